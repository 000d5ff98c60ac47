//! Single-queue serializer for commands, engine notifications, and focus
//! changes.
//!
//! Everything that can mutate [`PlayerCore`] enters through one of three
//! unbounded channels and is drained by a single task, so handlers run
//! strictly in emission order and never concurrently. Engine notifications
//! take priority over caller commands: a command posted after a
//! notification always observes that notification's effects.

use crate::core::{Flow, PlayerCommand, PlayerCore};
use bridge_traits::engine::EngineNotification;
use bridge_traits::focus::AudioFocusChange;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Message on the caller-facing queue.
#[derive(Debug)]
pub(crate) enum AdapterMessage {
    Command(PlayerCommand),
    /// Barrier: acknowledged once every previously posted message has been
    /// handled. Lets callers and tests await quiescence.
    Settled(oneshot::Sender<()>),
}

/// Drain the queues until release. Owns the core exclusively.
pub(crate) async fn run(
    mut core: PlayerCore,
    mut messages: mpsc::UnboundedReceiver<AdapterMessage>,
    mut engine_rx: mpsc::UnboundedReceiver<EngineNotification>,
    mut focus_rx: mpsc::UnboundedReceiver<AudioFocusChange>,
) {
    loop {
        tokio::select! {
            biased;

            Some(notification) = engine_rx.recv() => {
                core.handle_notification(notification);
            }
            Some(change) = focus_rx.recv() => {
                core.handle_focus_change(change);
            }
            message = messages.recv() => match message {
                Some(AdapterMessage::Command(command)) => {
                    if core.handle_command(command) == Flow::Shutdown {
                        break;
                    }
                }
                Some(AdapterMessage::Settled(ack)) => {
                    let _ = ack.send(());
                }
                None => break,
            },
        }
        core.publish();
    }

    // Closing the receivers drops anything still queued; late sink posts
    // report a closed channel to the bridge.
    engine_rx.close();
    focus_rx.close();
    core.shutdown();
    core.publish();
    debug!("player dispatch loop terminated");
}
