//! Listener registration and coalesced fan-out.
//!
//! [`ListenerSet`] mirrors the notification discipline the rest of the
//! application expects from a `Player`: state mutations queue one callback
//! per change, and `flush_events` delivers the whole batch in order,
//! followed by a single `on_events` carrying the accumulated flag set.
//! Observers therefore never see a transient combination such as a state
//! change without its matching `is_playing` change.

use crate::error::PlayerError;
use crate::events::{
    DiscontinuityReason, Events, MediaItemTransitionReason, PlaybackParameters, PlaybackState,
    PlayWhenReadyChangeReason, PlayerEvent, TimelineChangeReason,
};
use crate::media::MediaItem;
use crate::timeline::Timeline;
use crate::tracks::Tracks;
use parking_lot::Mutex;
use std::sync::Arc;

/// Observer of player state. All methods have empty default bodies; implement
/// only the ones of interest.
///
/// Callbacks are invoked on the adapter's dispatch context, in mutation
/// order. Implementations may post commands back into the player but must
/// not block.
#[allow(unused_variables)]
pub trait PlayerListener: Send + Sync {
    fn on_playback_state_changed(&self, state: PlaybackState) {}

    fn on_play_when_ready_changed(&self, play_when_ready: bool, reason: PlayWhenReadyChangeReason) {
    }

    fn on_is_playing_changed(&self, is_playing: bool) {}

    fn on_timeline_changed(&self, timeline: &Timeline, reason: TimelineChangeReason) {}

    fn on_tracks_changed(&self, tracks: &Tracks) {}

    fn on_media_item_transition(
        &self,
        media_item: Option<&MediaItem>,
        reason: MediaItemTransitionReason,
    ) {
    }

    fn on_position_discontinuity(&self, reason: DiscontinuityReason) {}

    fn on_playback_parameters_changed(&self, parameters: PlaybackParameters) {}

    fn on_player_error(&self, error: &PlayerError) {}

    /// First video frame of the active item was rendered.
    fn on_rendered_first_frame(&self) {}

    /// Delivered once per flush with every flag raised during the batch.
    fn on_events(&self, events: Events) {}
}

type ListenerFn = Box<dyn Fn(&dyn PlayerListener) + Send>;

struct QueuedEvent {
    flag: PlayerEvent,
    deliver: ListenerFn,
}

/// Registered listeners plus the queue of not-yet-flushed notifications.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Mutex<Vec<Arc<dyn PlayerListener>>>,
    pending: Mutex<Vec<QueuedEvent>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Arc<dyn PlayerListener>) {
        self.listeners.lock().push(listener);
    }

    /// Remove a previously added listener, matched by pointer identity.
    pub fn remove(&self, listener: &Arc<dyn PlayerListener>) {
        self.listeners
            .lock()
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    /// Queue a notification without delivering it yet.
    pub fn queue_event(
        &self,
        flag: PlayerEvent,
        deliver: impl Fn(&dyn PlayerListener) + Send + 'static,
    ) {
        self.pending.lock().push(QueuedEvent {
            flag,
            deliver: Box::new(deliver),
        });
    }

    /// Queue a notification and flush immediately.
    pub fn send_event(
        &self,
        flag: PlayerEvent,
        deliver: impl Fn(&dyn PlayerListener) + Send + 'static,
    ) {
        self.queue_event(flag, deliver);
        self.flush_events();
    }

    /// Deliver every queued notification in order, then one `on_events`
    /// per listener with the accumulated flags.
    pub fn flush_events(&self) {
        let batch: Vec<QueuedEvent> = std::mem::take(&mut *self.pending.lock());
        if batch.is_empty() {
            return;
        }
        let listeners: Vec<Arc<dyn PlayerListener>> = self.listeners.lock().clone();
        let mut flags = Events::default();
        for event in &batch {
            flags.add(event.flag);
            for listener in &listeners {
                (event.deliver)(listener.as_ref());
            }
        }
        for listener in &listeners {
            listener.on_events(flags);
        }
    }
}
