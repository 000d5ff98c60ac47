//! OS audio-focus bridge.
//!
//! Audio focus is the operating system's arbitration of which application
//! may render audio at a given moment. The host adapter wraps the platform
//! API (e.g. `AudioManager` on Android) and reports focus transitions
//! through a [`FocusChangeSink`], mirroring the engine callback inversion
//! in [`engine`](crate::engine).

use crate::error::Result;
use tokio::sync::mpsc;

/// Focus transition reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFocusChange {
    /// Focus (re)gained; the pending restore action may run.
    Gain,
    /// Focus lost for an unbounded duration; playback should pause.
    Loss,
    /// Focus lost temporarily (e.g. an incoming call); playback should pause.
    LossTransient,
    /// Focus lost temporarily but the app may keep playing at reduced
    /// volume ("ducking").
    LossTransientCanDuck,
}

/// Queue endpoint the platform adapter posts focus changes into.
#[derive(Debug, Clone)]
pub struct FocusChangeSink {
    tx: mpsc::UnboundedSender<AudioFocusChange>,
}

impl FocusChangeSink {
    pub fn new(tx: mpsc::UnboundedSender<AudioFocusChange>) -> Self {
        Self { tx }
    }

    /// Post a focus change. Returns `false` once the adapter is released.
    pub fn post(&self, change: AudioFocusChange) -> bool {
        self.tx.send(change).is_ok()
    }
}

/// Platform audio-focus API.
pub trait AudioFocusController: Send + Sync {
    /// Request audio focus once, registering `sink` for subsequent focus
    /// transitions. Returns [`BridgeError::FocusDenied`](crate::BridgeError)
    /// when the OS refuses the grant; the caller treats that as non-fatal
    /// and starts playback paused.
    fn request_focus(&self, sink: FocusChangeSink) -> Result<()>;

    /// Abandon a previously granted focus. No further changes may be posted
    /// after this returns.
    fn abandon_focus(&self);
}
