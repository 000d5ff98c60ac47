//! Player event vocabulary.
//!
//! Discrete lifecycle state, change reasons, and the coalesced event flag
//! set delivered to listeners. Individual callbacks fire in mutation order;
//! the flag set is delivered once per flush so observers can react to a
//! consistent batch instead of transient intermediate combinations.

use std::fmt;

/// Discrete playback lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Initial state, and the state after a reset.
    Idle,
    /// The engine is loading or rebuffering the active item.
    Buffering,
    /// Playback can proceed as soon as `play_when_ready` is set.
    Ready,
    /// The last playlist item finished.
    Ended,
}

/// Why `play_when_ready` changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayWhenReadyChangeReason {
    /// Explicit caller request.
    UserRequest,
    /// The OS revoked audio focus.
    AudioFocusLoss,
    /// Playback reached the end of the media.
    EndOfMediaItem,
}

/// Why the active media item changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaItemTransitionReason {
    /// The playlist itself was replaced (e.g. `set_media_items` + `prepare`).
    PlaylistChanged,
    /// Automatic advancement at end of file.
    Auto,
    /// Caller seeked to a different playlist index.
    Seek,
}

/// Why the timeline was republished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineChangeReason {
    /// Window set changed because the playlist changed.
    PlaylistChanged,
    /// Window data (duration, seekability) was updated from the source.
    SourceUpdate,
}

/// Why the playback position jumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscontinuityReason {
    /// An explicit seek.
    Seek,
    /// Automatic transition to the next playlist item.
    AutoTransition,
}

/// One kind of observable player change. Each maps to a bit in [`Events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PlayerEvent {
    PlaybackStateChanged = 0,
    PlayWhenReadyChanged = 1,
    IsPlayingChanged = 2,
    TimelineChanged = 3,
    TracksChanged = 4,
    MediaItemTransition = 5,
    PositionDiscontinuity = 6,
    PlaybackParametersChanged = 7,
    PlayerErrorChanged = 8,
    RenderedFirstFrame = 9,
}

/// Set of [`PlayerEvent`] flags accumulated over one notification flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Events(u32);

impl Events {
    pub const EMPTY: Events = Events(0);

    /// Add an event flag to the set.
    pub fn add(&mut self, event: PlayerEvent) {
        self.0 |= 1 << event as u32;
    }

    /// Whether the set contains the given event.
    pub fn contains(&self, event: PlayerEvent) -> bool {
        self.0 & (1 << event as u32) != 0
    }

    /// Whether any of the given events is present.
    pub fn contains_any(&self, events: &[PlayerEvent]) -> bool {
        events.iter().any(|e| self.contains(*e))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Events({:#012b})", self.0)
    }
}

/// Playback speed and related parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackParameters {
    /// Speed multiplier; `1.0` is normal speed.
    pub speed: f64,
}

impl PlaybackParameters {
    pub const DEFAULT: PlaybackParameters = PlaybackParameters { speed: 1.0 };

    pub fn with_speed(self, speed: f64) -> Self {
        Self { speed }
    }
}

impl Default for PlaybackParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}
