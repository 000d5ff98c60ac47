//! Playback-engine adapter: drives a native async media engine through the
//! bridge traits and exposes it as a synchronous, pull-based player.
//!
//! The adapter serializes every input — caller commands, engine
//! notifications, audio-focus changes — through one dispatch task that owns
//! all mutable state, and publishes a read-only snapshot after each handled
//! message. Callers get eager validation and non-blocking commands;
//! listeners get ordered callbacks with coalesced event batches.
//!
//! Entry point: [`MpvPlayer`], configured via
//! [`core_runtime::PlayerConfig`].

mod core;
mod dispatch;
mod focus;

pub mod error;
pub mod events;
pub mod listener;
pub mod media;
pub mod player;
pub mod timeline;
pub mod tracks;

pub use error::{PlayerError, Result};
pub use events::{
    DiscontinuityReason, Events, MediaItemTransitionReason, PlaybackParameters, PlaybackState,
    PlayWhenReadyChangeReason, PlayerEvent, TimelineChangeReason,
};
pub use listener::{ListenerSet, PlayerListener};
pub use media::{MediaItem, SubtitleDescriptor};
pub use player::{MpvPlayer, PlayerKind, RepeatMode, TrackSelectionParameters};
pub use timeline::{Timeline, Window};
pub use tracks::{Format, Track, TrackGroup, TrackType, Tracks};
