//! # Player Error Types

use thiserror::Error;

/// Errors surfaced by the playback-engine adapter.
///
/// The enum is `Clone` so the last playback failure can be retained and
/// handed out through [`MpvPlayer::player_error`](crate::MpvPlayer::player_error)
/// until the next prepare.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// Operation is deliberately unimplemented on this player variant.
    /// Callers must not assume success; there is no silent no-op path.
    #[error("Operation not supported by this player: {0}")]
    Unsupported(&'static str),

    /// Seek or start index outside the current playlist.
    #[error("Index {index} out of range for playlist of length {playlist_len}")]
    SeekOutOfRange { index: usize, playlist_len: usize },

    /// An operation required a non-empty playlist.
    #[error("The playlist is empty")]
    EmptyPlaylist,

    /// The requested track does not exist in the current track lists.
    #[error("No {track_type} track matches selection index {index}")]
    TrackNotFound {
        track_type: &'static str,
        index: i64,
    },

    /// Items cannot be inserted at this position while the player is
    /// prepared; only appending is supported after `prepare`.
    #[error("Cannot insert media items at index {0} into a prepared playlist")]
    InsertIntoPreparedPlaylist(usize),

    /// The adapter has been released; no further commands are accepted.
    #[error("Player has been released")]
    Released,

    /// Failure reported by the native engine (e.g. corrupt file, stream
    /// error). Carried as text because the native side only exposes a
    /// message.
    #[error("Engine failure: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
