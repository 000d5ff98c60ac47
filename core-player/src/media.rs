//! Playlist item model.
//!
//! A [`MediaItem`] is an opaque id plus a playable URI and any externally
//! attached subtitle descriptors. The adapter owns an ordered sequence of
//! them (the playlist); items are replaced wholesale by `set_media_items`
//! and appended by `add_media_items`, never mutated in place.

use serde::{Deserialize, Serialize};

/// An external subtitle stream attached to a media item.
///
/// External subtitles cannot be loaded before the engine starts opening the
/// file; the adapter queues one `sub-add` command per descriptor and issues
/// them on the item's start-of-file event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleDescriptor {
    /// URI of the subtitle document.
    pub uri: String,
    /// Display label shown in track selection.
    pub label: String,
    /// ISO 639 language code.
    pub language: String,
}

/// One entry of the playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Opaque identifier chosen by the caller (e.g. a library item id).
    pub id: String,
    /// Playable URI handed to the engine's `loadfile` command.
    pub uri: String,
    /// Externally attached subtitles, possibly empty.
    pub subtitles: Vec<SubtitleDescriptor>,
}

impl MediaItem {
    /// Create an item with no external subtitles.
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: uri.into(),
            subtitles: Vec::new(),
        }
    }

    /// Attach external subtitle descriptors.
    pub fn with_subtitles(mut self, subtitles: Vec<SubtitleDescriptor>) -> Self {
        self.subtitles = subtitles;
        self
    }
}
