//! Timeline synthesized from the playlist and engine-reported properties.
//!
//! The engine has no timeline concept of its own, so the adapter builds
//! one window per playlist item. Only the active window carries live data:
//! its duration stays unset until the engine reports one, and its
//! seekability mirrors the engine's `seekable` flag (a stream that cannot
//! be seeked is treated as dynamic).

use crate::media::MediaItem;

/// One playlist item's slot in the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub media_item: MediaItem,
    /// Known duration in milliseconds; `None` until the engine reports it.
    pub duration_ms: Option<i64>,
    pub is_seekable: bool,
    /// Live or otherwise unseekable content is dynamic.
    pub is_dynamic: bool,
}

impl Window {
    fn new(media_item: MediaItem) -> Self {
        Self {
            media_item,
            duration_ms: None,
            is_seekable: true,
            is_dynamic: false,
        }
    }
}

/// Ordered window set mirroring the playlist.
///
/// Rebuilt wholesale when the playlist changes and patched in place when
/// the engine reports duration or seekability for the active item. Every
/// distinct value fires exactly one timeline-changed notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    pub windows: Vec<Window>,
}

impl Timeline {
    pub const EMPTY: Timeline = Timeline {
        windows: Vec::new(),
    };

    /// Build a fresh timeline with one window per playlist item.
    pub fn from_media_items(items: &[MediaItem]) -> Self {
        Self {
            windows: items.iter().cloned().map(Window::new).collect(),
        }
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn window(&self, index: usize) -> Option<&Window> {
        self.windows.get(index)
    }

    /// Record the engine-reported duration of the given window. Returns
    /// `true` when the stored value changed.
    pub fn set_window_duration(&mut self, index: usize, duration_ms: i64) -> bool {
        match self.windows.get_mut(index) {
            Some(window) if window.duration_ms != Some(duration_ms) => {
                window.duration_ms = Some(duration_ms);
                true
            }
            _ => false,
        }
    }

    /// Record seekability of the given window. Returns `true` on change.
    pub fn set_window_seekable(&mut self, index: usize, seekable: bool) -> bool {
        match self.windows.get_mut(index) {
            Some(window) if window.is_seekable != seekable => {
                window.is_seekable = seekable;
                window.is_dynamic = !seekable;
                true
            }
            _ => false,
        }
    }
}
