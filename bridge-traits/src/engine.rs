//! Native engine bridge trait and notification types.
//!
//! The engine is an embedded, asynchronous media decode/playback library in
//! the style of libmpv: callers issue commands and set properties into its
//! internally thread-safe queue, and the engine reports state back through
//! observed-property and lifecycle-event callbacks on an engine-owned
//! thread. This module models both directions: [`EngineHandle`] for the
//! command direction, [`EngineEventSink`] + [`EngineNotification`] for the
//! callback direction.

use crate::error::Result;
use tokio::sync::mpsc;

/// Wire format requested when observing an engine property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyFormat {
    /// Boolean flag.
    Flag,
    /// Signed 64-bit integer.
    Int64,
    /// IEEE double.
    Double,
    /// UTF-8 string (JSON for structured properties such as `track-list`).
    String,
}

/// Why the engine stopped playing the current file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndFileReason {
    /// Playback ran off the end of the file.
    Eof,
    /// Playback was stopped by an external command.
    Stop,
    /// The engine is shutting down.
    Quit,
    /// Playback failed; `message` carries the native error description.
    Error { message: String },
    /// The file redirected to another entry (e.g. playlist files).
    Redirect,
    /// Reason code not mapped by the bridge.
    Unknown,
}

/// Lifecycle events the engine reports besides property changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine started opening a new file. Commands that require an open
    /// file (e.g. attaching external subtitles) become valid at this point.
    StartFile,
    /// A seek was initiated; playback is repositioning.
    Seek,
    /// Playback (re)started after opening a file or completing a seek.
    PlaybackRestart,
    /// Playback of the current file ended.
    EndFile { reason: EndFileReason },
}

/// A single typed callback payload emitted by the engine.
///
/// One variant per callback shape: the native observer API distinguishes
/// string, flag, integer and double properties, plus generic events.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineNotification {
    StringProperty { name: String, value: String },
    FlagProperty { name: String, value: bool },
    IntProperty { name: String, value: i64 },
    DoubleProperty { name: String, value: f64 },
    Event(EngineEvent),
}

/// Queue endpoint handed to the host engine adapter.
///
/// The native callback thread posts every notification into this sink in
/// emission order; the core drains the queue on one execution context, so
/// no two notifications are ever handled concurrently. Posting never blocks
/// the native thread.
#[derive(Debug, Clone)]
pub struct EngineEventSink {
    tx: mpsc::UnboundedSender<EngineNotification>,
}

impl EngineEventSink {
    /// Wrap a channel sender as a sink.
    pub fn new(tx: mpsc::UnboundedSender<EngineNotification>) -> Self {
        Self { tx }
    }

    /// Post a notification.
    ///
    /// Returns `false` when the adapter has been released and the
    /// notification was dropped; implementations should stop posting once
    /// this happens.
    pub fn post(&self, notification: EngineNotification) -> bool {
        self.tx.send(notification).is_ok()
    }
}

/// Opaque handle to a native window/surface the engine renders video into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Command/property surface of the native media engine.
///
/// All methods are fire-and-forget into the engine's own thread-safe queue;
/// no call blocks on decode work, and no result is assumed synchronously
/// except for the explicit `get_property_*` accessors. Malformed option or
/// command strings are the engine's concern; implementations report failures
/// as [`BridgeError`](crate::BridgeError) and must never panic across the
/// bridge.
pub trait EngineHandle: Send + Sync {
    /// Finish engine initialization. Options that must be set before
    /// initialization go through [`EngineHandle::set_option`] first.
    fn init(&self) -> Result<()>;

    /// Set a startup or runtime option string.
    fn set_option(&self, name: &str, value: &str) -> Result<()>;

    fn set_property_flag(&self, name: &str, value: bool) -> Result<()>;
    fn set_property_int(&self, name: &str, value: i64) -> Result<()>;
    fn set_property_double(&self, name: &str, value: f64) -> Result<()>;
    fn set_property_string(&self, name: &str, value: &str) -> Result<()>;

    fn get_property_flag(&self, name: &str) -> Result<bool>;
    fn get_property_int(&self, name: &str) -> Result<i64>;
    fn get_property_string(&self, name: &str) -> Result<String>;

    /// Ask the engine to report changes of `name` in the given format
    /// through the installed sink.
    fn observe_property(&self, name: &str, format: PropertyFormat) -> Result<()>;

    /// Issue a raw engine command (e.g. `["loadfile", url]`).
    fn command(&self, args: &[&str]) -> Result<()>;

    /// Install the notification sink. At most one sink is active; installing
    /// replaces any previous one.
    fn install_sink(&self, sink: EngineEventSink) -> Result<()>;

    /// Remove the notification sink; no further notifications may be posted
    /// after this returns.
    fn remove_sink(&self) -> Result<()>;

    /// Attach a video output surface.
    fn attach_surface(&self, surface: SurfaceHandle) -> Result<()>;

    /// Detach the video output surface.
    fn detach_surface(&self) -> Result<()>;

    /// Tear the engine down. The handle must not be used afterwards.
    fn destroy(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_reports_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = EngineEventSink::new(tx);
        assert!(sink.post(EngineNotification::Event(EngineEvent::Seek)));
        drop(rx);
        assert!(!sink.post(EngineNotification::Event(EngineEvent::Seek)));
    }
}
