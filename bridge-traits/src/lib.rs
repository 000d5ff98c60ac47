//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback core and the host it
//! is embedded in. The core drives a native, event-driven media engine and
//! arbitrates OS audio focus, but it never links against either directly:
//! each capability is a trait the host satisfies with a platform adapter
//! (JNI bridge on Android, FFI shim on desktop, fakes in tests).
//!
//! ## Traits
//!
//! - [`EngineHandle`](engine::EngineHandle) - command/property surface of the
//!   native decoding engine
//! - [`AudioFocusController`](focus::AudioFocusController) - OS audio-focus
//!   request/abandon API
//!
//! ## Callback inversion
//!
//! The native engine emits property changes and events on its own thread.
//! Rather than having the core implement a foreign observer interface, the
//! host adapter is handed an [`EngineEventSink`](engine::EngineEventSink)
//! (respectively a [`FocusChangeSink`](focus::FocusChangeSink)) and posts
//! typed notifications into it. The core drains them on a single execution
//! context, preserving emission order.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Platform
//! implementations should convert native error codes into it with an
//! actionable message; the core logs and contains these failures rather than
//! letting them surface into caller code.

pub mod engine;
pub mod error;
pub mod focus;

pub use error::BridgeError;

// Re-export commonly used types
pub use engine::{
    EndFileReason, EngineEvent, EngineEventSink, EngineHandle, EngineNotification,
    PropertyFormat, SurfaceHandle,
};
pub use focus::{AudioFocusChange, AudioFocusController, FocusChangeSink};
