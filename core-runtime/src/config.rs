//! # Player Configuration
//!
//! Builder for the dependencies and policy knobs of the playback-engine
//! adapter. The builder enforces fail-fast validation: the native engine
//! bridge is mandatory and its absence produces an actionable
//! [`CoreError::CapabilityMissing`] instead of a latent panic deep inside
//! the adapter.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::PlayerConfig;
//! use std::sync::Arc;
//!
//! let config = PlayerConfig::builder()
//!     .engine(Arc::new(MyEngineBridge::new()))
//!     .audio_focus(Arc::new(MyFocusBridge::new()))
//!     .preferred_audio_language("eng")
//!     .preferred_subtitle_language("eng")
//!     .build()?;
//! ```

use crate::error::{CoreError, Result};
use bridge_traits::{AudioFocusController, EngineHandle};
use std::sync::Arc;

/// Default seek-back increment exposed to transport controls, in ms.
pub const DEFAULT_SEEK_BACK_INCREMENT_MS: i64 = 5_000;

/// Default seek-forward increment exposed to transport controls, in ms.
pub const DEFAULT_SEEK_FORWARD_INCREMENT_MS: i64 = 15_000;

/// Configuration for one playback-engine adapter instance.
///
/// An adapter owns exactly one native engine for its lifetime, so the
/// engine handle is injected here rather than created internally. Use
/// [`PlayerConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct PlayerConfig {
    /// Bridge to the native decoding engine. Required.
    pub engine: Arc<dyn EngineHandle>,

    /// Bridge to the OS audio-focus API. Optional; without it the adapter
    /// plays without focus arbitration (e.g. headless hosts, tests).
    pub audio_focus: Option<Arc<dyn AudioFocusController>>,

    /// Whether to request audio focus at construction.
    pub request_audio_focus: bool,

    /// Preferred audio track language (engine `alang` option).
    pub preferred_audio_language: Option<String>,

    /// Preferred subtitle track language (engine `slang` option).
    pub preferred_subtitle_language: Option<String>,

    /// When `true`, reaching the end of a media item pauses instead of
    /// auto-advancing to the next playlist entry.
    pub pause_at_end_of_media_item: bool,

    /// Video output driver handed to the engine when a surface attaches.
    pub video_output: String,

    /// Seek-back increment in milliseconds.
    pub seek_back_increment_ms: i64,

    /// Seek-forward increment in milliseconds.
    pub seek_forward_increment_ms: i64,
}

impl PlayerConfig {
    /// Start building a configuration.
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("engine", &"<dyn EngineHandle>")
            .field(
                "audio_focus",
                &self.audio_focus.as_ref().map(|_| "<dyn AudioFocusController>"),
            )
            .field("request_audio_focus", &self.request_audio_focus)
            .field("preferred_audio_language", &self.preferred_audio_language)
            .field("preferred_subtitle_language", &self.preferred_subtitle_language)
            .field("pause_at_end_of_media_item", &self.pause_at_end_of_media_item)
            .field("video_output", &self.video_output)
            .field("seek_back_increment_ms", &self.seek_back_increment_ms)
            .field("seek_forward_increment_ms", &self.seek_forward_increment_ms)
            .finish()
    }
}

/// Builder for [`PlayerConfig`].
#[derive(Default)]
pub struct PlayerConfigBuilder {
    engine: Option<Arc<dyn EngineHandle>>,
    audio_focus: Option<Arc<dyn AudioFocusController>>,
    request_audio_focus: bool,
    preferred_audio_language: Option<String>,
    preferred_subtitle_language: Option<String>,
    pause_at_end_of_media_item: bool,
    video_output: Option<String>,
    seek_back_increment_ms: Option<i64>,
    seek_forward_increment_ms: Option<i64>,
}

impl PlayerConfigBuilder {
    pub fn engine(mut self, engine: Arc<dyn EngineHandle>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn audio_focus(mut self, controller: Arc<dyn AudioFocusController>) -> Self {
        self.audio_focus = Some(controller);
        self.request_audio_focus = true;
        self
    }

    /// Override whether focus is requested at construction (defaults to
    /// `true` once a controller is provided).
    pub fn request_audio_focus(mut self, request: bool) -> Self {
        self.request_audio_focus = request;
        self
    }

    pub fn preferred_audio_language(mut self, lang: impl Into<String>) -> Self {
        self.preferred_audio_language = Some(lang.into());
        self
    }

    pub fn preferred_subtitle_language(mut self, lang: impl Into<String>) -> Self {
        self.preferred_subtitle_language = Some(lang.into());
        self
    }

    pub fn pause_at_end_of_media_item(mut self, pause: bool) -> Self {
        self.pause_at_end_of_media_item = pause;
        self
    }

    pub fn video_output(mut self, driver: impl Into<String>) -> Self {
        self.video_output = Some(driver.into());
        self
    }

    pub fn seek_back_increment_ms(mut self, ms: i64) -> Self {
        self.seek_back_increment_ms = Some(ms);
        self
    }

    pub fn seek_forward_increment_ms(mut self, ms: i64) -> Self {
        self.seek_forward_increment_ms = Some(ms);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<PlayerConfig> {
        let engine = self.engine.ok_or_else(|| CoreError::CapabilityMissing {
            capability: "EngineHandle".to_string(),
            message: "No native engine bridge provided. \
                      Inject the platform engine adapter via PlayerConfigBuilder::engine."
                .to_string(),
        })?;

        if self.request_audio_focus && self.audio_focus.is_none() {
            return Err(CoreError::CapabilityMissing {
                capability: "AudioFocusController".to_string(),
                message: "request_audio_focus is set but no focus bridge was provided."
                    .to_string(),
            });
        }

        let seek_back = self
            .seek_back_increment_ms
            .unwrap_or(DEFAULT_SEEK_BACK_INCREMENT_MS);
        let seek_forward = self
            .seek_forward_increment_ms
            .unwrap_or(DEFAULT_SEEK_FORWARD_INCREMENT_MS);
        if seek_back <= 0 || seek_forward <= 0 {
            return Err(CoreError::InvalidConfig(
                "seek increments must be positive".to_string(),
            ));
        }

        Ok(PlayerConfig {
            engine,
            audio_focus: self.audio_focus,
            request_audio_focus: self.request_audio_focus,
            preferred_audio_language: self.preferred_audio_language,
            preferred_subtitle_language: self.preferred_subtitle_language,
            pause_at_end_of_media_item: self.pause_at_end_of_media_item,
            video_output: self.video_output.unwrap_or_else(|| "gpu".to_string()),
            seek_back_increment_ms: seek_back,
            seek_forward_increment_ms: seek_forward,
        })
    }
}
