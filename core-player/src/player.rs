//! Synchronous, pull-based player facade over the dispatch loop.
//!
//! [`MpvPlayer`] mirrors the shape of a framework media player: mutating
//! calls validate eagerly, post a command, and return immediately; getters
//! read the snapshot published by the dispatch task after each handled
//! message. Nothing here blocks on the native engine.

use crate::core::{PlayerCommand, PlayerCore, PlayerSnapshot};
use crate::dispatch::{self, AdapterMessage};
use crate::error::{PlayerError, Result};
use crate::events::{PlaybackParameters, PlaybackState};
use crate::listener::{ListenerSet, PlayerListener};
use crate::media::MediaItem;
use crate::timeline::Timeline;
use crate::tracks::{TrackType, Tracks};
use bridge_traits::engine::{EngineEventSink, SurfaceHandle};
use core_runtime::PlayerConfig;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

/// Which player implementation backs a `Player`-shaped handle.
///
/// Hosts that juggle multiple player backends branch on this tag instead of
/// downcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    /// This adapter: a native engine driven over the bridge.
    NativeBridge,
    /// A platform framework player supplied by the host.
    Framework,
}

impl PlayerKind {
    /// Whether the host UI's built-in track selection dialog works with
    /// this player. The native bridge exposes its own track model instead.
    pub fn supports_external_track_dialog(self) -> bool {
        matches!(self, PlayerKind::Framework)
    }
}

/// Repeat behavior. The native bridge does not implement repeat; the type
/// exists so hosts can pass their setting through a common surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

/// Preferred track languages applied across media items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSelectionParameters {
    pub preferred_audio_language: Option<String>,
    pub preferred_subtitle_language: Option<String>,
}

/// Playback-engine adapter with a synchronous `Player`-style surface.
///
/// Construct with [`MpvPlayer::new`] inside a tokio runtime; the adapter
/// spawns one dispatch task that owns all mutable state for the player's
/// lifetime. The handle itself is `Send + Sync` and is normally shared via
/// `Arc`.
pub struct MpvPlayer {
    kind: PlayerKind,
    messages: mpsc::UnboundedSender<AdapterMessage>,
    published: Arc<RwLock<PlayerSnapshot>>,
    listeners: Arc<ListenerSet>,
    playlist_len: AtomicUsize,
    prepared: AtomicBool,
    released: AtomicBool,
    dispatch: Mutex<Option<JoinHandle<()>>>,
    seek_back_increment_ms: i64,
    seek_forward_increment_ms: i64,
}

impl MpvPlayer {
    /// Initialize the engine and start the dispatch task.
    ///
    /// Fails with [`PlayerError::Engine`] when engine bootstrap (options,
    /// init, property observation) is rejected by the bridge. Must be called
    /// within a tokio runtime.
    pub fn new(config: PlayerConfig) -> Result<Self> {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let (engine_tx, engine_rx) = mpsc::unbounded_channel();
        let (focus_tx, focus_rx) = mpsc::unbounded_channel();

        PlayerCore::bootstrap(&config, EngineEventSink::new(engine_tx))
            .map_err(|e| PlayerError::Engine(e.to_string()))?;

        let listeners = Arc::new(ListenerSet::new());
        let published = Arc::new(RwLock::new(PlayerSnapshot::default()));
        let core = PlayerCore::new(&config, listeners.clone(), published.clone(), focus_tx);
        let dispatch = tokio::spawn(dispatch::run(core, message_rx, engine_rx, focus_rx));

        Ok(Self {
            kind: PlayerKind::NativeBridge,
            messages: message_tx,
            published,
            listeners,
            playlist_len: AtomicUsize::new(0),
            prepared: AtomicBool::new(false),
            released: AtomicBool::new(false),
            dispatch: Mutex::new(Some(dispatch)),
            seek_back_increment_ms: config.seek_back_increment_ms,
            seek_forward_increment_ms: config.seek_forward_increment_ms,
        })
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub fn add_listener(&self, listener: Arc<dyn PlayerListener>) {
        self.listeners.add(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn PlayerListener>) {
        self.listeners.remove(listener);
    }

    // ---- playlist -------------------------------------------------------

    /// Replace the playlist, starting at the first item.
    pub fn set_media_items(&self, items: Vec<MediaItem>) -> Result<()> {
        self.set_media_items_with_start(items, 0, 0)
    }

    /// Replace the playlist and select the initial item and position.
    pub fn set_media_items_with_start(
        &self,
        items: Vec<MediaItem>,
        start_index: usize,
        start_position_ms: i64,
    ) -> Result<()> {
        if start_index > 0 && start_index >= items.len() {
            return Err(PlayerError::SeekOutOfRange {
                index: start_index,
                playlist_len: items.len(),
            });
        }
        self.check_released()?;
        self.playlist_len.store(items.len(), Ordering::Release);
        self.prepared.store(false, Ordering::Release);
        self.post(PlayerCommand::SetMediaItems {
            items,
            start_index,
            start_position_ms,
        })
    }

    /// Insert items at `index`. Once prepared, only appending at the end of
    /// the playlist is supported; other positions fail loudly.
    pub fn add_media_items(&self, index: usize, items: Vec<MediaItem>) -> Result<()> {
        self.check_released()?;
        let len = self.playlist_len.load(Ordering::Acquire);
        if self.prepared.load(Ordering::Acquire) && index != len {
            return Err(PlayerError::InsertIntoPreparedPlaylist(index));
        }
        let index = index.min(len);
        self.playlist_len.store(len + items.len(), Ordering::Release);
        self.post(PlayerCommand::AddMediaItems { index, items })
    }

    /// Load the playlist into the engine and enter `Buffering`.
    pub fn prepare(&self) -> Result<()> {
        self.check_released()?;
        if self.playlist_len.load(Ordering::Acquire) == 0 {
            return Err(PlayerError::EmptyPlaylist);
        }
        self.prepared.store(true, Ordering::Release);
        self.post(PlayerCommand::Prepare)
    }

    pub fn move_media_items(&self, _from: usize, _to: usize, _new_index: usize) -> Result<()> {
        Err(PlayerError::Unsupported("move_media_items"))
    }

    pub fn remove_media_items(&self, _from: usize, _to: usize) -> Result<()> {
        Err(PlayerError::Unsupported("remove_media_items"))
    }

    // ---- transport ------------------------------------------------------

    pub fn play(&self) -> Result<()> {
        self.set_play_when_ready(true)
    }

    pub fn pause(&self) -> Result<()> {
        self.set_play_when_ready(false)
    }

    pub fn set_play_when_ready(&self, play_when_ready: bool) -> Result<()> {
        self.post(PlayerCommand::SetPlayWhenReady(play_when_ready))
    }

    /// Seek within the playlist. Same-index seeks reposition the current
    /// item; cross-index seeks switch items and buffer the position until
    /// the new item opens.
    pub fn seek_to(&self, index: usize, position_ms: i64) -> Result<()> {
        self.check_released()?;
        let len = self.playlist_len.load(Ordering::Acquire);
        if index >= len {
            return Err(PlayerError::SeekOutOfRange {
                index,
                playlist_len: len,
            });
        }
        self.post(PlayerCommand::SeekTo {
            index,
            position_ms: position_ms.max(0),
        })
    }

    /// Seek back by the configured increment, clamped to the item start.
    pub fn seek_back(&self) -> Result<()> {
        let (index, position_ms) = {
            let snapshot = self.published.read();
            (snapshot.current_index, snapshot.current_position_ms)
        };
        self.seek_to(index, (position_ms - self.seek_back_increment_ms).max(0))
    }

    /// Seek forward by the configured increment, clamped to the known
    /// duration.
    pub fn seek_forward(&self) -> Result<()> {
        let (index, target_ms) = {
            let snapshot = self.published.read();
            let mut target = snapshot.current_position_ms + self.seek_forward_increment_ms;
            if let Some(duration) = snapshot.duration_ms {
                target = target.min(duration);
            }
            (snapshot.current_index, target)
        };
        self.seek_to(index, target_ms)
    }

    pub fn set_playback_speed(&self, speed: f64) -> Result<()> {
        self.post(PlayerCommand::SetSpeed(speed))
    }

    /// Stop playback, keeping the playlist. The player returns to `Idle`
    /// and can be prepared again.
    pub fn stop(&self) -> Result<()> {
        self.check_released()?;
        self.prepared.store(false, Ordering::Release);
        self.post(PlayerCommand::Stop)
    }

    // ---- tracks ---------------------------------------------------------

    /// Select the track with the engine-native `id` of the given type, or
    /// disable the type with a negative id (subtitles and audio only).
    pub fn select_track(&self, kind: TrackType, id: i64) -> Result<()> {
        self.check_released()?;
        if id >= 0 {
            let snapshot = self.published.read();
            let known = snapshot
                .tracks
                .group(kind)
                .is_some_and(|group| group.formats.iter().any(|f| f.id == id));
            if !known {
                return Err(PlayerError::TrackNotFound {
                    track_type: kind.as_str(),
                    index: id,
                });
            }
        }
        self.post(PlayerCommand::SelectTrack { kind, id })
    }

    pub fn set_track_selection_parameters(
        &self,
        parameters: TrackSelectionParameters,
    ) -> Result<()> {
        self.post(PlayerCommand::SetTrackSelectionParameters(parameters))
    }

    // ---- volume / shuffle / repeat: not implemented by this backend -----

    pub fn set_volume(&self, _volume: f64) -> Result<()> {
        Err(PlayerError::Unsupported("set_volume"))
    }

    pub fn volume(&self) -> Result<f64> {
        Err(PlayerError::Unsupported("volume"))
    }

    pub fn set_shuffle_mode_enabled(&self, _enabled: bool) -> Result<()> {
        Err(PlayerError::Unsupported("set_shuffle_mode_enabled"))
    }

    pub fn set_repeat_mode(&self, _mode: RepeatMode) -> Result<()> {
        Err(PlayerError::Unsupported("set_repeat_mode"))
    }

    // ---- video surface --------------------------------------------------

    pub fn surface_created(&self, surface: SurfaceHandle) -> Result<()> {
        self.post(PlayerCommand::SurfaceCreated(surface))
    }

    pub fn surface_changed(&self, width: u32, height: u32) -> Result<()> {
        self.post(PlayerCommand::SurfaceChanged { width, height })
    }

    pub fn surface_destroyed(&self) -> Result<()> {
        self.post(PlayerCommand::SurfaceDestroyed)
    }

    // ---- lifecycle ------------------------------------------------------

    /// Release the player: abandon focus, tear the engine down, stop the
    /// dispatch task. Idempotent; all later commands fail with
    /// [`PlayerError::Released`] and getters keep serving the final state.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self
            .messages
            .send(AdapterMessage::Command(PlayerCommand::Release));
    }

    /// Wait for the dispatch task to finish after [`MpvPlayer::release`].
    pub async fn closed(&self) {
        let dispatch = self.dispatch.lock().take();
        if let Some(dispatch) = dispatch {
            if let Err(e) = dispatch.await {
                warn!("player dispatch task aborted: {e}");
            }
        }
    }

    /// Wait until every message posted before this call has been handled.
    pub async fn settled(&self) {
        let (tx, rx) = oneshot::channel();
        if self
            .messages
            .send(AdapterMessage::Settled(tx))
            .is_err()
        {
            return;
        }
        let _ = rx.await;
    }

    // ---- synchronous getters --------------------------------------------

    pub fn playback_state(&self) -> PlaybackState {
        self.published.read().playback_state
    }

    pub fn play_when_ready(&self) -> bool {
        self.published.read().play_when_ready
    }

    pub fn is_playing(&self) -> bool {
        self.published.read().is_playing
    }

    pub fn current_timeline(&self) -> Timeline {
        self.published.read().timeline.clone()
    }

    pub fn current_tracks(&self) -> Tracks {
        self.published.read().tracks.clone()
    }

    pub fn current_media_item_index(&self) -> usize {
        self.published.read().current_index
    }

    pub fn current_media_item(&self) -> Option<MediaItem> {
        let snapshot = self.published.read();
        snapshot
            .timeline
            .window(snapshot.current_index)
            .map(|w| w.media_item.clone())
    }

    pub fn media_item_count(&self) -> usize {
        self.playlist_len.load(Ordering::Acquire)
    }

    pub fn current_position_ms(&self) -> i64 {
        self.published.read().current_position_ms
    }

    pub fn buffered_position_ms(&self) -> i64 {
        self.published.read().buffered_position_ms
    }

    /// Duration of the active item, once the engine has reported it.
    pub fn duration_ms(&self) -> Option<i64> {
        self.published.read().duration_ms
    }

    pub fn playback_parameters(&self) -> PlaybackParameters {
        self.published.read().parameters
    }

    /// Last playback failure, retained until the next [`MpvPlayer::prepare`].
    pub fn player_error(&self) -> Option<PlayerError> {
        self.published.read().error.clone()
    }

    pub fn seek_back_increment_ms(&self) -> i64 {
        self.seek_back_increment_ms
    }

    pub fn seek_forward_increment_ms(&self) -> i64 {
        self.seek_forward_increment_ms
    }

    fn check_released(&self) -> Result<()> {
        if self.released.load(Ordering::Acquire) {
            return Err(PlayerError::Released);
        }
        Ok(())
    }

    fn post(&self, command: PlayerCommand) -> Result<()> {
        self.check_released()?;
        self.messages
            .send(AdapterMessage::Command(command))
            .map_err(|_| PlayerError::Released)
    }
}

impl Drop for MpvPlayer {
    fn drop(&mut self) {
        self.release();
    }
}
