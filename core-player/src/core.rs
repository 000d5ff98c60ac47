//! Adapter-owned playback state and the handlers that mutate it.
//!
//! [`PlayerCore`] is owned exclusively by the dispatch task; every caller
//! command, engine notification, and audio-focus change funnels through one
//! of its `handle_*` methods, strictly one at a time. After each message the
//! dispatch task calls [`PlayerCore::publish`] so the facade's synchronous
//! getters observe a consistent snapshot.
//!
//! Engine command failures are logged and swallowed here; a flaky native
//! call must not surface as a caller error from an unrelated operation.

use crate::error::PlayerError;
use crate::events::{
    DiscontinuityReason, MediaItemTransitionReason, PlaybackParameters, PlaybackState,
    PlayWhenReadyChangeReason, PlayerEvent, TimelineChangeReason,
};
use crate::focus::{FocusRestore, FocusStack, DUCK_VOLUME_FACTOR};
use crate::listener::ListenerSet;
use crate::media::MediaItem;
use crate::player::TrackSelectionParameters;
use crate::timeline::Timeline;
use crate::tracks::{parse_track_list, TrackType, Tracks};
use bridge_traits::engine::{
    EndFileReason, EngineEvent, EngineEventSink, EngineHandle, EngineNotification, PropertyFormat,
    SurfaceHandle,
};
use bridge_traits::focus::{AudioFocusChange, AudioFocusController, FocusChangeSink};
use bridge_traits::BridgeError;
use core_runtime::PlayerConfig;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Startup options issued before `init`. Mirrors a conservative embedded
/// profile: caching on, no implicit window, files kept open at EOF so the
/// adapter controls end-of-item advancement itself.
const STARTUP_OPTIONS: &[(&str, &str)] = &[
    ("cache", "yes"),
    ("cache-pause-initial", "yes"),
    ("force-window", "no"),
    ("keep-open", "always"),
    ("save-position-on-quit", "no"),
    ("sub-font-provider", "none"),
    ("ytdl", "no"),
];

/// Properties observed after `init`. Integer time properties arrive in
/// seconds and are converted to milliseconds on receipt.
const OBSERVED_PROPERTIES: &[(&str, PropertyFormat)] = &[
    ("track-list", PropertyFormat::String),
    ("paused-for-cache", PropertyFormat::Flag),
    ("eof-reached", PropertyFormat::Flag),
    ("seekable", PropertyFormat::Flag),
    ("time-pos", PropertyFormat::Int64),
    ("duration", PropertyFormat::Int64),
    ("demuxer-cache-time", PropertyFormat::Int64),
    ("speed", PropertyFormat::Double),
];

/// Read-only state mirror published after every handled message.
#[derive(Debug, Clone)]
pub(crate) struct PlayerSnapshot {
    pub(crate) playback_state: PlaybackState,
    pub(crate) play_when_ready: bool,
    pub(crate) is_playing: bool,
    pub(crate) timeline: Timeline,
    pub(crate) tracks: Tracks,
    pub(crate) current_index: usize,
    pub(crate) current_position_ms: i64,
    pub(crate) buffered_position_ms: i64,
    pub(crate) duration_ms: Option<i64>,
    pub(crate) parameters: PlaybackParameters,
    pub(crate) error: Option<PlayerError>,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            playback_state: PlaybackState::Idle,
            play_when_ready: false,
            is_playing: false,
            timeline: Timeline::EMPTY,
            tracks: Tracks::EMPTY,
            current_index: 0,
            current_position_ms: 0,
            buffered_position_ms: 0,
            duration_ms: None,
            parameters: PlaybackParameters::DEFAULT,
            error: None,
        }
    }
}

/// Caller commands posted through the dispatch queue.
#[derive(Debug)]
pub(crate) enum PlayerCommand {
    SetMediaItems {
        items: Vec<MediaItem>,
        start_index: usize,
        start_position_ms: i64,
    },
    AddMediaItems {
        index: usize,
        items: Vec<MediaItem>,
    },
    Prepare,
    SetPlayWhenReady(bool),
    SeekTo {
        index: usize,
        position_ms: i64,
    },
    SetSpeed(f64),
    SelectTrack {
        kind: TrackType,
        id: i64,
    },
    SetTrackSelectionParameters(TrackSelectionParameters),
    Stop,
    SurfaceCreated(SurfaceHandle),
    SurfaceChanged {
        width: u32,
        height: u32,
    },
    SurfaceDestroyed,
    Release,
}

/// Whether the dispatch loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Shutdown,
}

pub(crate) struct PlayerCore {
    engine: Arc<dyn EngineHandle>,
    audio_focus: Option<Arc<dyn AudioFocusController>>,
    request_audio_focus: bool,
    pause_at_end_of_media_item: bool,
    video_output: String,
    listeners: Arc<ListenerSet>,
    published: Arc<RwLock<PlayerSnapshot>>,
    focus_tx: mpsc::UnboundedSender<AudioFocusChange>,

    playlist: Vec<MediaItem>,
    current_index: usize,
    playback_state: PlaybackState,
    play_when_ready: bool,
    parameters: PlaybackParameters,
    timeline: Timeline,
    tracks: Tracks,
    current_position_ms: i64,
    buffered_position_ms: i64,
    duration_ms: Option<i64>,
    error: Option<PlayerError>,

    /// `prepare` has been issued and the playlist is loaded in the engine.
    prepared: bool,
    /// A file switch is in flight; the next `PlaybackRestart` belongs to it.
    awaiting_restart: bool,
    first_frame_rendered: bool,
    /// Seek target buffered until the in-flight item opens.
    initial_seek_ms: Option<i64>,
    /// Commands that require an open file, issued on the next `StartFile`.
    initial_commands: Vec<Vec<String>>,
    focus_stack: FocusStack,
    focus_granted: bool,
}

impl PlayerCore {
    pub(crate) fn new(
        config: &PlayerConfig,
        listeners: Arc<ListenerSet>,
        published: Arc<RwLock<PlayerSnapshot>>,
        focus_tx: mpsc::UnboundedSender<AudioFocusChange>,
    ) -> Self {
        Self {
            engine: config.engine.clone(),
            audio_focus: config.audio_focus.clone(),
            request_audio_focus: config.request_audio_focus,
            pause_at_end_of_media_item: config.pause_at_end_of_media_item,
            video_output: config.video_output.clone(),
            listeners,
            published,
            focus_tx,
            playlist: Vec::new(),
            current_index: 0,
            playback_state: PlaybackState::Idle,
            play_when_ready: false,
            parameters: PlaybackParameters::DEFAULT,
            timeline: Timeline::EMPTY,
            tracks: Tracks::EMPTY,
            current_position_ms: 0,
            buffered_position_ms: 0,
            duration_ms: None,
            error: None,
            prepared: false,
            awaiting_restart: false,
            first_frame_rendered: false,
            initial_seek_ms: None,
            initial_commands: Vec::new(),
            focus_stack: FocusStack::new(),
            focus_granted: false,
        }
    }

    /// Configure and initialize the engine, then register the observers.
    /// Runs once, before the dispatch loop starts.
    pub(crate) fn bootstrap(
        config: &PlayerConfig,
        sink: EngineEventSink,
    ) -> Result<(), BridgeError> {
        let engine = &config.engine;
        for (name, value) in STARTUP_OPTIONS {
            engine.set_option(name, value)?;
        }
        if let Some(lang) = &config.preferred_audio_language {
            engine.set_option("alang", lang)?;
        }
        if let Some(lang) = &config.preferred_subtitle_language {
            engine.set_option("slang", lang)?;
        }
        // Rendering starts only once a surface attaches.
        engine.set_option("vo", "null")?;
        engine.init()?;
        for (name, format) in OBSERVED_PROPERTIES {
            engine.observe_property(name, *format)?;
        }
        engine.install_sink(sink)?;
        Ok(())
    }

    // ---- caller commands ------------------------------------------------

    pub(crate) fn handle_command(&mut self, command: PlayerCommand) -> Flow {
        match command {
            PlayerCommand::SetMediaItems {
                items,
                start_index,
                start_position_ms,
            } => self.set_media_items(items, start_index, start_position_ms),
            PlayerCommand::AddMediaItems { index, items } => self.add_media_items(index, items),
            PlayerCommand::Prepare => self.prepare(),
            PlayerCommand::SetPlayWhenReady(play) => self.set_play_when_ready(play),
            PlayerCommand::SeekTo { index, position_ms } => self.seek_to(index, position_ms),
            PlayerCommand::SetSpeed(speed) => self.set_speed(speed),
            PlayerCommand::SelectTrack { kind, id } => self.select_track(kind, id),
            PlayerCommand::SetTrackSelectionParameters(parameters) => {
                self.set_track_selection_parameters(parameters)
            }
            PlayerCommand::Stop => self.stop(),
            PlayerCommand::SurfaceCreated(surface) => self.surface_created(surface),
            PlayerCommand::SurfaceChanged { width, height } => {
                self.surface_changed(width, height)
            }
            PlayerCommand::SurfaceDestroyed => self.surface_destroyed(),
            PlayerCommand::Release => return Flow::Shutdown,
        }
        Flow::Continue
    }

    fn set_media_items(&mut self, items: Vec<MediaItem>, start_index: usize, start_position_ms: i64) {
        self.playlist = items;
        self.prepared = false;
        self.awaiting_restart = false;
        self.reset_item_state();
        self.current_index = start_index.min(self.playlist.len().saturating_sub(1));
        if start_position_ms > 0 {
            self.initial_seek_ms = Some(start_position_ms);
        }
        self.timeline = Timeline::from_media_items(&self.playlist);
        self.queue_timeline_changed(TimelineChangeReason::PlaylistChanged);
        self.update_state(None, Some(PlaybackState::Idle));
    }

    fn add_media_items(&mut self, index: usize, items: Vec<MediaItem>) {
        if self.prepared {
            // Facade only lets appends through once prepared.
            for item in &items {
                self.command(&["loadfile", &item.uri, "append"]);
            }
        }
        let index = index.min(self.playlist.len());
        let inserted = items.len();
        let was_empty = self.playlist.is_empty();
        self.playlist.splice(index..index, items);
        if !was_empty && index <= self.current_index {
            self.current_index += inserted;
        }
        self.timeline = Timeline::from_media_items(&self.playlist);
        self.queue_timeline_changed(TimelineChangeReason::PlaylistChanged);
        self.listeners.flush_events();
    }

    fn prepare(&mut self) {
        if self.playlist.is_empty() {
            return;
        }
        self.error = None;
        for (i, item) in self.playlist.iter().enumerate() {
            let mode = if i == 0 { "replace" } else { "append" };
            if let Err(e) = self.engine.command(&["loadfile", &item.uri, mode]) {
                warn!(uri = %item.uri, "loadfile failed: {e}");
            }
        }
        if self.current_index > 0 {
            let index = self.current_index.to_string();
            self.command(&["playlist-play-index", &index]);
        }
        self.queue_initial_commands();
        self.prepared = true;
        self.awaiting_restart = true;
        self.set_engine_pause(!self.play_when_ready);
        self.queue_media_item_transition(MediaItemTransitionReason::PlaylistChanged);
        self.update_state(None, Some(PlaybackState::Buffering));
    }

    fn set_play_when_ready(&mut self, play: bool) {
        if play && !self.acquire_focus() {
            warn!("audio focus denied, staying paused");
            self.set_engine_pause(true);
            self.update_state(
                Some((false, PlayWhenReadyChangeReason::AudioFocusLoss)),
                None,
            );
            return;
        }
        self.set_engine_pause(!play);
        self.update_state(Some((play, PlayWhenReadyChangeReason::UserRequest)), None);
    }

    fn seek_to(&mut self, index: usize, position_ms: i64) {
        if index == self.current_index {
            if self.prepared && !self.awaiting_restart {
                let seconds = (position_ms / 1000).to_string();
                self.command(&["seek", &seconds, "absolute"]);
            } else {
                // Applied exactly once, on the restart that opens the item.
                self.initial_seek_ms = Some(position_ms);
            }
            self.current_position_ms = position_ms;
        } else {
            self.switch_to_item(
                index,
                Some(position_ms),
                MediaItemTransitionReason::Seek,
                DiscontinuityReason::Seek,
            );
        }
    }

    fn set_speed(&mut self, speed: f64) {
        if let Err(e) = self.engine.set_property_double("speed", speed) {
            warn!("setting playback speed failed: {e}");
            return;
        }
        if self.parameters.speed != speed {
            self.parameters = self.parameters.with_speed(speed);
            let parameters = self.parameters;
            self.listeners
                .send_event(PlayerEvent::PlaybackParametersChanged, move |l| {
                    l.on_playback_parameters_changed(parameters)
                });
        }
    }

    fn select_track(&mut self, kind: TrackType, id: i64) {
        let property = kind.selection_property();
        let result = if id >= 0 {
            self.engine.set_property_int(property, id)
        } else {
            self.engine.set_property_string(property, "no")
        };
        if let Err(e) = result {
            warn!(track_type = kind.as_str(), id, "track selection failed: {e}");
        }
    }

    fn set_track_selection_parameters(&mut self, parameters: TrackSelectionParameters) {
        if let Some(lang) = &parameters.preferred_audio_language {
            self.set_engine_string("alang", lang);
        }
        if let Some(lang) = &parameters.preferred_subtitle_language {
            self.set_engine_string("slang", lang);
        }
    }

    fn stop(&mut self) {
        self.command(&["stop", "keep-playlist"]);
        self.prepared = false;
        self.awaiting_restart = false;
        self.reset_item_state();
        self.update_state(None, Some(PlaybackState::Idle));
    }

    fn surface_created(&mut self, surface: SurfaceHandle) {
        if let Err(e) = self.engine.attach_surface(surface) {
            warn!("attaching surface failed: {e}");
            return;
        }
        self.set_engine_option("force-window", "yes");
        let driver = self.video_output.clone();
        self.set_engine_string("vo", &driver);
    }

    fn surface_changed(&mut self, width: u32, height: u32) {
        let size = format!("{width}x{height}");
        self.set_engine_string("android-surface-size", &size);
    }

    fn surface_destroyed(&mut self) {
        self.set_engine_string("vo", "null");
        self.set_engine_option("force-window", "no");
        if let Err(e) = self.engine.detach_surface() {
            warn!("detaching surface failed: {e}");
        }
    }

    /// Final teardown after the dispatch loop exits.
    pub(crate) fn shutdown(&mut self) {
        if let Some(controller) = &self.audio_focus {
            controller.abandon_focus();
        }
        self.focus_granted = false;
        self.focus_stack.clear();
        if let Err(e) = self.engine.remove_sink() {
            debug!("removing engine sink failed: {e}");
        }
        if let Err(e) = self.engine.destroy() {
            warn!("engine teardown failed: {e}");
        }
        self.prepared = false;
        self.awaiting_restart = false;
        self.reset_item_state();
        self.update_state(
            Some((false, PlayWhenReadyChangeReason::UserRequest)),
            Some(PlaybackState::Idle),
        );
    }

    // ---- engine notifications -------------------------------------------

    pub(crate) fn handle_notification(&mut self, notification: EngineNotification) {
        match notification {
            EngineNotification::StringProperty { name, value } => {
                if name == "track-list" {
                    self.on_track_list(&value);
                }
            }
            EngineNotification::FlagProperty { name, value } => match name.as_str() {
                "eof-reached" => {
                    if value && self.prepared && !self.awaiting_restart {
                        self.on_end_of_item();
                    }
                }
                "paused-for-cache" => {
                    if self.prepared && !self.awaiting_restart {
                        let state = if value {
                            PlaybackState::Buffering
                        } else {
                            PlaybackState::Ready
                        };
                        self.update_state(None, Some(state));
                    }
                }
                "seekable" => {
                    if self.timeline.set_window_seekable(self.current_index, value) {
                        self.queue_timeline_changed(TimelineChangeReason::SourceUpdate);
                        self.listeners.flush_events();
                    }
                }
                _ => {}
            },
            EngineNotification::IntProperty { name, value } => match name.as_str() {
                "time-pos" => self.current_position_ms = value * 1000,
                "duration" => {
                    let duration_ms = value * 1000;
                    self.duration_ms = Some(duration_ms);
                    if self.timeline.set_window_duration(self.current_index, duration_ms) {
                        self.queue_timeline_changed(TimelineChangeReason::SourceUpdate);
                        self.listeners.flush_events();
                    }
                }
                "demuxer-cache-time" => self.buffered_position_ms = value * 1000,
                _ => {}
            },
            EngineNotification::DoubleProperty { name, value } => {
                if name == "speed" && self.parameters.speed != value {
                    self.parameters = self.parameters.with_speed(value);
                    let parameters = self.parameters;
                    self.listeners
                        .send_event(PlayerEvent::PlaybackParametersChanged, move |l| {
                            l.on_playback_parameters_changed(parameters)
                        });
                }
            }
            EngineNotification::Event(event) => self.handle_event(event),
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::StartFile => {
                for args in std::mem::take(&mut self.initial_commands) {
                    let argv: Vec<&str> = args.iter().map(String::as_str).collect();
                    self.command(&argv);
                }
            }
            EngineEvent::Seek => {
                if self.prepared {
                    self.queue_discontinuity(DiscontinuityReason::Seek);
                    self.update_state(None, Some(PlaybackState::Buffering));
                }
            }
            EngineEvent::PlaybackRestart => self.on_playback_restart(),
            EngineEvent::EndFile { reason } => {
                if let EndFileReason::Error { message } = reason {
                    self.on_engine_error(message);
                }
            }
        }
    }

    fn on_track_list(&mut self, json: &str) {
        let (_, grouped) = parse_track_list(json);
        if grouped != self.tracks {
            self.tracks = grouped;
            let tracks = self.tracks.clone();
            self.listeners
                .send_event(PlayerEvent::TracksChanged, move |l| {
                    l.on_tracks_changed(&tracks)
                });
        }
    }

    fn on_playback_restart(&mut self) {
        if self.awaiting_restart {
            self.awaiting_restart = false;
            if self.play_when_ready && !self.acquire_focus() {
                warn!("audio focus denied, starting paused");
                self.set_engine_pause(true);
                self.update_state(
                    Some((false, PlayWhenReadyChangeReason::AudioFocusLoss)),
                    Some(PlaybackState::Ready),
                );
            } else {
                self.set_engine_pause(!self.play_when_ready);
                self.update_state(None, Some(PlaybackState::Ready));
            }
            if !self.first_frame_rendered {
                self.first_frame_rendered = true;
                self.listeners
                    .send_event(PlayerEvent::RenderedFirstFrame, |l| {
                        l.on_rendered_first_frame()
                    });
            }
            if let Some(position_ms) = self.initial_seek_ms.take() {
                let seconds = (position_ms / 1000).to_string();
                self.command(&["seek", &seconds, "absolute"]);
            }
        } else if self.playback_state == PlaybackState::Buffering
            && self.buffered_position_ms >= self.current_position_ms
        {
            self.update_state(None, Some(PlaybackState::Ready));
        }
    }

    fn on_end_of_item(&mut self) {
        let next = self.current_index + 1;
        if next < self.playlist.len() {
            if self.pause_at_end_of_media_item {
                // Stay on the finished item; the caller decides when to
                // move on.
                self.set_engine_pause(true);
                self.update_state(
                    Some((false, PlayWhenReadyChangeReason::EndOfMediaItem)),
                    Some(PlaybackState::Ready),
                );
            } else {
                self.switch_to_item(
                    next,
                    None,
                    MediaItemTransitionReason::Auto,
                    DiscontinuityReason::AutoTransition,
                );
                self.set_engine_pause(false);
                self.update_state(Some((true, PlayWhenReadyChangeReason::UserRequest)), None);
            }
        } else {
            // End of playlist: clear per-item state and drop the prepared
            // guard so trailing cache callbacks cannot leave ENDED.
            self.set_engine_pause(true);
            self.prepared = false;
            self.reset_item_state();
            self.update_state(
                Some((false, PlayWhenReadyChangeReason::EndOfMediaItem)),
                Some(PlaybackState::Ended),
            );
        }
    }

    fn on_engine_error(&mut self, message: String) {
        let error = PlayerError::Engine(message);
        self.error = Some(error.clone());
        self.prepared = false;
        self.awaiting_restart = false;
        self.listeners
            .queue_event(PlayerEvent::PlayerErrorChanged, move |l| {
                l.on_player_error(&error)
            });
        self.update_state(None, Some(PlaybackState::Idle));
    }

    // ---- audio focus ----------------------------------------------------

    pub(crate) fn handle_focus_change(&mut self, change: AudioFocusChange) {
        match change {
            AudioFocusChange::Gain => {
                self.focus_granted = true;
                for action in self.focus_stack.drain() {
                    match action {
                        FocusRestore::Unduck { factor } => {
                            let factor = factor.to_string();
                            self.command(&["multiply", "volume", &factor]);
                        }
                        FocusRestore::Resume { was_playing: true } => {
                            self.set_engine_pause(false);
                            self.update_state(
                                Some((true, PlayWhenReadyChangeReason::UserRequest)),
                                None,
                            );
                        }
                        FocusRestore::Resume { was_playing: false } => {}
                    }
                }
            }
            AudioFocusChange::Loss => {
                self.focus_granted = false;
                self.focus_stack.clear();
                self.set_engine_pause(true);
                self.update_state(
                    Some((false, PlayWhenReadyChangeReason::AudioFocusLoss)),
                    None,
                );
            }
            AudioFocusChange::LossTransient => {
                self.focus_stack.push_loss(self.is_playing());
                self.set_engine_pause(true);
                self.update_state(
                    Some((false, PlayWhenReadyChangeReason::AudioFocusLoss)),
                    None,
                );
            }
            AudioFocusChange::LossTransientCanDuck => {
                let factor = DUCK_VOLUME_FACTOR.to_string();
                self.command(&["multiply", "volume", &factor]);
                self.focus_stack.push_duck();
            }
        }
    }

    fn acquire_focus(&mut self) -> bool {
        if !self.request_audio_focus || self.focus_granted {
            return true;
        }
        let Some(controller) = &self.audio_focus else {
            return true;
        };
        match controller.request_focus(FocusChangeSink::new(self.focus_tx.clone())) {
            Ok(()) => {
                self.focus_granted = true;
                true
            }
            Err(e) => {
                debug!("audio focus request failed: {e}");
                false
            }
        }
    }

    // ---- shared mechanics -----------------------------------------------

    fn is_playing(&self) -> bool {
        self.playback_state == PlaybackState::Ready && self.play_when_ready
    }

    /// Switch the active playlist item: reset per-item state, queue the
    /// deferred file-open commands, and tell the engine to jump.
    fn switch_to_item(
        &mut self,
        index: usize,
        position_ms: Option<i64>,
        transition: MediaItemTransitionReason,
        discontinuity: DiscontinuityReason,
    ) {
        self.current_index = index;
        self.reset_item_state();
        self.initial_seek_ms = position_ms.filter(|p| *p > 0);
        self.queue_initial_commands();
        self.awaiting_restart = true;
        let argument = index.to_string();
        self.command(&["playlist-play-index", &argument]);
        self.queue_media_item_transition(transition);
        self.queue_discontinuity(discontinuity);
        self.update_state(None, Some(PlaybackState::Buffering));
    }

    fn reset_item_state(&mut self) {
        self.current_position_ms = 0;
        self.buffered_position_ms = 0;
        self.duration_ms = None;
        self.tracks = Tracks::EMPTY;
        self.initial_seek_ms = None;
        self.initial_commands.clear();
        self.first_frame_rendered = false;
    }

    /// Queue external subtitle attachment for the active item. `sub-add`
    /// requires an open file, so the commands run on the next `StartFile`.
    fn queue_initial_commands(&mut self) {
        let Some(item) = self.playlist.get(self.current_index).cloned() else {
            return;
        };
        for subtitle in &item.subtitles {
            self.initial_commands.push(vec![
                "sub-add".to_string(),
                subtitle.uri.clone(),
                "cached".to_string(),
                subtitle.label.clone(),
                subtitle.language.clone(),
            ]);
        }
    }

    /// Apply state changes and notify. Individual change callbacks are
    /// queued first and flushed together with any notifications queued by
    /// the caller, so observers see one consistent batch.
    fn update_state(
        &mut self,
        play_when_ready: Option<(bool, PlayWhenReadyChangeReason)>,
        playback_state: Option<PlaybackState>,
    ) {
        let was_playing = self.is_playing();
        if let Some(state) = playback_state {
            if state != self.playback_state {
                self.playback_state = state;
                self.listeners
                    .queue_event(PlayerEvent::PlaybackStateChanged, move |l| {
                        l.on_playback_state_changed(state)
                    });
            }
        }
        if let Some((play, reason)) = play_when_ready {
            if play != self.play_when_ready {
                self.play_when_ready = play;
                self.listeners
                    .queue_event(PlayerEvent::PlayWhenReadyChanged, move |l| {
                        l.on_play_when_ready_changed(play, reason)
                    });
            }
        }
        let now_playing = self.is_playing();
        if now_playing != was_playing {
            self.listeners
                .queue_event(PlayerEvent::IsPlayingChanged, move |l| {
                    l.on_is_playing_changed(now_playing)
                });
        }
        self.listeners.flush_events();
    }

    fn queue_timeline_changed(&self, reason: TimelineChangeReason) {
        let timeline = self.timeline.clone();
        self.listeners
            .queue_event(PlayerEvent::TimelineChanged, move |l| {
                l.on_timeline_changed(&timeline, reason)
            });
    }

    fn queue_media_item_transition(&self, reason: MediaItemTransitionReason) {
        let item = self.playlist.get(self.current_index).cloned();
        self.listeners
            .queue_event(PlayerEvent::MediaItemTransition, move |l| {
                l.on_media_item_transition(item.as_ref(), reason)
            });
    }

    fn queue_discontinuity(&self, reason: DiscontinuityReason) {
        self.listeners
            .queue_event(PlayerEvent::PositionDiscontinuity, move |l| {
                l.on_position_discontinuity(reason)
            });
    }

    fn command(&self, args: &[&str]) {
        if let Err(e) = self.engine.command(args) {
            warn!(
                command = args.first().copied().unwrap_or_default(),
                "engine command failed: {e}"
            );
        }
    }

    fn set_engine_pause(&self, paused: bool) {
        if let Err(e) = self.engine.set_property_flag("pause", paused) {
            warn!("setting pause={paused} failed: {e}");
        }
    }

    fn set_engine_string(&self, name: &str, value: &str) {
        if let Err(e) = self.engine.set_property_string(name, value) {
            warn!(property = name, "setting property failed: {e}");
        }
    }

    fn set_engine_option(&self, name: &str, value: &str) {
        if let Err(e) = self.engine.set_option(name, value) {
            warn!(option = name, "setting option failed: {e}");
        }
    }

    /// Publish the current state for the facade's synchronous getters.
    pub(crate) fn publish(&self) {
        let mut snapshot = self.published.write();
        snapshot.playback_state = self.playback_state;
        snapshot.play_when_ready = self.play_when_ready;
        snapshot.is_playing = self.is_playing();
        snapshot.timeline = self.timeline.clone();
        snapshot.tracks = self.tracks.clone();
        snapshot.current_index = self.current_index;
        snapshot.current_position_ms = self.current_position_ms;
        snapshot.buffered_position_ms = self.buffered_position_ms;
        snapshot.duration_ms = self.duration_ms;
        snapshot.parameters = self.parameters;
        snapshot.error = self.error.clone();
    }
}
