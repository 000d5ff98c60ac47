//! End-to-end adapter tests against a recording fake engine.
//!
//! The fake engine records every option, property write, and command, and
//! hands back the installed notification sink so tests can play the native
//! side. `settled().await` is the ordering barrier: commands are flushed
//! before notifications are posted, mirroring how a real engine only
//! reacts to commands it has received.

use bridge_traits::engine::{
    EndFileReason, EngineEvent, EngineEventSink, EngineHandle, EngineNotification, PropertyFormat,
    SurfaceHandle,
};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::focus::{AudioFocusChange, AudioFocusController, FocusChangeSink};
use bridge_traits::BridgeError;
use core_player::{
    DiscontinuityReason, Events, MediaItem, MediaItemTransitionReason, MpvPlayer, PlaybackState,
    PlayWhenReadyChangeReason, PlayerError, PlayerKind, PlayerListener, SubtitleDescriptor,
    TrackType,
};
use core_runtime::PlayerConfig;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct FakeEngine {
    options: Mutex<Vec<(String, String)>>,
    commands: Mutex<Vec<Vec<String>>>,
    flags: Mutex<Vec<(String, bool)>>,
    strings: Mutex<Vec<(String, String)>>,
    observed: Mutex<Vec<(String, PropertyFormat)>>,
    sink: Mutex<Option<EngineEventSink>>,
    destroyed: AtomicBool,
}

impl FakeEngine {
    fn sink(&self) -> EngineEventSink {
        self.sink.lock().clone().unwrap()
    }

    fn commands(&self) -> Vec<Vec<String>> {
        self.commands.lock().clone()
    }

    fn has_command(&self, expected: &[&str]) -> bool {
        self.commands()
            .iter()
            .any(|c| c.iter().map(String::as_str).eq(expected.iter().copied()))
    }

    fn last_pause_flag(&self) -> Option<bool> {
        self.flags
            .lock()
            .iter()
            .rev()
            .find(|(name, _)| name == "pause")
            .map(|(_, value)| *value)
    }
}

impl EngineHandle for FakeEngine {
    fn init(&self) -> BridgeResult<()> {
        Ok(())
    }

    fn set_option(&self, name: &str, value: &str) -> BridgeResult<()> {
        self.options.lock().push((name.into(), value.into()));
        Ok(())
    }

    fn set_property_flag(&self, name: &str, value: bool) -> BridgeResult<()> {
        self.flags.lock().push((name.into(), value));
        Ok(())
    }

    fn set_property_int(&self, _name: &str, _value: i64) -> BridgeResult<()> {
        Ok(())
    }

    fn set_property_double(&self, _name: &str, _value: f64) -> BridgeResult<()> {
        Ok(())
    }

    fn set_property_string(&self, name: &str, value: &str) -> BridgeResult<()> {
        self.strings.lock().push((name.into(), value.into()));
        Ok(())
    }

    fn get_property_flag(&self, _name: &str) -> BridgeResult<bool> {
        Ok(false)
    }

    fn get_property_int(&self, _name: &str) -> BridgeResult<i64> {
        Ok(0)
    }

    fn get_property_string(&self, _name: &str) -> BridgeResult<String> {
        Ok(String::new())
    }

    fn observe_property(&self, name: &str, format: PropertyFormat) -> BridgeResult<()> {
        self.observed.lock().push((name.into(), format));
        Ok(())
    }

    fn command(&self, args: &[&str]) -> BridgeResult<()> {
        self.commands
            .lock()
            .push(args.iter().map(|a| a.to_string()).collect());
        Ok(())
    }

    fn install_sink(&self, sink: EngineEventSink) -> BridgeResult<()> {
        *self.sink.lock() = Some(sink);
        Ok(())
    }

    fn remove_sink(&self) -> BridgeResult<()> {
        *self.sink.lock() = None;
        Ok(())
    }

    fn attach_surface(&self, _surface: SurfaceHandle) -> BridgeResult<()> {
        Ok(())
    }

    fn detach_surface(&self) -> BridgeResult<()> {
        Ok(())
    }

    fn destroy(&self) -> BridgeResult<()> {
        self.destroyed.store(true, Ordering::Release);
        Ok(())
    }
}

mockall::mock! {
    FocusBridge {}

    impl AudioFocusController for FocusBridge {
        fn request_focus(&self, sink: FocusChangeSink) -> BridgeResult<()>;
        fn abandon_focus(&self);
    }
}

#[derive(Default)]
struct Recording {
    states: Vec<PlaybackState>,
    play_when_ready: Vec<(bool, PlayWhenReadyChangeReason)>,
    transitions: Vec<(Option<String>, MediaItemTransitionReason)>,
    discontinuities: Vec<DiscontinuityReason>,
    tracks_changes: usize,
    first_frames: usize,
    errors: Vec<PlayerError>,
    batches: Vec<Events>,
}

#[derive(Default)]
struct Recorder(Mutex<Recording>);

impl PlayerListener for Recorder {
    fn on_playback_state_changed(&self, state: PlaybackState) {
        self.0.lock().states.push(state);
    }

    fn on_play_when_ready_changed(&self, play: bool, reason: PlayWhenReadyChangeReason) {
        self.0.lock().play_when_ready.push((play, reason));
    }

    fn on_tracks_changed(&self, _tracks: &core_player::Tracks) {
        self.0.lock().tracks_changes += 1;
    }

    fn on_media_item_transition(
        &self,
        media_item: Option<&MediaItem>,
        reason: MediaItemTransitionReason,
    ) {
        self.0
            .lock()
            .transitions
            .push((media_item.map(|i| i.id.clone()), reason));
    }

    fn on_position_discontinuity(&self, reason: DiscontinuityReason) {
        self.0.lock().discontinuities.push(reason);
    }

    fn on_player_error(&self, error: &PlayerError) {
        self.0.lock().errors.push(error.clone());
    }

    fn on_rendered_first_frame(&self) {
        self.0.lock().first_frames += 1;
    }

    fn on_events(&self, events: Events) {
        self.0.lock().batches.push(events);
    }
}

fn items(n: usize) -> Vec<MediaItem> {
    (0..n)
        .map(|i| MediaItem::new(format!("item-{i}"), format!("https://host/{i}.mkv")))
        .collect()
}

fn player_with(engine: Arc<FakeEngine>) -> MpvPlayer {
    let config = PlayerConfig::builder().engine(engine).build().unwrap();
    MpvPlayer::new(config).unwrap()
}

async fn prepared_player(engine: Arc<FakeEngine>, item_count: usize) -> MpvPlayer {
    let player = player_with(engine);
    player.set_media_items(items(item_count)).unwrap();
    player.prepare().unwrap();
    player.settled().await;
    player
}

#[tokio::test]
async fn prepare_loads_playlist_and_enters_buffering() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 2).await;

    assert_eq!(player.playback_state(), PlaybackState::Buffering);
    assert!(engine.has_command(&["loadfile", "https://host/0.mkv", "replace"]));
    assert!(engine.has_command(&["loadfile", "https://host/1.mkv", "append"]));
    assert_eq!(player.current_timeline().window_count(), 2);
    assert_eq!(player.kind(), PlayerKind::NativeBridge);
}

#[tokio::test]
async fn media_item_transition_fires_on_prepare() {
    let engine = Arc::new(FakeEngine::default());
    let recorder = Arc::new(Recorder::default());
    let player = player_with(engine);
    player.add_listener(recorder.clone());

    player.set_media_items(items(2)).unwrap();
    player.settled().await;
    assert!(recorder.0.lock().transitions.is_empty());

    player.prepare().unwrap();
    player.settled().await;
    assert_eq!(
        recorder.0.lock().transitions,
        vec![(
            Some("item-0".into()),
            MediaItemTransitionReason::PlaylistChanged
        )]
    );
}

#[tokio::test]
async fn restart_transitions_to_ready_and_renders_first_frame() {
    let engine = Arc::new(FakeEngine::default());
    let recorder = Arc::new(Recorder::default());
    let player = prepared_player(engine.clone(), 1).await;
    player.add_listener(recorder.clone());

    let sink = engine.sink();
    sink.post(EngineNotification::Event(EngineEvent::StartFile));
    sink.post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;

    assert_eq!(player.playback_state(), PlaybackState::Ready);
    assert!(!player.is_playing());
    assert_eq!(engine.last_pause_flag(), Some(true));
    let recording = recorder.0.lock();
    assert_eq!(recording.states, vec![PlaybackState::Ready]);
    assert_eq!(recording.first_frames, 1);
}

#[tokio::test]
async fn play_after_ready_reports_is_playing() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 1).await;
    engine
        .sink()
        .post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;

    player.play().unwrap();
    player.settled().await;

    assert!(player.play_when_ready());
    assert!(player.is_playing());
    assert_eq!(engine.last_pause_flag(), Some(false));
}

#[tokio::test]
async fn track_list_changes_publish_once_per_distinct_snapshot() {
    let engine = Arc::new(FakeEngine::default());
    let recorder = Arc::new(Recorder::default());
    let player = prepared_player(engine.clone(), 1).await;
    player.add_listener(recorder.clone());

    let payload = r#"[
        {"id": 1, "type": "video", "selected": true, "codec": "h264"},
        {"id": 1, "type": "audio", "selected": true, "codec": "aac", "lang": "eng"}
    ]"#;
    let sink = engine.sink();
    sink.post(EngineNotification::StringProperty {
        name: "track-list".into(),
        value: payload.into(),
    });
    sink.post(EngineNotification::StringProperty {
        name: "track-list".into(),
        value: payload.into(),
    });
    player.settled().await;

    assert_eq!(recorder.0.lock().tracks_changes, 1);
    let tracks = player.current_tracks();
    assert_eq!(tracks.groups.len(), 2);
    assert!(tracks.group(TrackType::Subtitle).is_none());
    assert_eq!(tracks.subtitle_options().len(), 1);
}

#[tokio::test]
async fn seek_before_first_restart_is_buffered() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 1).await;

    player.seek_to(0, 30_000).unwrap();
    player.settled().await;
    assert!(!engine.has_command(&["seek", "30", "absolute"]));

    engine
        .sink()
        .post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;
    assert!(engine.has_command(&["seek", "30", "absolute"]));
}

#[tokio::test]
async fn ready_seek_is_issued_immediately() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 1).await;
    engine
        .sink()
        .post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;

    player.seek_to(0, 90_000).unwrap();
    player.settled().await;
    assert!(engine.has_command(&["seek", "90", "absolute"]));
}

#[tokio::test]
async fn cross_index_seek_switches_item_and_queues_subtitles() {
    let engine = Arc::new(FakeEngine::default());
    let recorder = Arc::new(Recorder::default());
    let player = player_with(engine.clone());
    let mut playlist = items(2);
    playlist[1] = playlist[1].clone().with_subtitles(vec![SubtitleDescriptor {
        uri: "https://host/subs.srt".into(),
        label: "English".into(),
        language: "eng".into(),
    }]);
    player.set_media_items(playlist).unwrap();
    player.prepare().unwrap();
    player.settled().await;
    player.add_listener(recorder.clone());

    player.seek_to(1, 10_000).unwrap();
    player.settled().await;

    assert_eq!(player.current_media_item_index(), 1);
    assert_eq!(player.playback_state(), PlaybackState::Buffering);
    assert!(engine.has_command(&["playlist-play-index", "1"]));
    // sub-add waits for the new file to open.
    assert!(!engine.has_command(&[
        "sub-add",
        "https://host/subs.srt",
        "cached",
        "English",
        "eng"
    ]));

    let sink = engine.sink();
    sink.post(EngineNotification::Event(EngineEvent::StartFile));
    player.settled().await;
    assert!(engine.has_command(&[
        "sub-add",
        "https://host/subs.srt",
        "cached",
        "English",
        "eng"
    ]));

    let recording = recorder.0.lock();
    assert_eq!(
        recording.transitions,
        vec![(Some("item-1".into()), MediaItemTransitionReason::Seek)]
    );
    assert_eq!(recording.discontinuities, vec![DiscontinuityReason::Seek]);
}

#[tokio::test]
async fn seek_out_of_range_is_rejected_before_the_engine() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 2).await;
    let issued = engine.commands().len();

    let err = player.seek_to(5, 0).unwrap_err();
    assert_eq!(
        err,
        PlayerError::SeekOutOfRange {
            index: 5,
            playlist_len: 2
        }
    );
    player.settled().await;
    assert_eq!(engine.commands().len(), issued);
}

#[tokio::test]
async fn end_of_item_advances_and_keeps_playing() {
    let engine = Arc::new(FakeEngine::default());
    let recorder = Arc::new(Recorder::default());
    let player = prepared_player(engine.clone(), 2).await;
    let sink = engine.sink();
    sink.post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;
    player.play().unwrap();
    player.settled().await;
    player.add_listener(recorder.clone());

    sink.post(EngineNotification::FlagProperty {
        name: "eof-reached".into(),
        value: true,
    });
    player.settled().await;

    assert_eq!(player.current_media_item_index(), 1);
    assert_eq!(player.playback_state(), PlaybackState::Buffering);
    assert!(player.play_when_ready());
    assert!(engine.has_command(&["playlist-play-index", "1"]));
    let recording = recorder.0.lock();
    assert_eq!(
        recording.transitions,
        vec![(Some("item-1".into()), MediaItemTransitionReason::Auto)]
    );
    assert_eq!(
        recording.discontinuities,
        vec![DiscontinuityReason::AutoTransition]
    );
}

#[tokio::test]
async fn end_of_item_pauses_when_configured() {
    let engine = Arc::new(FakeEngine::default());
    let recorder = Arc::new(Recorder::default());
    let config = PlayerConfig::builder()
        .engine(engine.clone())
        .pause_at_end_of_media_item(true)
        .build()
        .unwrap();
    let player = MpvPlayer::new(config).unwrap();
    player.set_media_items(items(2)).unwrap();
    player.prepare().unwrap();
    player.settled().await;
    let sink = engine.sink();
    sink.post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;
    player.play().unwrap();
    player.settled().await;
    player.add_listener(recorder.clone());

    sink.post(EngineNotification::FlagProperty {
        name: "eof-reached".into(),
        value: true,
    });
    player.settled().await;

    // The player stays on the finished item, paused and ready.
    assert_eq!(player.current_media_item_index(), 0);
    assert_eq!(player.playback_state(), PlaybackState::Ready);
    assert!(!player.play_when_ready());
    assert_eq!(engine.last_pause_flag(), Some(true));
    assert!(!engine.has_command(&["playlist-play-index", "1"]));
    assert_eq!(
        recorder.0.lock().play_when_ready,
        vec![(false, PlayWhenReadyChangeReason::EndOfMediaItem)]
    );
    assert!(recorder.0.lock().transitions.is_empty());
}

#[tokio::test]
async fn last_item_eof_ends_playback_and_resets_item_state() {
    let engine = Arc::new(FakeEngine::default());
    let recorder = Arc::new(Recorder::default());
    let player = prepared_player(engine.clone(), 1).await;
    let sink = engine.sink();
    sink.post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;
    player.play().unwrap();
    player.settled().await;
    player.add_listener(recorder.clone());

    sink.post(EngineNotification::IntProperty {
        name: "duration".into(),
        value: 120,
    });
    sink.post(EngineNotification::IntProperty {
        name: "time-pos".into(),
        value: 120,
    });
    sink.post(EngineNotification::StringProperty {
        name: "track-list".into(),
        value: r#"[{"id": 1, "type": "audio", "selected": true, "codec": "aac"}]"#.into(),
    });
    sink.post(EngineNotification::FlagProperty {
        name: "eof-reached".into(),
        value: true,
    });
    player.settled().await;

    assert_eq!(player.playback_state(), PlaybackState::Ended);
    assert!(!player.play_when_ready());
    assert!(!player.is_playing());
    assert_eq!(player.duration_ms(), None);
    assert_eq!(player.current_position_ms(), 0);
    assert!(player.current_tracks().is_empty());
    assert_eq!(engine.last_pause_flag(), Some(true));
    assert_eq!(
        recorder.0.lock().play_when_ready,
        vec![(false, PlayWhenReadyChangeReason::EndOfMediaItem)]
    );

    // A trailing cache callback must not pull the player out of Ended.
    sink.post(EngineNotification::FlagProperty {
        name: "paused-for-cache".into(),
        value: false,
    });
    player.settled().await;
    assert_eq!(player.playback_state(), PlaybackState::Ended);
}

#[tokio::test]
async fn first_frame_is_reported_for_each_item() {
    let engine = Arc::new(FakeEngine::default());
    let recorder = Arc::new(Recorder::default());
    let player = prepared_player(engine.clone(), 2).await;
    player.add_listener(recorder.clone());

    let sink = engine.sink();
    sink.post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;
    assert_eq!(recorder.0.lock().first_frames, 1);

    player.seek_to(1, 0).unwrap();
    player.settled().await;
    sink.post(EngineNotification::Event(EngineEvent::StartFile));
    sink.post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;
    assert_eq!(recorder.0.lock().first_frames, 2);
}

#[tokio::test]
async fn engine_times_are_scaled_to_milliseconds() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 1).await;
    let sink = engine.sink();
    sink.post(EngineNotification::IntProperty {
        name: "time-pos".into(),
        value: 73,
    });
    sink.post(EngineNotification::IntProperty {
        name: "duration".into(),
        value: 3600,
    });
    sink.post(EngineNotification::IntProperty {
        name: "demuxer-cache-time".into(),
        value: 90,
    });
    player.settled().await;

    assert_eq!(player.current_position_ms(), 73_000);
    assert_eq!(player.duration_ms(), Some(3_600_000));
    assert_eq!(player.buffered_position_ms(), 90_000);
    assert_eq!(
        player.current_timeline().window(0).unwrap().duration_ms,
        Some(3_600_000)
    );
}

#[tokio::test]
async fn unseekable_stream_is_reported_dynamic() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 1).await;
    engine.sink().post(EngineNotification::FlagProperty {
        name: "seekable".into(),
        value: false,
    });
    player.settled().await;

    let window = player.current_timeline().window(0).unwrap().clone();
    assert!(!window.is_seekable);
    assert!(window.is_dynamic);
}

#[tokio::test]
async fn transient_focus_loss_pauses_and_gain_resumes() {
    let engine = Arc::new(FakeEngine::default());
    let captured: Arc<Mutex<Option<FocusChangeSink>>> = Arc::new(Mutex::new(None));
    let mut focus = MockFocusBridge::new();
    let slot = captured.clone();
    focus.expect_request_focus().returning(move |sink| {
        *slot.lock() = Some(sink);
        Ok(())
    });
    focus.expect_abandon_focus().return_const(());

    let config = PlayerConfig::builder()
        .engine(engine.clone())
        .audio_focus(Arc::new(focus))
        .build()
        .unwrap();
    let player = MpvPlayer::new(config).unwrap();
    player.set_media_items(items(1)).unwrap();
    player.prepare().unwrap();
    player.play().unwrap();
    player.settled().await;
    engine
        .sink()
        .post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;
    assert!(player.is_playing());

    let recorder = Arc::new(Recorder::default());
    player.add_listener(recorder.clone());
    let focus_sink = captured.lock().clone().unwrap();

    focus_sink.post(AudioFocusChange::LossTransient);
    player.settled().await;
    assert!(!player.play_when_ready());
    assert_eq!(engine.last_pause_flag(), Some(true));

    focus_sink.post(AudioFocusChange::Gain);
    player.settled().await;
    assert!(player.play_when_ready());
    assert_eq!(engine.last_pause_flag(), Some(false));

    // A second gain without a loss restores nothing further.
    let flags_before = engine.flags.lock().len();
    focus_sink.post(AudioFocusChange::Gain);
    player.settled().await;
    assert_eq!(engine.flags.lock().len(), flags_before);

    let recording = recorder.0.lock();
    assert_eq!(
        recording.play_when_ready,
        vec![
            (false, PlayWhenReadyChangeReason::AudioFocusLoss),
            (true, PlayWhenReadyChangeReason::UserRequest),
        ]
    );
}

#[tokio::test]
async fn ducking_halves_volume_and_gain_restores_it() {
    let engine = Arc::new(FakeEngine::default());
    let captured: Arc<Mutex<Option<FocusChangeSink>>> = Arc::new(Mutex::new(None));
    let mut focus = MockFocusBridge::new();
    let slot = captured.clone();
    focus.expect_request_focus().returning(move |sink| {
        *slot.lock() = Some(sink);
        Ok(())
    });
    focus.expect_abandon_focus().return_const(());

    let config = PlayerConfig::builder()
        .engine(engine.clone())
        .audio_focus(Arc::new(focus))
        .build()
        .unwrap();
    let player = MpvPlayer::new(config).unwrap();
    player.set_media_items(items(1)).unwrap();
    player.prepare().unwrap();
    player.play().unwrap();
    player.settled().await;
    engine
        .sink()
        .post(EngineNotification::Event(EngineEvent::PlaybackRestart));
    player.settled().await;
    let focus_sink = captured.lock().clone().unwrap();

    focus_sink.post(AudioFocusChange::LossTransientCanDuck);
    player.settled().await;
    assert!(engine.has_command(&["multiply", "volume", "0.5"]));
    assert!(player.play_when_ready());

    focus_sink.post(AudioFocusChange::Gain);
    player.settled().await;
    assert!(engine.has_command(&["multiply", "volume", "2"]));
}

#[tokio::test]
async fn denied_focus_starts_playback_paused() {
    let engine = Arc::new(FakeEngine::default());
    let mut focus = MockFocusBridge::new();
    focus
        .expect_request_focus()
        .returning(|_| Err(BridgeError::FocusDenied));
    focus.expect_abandon_focus().return_const(());

    let config = PlayerConfig::builder()
        .engine(engine.clone())
        .audio_focus(Arc::new(focus))
        .build()
        .unwrap();
    let player = MpvPlayer::new(config).unwrap();
    player.set_media_items(items(1)).unwrap();
    player.prepare().unwrap();
    player.play().unwrap();
    player.settled().await;

    assert!(!player.play_when_ready());
    assert_eq!(engine.last_pause_flag(), Some(true));
}

#[tokio::test]
async fn engine_error_is_retained_until_next_prepare() {
    let engine = Arc::new(FakeEngine::default());
    let recorder = Arc::new(Recorder::default());
    let player = prepared_player(engine.clone(), 1).await;
    player.add_listener(recorder.clone());

    engine
        .sink()
        .post(EngineNotification::Event(EngineEvent::EndFile {
            reason: EndFileReason::Error {
                message: "demuxer: failed to open stream".into(),
            },
        }));
    player.settled().await;

    assert_eq!(player.playback_state(), PlaybackState::Idle);
    assert_eq!(
        player.player_error(),
        Some(PlayerError::Engine(
            "demuxer: failed to open stream".into()
        ))
    );
    assert_eq!(recorder.0.lock().errors.len(), 1);

    player.prepare().unwrap();
    player.settled().await;
    assert_eq!(player.player_error(), None);
}

#[tokio::test]
async fn unsupported_operations_fail_loudly() {
    let engine = Arc::new(FakeEngine::default());
    let player = player_with(engine);

    assert!(matches!(
        player.move_media_items(0, 1, 0),
        Err(PlayerError::Unsupported(_))
    ));
    assert!(matches!(
        player.remove_media_items(0, 1),
        Err(PlayerError::Unsupported(_))
    ));
    assert!(matches!(
        player.set_volume(0.5),
        Err(PlayerError::Unsupported(_))
    ));
    assert!(matches!(player.volume(), Err(PlayerError::Unsupported(_))));
    assert!(matches!(
        player.set_shuffle_mode_enabled(true),
        Err(PlayerError::Unsupported(_))
    ));
}

#[tokio::test]
async fn insert_into_prepared_playlist_only_appends() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 2).await;

    let err = player.add_media_items(0, items(1)).unwrap_err();
    assert_eq!(err, PlayerError::InsertIntoPreparedPlaylist(0));

    player.add_media_items(2, items(1)).unwrap();
    player.settled().await;
    assert_eq!(player.media_item_count(), 3);
    assert!(engine.has_command(&["loadfile", "https://host/0.mkv", "append"]));
    assert_eq!(player.current_timeline().window_count(), 3);
}

#[tokio::test]
async fn prepare_with_empty_playlist_is_rejected() {
    let engine = Arc::new(FakeEngine::default());
    let player = player_with(engine);
    assert_eq!(player.prepare().unwrap_err(), PlayerError::EmptyPlaylist);
}

#[tokio::test]
async fn select_track_validates_against_current_tracks() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 1).await;
    engine.sink().post(EngineNotification::StringProperty {
        name: "track-list".into(),
        value: r#"[{"id": 2, "type": "audio", "selected": true, "codec": "aac"}]"#.into(),
    });
    player.settled().await;

    player.select_track(TrackType::Audio, 2).unwrap();
    player.settled().await;

    let err = player.select_track(TrackType::Audio, 9).unwrap_err();
    assert_eq!(
        err,
        PlayerError::TrackNotFound {
            track_type: "audio",
            index: 9
        }
    );

    // Negative id disables the type without validation.
    player.select_track(TrackType::Subtitle, -1).unwrap();
    player.settled().await;
    assert!(engine
        .strings
        .lock()
        .iter()
        .any(|(name, value)| name == "sub" && value == "no"));
}

#[tokio::test]
async fn release_is_idempotent_and_drops_late_notifications() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 1).await;
    let sink = engine.sink();

    player.release();
    player.release();
    player.closed().await;

    assert!(engine.destroyed.load(Ordering::Acquire));
    assert_eq!(player.prepare().unwrap_err(), PlayerError::Released);
    assert_eq!(player.playback_state(), PlaybackState::Idle);
    // The bridge learns the adapter is gone from the post result.
    assert!(!sink.post(EngineNotification::Event(EngineEvent::Seek)));
}

#[tokio::test]
async fn stop_keeps_the_playlist() {
    let engine = Arc::new(FakeEngine::default());
    let player = prepared_player(engine.clone(), 2).await;

    player.stop().unwrap();
    player.settled().await;

    assert_eq!(player.playback_state(), PlaybackState::Idle);
    assert!(engine.has_command(&["stop", "keep-playlist"]));
    assert_eq!(player.media_item_count(), 2);

    player.prepare().unwrap();
    player.settled().await;
    assert_eq!(player.playback_state(), PlaybackState::Buffering);
}
