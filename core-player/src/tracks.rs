//! Track model parsed from the engine's `track-list` property.
//!
//! The engine reports its demuxed streams as one JSON array; every change
//! replaces the whole snapshot. Parsing groups the descriptors by type,
//! records which entry carries `selected: true`, and produces one
//! [`TrackGroup`] per non-empty type with a selection bitmap. A [`Tracks`]
//! snapshot is only meaningful as a whole; partial updates are never
//! published.

use serde::Deserialize;

/// Kind of a selectable media stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackType {
    Video,
    Audio,
    Subtitle,
}

impl TrackType {
    /// Engine property that selects a track of this type by id.
    pub fn selection_property(self) -> &'static str {
        match self {
            TrackType::Video => "video",
            TrackType::Audio => "audio",
            TrackType::Subtitle => "sub",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrackType::Video => "video",
            TrackType::Audio => "audio",
            TrackType::Subtitle => "sub",
        }
    }
}

/// Raw descriptor shape of one `track-list` array element.
#[derive(Debug, Deserialize)]
struct TrackDescriptor {
    #[serde(default)]
    id: i64,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    external: bool,
    #[serde(default)]
    selected: bool,
    #[serde(rename = "external-filename", default)]
    external_filename: Option<String>,
    #[serde(rename = "ff-index", default)]
    ff_index: i64,
    #[serde(default)]
    codec: Option<String>,
    #[serde(rename = "demux-w", default)]
    width: Option<u32>,
    #[serde(rename = "demux-h", default)]
    height: Option<u32>,
    #[serde(rename = "demux-channel-count", default)]
    channels: Option<u32>,
    #[serde(rename = "demux-samplerate", default)]
    sample_rate: Option<u32>,
}

/// One selectable media stream as reported by the engine.
///
/// Tracks are rebuilt from the latest JSON snapshot on every `track-list`
/// change and never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Engine-native track id, used for selection commands.
    pub id: i64,
    pub kind: TrackType,
    pub title: String,
    pub language: String,
    /// Whether the stream was attached externally (e.g. `sub-add`).
    pub external: bool,
    /// Whether the engine currently renders this track.
    pub selected: bool,
    /// Source file for external tracks.
    pub external_filename: Option<String>,
    /// Index of the stream inside the container.
    pub ff_index: i64,
    pub codec: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub channels: Option<u32>,
    pub sample_rate: Option<u32>,
}

impl Track {
    fn from_descriptor(descriptor: &TrackDescriptor, kind: TrackType) -> Self {
        Self {
            id: descriptor.id,
            kind,
            title: descriptor.title.clone().unwrap_or_default(),
            language: descriptor.lang.clone().unwrap_or_default(),
            external: descriptor.external,
            selected: descriptor.selected,
            external_filename: descriptor.external_filename.clone(),
            ff_index: descriptor.ff_index,
            codec: descriptor.codec.clone().unwrap_or_default(),
            width: descriptor.width,
            height: descriptor.height,
            channels: descriptor.channels,
            sample_rate: descriptor.sample_rate,
        }
    }
}

/// Typed format of one track inside a [`TrackGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub id: i64,
    pub codec: String,
    pub label: Option<String>,
    pub language: Option<String>,
    /// Video dimensions.
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Audio channel layout size and sample rate.
    pub channels: Option<u32>,
    pub sample_rate: Option<u32>,
}

impl Format {
    fn from_track(track: &Track) -> Self {
        Self {
            id: track.id,
            codec: track.codec.clone(),
            label: (!track.title.is_empty()).then(|| track.title.clone()),
            language: (!track.language.is_empty()).then(|| track.language.clone()),
            width: track.width,
            height: track.height,
            channels: track.channels,
            sample_rate: track.sample_rate,
        }
    }

    /// Pseudo-format representing "no subtitles".
    fn disabled_subtitle() -> Self {
        Self {
            id: -1,
            codec: String::new(),
            label: Some("Disabled".to_string()),
            language: None,
            width: None,
            height: None,
            channels: None,
            sample_rate: None,
        }
    }
}

/// All alternatives of one track type plus the selection bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackGroup {
    pub kind: TrackType,
    pub formats: Vec<Format>,
    /// `selected[i]` is `true` for at most one `i`.
    pub selected: Vec<bool>,
}

impl TrackGroup {
    fn new(kind: TrackType, formats: Vec<Format>, selected_index: Option<usize>) -> Self {
        let selected = (0..formats.len())
            .map(|i| Some(i) == selected_index)
            .collect();
        Self {
            kind,
            formats,
            selected,
        }
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Index of the selected format, if any format is selected.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.iter().position(|s| *s)
    }
}

/// Immutable-per-update snapshot of every track group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracks {
    pub groups: Vec<TrackGroup>,
}

impl Tracks {
    pub const EMPTY: Tracks = Tracks { groups: Vec::new() };

    pub fn group(&self, kind: TrackType) -> Option<&TrackGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Subtitle group for selection UIs. When the stream carries no
    /// subtitles this still returns a singleton "disabled" pseudo-track so
    /// that "no subtitles" stays a representable, selectable state.
    pub fn subtitle_options(&self) -> TrackGroup {
        match self.group(TrackType::Subtitle) {
            Some(group) => group.clone(),
            None => TrackGroup::new(
                TrackType::Subtitle,
                vec![Format::disabled_subtitle()],
                Some(0),
            ),
        }
    }
}

/// Parse a `track-list` JSON snapshot into raw tracks plus grouped tracks.
///
/// Unparsable JSON degrades to an empty snapshot instead of propagating a
/// parse error; the engine owns the document format and a bad payload must
/// not take the adapter down.
pub fn parse_track_list(json: &str) -> (Vec<Track>, Tracks) {
    let descriptors: Vec<TrackDescriptor> = match serde_json::from_str(json) {
        Ok(descriptors) => descriptors,
        Err(e) => {
            tracing::warn!("unparsable track-list payload: {e}");
            return (Vec::new(), Tracks::EMPTY);
        }
    };

    let mut tracks = Vec::new();
    let mut video = Vec::new();
    let mut audio = Vec::new();
    let mut text = Vec::new();
    let mut current_video = None;
    let mut current_audio = None;
    let mut current_text = None;

    for descriptor in &descriptors {
        let kind = match descriptor.kind.as_str() {
            "video" => TrackType::Video,
            "audio" => TrackType::Audio,
            "sub" => TrackType::Subtitle,
            other => {
                tracing::debug!("skipping track of unknown type {other:?}");
                continue;
            }
        };
        let track = Track::from_descriptor(descriptor, kind);
        let format = Format::from_track(&track);
        let (list, current) = match kind {
            TrackType::Video => (&mut video, &mut current_video),
            TrackType::Audio => (&mut audio, &mut current_audio),
            TrackType::Subtitle => (&mut text, &mut current_text),
        };
        if track.selected {
            *current = Some(list.len());
        }
        list.push(format);
        tracks.push(track);
    }

    let mut groups = Vec::new();
    if !video.is_empty() {
        groups.push(TrackGroup::new(TrackType::Video, video, current_video));
    }
    if !audio.is_empty() {
        groups.push(TrackGroup::new(TrackType::Audio, audio, current_audio));
    }
    if !text.is_empty() {
        groups.push(TrackGroup::new(TrackType::Subtitle, text, current_text));
    }

    (tracks, Tracks { groups })
}
