use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One selectable feed (camera angle, mat, court) of a live event.
///
/// Built from the event's stream registry; lives for a single resolution
/// call only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Registry id, unique within one event. Kept as a string because the
    /// upstream JSON is inconsistent about numeric vs. string ids.
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    pub active: bool,
}

/// One playable rendition out of an HLS master playlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFormat {
    pub format_id: String,
    pub url: String,
    pub protocol: String,
    /// Total bitrate in kbit/s, when the manifest advertises BANDWIDTH.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tbr: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codecs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    /// Human-readable note, carries the originating stream's display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_note: Option<String>,
}

impl LiveFormat {
    pub fn opaque(format_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            format_id: format_id.into(),
            url: url.into(),
            protocol: "hls".to_string(),
            tbr: None,
            width: None,
            height: None,
            codecs: None,
            frame_rate: None,
            format_note: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleTrack {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Subtitle collections are keyed by language/kind; on key collision the
/// last stream written wins.
pub type SubtitleMap = HashMap<String, Vec<SubtitleTrack>>;

/// Final output of one resolution call. Assembled once, never mutated after.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamInfo {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub formats: Vec<LiveFormat>,
    #[serde(default)]
    pub subtitles: SubtitleMap,
    pub is_live: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
