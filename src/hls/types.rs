/// One `#EXT-X-STREAM-INF` entry of a master playlist.
#[derive(Debug, Clone)]
pub struct Variant {
    pub url: String,
    pub bandwidth: Option<u64>,
    pub codecs: Option<String>,
    pub resolution: Option<(u32, u32)>,
    pub frame_rate: Option<f64>,
}

/// One `#EXT-X-MEDIA` entry (alternative rendition).
#[derive(Debug, Clone)]
pub struct MediaTrack {
    pub media_type: String,
    pub group_id: String,
    pub language: Option<String>,
    pub name: Option<String>,
    pub uri: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Default)]
pub struct MasterPlaylist {
    pub variants: Vec<Variant>,
    pub media: Vec<MediaTrack>,
}
