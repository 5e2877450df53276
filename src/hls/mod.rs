pub mod parser;
pub mod types;
pub mod utils;

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::{
    common::{errors::ExtractResult, http::HttpClient},
    protocol::{LiveFormat, SubtitleMap, SubtitleTrack},
};

use self::types::Variant;

/// What a manifest resolves into: renditions plus any subtitle tracks
/// advertised alongside them.
#[derive(Debug, Default)]
pub struct ManifestStreams {
    pub formats: Vec<LiveFormat>,
    pub subtitles: SubtitleMap,
}

/// Manifest-resolution seam.
///
/// The extractor only ever sees this trait; tests swap the HTTP-backed
/// implementation for a canned one.
#[async_trait]
pub trait ManifestResolver: Send + Sync {
    /// Fetch and parse the playlist at `uri`. `live` requests a live (non-VOD)
    /// interpretation — no duration is derived for the renditions.
    async fn resolve(
        &self,
        uri: &str,
        headers: &HeaderMap,
        live: bool,
    ) -> ExtractResult<ManifestStreams>;
}

pub struct HlsManifestResolver {
    client: reqwest::Client,
}

impl HlsManifestResolver {
    pub fn new() -> Result<Self, String> {
        let client = HttpClient::new().map_err(|e| e.to_string())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ManifestResolver for HlsManifestResolver {
    async fn resolve(
        &self,
        uri: &str,
        headers: &HeaderMap,
        live: bool,
    ) -> ExtractResult<ManifestStreams> {
        let text = self
            .client
            .get(uri)
            .headers(headers.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if !parser::is_master_playlist(&text) {
            // Some events hand out a bare rendition playlist; treat the URI
            // itself as the single playable format.
            debug!("Playlist at {} is not a master playlist", uri);
            return Ok(ManifestStreams {
                formats: vec![LiveFormat::opaque("hls", uri)],
                subtitles: SubtitleMap::new(),
            });
        }

        let playlist = parser::parse_master(&text, uri);
        debug!(
            "Parsed master playlist: {} variants, {} media tracks (live={})",
            playlist.variants.len(),
            playlist.media.len(),
            live
        );

        let mut streams = ManifestStreams::default();
        let mut seen_ids: HashMap<String, usize> = HashMap::new();
        for variant in &playlist.variants {
            streams.formats.push(variant_to_format(variant, &mut seen_ids));
        }

        for media in &playlist.media {
            if media.media_type != "SUBTITLES" {
                continue;
            }
            let Some(sub_uri) = &media.uri else { continue };
            let key = media
                .language
                .clone()
                .or_else(|| media.name.clone())
                .unwrap_or_else(|| "und".to_string());
            streams.subtitles.entry(key).or_default().push(SubtitleTrack {
                url: sub_uri.clone(),
                name: media.name.clone(),
            });
        }

        Ok(streams)
    }
}

fn variant_to_format(variant: &Variant, seen_ids: &mut HashMap<String, usize>) -> LiveFormat {
    let base = match variant.bandwidth {
        Some(b) => format!("hls-{}", b / 1000),
        None => "hls".to_string(),
    };
    // Disambiguate variants advertising the same bandwidth.
    let n = seen_ids.entry(base.clone()).and_modify(|c| *c += 1).or_insert(0);
    let format_id = if *n == 0 {
        base
    } else {
        format!("{}-{}", base, n)
    };

    LiveFormat {
        format_id,
        url: variant.url.clone(),
        protocol: "hls".to_string(),
        tbr: variant.bandwidth.map(|b| b / 1000),
        width: variant.resolution.map(|(w, _)| w),
        height: variant.resolution.map(|(_, h)| h),
        codecs: variant.codecs.clone(),
        frame_rate: variant.frame_rate,
        format_note: None,
    }
}
