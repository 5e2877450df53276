use reqwest::header::HeaderMap;
use serde_json::{Value, json};

use crate::common::errors::ExtractResult;

/// Short-lived playback credential from the live API. Never cached: every
/// resolution exchanges the stream id for a fresh token.
#[derive(Debug, Default)]
pub struct PlaybackToken {
    pub uri: Option<String>,
    pub clean_uri: Option<String>,
    pub stream_name: Option<String>,
}

impl PlaybackToken {
    /// The usable manifest URI, preferring `uri` over `cleanUri`.
    pub fn playback_uri(&self) -> Option<&str> {
        self.uri
            .as_deref()
            .or(self.clean_uri.as_deref())
            .filter(|u| !u.is_empty())
    }
}

/// Exchange a stream id for a playback token.
///
/// The endpoint wants the web player's exact header set; anything else gets
/// a 403.
pub async fn request_token(
    client: &reqwest::Client,
    headers: HeaderMap,
    live_api_url: &str,
    stream_id: &str,
) -> ExtractResult<PlaybackToken> {
    let url = format!("{}/streams/{}/tokens", live_api_url, stream_id);
    let body = json!({"adTracking": {"appName": "flosports-web"}});

    let response: Value = client
        .post(&url)
        .headers(headers)
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(token_from_response(&response))
}

pub fn token_from_response(response: &Value) -> PlaybackToken {
    let data = &response["data"];
    PlaybackToken {
        uri: data["uri"].as_str().map(str::to_string),
        clean_uri: data["cleanUri"].as_str().map(str::to_string),
        stream_name: data["stream"]["name"].as_str().map(str::to_string),
    }
}

/// Ask the manifest server for a start point `lookback_secs` in the past.
/// Best effort: nothing verifies the server honors it.
pub fn apply_lookback(uri: &str, lookback_secs: u64, now_unix: u64) -> String {
    let start = now_unix.saturating_sub(lookback_secs);
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{}{}start={}", uri, separator, start)
}
