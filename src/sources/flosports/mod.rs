use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, ORIGIN, REFERER,
    USER_AGENT,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    common::{
        errors::{ExtractError, ExtractResult},
        http::HttpClient,
    },
    configs::FloSportsConfig,
    hls::ManifestResolver,
    protocol::{LiveStreamInfo, StreamDescriptor, SubtitleMap},
    session::CookieStore,
    sources::SourcePlugin,
};

pub mod app_state;
pub mod title;
pub mod token;

/// Cookie carrying the bearer credential for the live API.
const SESSION_TOKEN_COOKIE: &str = "jwt_token";
const SITE_ID: u32 = 27;

pub struct FloSportsLiveSource {
    client: reqwest::Client,
    live_url_re: Regex,
    session: Arc<CookieStore>,
    manifests: Arc<dyn ManifestResolver>,
    config: FloSportsConfig,
    host: String,
}

impl FloSportsLiveSource {
    pub fn new(
        config: FloSportsConfig,
        session: Arc<CookieStore>,
        manifests: Arc<dyn ManifestResolver>,
    ) -> Result<Self, String> {
        let client = HttpClient::new().map_err(|e| e.to_string())?;

        let host = host_of(&config.site_url);
        let live_url_re = Regex::new(&format!(
            r"(?i)^https?://(?:www\.)?{}/live/(?P<id>\d+)",
            regex::escape(host.trim_start_matches("www."))
        ))
        .map_err(|e| e.to_string())?;

        Ok(Self {
            client,
            live_url_re,
            session,
            manifests,
            config,
            host,
        })
    }

    fn match_event_id(&self, url: &str) -> Option<String> {
        self.live_url_re
            .captures(url)
            .map(|caps| caps["id"].to_string())
    }

    /// Cookie domains never carry a port.
    fn cookie_host(&self) -> &str {
        self.host.split(':').next().unwrap_or(&self.host)
    }

    /// The header set the site's web player sends on every request.
    fn browser_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(&HttpClient::default_user_agent()) {
            headers.insert(USER_AGENT, v);
        }
        if let Ok(v) = HeaderValue::from_str(&self.config.site_url) {
            headers.insert(ORIGIN, v);
        }
        if let Ok(v) = HeaderValue::from_str(&format!("{}/", self.config.site_url)) {
            headers.insert(REFERER, v);
        }
        if let Some(cookie_header) = self.session.header_for(self.cookie_host()) {
            if let Ok(v) = HeaderValue::from_str(&cookie_header) {
                headers.insert(COOKIE, v);
            }
        }
        headers
    }

    fn token_headers(&self, session_token: Option<&str>) -> HeaderMap {
        let mut headers = self.browser_headers();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-301-location", HeaderValue::from_static("web"));
        headers.insert("x-flo-app", HeaderValue::from_static("flosports-webapp"));
        if let Some(token) = session_token {
            if let Ok(v) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, v);
            }
        }
        headers
    }

    async fn fetch_page(&self, url: &str) -> ExtractResult<String> {
        Ok(self
            .client
            .get(url)
            .headers(self.browser_headers())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }

    /// Registry discovery: embedded page state first, live-events API second.
    /// A broken page blob is not fatal, an empty result from both is.
    async fn discover_streams(
        &self,
        event_id: &str,
        page: &str,
    ) -> ExtractResult<Vec<StreamDescriptor>> {
        if let Some(state) = app_state::extract_app_state(page) {
            let streams = app_state::find_stream_list(&state);
            if !streams.is_empty() {
                debug!("Found {} stream(s) in embedded app state", streams.len());
                return Ok(streams);
            }
        }
        debug!("No stream registry in page state, falling back to live-events API");

        let url = format!(
            "{}/live-events/{}?site_id={}&version={}",
            self.config.api_url, event_id, SITE_ID, self.config.api_version
        );
        let body = match self.client.get(&url).headers(self.browser_headers()).send().await {
            Ok(resp) => match resp.error_for_status() {
                Ok(resp) => resp.json::<Value>().await.ok(),
                Err(e) => {
                    debug!("live-events API rejected event {}: {}", event_id, e);
                    None
                }
            },
            Err(e) => {
                debug!("live-events API unreachable: {}", e);
                None
            }
        };

        let streams = body
            .map(|b| app_state::find_stream_list(&b))
            .unwrap_or_default();
        if streams.is_empty() {
            return Err(ExtractError::NoStreams(event_id.to_string()));
        }
        Ok(streams)
    }

    async fn schedule_title(&self, event_id: &str) -> Option<String> {
        let url = format!("{}/api/live/{}", self.config.site_url, event_id);
        let body: Value = self
            .client
            .get(&url)
            .headers(self.browser_headers())
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?
            .json()
            .await
            .ok()?;

        let heading = body
            .pointer("/data/title")
            .and_then(Value::as_str)
            .or_else(|| body.get("title").and_then(Value::as_str))?
            .trim();
        (!heading.is_empty()).then(|| heading.to_string())
    }

    async fn resolve_title(&self, event_id: &str, page: &str) -> String {
        if let Some(t) = self.schedule_title(event_id).await {
            return t;
        }
        if let Some(t) = title::title_from_page(page) {
            return t;
        }
        let date = self
            .config
            .date_in_default_title
            .then(title::today_utc);
        title::fallback_title(event_id, date.as_deref())
    }
}

#[async_trait]
impl SourcePlugin for FloSportsLiveSource {
    fn name(&self) -> &str {
        "flosports"
    }

    fn can_handle(&self, url: &str) -> bool {
        self.live_url_re.is_match(url)
    }

    async fn extract(&self, url: &str) -> ExtractResult<LiveStreamInfo> {
        let event_id = self
            .match_event_id(url)
            .ok_or_else(|| ExtractError::UnsupportedUrl(url.to_string()))?;

        // Pure cookie consumer: without a session there is nothing to fetch.
        if self.session.is_empty_for(self.cookie_host()) {
            return Err(ExtractError::LoginRequired);
        }
        let session_token = self
            .session
            .get(self.cookie_host(), SESSION_TOKEN_COOKIE)
            .map(str::to_string);
        if session_token.is_none() {
            if self.config.require_session_token {
                return Err(ExtractError::LoginRequired);
            }
            debug!(
                "No {} cookie in session; relying on cookie auth for the token endpoint",
                SESSION_TOKEN_COOKIE
            );
        }

        if let Some(minutes) = self.config.delay_minutes.filter(|m| *m > 0) {
            info!("Delaying extraction of event {} by {} minute(s)", event_id, minutes);
            tokio::time::sleep(Duration::from_secs(minutes * 60)).await;
        }

        let event_url = format!("{}/live/{}", self.config.site_url, event_id);
        let page = self.fetch_page(&event_url).await?;

        let registry = self.discover_streams(&event_id, &page).await?;
        let selection = select_streams(&registry, self.config.stream.as_deref());
        if let Some(warning) = &selection.warning {
            warn!("{}", warning);
        }

        let mut formats = Vec::new();
        let mut subtitles = SubtitleMap::new();
        for stream in &selection.streams {
            let token = match token::request_token(
                &self.client,
                self.token_headers(session_token.as_deref()),
                &self.config.live_api_url,
                &stream.id,
            )
            .await
            {
                Ok(t) => t,
                Err(e) => {
                    warn!("Token exchange failed for stream '{}': {}", stream.name, e);
                    continue;
                }
            };
            let Some(uri) = token.playback_uri() else {
                warn!("Token response for stream '{}' carried no playback URI", stream.name);
                continue;
            };

            let mut uri = uri.to_string();
            if let Some(minutes) = self.config.lookback_minutes.filter(|m| *m > 0) {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                uri = token::apply_lookback(&uri, minutes * 60, now);
                debug!("Rewrote playback URI for a {} minute lookback", minutes);
            }

            let streams = match self.manifests.resolve(&uri, &self.browser_headers(), true).await {
                Ok(s) => s,
                Err(e) => {
                    warn!("Manifest resolution failed for stream '{}': {}", stream.name, e);
                    continue;
                }
            };

            let suffix = normalize_name(&stream.name);
            for mut format in streams.formats {
                format.format_note = Some(stream.name.clone());
                format.format_id = format!("{}-{}", format.format_id, suffix);
                formats.push(format);
            }
            for (lang, tracks) in streams.subtitles {
                subtitles.insert(lang, tracks);
            }
        }

        if formats.is_empty() {
            return Err(ExtractError::NoPlayableStreams(event_id));
        }

        let mut resolved_title = self.resolve_title(&event_id, &page).await;
        if selection.matched_hint && selection.streams.len() == 1 {
            resolved_title = format!("{} - {}", resolved_title, selection.streams[0].name);
        }

        Ok(LiveStreamInfo {
            id: event_id,
            title: resolved_title,
            description: title::meta_content(&page, "og:description"),
            thumbnail: title::meta_content(&page, "og:image"),
            formats,
            subtitles,
            is_live: true,
        })
    }
}

pub(crate) struct Selection {
    pub streams: Vec<StreamDescriptor>,
    /// True when a caller-supplied hint picked the set (drives title tagging).
    pub matched_hint: bool,
    pub warning: Option<String>,
}

/// Narrow the registry to the streams the caller asked for.
///
/// Exact id/code/name match wins; otherwise every case-insensitive substring
/// match of the name is taken. An unmatched hint degrades to the whole
/// registry rather than failing. Without a hint, a multi-stream registry
/// prefers the active-flagged entry, else the first one.
pub(crate) fn select_streams(registry: &[StreamDescriptor], hint: Option<&str>) -> Selection {
    let names = || {
        registry
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    if let Some(hint) = hint {
        if let Some(exact) = registry
            .iter()
            .find(|s| s.id == hint || s.code.as_deref() == Some(hint) || s.name == hint)
        {
            return Selection {
                streams: vec![exact.clone()],
                matched_hint: true,
                warning: None,
            };
        }

        let needle = hint.to_lowercase();
        let matches: Vec<StreamDescriptor> = registry
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        if !matches.is_empty() {
            return Selection {
                streams: matches,
                matched_hint: true,
                warning: None,
            };
        }

        return Selection {
            streams: registry.to_vec(),
            matched_hint: false,
            warning: Some(format!(
                "Stream '{}' not found; trying every stream. Available: {}",
                hint,
                names()
            )),
        };
    }

    if registry.len() <= 1 {
        return Selection {
            streams: registry.to_vec(),
            matched_hint: false,
            warning: None,
        };
    }

    let chosen = registry
        .iter()
        .find(|s| s.active)
        .unwrap_or(&registry[0])
        .clone();
    Selection {
        warning: Some(format!(
            "Multiple streams available ({}); defaulting to '{}'. Pick one with the stream option",
            names(),
            chosen.name
        )),
        streams: vec![chosen],
        matched_hint: false,
    }
}

/// Lowercased, dash-separated form of a stream name, for format id suffixes.
fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}

fn host_of(url: &str) -> String {
    let rest = url.split("://").nth(1).unwrap_or(url);
    rest.split('/').next().unwrap_or(rest).to_string()
}
