use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_enabled")]
    pub flosports: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self { flosports: true }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FloSportsConfig {
    /// Stream selection hint: a registry id, code, or (partial) name.
    #[serde(default)]
    pub stream: Option<String>,
    /// Sleep this long before touching the event page. Blocks the whole
    /// resolution; used to schedule extraction ahead of a known start time.
    #[serde(default)]
    pub delay_minutes: Option<u64>,
    /// Rewrite playback URIs to start this many minutes in the past
    /// (DVR-capable streams only, best effort).
    #[serde(default)]
    pub lookback_minutes: Option<u64>,
    /// Refuse to continue when the jwt_token cookie is missing. The live API
    /// usually accepts plain cookie auth, so this defaults to off.
    #[serde(default)]
    pub require_session_token: bool,
    /// Prefix the synthesized fallback title with today's date.
    #[serde(default)]
    pub date_in_default_title: bool,
    #[serde(default = "default_site_url")]
    pub site_url: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_live_api_url")]
    pub live_api_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_site_url() -> String {
    "https://www.flomarching.com".to_string()
}

fn default_api_url() -> String {
    "https://api.flomarching.com/api".to_string()
}

fn default_live_api_url() -> String {
    "https://live-api-3.flosports.tv".to_string()
}

fn default_api_version() -> String {
    "1.24.2".to_string()
}

impl Default for FloSportsConfig {
    fn default() -> Self {
        Self {
            stream: None,
            delay_minutes: None,
            lookback_minutes: None,
            require_session_token: false,
            date_in_default_title: false,
            site_url: default_site_url(),
            api_url: default_api_url(),
            live_api_url: default_live_api_url(),
            api_version: default_api_version(),
        }
    }
}
