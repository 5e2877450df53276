use std::path::Path;

use tracing::debug;

use crate::common::errors::ExtractResult;

/// One cookie from a browser export.
#[derive(Debug, Clone)]
pub struct Cookie {
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub name: String,
    pub value: String,
}

/// Read-only store over a Netscape-format `cookies.txt` export.
///
/// The extractor never writes cookies back; whatever the browser session had
/// at export time is what gets sent.
#[derive(Debug, Default)]
pub struct CookieStore {
    cookies: Vec<Cookie>,
}

impl CookieStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> ExtractResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let store = Self::parse(&text);
        debug!("Loaded {} cookies from {}", store.cookies.len(), path.display());
        Ok(store)
    }

    /// Parse Netscape cookie-file text. Unparseable lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut cookies = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            // curl marks HttpOnly cookies by prefixing the domain field
            let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 7 {
                continue;
            }

            cookies.push(Cookie {
                domain: fields[0].to_string(),
                path: fields[2].to_string(),
                secure: fields[3].eq_ignore_ascii_case("TRUE"),
                name: fields[5].to_string(),
                value: fields[6].to_string(),
            });
        }

        Self { cookies }
    }

    /// RFC 6265 style domain matching: `.flosports.tv` (or `flosports.tv`)
    /// covers `live.flosports.tv`; a bare host only matches itself.
    fn domain_matches(cookie_domain: &str, host: &str) -> bool {
        let cookie_domain = cookie_domain.trim_start_matches('.');
        host == cookie_domain || host.ends_with(&format!(".{}", cookie_domain))
    }

    pub fn cookies_for(&self, host: &str) -> Vec<&Cookie> {
        self.cookies
            .iter()
            .filter(|c| Self::domain_matches(&c.domain, host))
            .collect()
    }

    pub fn is_empty_for(&self, host: &str) -> bool {
        self.cookies_for(host).is_empty()
    }

    pub fn get(&self, host: &str, name: &str) -> Option<&str> {
        self.cookies_for(host)
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// Build a `Cookie:` header value for the host, or None when no cookie
    /// applies.
    pub fn header_for(&self, host: &str) -> Option<String> {
        let cookies = self.cookies_for(host);
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
