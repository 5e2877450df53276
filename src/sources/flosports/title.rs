use regex::Regex;
use time::{OffsetDateTime, macros::format_description};

/// Title scraped from the page markup, tried in order: the event heading
/// element, `og:title`, then `<title>`.
pub fn title_from_page(page: &str) -> Option<String> {
    heading(page)
        .or_else(|| meta_content(page, "og:title"))
        .or_else(|| html_title(page))
        .filter(|t| !t.is_empty())
}

fn heading(page: &str) -> Option<String> {
    let re =
        Regex::new(r#"(?is)<h[12][^>]*class="[^"]*event-header[^"]*"[^>]*>(.*?)</h[12]>"#).ok()?;
    let inner = re.captures(page)?.get(1)?.as_str();
    clean_fragment(inner)
}

/// Content of a `<meta property=... content=...>` tag, tolerating either
/// attribute order.
pub fn meta_content(page: &str, property: &str) -> Option<String> {
    let escaped = regex::escape(property);
    let patterns = [
        format!(r#"(?is)<meta[^>]+property="{}"[^>]+content="([^"]*)""#, escaped),
        format!(r#"(?is)<meta[^>]+content="([^"]*)"[^>]+property="{}""#, escaped),
    ];
    for pattern in patterns {
        if let Some(content) = Regex::new(&pattern)
            .ok()
            .and_then(|re| re.captures(page).and_then(|c| c.get(1).map(|m| m.as_str().to_string())))
        {
            if let Some(cleaned) = clean_fragment(&content) {
                return Some(cleaned);
            }
        }
    }
    None
}

fn html_title(page: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok()?;
    clean_fragment(re.captures(page)?.get(1)?.as_str())
}

fn clean_fragment(fragment: &str) -> Option<String> {
    let no_tags = Regex::new(r"<[^>]+>").ok()?.replace_all(fragment, "");
    let text = decode_entities(no_tags.trim());
    (!text.is_empty()).then_some(text)
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Synthesized title when nothing on the page or the schedule API gave one.
pub fn fallback_title(event_id: &str, date: Option<&str>) -> String {
    match date {
        Some(date) => format!("{} FloMarching Live Stream {}", date, event_id),
        None => format!("FloMarching Live Stream {}", event_id),
    }
}

pub fn today_utc() -> String {
    let format = format_description!("[year]-[month]-[day]");
    OffsetDateTime::now_utc()
        .format(&format)
        .unwrap_or_default()
}
