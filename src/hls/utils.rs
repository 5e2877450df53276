/// Resolve a possibly-relative playlist URI against the manifest URL.
pub fn resolve_url(base: &str, maybe_relative: &str) -> String {
    if maybe_relative.starts_with("http://") || maybe_relative.starts_with("https://") {
        return maybe_relative.to_string();
    }

    // Query string and fragment must not leak into resolved paths; playback
    // tokens often ride in the query (?start=..., ?hdnts=...).
    let base_clean = base.split(['?', '#']).next().unwrap_or(base);

    if maybe_relative.starts_with('/') {
        if let Some(scheme_end) = base_clean.find("://") {
            let host_start = scheme_end + 3;
            let host_end = base_clean[host_start..]
                .find('/')
                .map(|p| host_start + p)
                .unwrap_or(base_clean.len());
            return format!("{}{}", &base_clean[..host_end], maybe_relative);
        }
    }

    let base_dir = base_clean
        .rfind('/')
        .map(|i| &base_clean[..=i])
        .unwrap_or(base_clean);
    format!("{}{}", base_dir, maybe_relative)
}
