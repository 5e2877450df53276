use super::{
    types::{MasterPlaylist, MediaTrack, Variant},
    utils::resolve_url,
};

/// A playlist with no `#EXT-X-STREAM-INF` is a media playlist and carries no
/// variants of its own.
pub fn is_master_playlist(text: &str) -> bool {
    text.lines()
        .any(|l| l.trim_start().starts_with("#EXT-X-STREAM-INF"))
}

/// Small master-playlist parser — just the tags a live master carries.
pub fn parse_master(text: &str, base_url: &str) -> MasterPlaylist {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut playlist = MasterPlaylist::default();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some(rest) = line.strip_prefix("#EXT-X-MEDIA:") {
            let attrs = split_attributes(rest);
            playlist.media.push(MediaTrack {
                media_type: attr(&attrs, "TYPE").unwrap_or_default(),
                group_id: attr(&attrs, "GROUP-ID").unwrap_or_default(),
                language: attr(&attrs, "LANGUAGE"),
                name: attr(&attrs, "NAME"),
                uri: attr(&attrs, "URI").map(|u| resolve_url(base_url, &u)),
                is_default: attr(&attrs, "DEFAULT").as_deref() == Some("YES"),
            });
            i += 1;
        } else if let Some(rest) = line.strip_prefix("#EXT-X-STREAM-INF:") {
            let attrs = split_attributes(rest);

            // The variant URI is the next non-tag, non-empty line.
            let mut j = i + 1;
            while j < lines.len() && (lines[j].starts_with('#') || lines[j].is_empty()) {
                j += 1;
            }
            if j < lines.len() {
                playlist.variants.push(Variant {
                    url: resolve_url(base_url, lines[j]),
                    bandwidth: attr(&attrs, "BANDWIDTH").and_then(|v| v.parse().ok()),
                    codecs: attr(&attrs, "CODECS"),
                    resolution: attr(&attrs, "RESOLUTION").and_then(|v| parse_resolution(&v)),
                    frame_rate: attr(&attrs, "FRAME-RATE").and_then(|v| v.parse().ok()),
                });
            }
            i = j + 1;
        } else {
            i += 1;
        }
    }

    playlist
}

/// Split an attribute list into key/value pairs. Commas inside quoted values
/// (CODECS="avc1...,mp4a...") do not split.
fn split_attributes(rest: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in rest.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                push_pair(&mut pairs, &current);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    push_pair(&mut pairs, &current);
    pairs
}

fn push_pair(pairs: &mut Vec<(String, String)>, raw: &str) {
    if let Some((key, value)) = raw.split_once('=') {
        let value = value.trim().trim_matches('"');
        pairs.push((key.trim().to_string(), value.to_string()));
    }
}

fn attr(attrs: &[(String, String)], key: &str) -> Option<String> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}
