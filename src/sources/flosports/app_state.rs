use regex::Regex;
use serde_json::Value;

use crate::protocol::StreamDescriptor;

/// Pull the embedded app-state JSON blob out of the event page.
///
/// The page ships its state in a `<script id="flo-app-state">` tag with
/// double quotes escaped as `&q;`.
pub fn extract_app_state(page: &str) -> Option<Value> {
    let script_re =
        Regex::new(r#"(?is)<script[^>]+id="flo-app-state"[^>]*>(.*?)</script>"#).ok()?;
    let blob = script_re.captures(page)?.get(1)?.as_str();
    serde_json::from_str(&unescape_embedded(blob)).ok()
}

/// Undo the page's quote escaping: the literal sequence `&q;` stands for `"`.
pub fn unescape_embedded(blob: &str) -> String {
    blob.replace("&q;", "\"")
}

/// Find the first `stream_list` array anywhere in the state tree and turn its
/// entries into descriptors. Returns an empty list when nothing usable exists.
pub fn find_stream_list(value: &Value) -> Vec<StreamDescriptor> {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(items)) = map.get("stream_list") {
                let streams: Vec<StreamDescriptor> =
                    items.iter().filter_map(descriptor_from_value).collect();
                if !streams.is_empty() {
                    return streams;
                }
            }
            for nested in map.values() {
                let streams = find_stream_list(nested);
                if !streams.is_empty() {
                    return streams;
                }
            }
            Vec::new()
        }
        Value::Array(items) => {
            for nested in items {
                let streams = find_stream_list(nested);
                if !streams.is_empty() {
                    return streams;
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// The registry is loose about types: ids arrive as numbers or strings, and
/// not every entry carries a name.
fn descriptor_from_value(value: &Value) -> Option<StreamDescriptor> {
    let id = match value.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => return None,
    };

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Stream {}", id));

    Some(StreamDescriptor {
        name,
        code: value
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_string),
        active: value.get("active").and_then(Value::as_bool).unwrap_or(false),
        id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"<html><head></head><body>
<script id="flo-app-state" type="application/json">{&q;event&q;:{&q;stream_list&q;:[{&q;id&q;:1001,&q;name&q;:&q;Main&q;,&q;active&q;:true},{&q;id&q;:&q;1002&q;,&q;name&q;:&q;High Cam&q;,&q;code&q;:&q;high&q;}]}}</script>
</body></html>"#;

    #[test]
    fn unescape_restores_every_quote() {
        let blob = "{&q;a&q;:&q;b&q;}";
        let unescaped = unescape_embedded(blob);
        assert_eq!(unescaped, r#"{"a":"b"}"#);
        assert_eq!(unescaped.matches('"').count(), 4);
        assert!(serde_json::from_str::<Value>(&unescaped).is_ok());
    }

    #[test]
    fn extracts_registry_from_page() {
        let state = extract_app_state(PAGE).expect("app state should parse");
        let streams = find_stream_list(&state);
        assert_eq!(streams.len(), 2);

        assert_eq!(streams[0].id, "1001");
        assert_eq!(streams[0].name, "Main");
        assert!(streams[0].active);

        // string ids survive as-is
        assert_eq!(streams[1].id, "1002");
        assert_eq!(streams[1].code.as_deref(), Some("high"));
        assert!(!streams[1].active);
    }

    #[test]
    fn missing_script_tag_yields_none() {
        assert!(extract_app_state("<html><body>nothing here</body></html>").is_none());
    }

    #[test]
    fn garbled_state_yields_none() {
        let page = r#"<script id="flo-app-state">{&q;broken&q;:</script>"#;
        assert!(extract_app_state(page).is_none());
    }

    #[test]
    fn finds_stream_list_under_api_data_envelope() {
        let body = json!({
            "data": {
                "stream_list": [{"id": 7, "name": "Mat A"}]
            }
        });
        let streams = find_stream_list(&body);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].id, "7");
        assert_eq!(streams[0].name, "Mat A");
    }

    #[test]
    fn entries_without_id_are_dropped_and_names_synthesized() {
        let body = json!({"stream_list": [{"name": "no id"}, {"id": 3}]});
        let streams = find_stream_list(&body);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].name, "Stream 3");
    }
}
