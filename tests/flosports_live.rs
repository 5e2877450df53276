use std::sync::Arc;

use flolive::{
    ExtractError,
    configs::{Config, FloSportsConfig},
    hls::HlsManifestResolver,
    session::CookieStore,
    sources::{SourceManager, SourcePlugin, flosports::FloSportsLiveSource},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

const MASTER_PLAYLIST: &str = r#"#EXTM3U
#EXT-X-VERSION:6
#EXT-X-STREAM-INF:BANDWIDTH=2176000,RESOLUTION=1280x720,CODECS="avc1.64001f,mp4a.40.2"
v0.m3u8
"#;

fn event_page(stream_list_json: &str) -> String {
    format!(
        r#"<html><head>
<title>DCI World Championships | FloMarching</title>
<meta property="og:title" content="DCI World Championships"/>
<meta property="og:description" content="Live from Indianapolis"/>
<meta property="og:image" content="https://cdn.example/thumb.jpg"/>
</head><body>
<script id="flo-app-state" type="application/json">{}</script>
</body></html>"#,
        stream_list_json.replace('"', "&q;")
    )
}

fn test_config(server: &MockServer) -> FloSportsConfig {
    FloSportsConfig {
        site_url: server.uri(),
        api_url: format!("{}/api", server.uri()),
        live_api_url: server.uri(),
        ..Default::default()
    }
}

fn session_with_jwt() -> CookieStore {
    CookieStore::parse("127.0.0.1\tFALSE\t/\tFALSE\t0\tjwt_token\ttest-jwt\n")
}

fn source(config: FloSportsConfig, session: CookieStore) -> FloSportsLiveSource {
    FloSportsLiveSource::new(
        config,
        Arc::new(session),
        Arc::new(HlsManifestResolver::new().unwrap()),
    )
    .unwrap()
}

#[tokio::test]
async fn resolves_single_stream_event_end_to_end() {
    let server = MockServer::start().await;

    let page = event_page(r#"{"live":{"stream_list":[{"id":9001,"name":"Main","active":true}]}}"#);
    Mock::given(method("GET"))
        .and(path("/live/164101"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/streams/9001/tokens"))
        .and(header("authorization", "Bearer test-jwt"))
        .and(header("x-flo-app", "flosports-webapp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "uri": format!("{}/master.m3u8", server.uri()),
                "stream": {"name": "Main"}
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/master.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MASTER_PLAYLIST))
        .mount(&server)
        .await;

    // Drive through the manager so URL dispatch is covered too.
    let mut config = Config::default();
    config.flosports = Some(test_config(&server));
    let manager = SourceManager::new(
        &config,
        Arc::new(session_with_jwt()),
        Arc::new(HlsManifestResolver::new().unwrap()),
    );
    assert_eq!(manager.source_names(), vec!["flosports".to_string()]);

    let info = manager
        .extract(&format!("{}/live/164101", server.uri()))
        .await
        .expect("resolution should succeed");

    assert_eq!(info.id, "164101");
    assert!(info.is_live);
    assert_eq!(info.title, "DCI World Championships");
    assert_eq!(info.description.as_deref(), Some("Live from Indianapolis"));
    assert_eq!(info.thumbnail.as_deref(), Some("https://cdn.example/thumb.jpg"));

    assert_eq!(info.formats.len(), 1);
    let format = &info.formats[0];
    assert_eq!(format.format_id, "hls-2176-main");
    assert_eq!(format.format_note.as_deref(), Some("Main"));
    assert_eq!(format.tbr, Some(2176));
    assert_eq!(format.height, Some(720));
    assert!(format.url.ends_with("/v0.m3u8"));
}

#[tokio::test]
async fn one_failing_stream_does_not_abort_the_others() {
    let server = MockServer::start().await;

    let page = event_page(
        r#"{"live":{"stream_list":[{"id":1,"name":"Mat A"},{"id":2,"name":"Mat B"}]}}"#,
    );
    Mock::given(method("GET"))
        .and(path("/live/164101"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/streams/1/tokens"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/streams/2/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"uri": format!("{}/master.m3u8", server.uri())}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/master.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MASTER_PLAYLIST))
        .mount(&server)
        .await;

    // "mat" substring-matches both streams; only Mat B survives.
    let mut config = test_config(&server);
    config.stream = Some("mat".to_string());
    let source = source(config, session_with_jwt());

    let info = source
        .extract(&format!("{}/live/164101", server.uri()))
        .await
        .expect("surviving stream should carry the resolution");

    assert_eq!(info.formats.len(), 1);
    assert_eq!(info.formats[0].format_note.as_deref(), Some("Mat B"));
    assert_eq!(info.formats[0].format_id, "hls-2176-mat-b");
}

#[tokio::test]
async fn token_responses_without_uris_fail_the_whole_event() {
    let server = MockServer::start().await;

    let page = event_page(r#"{"stream_list":[{"id":7,"name":"Main"}]}"#);
    Mock::given(method("GET"))
        .and(path("/live/164101"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/streams/7/tokens"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": {"stream": {"name": "Main"}}})),
        )
        .mount(&server)
        .await;

    let err = source(test_config(&server), session_with_jwt())
        .extract(&format!("{}/live/164101", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::NoPlayableStreams(id) if id == "164101"));
}

#[tokio::test]
async fn empty_cookie_jar_never_touches_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/live/164101"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = source(test_config(&server), CookieStore::empty())
        .extract(&format!("{}/live/164101", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::LoginRequired));

    // MockServer verifies the expect(0) on drop.
}

#[tokio::test]
async fn falls_back_to_live_events_api_when_page_state_is_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/live/164101"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>client-rendered shell</body></html>"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/live-events/164101"))
        .and(query_param("site_id", "27"))
        .and(query_param("version", "1.24.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"stream_list": [{"id": 9002, "name": "Main"}]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/streams/9002/tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"cleanUri": format!("{}/master.m3u8", server.uri())}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/master.m3u8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MASTER_PLAYLIST))
        .mount(&server)
        .await;

    let info = source(test_config(&server), session_with_jwt())
        .extract(&format!("{}/live/164101", server.uri()))
        .await
        .expect("registry should come from the fallback API");

    assert_eq!(info.formats.len(), 1);
    // No markup gave a title, so the synthesized fallback is used.
    assert_eq!(info.title, "FloMarching Live Stream 164101");
}

#[tokio::test]
async fn exhausted_registry_discovery_reports_no_streams() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/live/164101"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/live-events/164101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})))
        .mount(&server)
        .await;

    let err = source(test_config(&server), session_with_jwt())
        .extract(&format!("{}/live/164101", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::NoStreams(id) if id == "164101"));
}
