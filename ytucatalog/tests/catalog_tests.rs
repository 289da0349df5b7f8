//! Integration tests for the catalog protocol against a mock YouTube

use axum::body::{to_bytes, Body};
use axum::http::{self, header, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ytucatalog::{CatalogExt, CatalogState};
use ytuconfig::tenant::{self, encode_text};
use ytuconfig::TenantConfig;
use ytuserver::{RewritingService, Server};
use ytuyoutube::{OnceStore, YouTubeClient};

const CHANNEL: &str = "UCHnyfMqiRRG1u-2MsSQLbXA";
const OTHER_CHANNEL: &str = "UCYO_jab_esuFRV4b17AJtAw";
const PLACEHOLDER: &str = "https://placeholder.example/poster.png";

fn handle_page(channel_id: &str) -> String {
    format!(
        r#"<html><body><script>{{"browseEndpoint":{{"channelId":"{}"}}}}</script></body></html>"#,
        channel_id
    )
}

fn profile_page(title: &str, image: Option<&str>) -> String {
    let image = image
        .map(|url| format!(r#"<meta property="og:image" content="{}">"#, url))
        .unwrap_or_default();
    format!(
        r#"<html><head><meta property="og:title" content="{}">{}</head><body></body></html>"#,
        title, image
    )
}

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <title>Veritasium (feed)</title>
 <entry>
  <yt:videoId>abc123def45</yt:videoId>
  <title>Latest upload</title>
  <link rel="alternate" href="https://www.youtube.com/watch?v=abc123def45"/>
  <published>2024-05-01T12:00:00+00:00</published>
  <media:group>
   <media:thumbnail url="https://i1.ytimg.com/vi/abc123def45/hqdefault.jpg" width="480" height="360"/>
  </media:group>
 </entry>
</feed>"#;

fn search_page() -> String {
    let data = json!({
        "contents": {"twoColumnSearchResultsRenderer": {"primaryContents": {
            "sectionListRenderer": {"contents": [{"itemSectionRenderer": {"contents": [
                {"channelRenderer": {
                    "channelId": CHANNEL,
                    "title": {"simpleText": "Veritasium"},
                    "subscriberCountText": {"simpleText": "16M subscribers"}
                }}
            ]}}]}
        }}}
    });
    format!(r#"<html><script>var ytInitialData = {};</script></html>"#, data)
}

async fn mock_profile(server: &MockServer, channel_id: &str, title: &str, image: Option<&str>) {
    Mock::given(method("GET"))
        .and(path(format!("/channel/{}", channel_id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(profile_page(title, image)))
        .mount(server)
        .await;
}

async fn mock_feed(server: &MockServer, channel_id: &str) {
    Mock::given(method("GET"))
        .and(path("/feeds/videos.xml"))
        .and(query_param("channel_id", channel_id))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .mount(server)
        .await;
}

async fn catalog_state(upstream: &MockServer) -> CatalogState {
    let client = YouTubeClient::builder()
        .base_url(upstream.uri())
        .resolve_timeout(Duration::from_secs(2))
        .fetch_timeout(Duration::from_secs(2))
        .build()
        .await
        .unwrap();

    CatalogState::new(client)
        .with_placeholder_poster(PLACEHOLDER)
        .with_public_base_url(None)
}

async fn service_for(state: CatalogState) -> RewritingService {
    let mut server = Server::new("Test", "localhost", 0);
    server.init_catalog_with_state(state).await.unwrap();
    server.service().await
}

async fn get(service: &RewritingService, uri: &str) -> Response {
    service
        .clone()
        .oneshot(http::Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn token(channels: &[&str], low_quota: bool) -> String {
    tenant::encode(&TenantConfig::new(channels.iter().copied(), low_quota))
}

// ============================================================================
// Descriptor
// ============================================================================

#[tokio::test]
async fn test_manifest() {
    let upstream = MockServer::start().await;
    let service = service_for(catalog_state(&upstream).await).await;

    let response = get(&service, &format!("/cfg/{}/manifest.json", token(&["@a"], true))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

    let manifest = body_json(response).await;
    assert_eq!(manifest["id"], "org.cary.youtube.universe");
    assert_eq!(manifest["name"], "YouTube Universe • Low-quota");
    assert_eq!(manifest["catalogs"][0]["id"], "youtube-user");
}

#[tokio::test]
async fn test_invalid_token() {
    let upstream = MockServer::start().await;
    let service = service_for(catalog_state(&upstream).await).await;

    for uri in [
        "/cfg/not-a-token/manifest.json",
        "/cfg/not-a-token/catalog/series/youtube-user.json",
        "/cfg/not-a-token/meta/series/ytc:abc.json",
        "/cfg/not-a-token/stream/movie/ytv:abc.json",
    ] {
        let response = get(&service, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body_json(response).await, json!({"error": "invalid cfg"}));
    }
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_listing_keeps_unresolved_channels_in_order() {
    let upstream = MockServer::start().await;

    // Canonical id with an avatar
    mock_profile(&upstream, CHANNEL, "Veritasium", Some("https://yt3.example/v.jpg")).await;

    // Handle resolved through its page, avatar from the feed
    Mock::given(method("GET"))
        .and(path("/@3blue1brown"))
        .respond_with(ResponseTemplate::new(200).set_body_string(handle_page(OTHER_CHANNEL)))
        .mount(&upstream)
        .await;
    mock_profile(&upstream, OTHER_CHANNEL, "3Blue1Brown", None).await;
    mock_feed(&upstream, OTHER_CHANNEL).await;

    // "@nobody" is not mocked: 404
    let service = service_for(catalog_state(&upstream).await).await;
    let token = token(&[CHANNEL, "@3blue1brown", "@nobody"], true);

    let response = get(
        &service,
        &format!("/cfg/{}/catalog/series/youtube-user.json", token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "no-store, no-cache, must-revalidate"
    );

    let body = body_json(response).await;
    let metas = body["metas"].as_array().unwrap();
    assert_eq!(metas.len(), 3);

    assert_eq!(metas[0]["id"], format!("ytc:{}", CHANNEL));
    assert_eq!(metas[0]["name"], "Veritasium");
    assert_eq!(metas[0]["poster"], "https://yt3.example/v.jpg");
    assert_eq!(metas[0]["posterShape"], "square");

    assert_eq!(metas[1]["id"], format!("ytc:{}", OTHER_CHANNEL));
    assert_eq!(metas[1]["name"], "3Blue1Brown");
    assert_eq!(
        metas[1]["poster"],
        "https://i1.ytimg.com/vi/abc123def45/hqdefault.jpg"
    );

    assert_eq!(metas[2]["id"], format!("ytc:{}", encode_text("@nobody")));
    assert_eq!(metas[2]["name"], "@nobody");
    assert_eq!(metas[2]["poster"], PLACEHOLDER);
}

#[tokio::test]
async fn test_listing_unknown_catalog_is_empty() {
    let upstream = MockServer::start().await;
    let service = service_for(catalog_state(&upstream).await).await;

    let response = get(
        &service,
        &format!("/cfg/{}/catalog/movie/top.json", token(&[CHANNEL], true)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"metas": []}));
}

#[tokio::test]
async fn test_listing_search_extra() {
    let upstream = MockServer::start().await;
    mock_profile(&upstream, CHANNEL, "Veritasium", Some("https://yt3.example/v.jpg")).await;
    let service = service_for(catalog_state(&upstream).await).await;

    let response = get(
        &service,
        &format!(
            "/cfg/{}/catalog/series/youtube-user/search=VERI.json",
            token(&[CHANNEL, "@nobody"], true)
        ),
    )
    .await;

    let body = body_json(response).await;
    let metas = body["metas"].as_array().unwrap();
    assert_eq!(metas.len(), 1);
    assert_eq!(metas[0]["name"], "Veritasium");
}

#[tokio::test]
async fn test_concurrent_listings_resolve_once() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@fresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(handle_page(CHANNEL))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1..=2)
        .mount(&upstream)
        .await;
    mock_profile(&upstream, CHANNEL, "Veritasium", Some("https://yt3.example/v.jpg")).await;

    let state = catalog_state(&upstream).await;
    let store = state.client.channel_id_store().clone();
    let service = service_for(state).await;
    let uri = format!("/cfg/{}/catalog/series/youtube-user.json", token(&["@fresh"], true));

    let (first, second) = tokio::join!(get(&service, &uri), get(&service, &uri));
    let first = body_json(first).await;
    let second = body_json(second).await;

    assert_eq!(first, second);
    assert_eq!(first["metas"][0]["id"], format!("ytc:{}", CHANNEL));
    assert_eq!(store.len().await, 1);
    assert_eq!(store.get("@fresh").await.unwrap().as_str(), CHANNEL);
}

// ============================================================================
// Detail
// ============================================================================

#[tokio::test]
async fn test_meta_low_quota_lists_feed_videos() {
    let upstream = MockServer::start().await;
    mock_profile(&upstream, CHANNEL, "Veritasium", Some("https://yt3.example/v.jpg")).await;
    mock_feed(&upstream, CHANNEL).await;
    let service = service_for(catalog_state(&upstream).await).await;

    let response = get(
        &service,
        &format!("/cfg/{}/meta/series/ytc:{}.json", token(&[CHANNEL], true), CHANNEL),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let meta = body_json(response).await["meta"].clone();
    assert_eq!(meta["id"], format!("ytc:{}", CHANNEL));
    assert_eq!(meta["type"], "series");
    // The feed title wins over the profile title
    assert_eq!(meta["name"], "Veritasium (feed)");
    assert_eq!(meta["poster"], "https://yt3.example/v.jpg");

    let videos = meta["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["id"], "ytv:abc123def45");
    assert_eq!(videos[0]["releaseInfo"], "2024-05-01");

    assert_eq!(meta["links"][0]["name"], "Channel on YouTube");
    assert_eq!(
        meta["links"][0]["url"],
        format!("{}/channel/{}", upstream.uri(), CHANNEL)
    );
}

#[tokio::test]
async fn test_meta_without_low_quota_skips_feed() {
    let upstream = MockServer::start().await;
    mock_profile(&upstream, CHANNEL, "Veritasium", None).await;
    Mock::given(method("GET"))
        .and(path("/feeds/videos.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .expect(0)
        .mount(&upstream)
        .await;
    let service = service_for(catalog_state(&upstream).await).await;

    let encoded = encode_text(CHANNEL);
    let response = get(
        &service,
        &format!("/cfg/{}/meta/series/ytc:{}.json", token(&[CHANNEL], false), encoded),
    )
    .await;

    let meta = body_json(response).await["meta"].clone();
    assert_eq!(meta["id"], format!("ytc:{}", encoded));
    assert_eq!(meta["name"], "Veritasium");
    assert_eq!(meta["poster"], PLACEHOLDER);
    assert_eq!(meta["videos"], json!([]));
}

#[tokio::test]
async fn test_meta_unknown_key_gets_default_detail() {
    let upstream = MockServer::start().await;
    let service = service_for(catalog_state(&upstream).await).await;

    let response = get(
        &service,
        &format!("/cfg/{}/meta/series/ytc:!!.json", token(&["@a"], true)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let meta = body_json(response).await["meta"].clone();
    assert_eq!(meta["id"], "ytc:!!");
    assert_eq!(meta["name"], "Channel !!");
    assert_eq!(meta["poster"], PLACEHOLDER);
    assert_eq!(meta["videos"], json!([]));
    assert_eq!(meta["links"], json!([]));
}

// ============================================================================
// Playback
// ============================================================================

#[tokio::test]
async fn test_streams() {
    let upstream = MockServer::start().await;
    let service = service_for(catalog_state(&upstream).await).await;
    let token = token(&[], true);

    let response = get(&service, &format!("/cfg/{}/stream/movie/ytv:abc123def45.json", token)).await;
    let body = body_json(response).await;
    assert_eq!(
        body["streams"][0]["externalUrl"],
        "https://www.youtube.com/watch?v=abc123def45"
    );
    assert_eq!(body["streams"][0]["behaviorHints"]["openExternal"], true);

    let response = get(&service, &format!("/cfg/{}/stream/series/{}.json", token, CHANNEL)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"streams": []}));
}

// ============================================================================
// Legacy routes
// ============================================================================

#[tokio::test]
async fn test_legacy_routes_match_canonical_ones() {
    let upstream = MockServer::start().await;
    mock_profile(&upstream, CHANNEL, "Veritasium", Some("https://yt3.ggpht.com/v=s900")).await;
    mock_feed(&upstream, CHANNEL).await;
    let service = service_for(catalog_state(&upstream).await).await;
    let token = token(&[CHANNEL, "@unknown"], true);

    let canonical = body_json(get(&service, &format!("/cfg/{}/manifest.json", token)).await).await;

    let direct = get(&service, &format!("/manifest.json?cfg={}", token)).await;
    assert_eq!(direct.status(), StatusCode::OK);
    assert_eq!(body_json(direct).await, canonical);

    // Token carried by the descriptor URL, in a path segment or in its query
    let canonical_catalog = body_json(
        get(&service, &format!("/cfg/{}/catalog/series/youtube-user.json", token)).await,
    )
    .await;
    assert_eq!(canonical_catalog["metas"].as_array().map(Vec::len), Some(2));

    for descriptor in [
        format!("https://addon.example/cfg/{}/manifest.json", token),
        format!("https://addon.example/manifest.json?cfg={}", token),
    ] {
        let addon: String =
            url::form_urlencoded::byte_serialize(descriptor.as_bytes()).collect();
        let wrapped = get(
            &service,
            &format!("/catalog/series/youtube-user.json?addon={}", addon),
        )
        .await;
        assert_eq!(wrapped.status(), StatusCode::OK, "{}", descriptor);
        assert_eq!(body_json(wrapped).await, canonical_catalog, "{}", descriptor);
    }

    let canonical_meta = body_json(
        get(&service, &format!("/cfg/{}/meta/series/ytc:{}.json", token, CHANNEL)).await,
    )
    .await;
    assert_eq!(canonical_meta["meta"]["videos"].as_array().map(Vec::len), Some(1));

    let legacy_meta = body_json(
        get(&service, &format!("/meta/series/ytc:{}.json?cfg={}", CHANNEL, token)).await,
    )
    .await;
    assert_eq!(legacy_meta, canonical_meta);
}

#[tokio::test]
async fn test_legacy_route_without_token() {
    let upstream = MockServer::start().await;
    let service = service_for(catalog_state(&upstream).await).await;

    let response = get(&service, "/meta/series/ytc:abc.json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Helpers
// ============================================================================

#[tokio::test]
async fn test_create_config() {
    let upstream = MockServer::start().await;
    let service = service_for(catalog_state(&upstream).await).await;

    let response = service
        .clone()
        .oneshot(
            http::Request::post("/create-config")
                .header(header::HOST, "addon.example")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"channels":["@veritasium",42,{}]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let links = body_json(response).await;
    let token = links["token"].as_str().unwrap();
    assert_eq!(
        tenant::decode(token),
        Some(TenantConfig::new(["@veritasium", "42"], true))
    );
    assert_eq!(
        links["manifest_url"],
        format!("https://addon.example/cfg/{}/manifest.json", token)
    );
    assert!(links["deep_link_url"]
        .as_str()
        .unwrap()
        .starts_with("stremio://addon.example/cfg/"));
}

#[tokio::test]
async fn test_suggest() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page()))
        .mount(&upstream)
        .await;
    let service = service_for(catalog_state(&upstream).await).await;

    let body = body_json(get(&service, "/suggest?query=veri").await).await;
    assert_eq!(body["query"], "veri");
    assert_eq!(body["suggestions"][0]["channelId"], CHANNEL);

    let response = get(&service, "/suggest?query=%20").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_suggest_upstream_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;
    let service = service_for(catalog_state(&upstream).await).await;

    let response = get(&service, "/suggest?query=veri").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await, json!({"error": "search_failed"}));
}

#[tokio::test]
async fn test_resolve() {
    let upstream = MockServer::start().await;
    mock_feed(&upstream, CHANNEL).await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("search_query", "veri"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page()))
        .mount(&upstream)
        .await;
    let service = service_for(catalog_state(&upstream).await).await;

    let body = body_json(get(&service, &format!("/resolve?input={}", CHANNEL)).await).await;
    assert_eq!(
        body,
        json!({
            "channelId": CHANNEL,
            "title": "Veritasium (feed)",
            "thumbnail": "https://i1.ytimg.com/vi/abc123def45/hqdefault.jpg"
        })
    );

    // "/@veri" is not mocked, the search page proposes a channel
    let response = get(&service, "/resolve?input=veri").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "ambiguous");
    assert_eq!(body["suggestions"][0]["title"], "Veritasium");

    let response = get(&service, "/resolve?input=nothing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"error": "channel not found"}));

    let response = get(&service, "/resolve").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feed_helper() {
    let upstream = MockServer::start().await;
    mock_feed(&upstream, CHANNEL).await;
    let service = service_for(catalog_state(&upstream).await).await;

    let body = body_json(get(&service, &format!("/feed?channelId={}", CHANNEL)).await).await;
    assert_eq!(body["channelId"], CHANNEL);
    assert_eq!(body["videos"][0]["id"], "abc123def45");
    assert_eq!(
        body["videos"][0]["link"],
        "https://www.youtube.com/watch?v=abc123def45"
    );

    let response = get(&service, "/feed?channelId=nope").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&service, &format!("/feed?channelId={}", OTHER_CHANNEL)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await, json!({"error": "rss_fetch_failed"}));
}

#[tokio::test]
async fn test_cfg_debug_and_health() {
    let upstream = MockServer::start().await;
    let service = service_for(catalog_state(&upstream).await).await;
    let token = token(&["@a"], true);

    let body = body_json(get(&service, &format!("/_cfg_debug?cfg={}", token)).await).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["cfg"], json!({"channels": ["@a"], "lowQuota": true}));
    assert_eq!(body["tokenPreview"], token.chars().take(24).collect::<String>());

    let body = body_json(get(&service, "/_cfg_debug?cfg=garbage!").await).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["cfg"], Value::Null);

    // Dashed alias
    let alias = body_json(get(&service, &format!("/cfg-debug?cfg={}", token)).await).await;
    assert_eq!(alias["cfg"], json!({"channels": ["@a"], "lowQuota": true}));

    let body = body_json(get(&service, "/").await).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["name"], "stremio-youtube-backend");

    let response = get(&service, "/api-docs/helpers.json").await;
    assert_eq!(response.status(), StatusCode::OK);
}
