// tests/traceback_client.rs
//
// INTEGRATION TESTS: Traceback backend client
//
// Runs TracebackClient against a local mock backend and checks the wire
// contract: paths, query parameters, payload field names and error mapping.
// The last section drives a full AttributionResolver over HTTP and SQLite.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use traceback::db::create_connection_pool_at;
use traceback::domain::fingerprint::{DeviceFingerprint, DeviceInfo, PlatformDevice, WebHeuristics};
use traceback::{
    AttributionResolver, CampaignGateway, FingerprintService, FocusGain, HeuristicsGateway,
    InstallReferrerProvider, MatchConfidence, MatchType, NoClipboard, NoWebHeuristics,
    ResolutionStateRepository, ResolverConfig, SqliteResolutionStateRepository, SystemClock,
    TracebackClient, TracebackError, TracebackResult,
};

const WELCOME: &str = "https://example.com/welcome";
const CAMPAIGN_URL: &str = "https://traceback.com/halloween";

fn config(min_match_type: MatchType) -> Arc<ResolverConfig> {
    Arc::new(
        ResolverConfig::builder(Arc::new(HashMap::<String, String>::new()))
            .domain("traceback.com")
            .version("1.2.0")
            .min_match_type(min_match_type)
            .build(),
    )
}

fn platform() -> PlatformDevice {
    PlatformDevice {
        install_time: Utc::now(),
        os_version: "14".to_string(),
        bundle_id: "com.example.app".to_string(),
        model: "Pixel 8".to_string(),
        language_tag: "en-US".to_string(),
        app_version: Some("1.0.0".to_string()),
        screen_width: 1080,
        screen_height: 2400,
        timezone: "Europe/Madrid".to_string(),
    }
}

fn fingerprint(clipboard_link: Option<&str>) -> DeviceFingerprint {
    let platform = platform();
    DeviceFingerprint {
        app_installation_time: 1_750_000_000_000,
        os_version: platform.os_version.clone(),
        bundle_id: platform.bundle_id.clone(),
        sdk_version: "rust/1.2.0".to_string(),
        unique_match_link_to_check: clipboard_link.map(str::to_string),
        intent_link: None,
        device: DeviceInfo::merge(&platform, &WebHeuristics::default()),
    }
}

async fn client_for(server: &MockServer) -> TracebackClient {
    TracebackClient::new(config(MatchType::Ambiguous))
        .unwrap()
        .with_base_url(server.uri())
}

// ============================================================================
// HEURISTICS SEARCH
// ============================================================================

#[tokio::test]
async fn test_search_posts_fingerprint_and_maps_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_postinstall_search_link"))
        .and(body_partial_json(json!({
            "bundleId": "com.example.app",
            "sdkVersion": "rust/1.2.0",
            "uniqueMatchLinkToCheck": "https://traceback.com/?link=x",
            "device": { "deviceModelName": "Pixel 8", "languageCodeRaw": "en_US" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "match_type": "heuristics",
            "request_ip_version": "ipv4",
            "match_message": "matched by fingerprint",
            "deep_link_id": WELCOME,
            "match_campaign": "halloween",
            "utm_medium": "social",
            "utm_source": "newsletter"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .search(&fingerprint(Some("https://traceback.com/?link=x")))
        .await
        .unwrap();

    assert_eq!(result.match_type, MatchConfidence::HEURISTICS);
    assert_eq!(result.deep_link, WELCOME);
    assert_eq!(result.campaign_id.as_deref(), Some("halloween"));
    assert_eq!(result.utm_medium.as_deref(), Some("social"));
    assert_eq!(result.utm_source.as_deref(), Some("newsletter"));
    assert!(result.clipboard_used);
}

#[tokio::test]
async fn test_search_omits_absent_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_postinstall_search_link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "match_type": "intent",
            "request_ip_version": "ipv6",
            "deep_link_id": WELCOME
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.search(&fingerprint(None)).await.unwrap();
    assert_eq!(result.match_type, MatchConfidence::Intent);
    assert!(!result.clipboard_used);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("uniqueMatchLinkToCheck").is_none());
    assert!(body.get("intentLink").is_none());
    assert_eq!(body["device"]["languageCodeFromWebView"], "unknown");
}

#[tokio::test]
async fn test_search_non_success_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_postinstall_search_link"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.search(&fingerprint(None)).await.unwrap_err();

    assert!(matches!(err, TracebackError::Transport(_)));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_search_without_deep_link_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_postinstall_search_link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "match_type": "unique",
            "request_ip_version": "ipv4"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.search(&fingerprint(None)).await.unwrap_err();
    assert!(matches!(err, TracebackError::Protocol(_)));
}

#[tokio::test]
async fn test_search_malformed_body_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_postinstall_search_link"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.search(&fingerprint(None)).await.unwrap_err();
    assert!(matches!(err, TracebackError::Protocol(_)));
}

// ============================================================================
// CAMPAIGN RESOLUTION
// ============================================================================

#[tokio::test]
async fn test_campaign_sends_link_and_first_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1_get_campaign"))
        .and(query_param("link", CAMPAIGN_URL))
        .and(query_param("first_campaign_open", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": WELCOME })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let link = client.resolve(CAMPAIGN_URL, true).await.unwrap();
    assert_eq!(link.as_str(), WELCOME);
}

#[tokio::test]
async fn test_campaign_repeat_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1_get_campaign"))
        .and(query_param("first_campaign_open", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": WELCOME })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client.resolve(CAMPAIGN_URL, false).await.is_ok());
}

#[tokio::test]
async fn test_campaign_error_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1_get_campaign"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "campaign not found" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.resolve(CAMPAIGN_URL, true).await.unwrap_err();

    assert!(matches!(err, TracebackError::Transport(_)));
    assert!(err.to_string().contains("campaign not found"));
}

#[tokio::test]
async fn test_campaign_invalid_link_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1_get_campaign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "not a url" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.resolve(CAMPAIGN_URL, true).await.unwrap_err();
    assert!(matches!(err, TracebackError::Protocol(_)));
}

#[tokio::test]
async fn test_missing_domain_fails_before_request() {
    let config = Arc::new(
        ResolverConfig::builder(Arc::new(HashMap::<String, String>::new()))
            .version("1.2.0")
            .build(),
    );
    let client = TracebackClient::new(config).unwrap();

    let err = client.resolve(CAMPAIGN_URL, true).await.unwrap_err();
    assert!(err.is_fatal());
}

// ============================================================================
// END TO END
// ============================================================================

struct FixedReferrer(&'static str);

#[async_trait]
impl InstallReferrerProvider for FixedReferrer {
    async fn resolve_install_referrer(&self) -> TracebackResult<Url> {
        Ok(Url::parse(self.0)?)
    }
}

fn resolver(
    server: &MockServer,
    state: Arc<SqliteResolutionStateRepository>,
    referrer: &'static str,
) -> AttributionResolver {
    let config = config(MatchType::Ambiguous);
    let client = Arc::new(
        TracebackClient::new(Arc::clone(&config))
            .unwrap()
            .with_base_url(server.uri()),
    );
    let fingerprints = FingerprintService::new(
        Arc::clone(&config),
        platform(),
        Arc::new(NoClipboard),
        Arc::new(NoWebHeuristics),
    );

    AttributionResolver::new(
        config,
        state,
        client.clone(),
        client,
        Arc::new(FixedReferrer(referrer)),
        fingerprints,
        Arc::new(SystemClock),
    )
}

/// PROVES: a failed search on a campaign referrer ends at the campaign endpoint,
/// and the outcome survives in the durable state store
#[tokio::test]
async fn test_resolver_end_to_end_campaign_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_postinstall_search_link"))
        .and(body_partial_json(json!({ "intentLink": CAMPAIGN_URL })))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1_get_campaign"))
        .and(query_param("link", CAMPAIGN_URL))
        .and(query_param("first_campaign_open", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": WELCOME })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pool = Arc::new(create_connection_pool_at(&dir.path().join("traceback.db")).unwrap());
    let state = Arc::new(SqliteResolutionStateRepository::open(pool).unwrap());

    let resolver = resolver(&server, Arc::clone(&state), CAMPAIGN_URL);
    let link = resolver.resolve(None, FocusGain::Immediate).await.unwrap();
    assert_eq!(link.as_str(), WELCOME);

    let stored = state.read().unwrap();
    assert!(stored.referral_queried);
    assert!(stored.post_install_executed);
    assert!(stored.has_reported("halloween"));
}

#[tokio::test]
async fn test_resolver_end_to_end_heuristics_match() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_postinstall_search_link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "match_type": "unique",
            "request_ip_version": "ipv4",
            "deep_link_id": WELCOME
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pool = Arc::new(create_connection_pool_at(&dir.path().join("traceback.db")).unwrap());
    let state = Arc::new(SqliteResolutionStateRepository::open(pool).unwrap());

    let resolver = resolver(&server, Arc::clone(&state), "https://example.com/oldschool");
    let link = resolver.resolve(None, FocusGain::Immediate).await.unwrap();

    // Untrusted referrer is its own destination
    assert_eq!(link.as_str(), "https://example.com/oldschool");
    assert!(state.read().unwrap().post_install_executed);
    assert!(state.read().unwrap().reported_campaigns.is_empty());
}
