// src/integrations/traceback/client.rs
//
// Traceback Backend Client
//
// ARCHITECTURE:
// - JSON over HTTPS against `https://{domain}`
// - POST /v1_postinstall_search_link  (heuristics search)
// - GET  /v1_get_campaign             (campaign resolution)
// - Maps wire DTOs → domain values (NO state mutation)
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - One attempt per call, no retries
// - Domain is read from config on every call so a missing domain surfaces here too

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use super::{CampaignGateway, HeuristicsGateway};
use crate::config::ResolverConfig;
use crate::domain::fingerprint::DeviceFingerprint;
use crate::domain::matching::MatchConfidence;
use crate::domain::resolution::HeuristicsResult;
use crate::error::{TracebackError, TracebackResult};

pub const SEARCH_LINK_PATH: &str = "v1_postinstall_search_link";
pub const CAMPAIGN_PATH: &str = "v1_get_campaign";

// ============================================================================
// WIRE DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchLinkResponse {
    match_type: String,
    #[allow(dead_code)] // Part of the response schema, only logged
    request_ip_version: String,
    #[serde(default)]
    match_message: Option<String>,
    #[serde(default)]
    deep_link_id: Option<String>,
    #[serde(default, rename = "match_campaign")]
    campaign_id: Option<String>,
    #[serde(default)]
    utm_medium: Option<String>,
    #[serde(default)]
    utm_source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CampaignResponse {
    #[serde(alias = "link")]
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct TracebackClient {
    http_client: Client,
    config: Arc<ResolverConfig>,
    base_url_override: Option<String>,
}

impl TracebackClient {
    pub fn new(config: Arc<ResolverConfig>) -> TracebackResult<Self> {
        let http_client = Client::builder().timeout(config.http_timeout()).build()?;

        Ok(Self {
            http_client,
            config,
            base_url_override: None,
        })
    }

    /// Send requests to `base_url` instead of `https://{domain}`
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    fn endpoint(&self, path: &str) -> TracebackResult<String> {
        let base = match &self.base_url_override {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.config.domain()?),
        };
        Ok(format!("{}/{}", base, path))
    }

    fn map_search_response(
        response: SearchLinkResponse,
        clipboard_used: bool,
    ) -> TracebackResult<HeuristicsResult> {
        let match_type: MatchConfidence = response.match_type.parse()?;
        let deep_link = response.deep_link_id.ok_or_else(|| {
            TracebackError::Protocol("No deep link ID found in the response".to_string())
        })?;

        Ok(HeuristicsResult {
            match_type,
            deep_link,
            utm_medium: response.utm_medium,
            utm_source: response.utm_source,
            campaign_id: response.campaign_id,
            clipboard_used,
        })
    }

    async fn campaign_error(status: StatusCode, response: reqwest::Response) -> TracebackError {
        let detail = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => "no error detail".to_string(),
        };
        log::error!(
            "Failed to resolve campaign link, status: {} ({})",
            status,
            detail
        );
        TracebackError::Transport(format!(
            "Failed to resolve campaign link, status: {} - {}",
            status, detail
        ))
    }
}

#[async_trait]
impl HeuristicsGateway for TracebackClient {
    async fn search(&self, fingerprint: &DeviceFingerprint) -> TracebackResult<HeuristicsResult> {
        let url = self.endpoint(SEARCH_LINK_PATH)?;

        let response = self
            .http_client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(fingerprint)
            .send()
            .await
            .map_err(|e| TracebackError::Transport(format!("Heuristics request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Failed to resolve link with heuristics, status: {}", status);
            return Err(TracebackError::Transport(format!(
                "Failed to resolve link with heuristics, status: {}",
                status
            )));
        }

        let body: SearchLinkResponse = response.json().await.map_err(|e| {
            TracebackError::Protocol(format!("Failed to parse heuristics response: {}", e))
        })?;
        log::debug!(
            "Heuristics response: match_type={}, message={:?}, campaign={:?}",
            body.match_type,
            body.match_message,
            body.campaign_id
        );

        Self::map_search_response(body, fingerprint.uses_clipboard())
    }
}

#[async_trait]
impl CampaignGateway for TracebackClient {
    async fn resolve(&self, campaign_url: &str, first_open: bool) -> TracebackResult<Url> {
        let url = self.endpoint(CAMPAIGN_PATH)?;
        let first_open = first_open.to_string();

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[("link", campaign_url), ("first_campaign_open", first_open.as_str())])
            .send()
            .await
            .map_err(|e| TracebackError::Transport(format!("Campaign request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::campaign_error(status, response).await);
        }

        let body: CampaignResponse = response.json().await.map_err(|e| {
            TracebackError::Protocol(format!("Failed to parse campaign response: {}", e))
        })?;

        Ok(Url::parse(&body.result)?)
    }
}
