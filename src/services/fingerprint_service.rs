// src/services/fingerprint_service.rs
//
// Fingerprint Service
//
// Assembles the DeviceFingerprint sent to the heuristics backend.
//
// CRITICAL RULES:
// - Clipboard is consulted only for a Unique minimum with no embedded deeplink
// - Focus wait + clipboard read share one timeout; timeout means "no candidate"
// - Only absolute http/https links count as clipboard candidates
// - Web heuristics collection is bounded; timeout means empty heuristics
// - Never fails on a collaborator problem, only on missing configuration

use std::sync::Arc;

use url::Url;

use crate::config::ResolverConfig;
use crate::domain::fingerprint::{DeviceFingerprint, DeviceInfo, PlatformDevice, WebHeuristics};
use crate::domain::link::LinkClassification;
use crate::domain::matching::MatchType;
use crate::error::TracebackResult;
use crate::integrations::platform::{ClipboardProvider, FocusGain, HeuristicCollector};

pub struct FingerprintService {
    config: Arc<ResolverConfig>,
    platform: PlatformDevice,
    clipboard: Arc<dyn ClipboardProvider>,
    collector: Arc<dyn HeuristicCollector>,
}

impl FingerprintService {
    pub fn new(
        config: Arc<ResolverConfig>,
        platform: PlatformDevice,
        clipboard: Arc<dyn ClipboardProvider>,
        collector: Arc<dyn HeuristicCollector>,
    ) -> Self {
        Self {
            config,
            platform,
            clipboard,
            collector,
        }
    }

    pub fn platform(&self) -> &PlatformDevice {
        &self.platform
    }

    /// Build the fingerprint for this install.
    ///
    /// `intent_link` is the launch or referrer link that started the resolution.
    pub async fn build(
        &self,
        intent_link: Option<String>,
        classification: Option<&LinkClassification>,
        focus: FocusGain,
    ) -> TracebackResult<DeviceFingerprint> {
        let sdk_version = self.config.sdk_version()?;
        let clipboard_link = self.clipboard_candidate(classification, focus).await;
        let web = self.collect_web_heuristics().await;

        Ok(DeviceFingerprint {
            app_installation_time: self.platform.install_time.timestamp_millis(),
            os_version: self.platform.os_version.clone(),
            bundle_id: self.platform.bundle_id.clone(),
            sdk_version,
            unique_match_link_to_check: clipboard_link,
            intent_link,
            device: DeviceInfo::merge(&self.platform, &web),
        })
    }

    async fn clipboard_candidate(
        &self,
        classification: Option<&LinkClassification>,
        focus: FocusGain,
    ) -> Option<String> {
        if self.config.min_match_type() != MatchType::Unique {
            log::info!("Won't use clipboard, match type is not unique");
            return None;
        }
        if classification
            .and_then(LinkClassification::embedded_deeplink)
            .is_some()
        {
            log::debug!("Won't use clipboard, launch link already carries a deeplink");
            return None;
        }

        let read = async {
            focus.wait().await;
            self.clipboard.read_clipboard().await
        };

        let text = match tokio::time::timeout(self.config.clipboard_timeout(), read).await {
            Err(_) => {
                log::info!("Clipboard not available in time, proceeding without clipboard");
                return None;
            }
            Ok(Err(e)) => {
                log::error!("Failed to get clipboard content: {}", e);
                return None;
            }
            Ok(Ok(text)) => text,
        };

        let text = match text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            Some(text) => text,
            None => {
                log::info!("No valid clipboard content found, proceeding without clipboard");
                return None;
            }
        };

        let link = http_link(&text)?;
        log::debug!("Using clipboard content as link: {}", link);
        if let Err(e) = self.clipboard.clear_clipboard().await {
            log::warn!("Failed to clear clipboard: {}", e);
        }
        Some(link)
    }

    async fn collect_web_heuristics(&self) -> WebHeuristics {
        match tokio::time::timeout(self.config.heuristics_timeout(), self.collector.collect()).await {
            Ok(web) => web,
            Err(_) => {
                log::warn!(
                    "Web heuristics not collected within {:?}, using platform values",
                    self.config.heuristics_timeout()
                );
                WebHeuristics::default()
            }
        }
    }
}

fn http_link(text: &str) -> Option<String> {
    match Url::parse(text) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url.to_string()),
        _ => {
            log::debug!("Clipboard content is not an http link, ignoring it");
            None
        }
    }
}
