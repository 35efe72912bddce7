// src/config/mod.rs
//
// Resolver Configuration
//
// CRITICAL RULES:
// - Domain and version come from platform metadata, read on first use only
// - A missing value is captured once and replayed on every later access
// - Everything else has a default and is set through the builder

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::domain::matching::MatchType;
use crate::error::{TracebackError, TracebackResult};
use crate::integrations::analytics::{AnalyticsClient, DisabledAnalyticsClient};

pub const DOMAIN_METADATA_KEY: &str = "traceback.domain";
pub const VERSION_METADATA_KEY: &str = "traceback.sdk.version";

pub const DEFAULT_PLATFORM: &str = "rust";
pub const DEFAULT_REFERRER_WINDOW: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_CLIPBOARD_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_HEURISTICS_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// PLATFORM METADATA
// ============================================================================

/// Key/value metadata bundled with the host application.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformMetadata: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;
}

impl PlatformMetadata for HashMap<String, String> {
    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

// ============================================================================
// LAZY SETTING
// ============================================================================

enum SettingSource {
    Metadata(Arc<dyn PlatformMetadata>),
    Fixed(String),
}

/// A metadata value resolved on first access and replayed afterwards.
pub struct LazySetting {
    key: &'static str,
    missing_message: &'static str,
    source: SettingSource,
    outcome: OnceLock<Result<String, String>>,
}

impl LazySetting {
    fn from_metadata(
        key: &'static str,
        missing_message: &'static str,
        metadata: Arc<dyn PlatformMetadata>,
    ) -> Self {
        Self {
            key,
            missing_message,
            source: SettingSource::Metadata(metadata),
            outcome: OnceLock::new(),
        }
    }

    fn fixed(key: &'static str, value: String) -> Self {
        Self {
            key,
            missing_message: "",
            source: SettingSource::Fixed(value),
            outcome: OnceLock::new(),
        }
    }

    pub fn get(&self) -> TracebackResult<String> {
        self.outcome
            .get_or_init(|| match &self.source {
                SettingSource::Fixed(value) => Ok(value.clone()),
                SettingSource::Metadata(metadata) => {
                    match metadata.get_string(self.key).filter(|v| !v.trim().is_empty()) {
                        Some(value) => Ok(value),
                        None => {
                            log::warn!("No '{}' attribute found in the application metadata", self.key);
                            Err(self.missing_message.to_string())
                        }
                    }
                }
            })
            .clone()
            .map_err(|message| TracebackError::MissingConfiguration {
                key: self.key,
                message,
            })
    }
}

impl fmt::Debug for LazySetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySetting")
            .field("key", &self.key)
            .field("outcome", &self.outcome.get())
            .finish()
    }
}

// ============================================================================
// RESOLVER CONFIG
// ============================================================================

pub struct ResolverConfig {
    domain: LazySetting,
    version: LazySetting,
    min_match_type: MatchType,
    analytics: Arc<dyn AnalyticsClient>,
    platform: String,
    referrer_window: Duration,
    clipboard_timeout: Duration,
    heuristics_timeout: Duration,
    http_timeout: Duration,
}

impl ResolverConfig {
    pub fn builder(metadata: Arc<dyn PlatformMetadata>) -> ResolverConfigBuilder {
        ResolverConfigBuilder::new(metadata)
    }

    /// Backend domain, also the trusted host for referrer links.
    pub fn domain(&self) -> TracebackResult<String> {
        let domain = self.domain.get()?;
        log::debug!("Using domain: {} for link resolution", domain);
        Ok(domain)
    }

    pub fn version(&self) -> TracebackResult<String> {
        self.version.get()
    }

    /// `{platform}/{version}`
    pub fn sdk_version(&self) -> TracebackResult<String> {
        Ok(format!("{}/{}", self.platform, self.version()?))
    }

    pub fn min_match_type(&self) -> MatchType {
        self.min_match_type
    }

    pub fn analytics(&self) -> &Arc<dyn AnalyticsClient> {
        &self.analytics
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn referrer_window(&self) -> Duration {
        self.referrer_window
    }

    pub fn clipboard_timeout(&self) -> Duration {
        self.clipboard_timeout
    }

    pub fn heuristics_timeout(&self) -> Duration {
        self.heuristics_timeout
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("domain", &self.domain)
            .field("version", &self.version)
            .field("min_match_type", &self.min_match_type)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

pub struct ResolverConfigBuilder {
    metadata: Arc<dyn PlatformMetadata>,
    domain: Option<String>,
    version: Option<String>,
    min_match_type: Option<MatchType>,
    analytics: Option<Arc<dyn AnalyticsClient>>,
    platform: Option<String>,
    referrer_window: Option<Duration>,
    clipboard_timeout: Option<Duration>,
    heuristics_timeout: Option<Duration>,
    http_timeout: Option<Duration>,
}

impl ResolverConfigBuilder {
    pub fn new(metadata: Arc<dyn PlatformMetadata>) -> Self {
        Self {
            metadata,
            domain: None,
            version: None,
            min_match_type: None,
            analytics: None,
            platform: None,
            referrer_window: None,
            clipboard_timeout: None,
            heuristics_timeout: None,
            http_timeout: None,
        }
    }

    /// Use this domain instead of the metadata entry
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Use this version instead of the metadata entry
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn min_match_type(mut self, match_type: MatchType) -> Self {
        self.min_match_type = Some(match_type);
        self
    }

    pub fn analytics(mut self, client: Arc<dyn AnalyticsClient>) -> Self {
        self.analytics = Some(client);
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn referrer_window(mut self, window: Duration) -> Self {
        self.referrer_window = Some(window);
        self
    }

    pub fn clipboard_timeout(mut self, timeout: Duration) -> Self {
        self.clipboard_timeout = Some(timeout);
        self
    }

    pub fn heuristics_timeout(mut self, timeout: Duration) -> Self {
        self.heuristics_timeout = Some(timeout);
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ResolverConfig {
        let domain = match self.domain {
            Some(value) => LazySetting::fixed(DOMAIN_METADATA_KEY, value),
            None => LazySetting::from_metadata(
                DOMAIN_METADATA_KEY,
                "No domain attribute found in the application metadata. \
                 Please add a `traceback.domain` entry with your link domain (e.g. your.domain.com)",
                Arc::clone(&self.metadata),
            ),
        };
        let version = match self.version {
            Some(value) => LazySetting::fixed(VERSION_METADATA_KEY, value),
            None => LazySetting::from_metadata(
                VERSION_METADATA_KEY,
                "No version attribute found in the application metadata, \
                 make sure the `traceback.sdk.version` entry is not removed from your build",
                Arc::clone(&self.metadata),
            ),
        };

        ResolverConfig {
            domain,
            version,
            min_match_type: self.min_match_type.unwrap_or_default(),
            analytics: self
                .analytics
                .unwrap_or_else(|| Arc::new(DisabledAnalyticsClient)),
            platform: self.platform.unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            referrer_window: self.referrer_window.unwrap_or(DEFAULT_REFERRER_WINDOW),
            clipboard_timeout: self.clipboard_timeout.unwrap_or(DEFAULT_CLIPBOARD_TIMEOUT),
            heuristics_timeout: self.heuristics_timeout.unwrap_or(DEFAULT_HEURISTICS_TIMEOUT),
            http_timeout: self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT),
        }
    }
}
