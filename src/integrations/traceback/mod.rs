// src/integrations/traceback/mod.rs
//
// Traceback backend: the two lookups the resolver depends on.

pub mod client;

use async_trait::async_trait;
use url::Url;

use crate::domain::fingerprint::DeviceFingerprint;
use crate::domain::resolution::HeuristicsResult;
use crate::error::TracebackResult;

pub use client::{TracebackClient, CAMPAIGN_PATH, SEARCH_LINK_PATH};

/// Matches a device fingerprint against recent pre-install clicks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HeuristicsGateway: Send + Sync {
    async fn search(&self, fingerprint: &DeviceFingerprint) -> TracebackResult<HeuristicsResult>;
}

/// Resolves a campaign link to its destination.
///
/// `first_open` tells the backend whether this install has reported the campaign before.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignGateway: Send + Sync {
    async fn resolve(&self, campaign_url: &str, first_open: bool) -> TracebackResult<Url>;
}
