// src/services/attribution_resolver.rs
//
// Attribution Resolver
//
// Works out, once per install, which deep link the user should land on.
//
// Fallback chain:
//   launch link → install referrer → heuristics search → campaign lookup
//
// CRITICAL RULES:
// - Missing domain/version fails before any network call or state write
// - Referrer is requested at most once per install, and only shortly after install
// - Heuristics search runs at most once per install, win or lose
// - A campaign id is recorded as reported before its lookup result is observed
// - Flags are written after the guarded call returns, never before
// - Only MissingConfiguration escapes the fallback chain
// - One resolve() at a time per resolver instance

use std::sync::Arc;

use tokio::sync::Mutex;
use url::Url;

use crate::config::ResolverConfig;
use crate::domain::link::LinkClassification;
use crate::domain::matching::MatchPolicy;
use crate::domain::resolution::{HeuristicsResult, ResolutionState, ResolveSource};
use crate::error::{TracebackError, TracebackResult};
use crate::integrations::platform::{Clock, FocusGain, InstallReferrerProvider};
use crate::integrations::traceback::{CampaignGateway, HeuristicsGateway};
use crate::repositories::ResolutionStateRepository;
use crate::services::fingerprint_service::FingerprintService;

// ============================================================================
// ATTRIBUTION RESOLVER
// ============================================================================

pub struct AttributionResolver {
    config: Arc<ResolverConfig>,
    state_repo: Arc<dyn ResolutionStateRepository>,
    heuristics: Arc<dyn HeuristicsGateway>,
    campaigns: Arc<dyn CampaignGateway>,
    referrer: Arc<dyn InstallReferrerProvider>,
    fingerprints: FingerprintService,
    clock: Arc<dyn Clock>,
    policy: MatchPolicy,
    in_flight: Mutex<()>,
}

impl AttributionResolver {
    pub fn new(
        config: Arc<ResolverConfig>,
        state_repo: Arc<dyn ResolutionStateRepository>,
        heuristics: Arc<dyn HeuristicsGateway>,
        campaigns: Arc<dyn CampaignGateway>,
        referrer: Arc<dyn InstallReferrerProvider>,
        fingerprints: FingerprintService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let policy = MatchPolicy::new(config.min_match_type());
        Self {
            config,
            state_repo,
            heuristics,
            campaigns,
            referrer,
            fingerprints,
            clock,
            policy,
            in_flight: Mutex::new(()),
        }
    }

    /// Resolve the pending deep link for this install.
    ///
    /// `launch_uri` is the link the app was opened with, if any. `focus` gates
    /// clipboard access during the heuristics step.
    pub async fn resolve(&self, launch_uri: Option<&Url>, focus: FocusGain) -> TracebackResult<Url> {
        let _guard = self.in_flight.lock().await;
        log::info!(
            "Resolving pending traceback link: {}",
            launch_uri.map(Url::as_str).unwrap_or("<none>")
        );

        let domain = self.config.domain().map_err(|e| {
            log::error!("Failed to get traceback domain from configuration: {}", e);
            e
        })?;
        self.config.version()?;

        let mut state = self.state_repo.read()?;

        let classification = match launch_uri {
            Some(uri) => Some(LinkClassification::classify(uri, None)),
            None => self.referrer_classification(&state, &domain).await,
        };

        if state.post_install_executed {
            log::debug!("Post-install search already executed, resolving campaign if needed");
            return match &classification {
                Some(campaign @ LinkClassification::CampaignLink { .. }) => {
                    self.campaign_fallback(campaign, &state).await
                }
                other => direct_resolution(other.as_ref(), None),
            };
        }

        let resolved = match self
            .heuristics_resolution(classification.as_ref(), &mut state, focus)
            .await
        {
            Ok(link) => Ok(link),
            Err(e) if !e.is_recoverable() => Err(e),
            Err(e) => match &classification {
                // Campaign classification is always accepted, so `e` is a lookup failure here
                Some(campaign @ LinkClassification::CampaignLink { .. }) => {
                    log::warn!("Heuristics resolution failed, trying campaign lookup: {}", e);
                    self.campaign_fallback(campaign, &state).await
                }
                other => {
                    log::error!("Heuristics resolution failed: {}", e);
                    direct_resolution(other.as_ref(), None)
                }
            },
        };

        // Heuristics were attempted; never again for this install.
        self.record(
            self.state_repo.mark_post_install_executed(),
            "post-install search",
        );

        resolved
    }

    // ========================================================================
    // INTERNAL: Referrer
    // ========================================================================

    async fn referrer_classification(
        &self,
        state: &ResolutionState,
        domain: &str,
    ) -> Option<LinkClassification> {
        if state.referral_queried {
            log::debug!("Install referrer already queried for this install");
            return None;
        }
        if !self.within_referrer_window() {
            log::info!("App was installed too long ago, won't try to get install referrer");
            return None;
        }

        let referrer = self.referrer.resolve_install_referrer().await;
        self.record(self.state_repo.mark_referral_queried(), "referrer query");

        match referrer {
            Ok(uri) => {
                log::debug!("Install referrer: {}", uri);
                Some(LinkClassification::classify(&uri, Some(domain)))
            }
            Err(e) => {
                log::error!("Failed to get install referrer: {}", e);
                None
            }
        }
    }

    fn within_referrer_window(&self) -> bool {
        let age = self.clock.now() - self.fingerprints.platform().install_time;
        match age.to_std() {
            Ok(age) => age <= self.config.referrer_window(),
            // Install time in the future: clock skew, treat as fresh
            Err(_) => true,
        }
    }

    // ========================================================================
    // INTERNAL: Heuristics
    // ========================================================================

    async fn heuristics_resolution(
        &self,
        classification: Option<&LinkClassification>,
        state: &mut ResolutionState,
        focus: FocusGain,
    ) -> TracebackResult<Url> {
        let intent_link = classification
            .filter(|c| !c.is_unknown())
            .map(|c| c.original().to_string());

        let fingerprint = self
            .fingerprints
            .build(intent_link, classification, focus)
            .await?;
        let result = self.heuristics.search(&fingerprint).await?;

        if let Some(campaign_id) = &result.campaign_id {
            self.record(
                self.state_repo.add_reported_campaign(campaign_id),
                "reported campaign",
            );
            state.reported_campaigns.insert(campaign_id.clone());
        }

        let analytics = self.config.analytics();
        if !self.policy.accepts(&result, classification) {
            analytics.on_resolve_fail(ResolveSource::Heuristics, result.parameters());
            return Err(TracebackError::BelowConfidenceThreshold {
                received: result.match_type,
                expected: self.policy.minimum(),
            });
        }
        analytics.on_resolve_source(ResolveSource::Heuristics, result.parameters());

        direct_resolution(classification, Some(&result))
    }

    // ========================================================================
    // INTERNAL: Campaign
    // ========================================================================

    /// `state` is the snapshot read when this resolution started.
    async fn campaign_fallback(
        &self,
        classification: &LinkClassification,
        state: &ResolutionState,
    ) -> TracebackResult<Url> {
        let campaign_id = match classification.campaign_id() {
            Some(id) => id,
            None => return direct_resolution(Some(classification), None),
        };

        let first_open = !state.has_reported(campaign_id);
        self.record(
            self.state_repo.add_reported_campaign(campaign_id),
            "reported campaign",
        );

        match self
            .campaigns
            .resolve(classification.original().as_str(), first_open)
            .await
        {
            Ok(link) => Ok(link),
            Err(e) => {
                log::error!("Failed to resolve campaign link: {}", e);
                direct_resolution(Some(classification), None)
            }
        }
    }

    fn record(&self, write: TracebackResult<()>, what: &str) {
        if let Err(e) = write {
            log::error!("Failed to record {} in state store: {}", what, e);
        }
    }
}

// ============================================================================
// DIRECT RESOLUTION
// ============================================================================

/// Destination derivable without a network call.
///
/// An embedded deeplink wins over the heuristics answer. An unknown link is its
/// own destination.
fn direct_resolution(
    classification: Option<&LinkClassification>,
    heuristics: Option<&HeuristicsResult>,
) -> TracebackResult<Url> {
    let embedded = match classification {
        Some(LinkClassification::CampaignLink {
            embedded_deeplink, ..
        }) => embedded_deeplink.clone(),
        Some(LinkClassification::RegularDeeplink {
            embedded_deeplink, ..
        }) => Some(embedded_deeplink.clone()),
        Some(LinkClassification::Unknown { original }) => {
            log::debug!("Won't resolve unknown link kind: {}", original);
            return Ok(original.clone());
        }
        None => None,
    };

    if let Some(link) = embedded {
        return Ok(link);
    }

    match heuristics {
        Some(result) => Url::parse(&result.deep_link).map_err(|e| {
            TracebackError::Protocol(format!(
                "Invalid deep link '{}' in heuristics response: {}",
                result.deep_link, e
            ))
        }),
        None => Err(TracebackError::NoResolvableLink),
    }
}
