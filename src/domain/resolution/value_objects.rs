// src/domain/resolution/value_objects.rs
//
// Resolution Value Objects
//
// Outcomes and bookkeeping of one attribution resolution.
//
// CRITICAL INVARIANTS:
// - ResolutionState flags only ever move false → true
// - reported_campaigns only ever grows
// - HeuristicsResult always carries a deep link (absence is a protocol error upstream)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::domain::matching::MatchConfidence;

// ============================================================================
// HEURISTICS RESULT
// ============================================================================

/// Answer of the heuristics backend for one device fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicsResult {
    pub match_type: MatchConfidence,

    /// Resolved destination, as reported by the backend
    pub deep_link: String,

    pub utm_medium: Option<String>,
    pub utm_source: Option<String>,

    /// Campaign the backend attributed this install to
    pub campaign_id: Option<String>,

    /// Whether a clipboard candidate was part of the request
    pub clipboard_used: bool,
}

impl HeuristicsResult {
    /// Analytics parameters describing this result.
    pub fn parameters(&self) -> ResolveParameters {
        heuristics_parameters(self.match_type, self.clipboard_used)
    }
}

// ============================================================================
// RESOLUTION STATE (PER-INSTALL SNAPSHOT)
// ============================================================================

/// Snapshot of the persisted per-install bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionState {
    /// Install referrer has been requested (success or failure)
    pub referral_queried: bool,

    /// Heuristics backend call has been attempted (success or failure)
    pub post_install_executed: bool,

    /// Campaign ids already sent to the campaign endpoint
    pub reported_campaigns: BTreeSet<String>,
}

impl ResolutionState {
    pub fn has_reported(&self, campaign_id: &str) -> bool {
        self.reported_campaigns.contains(campaign_id)
    }
}

// ============================================================================
// RESOLVE SOURCE (ANALYTICS)
// ============================================================================

/// Where a resolved link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveSource {
    Intent,
    Referrer,
    Heuristics,
}

impl ResolveSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveSource::Intent => "intent",
            ResolveSource::Referrer => "referrer",
            ResolveSource::Heuristics => "heuristics",
        }
    }
}

impl fmt::Display for ResolveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type ResolveParameters = HashMap<String, String>;

pub const PARAM_MATCH_TYPE: &str = "match_type";
pub const PARAM_CLIPBOARD_USED: &str = "clipboard_used";

pub fn heuristics_parameters(match_type: MatchConfidence, clipboard_used: bool) -> ResolveParameters {
    let mut params = ResolveParameters::new();
    params.insert(PARAM_MATCH_TYPE.to_string(), match_type.to_string());
    params.insert(PARAM_CLIPBOARD_USED.to_string(), clipboard_used.to_string());
    params
}
