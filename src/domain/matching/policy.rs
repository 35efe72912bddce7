// src/domain/matching/policy.rs
//
// Match Policy - decides whether a heuristics result is trustworthy enough to act on.
//
// Rules, in order:
// 1. Launch/referrer link is a campaign link → accept
// 2. Backend attributed the match to a campaign → accept
// 3. Confidence None → reject
// 4. Confidence Unique or Intent → accept
// 5. Otherwise accept iff confidence ≥ configured minimum

use super::confidence::{MatchConfidence, MatchType};
use crate::domain::link::LinkClassification;
use crate::domain::resolution::HeuristicsResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    minimum: MatchType,
}

impl MatchPolicy {
    pub fn new(minimum: MatchType) -> Self {
        Self { minimum }
    }

    pub fn minimum(&self) -> MatchType {
        self.minimum
    }

    pub fn accepts(
        &self,
        result: &HeuristicsResult,
        classification: Option<&LinkClassification>,
    ) -> bool {
        if classification.map(LinkClassification::is_campaign).unwrap_or(false) {
            return true;
        }
        if result.campaign_id.is_some() {
            return true;
        }
        match result.match_type {
            MatchConfidence::Ranked(MatchType::None) => false,
            MatchConfidence::Ranked(MatchType::Unique) | MatchConfidence::Intent => true,
            other => other.satisfies(self.minimum),
        }
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self::new(MatchType::default())
    }
}
