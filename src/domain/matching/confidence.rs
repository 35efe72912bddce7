// src/domain/matching/confidence.rs
//
// Match Confidence Value Objects
//
// The backend reports how sure it is that a heuristic match is the right one.
// Callers configure the minimum they are willing to act on.
//
// INVARIANTS:
// - MatchType is totally ordered: None < Ambiguous < Heuristics < Unique
// - Intent sits outside that scale and satisfies every minimum
// - Wire strings map 1:1, unknown strings are rejected

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TracebackError;

// ============================================================================
// MATCH TYPE (ORDINAL SCALE)
// ============================================================================

/// Minimum confidence a caller is willing to act on.
///
/// Declaration order is the ordinal order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    None,
    #[default]
    Ambiguous,
    Heuristics,
    Unique,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::None => "none",
            MatchType::Ambiguous => "ambiguous",
            MatchType::Heuristics => "heuristics",
            MatchType::Unique => "unique",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// MATCH CONFIDENCE (WHAT THE BACKEND REPORTS)
// ============================================================================

/// Confidence attached to a heuristics result.
///
/// `Intent` marks a link that came straight from the launch request. It has no
/// position on the ordinal scale and always clears the configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchConfidence {
    Ranked(MatchType),
    Intent,
}

impl MatchConfidence {
    pub const NONE: MatchConfidence = MatchConfidence::Ranked(MatchType::None);
    pub const AMBIGUOUS: MatchConfidence = MatchConfidence::Ranked(MatchType::Ambiguous);
    pub const HEURISTICS: MatchConfidence = MatchConfidence::Ranked(MatchType::Heuristics);
    pub const UNIQUE: MatchConfidence = MatchConfidence::Ranked(MatchType::Unique);

    /// Ordinal position, `None` for `Intent`.
    pub fn rank(&self) -> Option<MatchType> {
        match self {
            MatchConfidence::Ranked(level) => Some(*level),
            MatchConfidence::Intent => None,
        }
    }

    /// Whether this confidence clears `minimum`.
    pub fn satisfies(&self, minimum: MatchType) -> bool {
        self.rank().map_or(true, |level| level >= minimum)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchConfidence::Ranked(level) => level.as_str(),
            MatchConfidence::Intent => "intent",
        }
    }
}

impl From<MatchType> for MatchConfidence {
    fn from(level: MatchType) -> Self {
        MatchConfidence::Ranked(level)
    }
}

impl fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchConfidence {
    type Err = TracebackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(MatchConfidence::NONE),
            "ambiguous" => Ok(MatchConfidence::AMBIGUOUS),
            "heuristics" => Ok(MatchConfidence::HEURISTICS),
            "unique" => Ok(MatchConfidence::UNIQUE),
            "intent" => Ok(MatchConfidence::Intent),
            other => Err(TracebackError::Protocol(format!(
                "Unknown match type received: {}",
                other
            ))),
        }
    }
}
