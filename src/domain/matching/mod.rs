// src/domain/matching/mod.rs
//
// Matching Domain
//
// Confidence levels reported by the heuristics backend and the policy that
// decides whether a result is acted upon.

pub mod confidence;
pub mod policy;

pub use confidence::{MatchConfidence, MatchType};
pub use policy::MatchPolicy;
