// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod fingerprint;
pub mod link;
pub mod matching;
pub mod resolution;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Link Domain
pub use link::{LinkClassification, LINK_QUERY_PARAM};

// Matching Domain
pub use matching::{MatchConfidence, MatchPolicy, MatchType};

// Fingerprint Domain
pub use fingerprint::{DeviceFingerprint, DeviceInfo, PlatformDevice, WebHeuristics};

// Resolution Domain
pub use resolution::{
    heuristics_parameters, HeuristicsResult, ResolutionState, ResolveParameters, ResolveSource,
};
