// src/domain/resolution/mod.rs
//
// Resolution Domain
//
// Value objects describing the outcome and bookkeeping of attribution resolution.
//
// CRITICAL RULES:
// - Pure value objects
// - No persistence (repositories own that)
// - No analytics emission (the resolver's job)

pub mod value_objects;

pub use value_objects::{
    heuristics_parameters, HeuristicsResult, ResolutionState, ResolveParameters, ResolveSource,
    PARAM_CLIPBOARD_USED, PARAM_MATCH_TYPE,
};
