// src/domain/link/mod.rs
//
// Link Domain
//
// Classifies launch and referrer URIs into attribution kinds.
// Pure value objects, no side effects.

pub mod classification;

pub use classification::{LinkClassification, LINK_QUERY_PARAM};
