// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod attribution_resolver;
pub mod fingerprint_service;


pub use attribution_resolver::AttributionResolver;
pub use fingerprint_service::FingerprintService;
