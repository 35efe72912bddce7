// src/lib.rs
// Traceback - Deferred deep link resolution for freshly installed applications
//
// Architecture:
// - Domain-centric: link classification and match policy are pure and synchronous
// - Explicit: every network call and state write happens in AttributionResolver
// - At-most-once: referrer and heuristics lookups are guarded by durable flags
// - Injected platform: referrer, clipboard, clock and analytics are traits

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub mod integrations;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    DeviceFingerprint, DeviceInfo, HeuristicsResult, LinkClassification, MatchConfidence,
    MatchPolicy, MatchType, PlatformDevice, ResolutionState, ResolveParameters, ResolveSource,
    WebHeuristics,
};

// ============================================================================
// PUBLIC API - Configuration & Errors
// ============================================================================

pub use config::{PlatformMetadata, ResolverConfig, ResolverConfigBuilder};
pub use error::{TracebackError, TracebackResult};

// ============================================================================
// PUBLIC API - State Store
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};
pub use repositories::{
    InMemoryResolutionStateRepository, ResolutionStateRepository, SqliteResolutionStateRepository,
};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    AnalyticsClient, CampaignGateway, ClipboardProvider, Clock, DisabledAnalyticsClient,
    FocusGain, HeuristicCollector, HeuristicsGateway, InstallReferrerProvider, NoClipboard,
    NoWebHeuristics, SystemClock, TracebackClient,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{AttributionResolver, FingerprintService};
