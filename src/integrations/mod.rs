// src/integrations/mod.rs
//
// External Integrations Module
//
// Everything the resolver talks to but does not own: the Traceback backend,
// the host platform, and the analytics sink.

pub mod analytics;
pub mod platform;
pub mod traceback;

pub use analytics::{AnalyticsClient, DisabledAnalyticsClient};
pub use platform::{
    ClipboardProvider, Clock, FocusGain, HeuristicCollector, InstallReferrerProvider, NoClipboard,
    NoWebHeuristics, SystemClock,
};
pub use traceback::{CampaignGateway, HeuristicsGateway, TracebackClient};
