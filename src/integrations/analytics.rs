// src/integrations/analytics.rs
//
// Analytics sink supplied by the host application.

use crate::domain::resolution::{ResolveParameters, ResolveSource};

/// Receives resolution outcomes. Calls are fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait AnalyticsClient: Send + Sync {
    fn on_resolve_source(&self, source: ResolveSource, parameters: ResolveParameters);

    fn on_resolve_fail(&self, source: ResolveSource, parameters: ResolveParameters);
}

/// No-op sink used when the host does not configure analytics.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledAnalyticsClient;

impl AnalyticsClient for DisabledAnalyticsClient {
    fn on_resolve_source(&self, source: ResolveSource, _parameters: ResolveParameters) {
        log::trace!("Analytics disabled, dropping resolve source {}", source);
    }

    fn on_resolve_fail(&self, source: ResolveSource, _parameters: ResolveParameters) {
        log::trace!("Analytics disabled, dropping resolve failure {}", source);
    }
}
