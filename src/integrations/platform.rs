// src/integrations/platform.rs
//
// Platform Collaborators
//
// Interfaces to the host operating system. The library never talks to the
// platform directly; the embedding application supplies these.
//
// CRITICAL RULES:
// - Each call is single-shot, retries are the resolver's business
// - Implementations must be Send + Sync (shared behind Arc)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use url::Url;

use crate::domain::fingerprint::WebHeuristics;
use crate::error::TracebackResult;

// ============================================================================
// INSTALL REFERRER
// ============================================================================

/// Provenance link recorded by the store at install time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstallReferrerProvider: Send + Sync {
    async fn resolve_install_referrer(&self) -> TracebackResult<Url>;
}

// ============================================================================
// CLIPBOARD
// ============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClipboardProvider: Send + Sync {
    /// Current plain-text clipboard content, `None` when empty or not text.
    async fn read_clipboard(&self) -> TracebackResult<Option<String>>;

    /// Clear the clipboard after its content has been consumed.
    async fn clear_clipboard(&self) -> TracebackResult<()> {
        Ok(())
    }
}

/// Clipboard that is never available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

#[async_trait]
impl ClipboardProvider for NoClipboard {
    async fn read_clipboard(&self) -> TracebackResult<Option<String>> {
        Ok(None)
    }
}

// ============================================================================
// WEB HEURISTICS
// ============================================================================

/// Runs the fingerprinting script inside an embedded web runtime.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HeuristicCollector: Send + Sync {
    async fn collect(&self) -> WebHeuristics;
}

/// Collector for hosts without a web runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWebHeuristics;

#[async_trait]
impl HeuristicCollector for NoWebHeuristics {
    async fn collect(&self) -> WebHeuristics {
        WebHeuristics::default()
    }
}

// ============================================================================
// CLOCK
// ============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================================================
// FOCUS
// ============================================================================

/// When the app window holds input focus (clipboard reads need it).
#[derive(Debug, Clone, Default)]
pub enum FocusGain {
    /// Proceed without waiting
    #[default]
    Immediate,

    /// Wait until the channel reports `true`
    Await(watch::Receiver<bool>),
}

impl FocusGain {
    /// Resolves once focus is held. A closed channel never resolves.
    pub async fn wait(self) {
        match self {
            FocusGain::Immediate => {}
            FocusGain::Await(mut receiver) => {
                let gained = receiver.wait_for(|focused| *focused).await.is_ok();
                if !gained {
                    log::debug!("Focus signal closed before focus was gained");
                    std::future::pending::<()>().await;
                }
            }
        }
    }
}
