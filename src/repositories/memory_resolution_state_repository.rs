// src/repositories/memory_resolution_state_repository.rs

use std::sync::Mutex;

use crate::domain::resolution::ResolutionState;
use crate::error::{TracebackError, TracebackResult};
use crate::repositories::resolution_state_repository::ResolutionStateRepository;

/// Process-local state store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryResolutionStateRepository {
    state: Mutex<ResolutionState>,
}

impl InMemoryResolutionStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ResolutionState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut ResolutionState)) -> TracebackResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TracebackError::Other("Resolution state lock poisoned".to_string()))?;
        apply(&mut state);
        Ok(())
    }
}

impl ResolutionStateRepository for InMemoryResolutionStateRepository {
    fn read(&self) -> TracebackResult<ResolutionState> {
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|_| TracebackError::Other("Resolution state lock poisoned".to_string()))
    }

    fn mark_referral_queried(&self) -> TracebackResult<()> {
        self.update(|state| state.referral_queried = true)
    }

    fn mark_post_install_executed(&self) -> TracebackResult<()> {
        self.update(|state| state.post_install_executed = true)
    }

    fn add_reported_campaign(&self, campaign_id: &str) -> TracebackResult<()> {
        self.update(|state| {
            state.reported_campaigns.insert(campaign_id.to_string());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_seeded_state_is_returned() {
        let seeded = ResolutionState {
            referral_queried: false,
            post_install_executed: true,
            reported_campaigns: BTreeSet::from(["somecampaign".to_string()]),
        };
        let repo = InMemoryResolutionStateRepository::with_state(seeded.clone());
        assert_eq!(repo.read().unwrap(), seeded);
    }

    #[test]
    fn test_mutations() {
        let repo = InMemoryResolutionStateRepository::new();
        repo.mark_referral_queried().unwrap();
        repo.mark_post_install_executed().unwrap();
        repo.add_reported_campaign("halloween").unwrap();
        repo.add_reported_campaign("halloween").unwrap();

        let state = repo.read().unwrap();
        assert!(state.referral_queried);
        assert!(state.post_install_executed);
        assert_eq!(state.reported_campaigns.len(), 1);
    }
}
