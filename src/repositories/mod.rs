// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO analytics emission
// - Writes are append-only (INSERT OR IGNORE)
// - Explicit SQL only

pub mod memory_resolution_state_repository;
pub mod resolution_state_repository;

pub use memory_resolution_state_repository::InMemoryResolutionStateRepository;
pub use resolution_state_repository::{
    ResolutionStateRepository, SqliteResolutionStateRepository, FLAG_POST_INSTALL_EXECUTED,
    FLAG_REFERRAL_QUERIED,
};

#[cfg(test)]
pub use resolution_state_repository::MockResolutionStateRepository;
