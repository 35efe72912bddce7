// src/repositories/resolution_state_repository.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use rusqlite::params;

use crate::db::{get_connection, initialize_database, verify_database_integrity, ConnectionPool};
use crate::domain::resolution::ResolutionState;
use crate::error::TracebackResult;

pub const FLAG_REFERRAL_QUERIED: &str = "traceback_referral_queried";
pub const FLAG_POST_INSTALL_EXECUTED: &str = "traceback_postinstall_search_executed";

/// Per-install bookkeeping of the resolver.
///
/// Every write is durable when the call returns. Flags are never cleared and
/// campaigns are never removed.
#[cfg_attr(test, mockall::automock)]
pub trait ResolutionStateRepository: Send + Sync {
    fn read(&self) -> TracebackResult<ResolutionState>;
    fn mark_referral_queried(&self) -> TracebackResult<()>;
    fn mark_post_install_executed(&self) -> TracebackResult<()>;
    fn add_reported_campaign(&self, campaign_id: &str) -> TracebackResult<()>;
}

pub struct SqliteResolutionStateRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteResolutionStateRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Wrap `pool`, creating the schema if needed and checking the file is intact.
    pub fn open(pool: Arc<ConnectionPool>) -> TracebackResult<Self> {
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
            verify_database_integrity(&conn)?;
        }
        Ok(Self::new(pool))
    }

    fn set_flag(&self, flag: &str) -> TracebackResult<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT OR IGNORE INTO resolution_flags (flag, value, set_at) VALUES (?1, 1, ?2)",
            params![flag, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl ResolutionStateRepository for SqliteResolutionStateRepository {
    fn read(&self) -> TracebackResult<ResolutionState> {
        let conn = get_connection(&self.pool)?;

        let mut stmt = conn.prepare("SELECT flag FROM resolution_flags WHERE value = 1")?;
        let flags = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<String>, _>>()?;

        let mut stmt = conn.prepare("SELECT campaign_id FROM reported_campaigns")?;
        let reported_campaigns = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<String>, _>>()?;

        Ok(ResolutionState {
            referral_queried: flags.contains(FLAG_REFERRAL_QUERIED),
            post_install_executed: flags.contains(FLAG_POST_INSTALL_EXECUTED),
            reported_campaigns,
        })
    }

    fn mark_referral_queried(&self) -> TracebackResult<()> {
        self.set_flag(FLAG_REFERRAL_QUERIED)
    }

    fn mark_post_install_executed(&self) -> TracebackResult<()> {
        self.set_flag(FLAG_POST_INSTALL_EXECUTED)
    }

    fn add_reported_campaign(&self, campaign_id: &str) -> TracebackResult<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT OR IGNORE INTO reported_campaigns (campaign_id, reported_at) VALUES (?1, ?2)",
            params![campaign_id, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
