//! Postgres adapters for the claims_core storage ports.
//!
//! All SQL is runtime-checked (`sqlx::query_as`, not `query_as!`) so the
//! crate builds without a live database.

pub mod claims;
pub mod config_store;
mod rows;

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use claims_core::ports::{ClaimStore, ConfigStore};

pub use claims::PgClaimStore;
pub use config_store::PgConfigStore;

const SCHEMA_SQL: &str = include_str!("../migrations/0001_claims.sql");

/// Create tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .context("applying claims schema")?;
    Ok(())
}

/// Both stores over one pool, ready to hand to `ClaimsServiceImpl::new`.
pub struct PgStores {
    pub claims: Arc<dyn ClaimStore>,
    pub configs: Arc<dyn ConfigStore>,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            claims: Arc::new(PgClaimStore::new(pool.clone())),
            configs: Arc::new(PgConfigStore::new(pool)),
        }
    }
}
