//! In-memory stores guarded by `tokio::sync::RwLock`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::claim::{ClaimFilter, ClaimPatch, ClaimRecord, NewClaim, PageRequest};
use crate::config::ClaimConfigDocument;
use crate::ports::{ClaimStore, ConfigStore, Result};

#[derive(Default)]
struct ClaimTable {
    next_id: i64,
    rows: BTreeMap<i64, ClaimRecord>,
}

impl ClaimTable {
    fn owned_mut(&mut self, claim_id: i64, user_id: &str) -> Option<&mut ClaimRecord> {
        self.rows
            .get_mut(&claim_id)
            .filter(|c| c.user_id == user_id && !c.status.is_locked())
    }
}

#[derive(Clone, Default)]
pub struct MemoryClaimStore {
    table: Arc<RwLock<ClaimTable>>,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    async fn insert(&self, claim: NewClaim) -> Result<Option<ClaimRecord>> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let now = Utc::now();
        let record = ClaimRecord {
            claim_id: table.next_id,
            user_id: claim.user_id,
            policy_id: claim.policy_id,
            description: claim.description,
            incident_type: claim.incident_type,
            status: claim.status,
            attributes: claim.attributes,
            date_of_incident: claim.date_of_incident,
            date_of_submission: claim.date_of_submission,
            created_at: now,
            updated_at: now,
            rejection_reason: None,
        };
        table.rows.insert(record.claim_id, record.clone());
        Ok(Some(record))
    }

    async fn find_owned(&self, claim_id: i64, user_id: &str) -> Result<Option<ClaimRecord>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .get(&claim_id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn find_mutable(&self, claim_id: i64, user_id: &str) -> Result<Option<ClaimRecord>> {
        Ok(self
            .find_owned(claim_id, user_id)
            .await?
            .filter(|c| !c.status.is_locked()))
    }

    async fn update(
        &self,
        claim_id: i64,
        user_id: &str,
        patch: ClaimPatch,
    ) -> Result<Option<ClaimRecord>> {
        let mut table = self.table.write().await;
        let Some(record) = table.owned_mut(claim_id, user_id) else {
            return Ok(None);
        };
        record.description = patch.description;
        record.attributes = patch.attributes;
        record.status = patch.status;
        record.rejection_reason = patch.rejection_reason;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete(&self, claim_id: i64, user_id: &str) -> Result<bool> {
        let mut table = self.table.write().await;
        if table.owned_mut(claim_id, user_id).is_none() {
            return Ok(false);
        }
        Ok(table.rows.remove(&claim_id).is_some())
    }

    async fn list(
        &self,
        filter: &ClaimFilter,
        page: PageRequest,
    ) -> Result<(Vec<ClaimRecord>, i64)> {
        let table = self.table.read().await;
        let mut matching: Vec<&ClaimRecord> =
            table.rows.values().filter(|c| filter.matches(c)).collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.claim_id.cmp(&a.claim_id))
        });
        let total = matching.len() as i64;
        let claims = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok((claims, total))
    }
}

#[derive(Clone, Default)]
pub struct MemoryConfigStore {
    document: Arc<RwLock<Option<ClaimConfigDocument>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: ClaimConfigDocument) -> Self {
        Self {
            document: Arc::new(RwLock::new(Some(document))),
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self) -> Result<Option<ClaimConfigDocument>> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &ClaimConfigDocument) -> Result<ClaimConfigDocument> {
        *self.document.write().await = Some(document.clone());
        Ok(document.clone())
    }
}
