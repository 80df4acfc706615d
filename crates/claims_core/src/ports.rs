//! Storage port traits. Implemented by `stores` (memory, file) and by
//! claims_postgres; the service depends only on these.

use async_trait::async_trait;

use crate::claim::{ClaimFilter, ClaimPatch, ClaimRecord, NewClaim, PageRequest};
use crate::config::ClaimConfigDocument;
use crate::error::ClaimsError;

pub type Result<T> = std::result::Result<T, ClaimsError>;

/// Persistence for the single claim configuration document.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// The stored document, or `None` if nothing has been saved yet.
    async fn load(&self) -> Result<Option<ClaimConfigDocument>>;

    /// Replace the stored document wholesale and return what was persisted.
    async fn save(&self, document: &ClaimConfigDocument) -> Result<ClaimConfigDocument>;
}

/// Persistence for claim records. Every lookup is scoped to the owning user;
/// a claim owned by someone else is indistinguishable from a missing one.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Insert a claim, assigning id and timestamps. `None` if the store
    /// accepted the write but produced no row.
    async fn insert(&self, claim: NewClaim) -> Result<Option<ClaimRecord>>;

    async fn find_owned(&self, claim_id: i64, user_id: &str) -> Result<Option<ClaimRecord>>;

    /// Like `find_owned`, but only claims that are not locked for review.
    async fn find_mutable(&self, claim_id: i64, user_id: &str) -> Result<Option<ClaimRecord>>;

    /// Apply `patch` if the claim exists, is owned by `user_id` and is not
    /// locked. Returns the updated record.
    async fn update(
        &self,
        claim_id: i64,
        user_id: &str,
        patch: ClaimPatch,
    ) -> Result<Option<ClaimRecord>>;

    /// Delete under the same conditions as `update`. `true` if a row went.
    async fn delete(&self, claim_id: i64, user_id: &str) -> Result<bool>;

    /// One page of matching claims, newest first, plus the total match count.
    async fn list(&self, filter: &ClaimFilter, page: PageRequest)
        -> Result<(Vec<ClaimRecord>, i64)>;
}
