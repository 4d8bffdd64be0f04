//! Claim storage seam.
//!
//! `AppState` carries an `Arc<dyn ClaimStore>`; the backend is picked at
//! startup (`InMemoryClaimStore` by default, `PgClaimStore` when
//! `DATABASE_URL` is set). Handlers never reach storage any other way.

use async_trait::async_trait;

use crate::claims::ids::ClaimId;
use crate::claims::ClaimError;
use crate::models::claim::{ClaimPatch, ClaimRecord};

/// A read-modify-write step applied under the claim's lock.
/// Returns true when it changed the record; unchanged records are not written back.
pub type Mutation = Box<dyn FnOnce(&mut ClaimRecord) -> bool + Send>;

/// Result of [`ClaimStore::modify`].
#[derive(Debug, Clone)]
pub struct Modified {
    pub record: ClaimRecord,
    pub changed: bool,
}

#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Absence is a normal outcome, not an error.
    async fn get(&self, id: &ClaimId) -> Result<Option<ClaimRecord>, ClaimError>;

    /// All claims, in no meaningful order.
    async fn list(&self) -> Result<Vec<ClaimRecord>, ClaimError>;

    /// Inserts a new claim. Fails with `DuplicateId` if the id is taken.
    async fn create(&self, record: ClaimRecord) -> Result<ClaimRecord, ClaimError>;

    /// Merges `patch` over an existing claim. `None` when the id is unknown; never upserts.
    async fn update(
        &self,
        id: &ClaimId,
        patch: ClaimPatch,
    ) -> Result<Option<ClaimRecord>, ClaimError>;

    /// Applies `mutation` atomically with respect to other writers of the same id.
    /// `None` when the id is unknown.
    async fn modify(&self, id: &ClaimId, mutation: Mutation)
        -> Result<Option<Modified>, ClaimError>;

    /// Next value of the store-wide claim number sequence.
    async fn next_claim_number(&self) -> Result<u64, ClaimError>;
}
