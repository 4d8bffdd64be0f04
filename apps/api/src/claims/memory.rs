use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::claims::ids::ClaimId;
use crate::claims::store::{ClaimStore, Modified, Mutation};
use crate::claims::ClaimError;
use crate::models::claim::{ClaimPatch, ClaimRecord};

/// First number handed out by the in-memory sequence.
const FIRST_CLAIM_NUMBER: u64 = 1000;

/// Process-lifetime claim store. Contents are lost on restart.
///
/// The map lock is only held to find or insert a slot; each claim has its own
/// mutex, so writers on different claims never wait on each other.
#[derive(Debug)]
pub struct InMemoryClaimStore {
    claims: RwLock<HashMap<ClaimId, Arc<Mutex<ClaimRecord>>>>,
    sequence: AtomicU64,
}

impl Default for InMemoryClaimStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self {
            claims: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(FIRST_CLAIM_NUMBER),
        }
    }

    async fn slot(&self, id: &ClaimId) -> Option<Arc<Mutex<ClaimRecord>>> {
        self.claims.read().await.get(id).cloned()
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn get(&self, id: &ClaimId) -> Result<Option<ClaimRecord>, ClaimError> {
        let Some(slot) = self.slot(id).await else {
            return Ok(None);
        };
        let record = slot.lock().await.clone();
        Ok(Some(record))
    }

    async fn list(&self) -> Result<Vec<ClaimRecord>, ClaimError> {
        let slots: Vec<_> = self.claims.read().await.values().cloned().collect();
        let mut records = Vec::with_capacity(slots.len());
        for slot in slots {
            records.push(slot.lock().await.clone());
        }
        Ok(records)
    }

    async fn create(&self, record: ClaimRecord) -> Result<ClaimRecord, ClaimError> {
        let mut claims = self.claims.write().await;
        if claims.contains_key(&record.id) {
            return Err(ClaimError::DuplicateId(record.id));
        }
        claims.insert(record.id.clone(), Arc::new(Mutex::new(record.clone())));
        Ok(record)
    }

    async fn update(
        &self,
        id: &ClaimId,
        patch: ClaimPatch,
    ) -> Result<Option<ClaimRecord>, ClaimError> {
        let modified = self
            .modify(id, Box::new(move |record: &mut ClaimRecord| patch.apply(record)))
            .await?;
        Ok(modified.map(|m| m.record))
    }

    async fn modify(
        &self,
        id: &ClaimId,
        mutation: Mutation,
    ) -> Result<Option<Modified>, ClaimError> {
        let Some(slot) = self.slot(id).await else {
            return Ok(None);
        };
        let mut record = slot.lock().await;
        let changed = mutation(&mut *record);
        Ok(Some(Modified {
            record: record.clone(),
            changed,
        }))
    }

    async fn next_claim_number(&self) -> Result<u64, ClaimError> {
        Ok(self.sequence.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::claim::Step;

    fn record(id: &str) -> ClaimRecord {
        ClaimRecord {
            id: id.parse().unwrap(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            submitted_at: Utc::now(),
            step: Step::Submitted,
            estimated_completion: "10-14 business days".to_string(),
            week: "N/A".to_string(),
            notifications: vec![],
            work_log: vec![],
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = InMemoryClaimStore::new();
        let id: ClaimId = "MN-2025-1".parse().unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = InMemoryClaimStore::new();
        let created = store.create(record("MN-2025-1")).await.unwrap();
        let fetched = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let store = InMemoryClaimStore::new();
        store.create(record("MN-2025-1")).await.unwrap();
        let err = store.create(record("MN-2025-1")).await.unwrap_err();
        assert!(matches!(err, ClaimError::DuplicateId(id) if id.as_str() == "MN-2025-1"));
    }

    #[tokio::test]
    async fn test_update_missing_does_not_create() {
        let store = InMemoryClaimStore::new();
        let id: ClaimId = "MN-2025-404".parse().unwrap();
        let patch = ClaimPatch {
            week: Some("Jan 5 - Jan 11".to_string()),
            ..Default::default()
        };
        assert!(store.update(&id, patch).await.unwrap().is_none());
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_over_existing() {
        let store = InMemoryClaimStore::new();
        let original = store.create(record("MN-2025-1")).await.unwrap();
        let patch = ClaimPatch {
            estimated_completion: Some("3-5 business days".to_string()),
            ..Default::default()
        };
        let updated = store.update(&original.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.estimated_completion, "3-5 business days");
        assert_eq!(updated.week, original.week);
        assert_eq!(updated.first_name, original.first_name);
        assert_eq!(updated.step, original.step);
    }

    #[tokio::test]
    async fn test_sequence_is_monotonic() {
        let store = InMemoryClaimStore::new();
        let a = store.next_claim_number().await.unwrap();
        let b = store.next_claim_number().await.unwrap();
        assert_eq!(a, FIRST_CLAIM_NUMBER);
        assert_eq!(b, a + 1);
    }

    #[tokio::test]
    async fn test_concurrent_modifications_are_not_lost() {
        let store = Arc::new(InMemoryClaimStore::new());
        let id = store.create(record("MN-2025-1")).await.unwrap().id;

        let mut handles = Vec::new();
        for i in 0..50 {
            let store = Arc::clone(&store);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .modify(
                        &id,
                        Box::new(move |r: &mut ClaimRecord| {
                            r.week = format!("{}|{i}", r.week);
                            true
                        }),
                    )
                    .await
                    .unwrap()
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let week = store.get(&id).await.unwrap().unwrap().week;
        assert_eq!(week.matches('|').count(), 50);
    }
}
