//! Work-search log: job applications recorded against a claim.
//!
//! Independent of the review step machine. Entries are prepended so the
//! feed reads newest first. The same job may be logged twice; the job-search
//! client tracks "already applied" on its side.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::claims::ids::ClaimId;
use crate::claims::store::ClaimStore;
use crate::claims::ClaimError;
use crate::models::claim::{ClaimRecord, WorkLogEntry, WorkLogStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct JobSummary {
    pub title: String,
    pub company: String,
}

pub fn new_entry(job: &JobSummary, today: NaiveDate) -> Result<WorkLogEntry, ClaimError> {
    let job_title = job.title.trim();
    let company = job.company.trim();
    if job_title.is_empty() {
        return Err(ClaimError::Validation("job.title cannot be empty".to_string()));
    }
    if company.is_empty() {
        return Err(ClaimError::Validation("job.company cannot be empty".to_string()));
    }

    Ok(WorkLogEntry {
        id: Uuid::new_v4(),
        job_title: job_title.to_string(),
        company: company.to_string(),
        date_applied: today,
        status: WorkLogStatus::Applied,
    })
}

/// Records an application on the claim's work log and returns the new entry.
pub async fn log_application(
    store: &dyn ClaimStore,
    claim_id: &ClaimId,
    job: &JobSummary,
) -> Result<WorkLogEntry, ClaimError> {
    let entry = new_entry(job, Utc::now().date_naive())?;

    let to_insert = entry.clone();
    store
        .modify(
            claim_id,
            Box::new(move |record: &mut ClaimRecord| {
                record.work_log.insert(0, to_insert);
                true
            }),
        )
        .await?
        .ok_or_else(|| ClaimError::NotFound(claim_id.clone()))?;

    info!(
        claim_id = %claim_id,
        entry_id = %entry.id,
        company = %entry.company,
        "Logged job application"
    );
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::intake::{new_claim_record, NewClaimRequest};
    use crate::claims::memory::InMemoryClaimStore;
    use crate::models::claim::Step;

    fn job(title: &str, company: &str) -> JobSummary {
        JobSummary {
            title: title.to_string(),
            company: company.to_string(),
        }
    }

    async fn store_with_claim() -> (InMemoryClaimStore, ClaimId) {
        let store = InMemoryClaimStore::new();
        let request = NewClaimRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        };
        let record =
            new_claim_record("MN-2025-1000".parse().unwrap(), &request, Utc::now()).unwrap();
        let id = store.create(record).await.unwrap().id;
        (store, id)
    }

    #[test]
    fn test_new_entry_is_applied() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let entry = new_entry(&job("Data Analyst", "Target"), today).unwrap();
        assert_eq!(entry.status, WorkLogStatus::Applied);
        assert_eq!(entry.date_applied, today);
        assert_eq!(entry.job_title, "Data Analyst");
    }

    #[test]
    fn test_new_entry_rejects_blank_company() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert!(new_entry(&job("Data Analyst", " "), today).is_err());
    }

    #[tokio::test]
    async fn test_entries_are_newest_first() {
        let (store, id) = store_with_claim().await;
        let a = log_application(&store, &id, &job("Cook", "Cafe A")).await.unwrap();
        let b = log_application(&store, &id, &job("Server", "Cafe B")).await.unwrap();

        let record = store.get(&id).await.unwrap().unwrap();
        assert_eq!(record.work_log.len(), 2);
        assert_eq!(record.work_log[0].id, b.id);
        assert_eq!(record.work_log[1].id, a.id);
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let (store, id) = store_with_claim().await;
        let same = job("Cook", "Cafe A");
        log_application(&store, &id, &same).await.unwrap();
        log_application(&store, &id, &same).await.unwrap();

        let record = store.get(&id).await.unwrap().unwrap();
        assert_eq!(record.work_log.len(), 2);
        assert_ne!(record.work_log[0].id, record.work_log[1].id);
    }

    #[tokio::test]
    async fn test_logging_leaves_step_alone() {
        let (store, id) = store_with_claim().await;
        log_application(&store, &id, &job("Cook", "Cafe A")).await.unwrap();

        let record = store.get(&id).await.unwrap().unwrap();
        assert_eq!(record.step, Step::Submitted);
        assert_eq!(record.notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let store = InMemoryClaimStore::new();
        let id: ClaimId = "MN-2025-404".parse().unwrap();
        let err = log_application(&store, &id, &job("Cook", "Cafe A"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::NotFound(_)));
    }
}
