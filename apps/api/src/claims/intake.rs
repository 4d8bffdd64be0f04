//! Claimant submissions: validates the request and creates the step-0 record.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::claims::ids::ClaimId;
use crate::claims::store::ClaimStore;
use crate::claims::transitions::format_notification_date;
use crate::claims::ClaimError;
use crate::models::claim::{ClaimRecord, Notification, NotificationKind, Step};

/// Attempts at minting a fresh id before giving up with `DuplicateId`.
const MAX_ID_ATTEMPTS: u32 = 3;

pub const NEW_CLAIM_ESTIMATE: &str = "10-14 business days";
pub const NEW_CLAIM_WEEK: &str = "N/A";
pub const RECEIVED_MESSAGE: &str = "Application Received";

/// Body of `POST /status`. Wizard answers beyond the claimant's name are accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClaimRequest {
    pub first_name: String,
    pub last_name: String,
}

/// Builds the record for a fresh submission: step 0 with one seed notification.
pub fn new_claim_record(
    id: ClaimId,
    request: &NewClaimRequest,
    now: DateTime<Utc>,
) -> Result<ClaimRecord, ClaimError> {
    let first_name = request.first_name.trim();
    let last_name = request.last_name.trim();
    if first_name.is_empty() {
        return Err(ClaimError::Validation("firstName cannot be empty".to_string()));
    }
    if last_name.is_empty() {
        return Err(ClaimError::Validation("lastName cannot be empty".to_string()));
    }

    Ok(ClaimRecord {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        submitted_at: now,
        step: Step::Submitted,
        estimated_completion: NEW_CLAIM_ESTIMATE.to_string(),
        week: NEW_CLAIM_WEEK.to_string(),
        notifications: vec![Notification {
            id: 1,
            message: RECEIVED_MESSAGE.to_string(),
            date: format_notification_date(now),
            kind: NotificationKind::Success,
        }],
        work_log: Vec::new(),
    })
}

/// Creates a claim for `request` under a freshly minted `<prefix>-<year>-<n>` id.
pub async fn submit_claim(
    store: &dyn ClaimStore,
    prefix: &str,
    request: &NewClaimRequest,
) -> Result<ClaimRecord, ClaimError> {
    let now = Utc::now();
    let mut attempt = 0;
    loop {
        attempt += 1;
        let number = store.next_claim_number().await?;
        let id = ClaimId::new(prefix, now.year(), number)?;
        let record = new_claim_record(id, request, now)?;

        match store.create(record).await {
            Ok(created) => {
                info!(claim_id = %created.id, "Claim submitted");
                return Ok(created);
            }
            Err(ClaimError::DuplicateId(id)) if attempt < MAX_ID_ATTEMPTS => {
                warn!(claim_id = %id, attempt, "Claim id already taken, minting another");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Creates the demo claimant shown on a fresh dashboard, unless `id` already exists.
pub async fn seed_demo_claim(store: &dyn ClaimStore, id: &ClaimId) -> Result<(), ClaimError> {
    if store.get(id).await?.is_some() {
        return Ok(());
    }

    let submitted_at = Utc
        .with_ymd_and_hms(2024, 12, 22, 10, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);

    let record = ClaimRecord {
        id: id.clone(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        submitted_at,
        step: Step::Reviewing,
        estimated_completion: "5-7 business days".to_string(),
        week: "Dec 15 - Dec 21".to_string(),
        notifications: vec![
            Notification {
                id: 1,
                message: RECEIVED_MESSAGE.to_string(),
                date: "Dec 22, 2:30 PM".to_string(),
                kind: NotificationKind::Success,
            },
            Notification {
                id: 2,
                message: "Handbook Available".to_string(),
                date: "Dec 22, 2:31 PM".to_string(),
                kind: NotificationKind::Info,
            },
        ],
        work_log: Vec::new(),
    };

    match store.create(record).await {
        Ok(_) => {
            info!(claim_id = %id, "Seeded demo claim");
            Ok(())
        }
        // Lost a race with another instance seeding the same database.
        Err(ClaimError::DuplicateId(_)) => Ok(()),
        Err(e) => Err(e),
    }
}
