//! Admin review queue actions. The only caller allowed to advance a claim.

// TODO: gate these actions behind a reviewer role once the portal has real sign-in.

use serde::{Deserialize, Serialize};

use crate::claims::ids::ClaimId;
use crate::claims::projection::{project, ClaimView};
use crate::claims::store::ClaimStore;
use crate::claims::transitions::{advance_claim, AdvanceOutcome};
use crate::claims::ClaimError;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdminActionKind {
    Approve,
}

/// `id` stays raw so a malformed id surfaces as `InvalidClaimId`, not a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminActionRequest {
    pub id: String,
    pub action: AdminActionKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminActionResult {
    pub outcome: &'static str,
    #[serde(flatten)]
    pub claim: ClaimView,
}

pub async fn apply_admin_action(
    store: &dyn ClaimStore,
    request: &AdminActionRequest,
) -> Result<(ClaimView, AdvanceOutcome), ClaimError> {
    let id: ClaimId = request.id.trim().parse()?;
    match request.action {
        AdminActionKind::Approve => {
            let (record, outcome) = advance_claim(store, &id).await?;
            Ok((project(&record), outcome))
        }
    }
}
