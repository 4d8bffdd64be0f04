//! Review step machine: Submitted → Reviewing → Determination → Paid.
//!
//! The only transition is a single forward step. There is no deny path, no
//! backward move and no cancellation. Advancing a paid claim is reported as
//! `AdvanceOutcome::AlreadyComplete` and leaves the record untouched.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::claims::ids::ClaimId;
use crate::claims::store::ClaimStore;
use crate::claims::ClaimError;
use crate::models::claim::{ClaimRecord, Notification, NotificationKind, Step};

/// Display format for notification timestamps, e.g. `Dec 22, 2:30 PM`.
pub const NOTIFICATION_DATE_FORMAT: &str = "%b %-d, %-I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced { from: Step, to: Step },
    AlreadyComplete,
}

impl AdvanceOutcome {
    pub fn label(self) -> &'static str {
        match self {
            AdvanceOutcome::Advanced { .. } => "advanced",
            AdvanceOutcome::AlreadyComplete => "already_complete",
        }
    }
}

/// Message and kind of the notification appended on entering `step`.
/// `None` for the initial step, which is never entered by a transition.
pub fn entry_notice(step: Step) -> Option<(NotificationKind, &'static str)> {
    match step {
        Step::Submitted => None,
        Step::Reviewing => Some((
            NotificationKind::Info,
            "Your application is now being reviewed.",
        )),
        Step::Determination => Some((
            NotificationKind::Info,
            "We are making a determination on your eligibility.",
        )),
        Step::Paid => Some((NotificationKind::Success, "Payment authorized.")),
    }
}

pub fn format_notification_date(at: DateTime<Utc>) -> String {
    at.format(NOTIFICATION_DATE_FORMAT).to_string()
}

/// Moves `record` one step forward and appends exactly one notification.
/// A no-op at the terminal step.
pub fn advance(record: &mut ClaimRecord, now: DateTime<Utc>) -> AdvanceOutcome {
    let from = record.step;
    let Some(to) = from.next() else {
        return AdvanceOutcome::AlreadyComplete;
    };

    record.step = to;
    if let Some((kind, message)) = entry_notice(to) {
        let id = record.next_notification_id();
        record.notifications.push(Notification {
            id,
            message: message.to_string(),
            date: format_notification_date(now),
            kind,
        });
    }

    AdvanceOutcome::Advanced { from, to }
}

/// Advances the stored claim under its per-claim lock.
pub async fn advance_claim(
    store: &dyn ClaimStore,
    id: &ClaimId,
) -> Result<(ClaimRecord, AdvanceOutcome), ClaimError> {
    let now = Utc::now();
    let modified = store
        .modify(
            id,
            Box::new(move |record: &mut ClaimRecord| {
                matches!(advance(record, now), AdvanceOutcome::Advanced { .. })
            }),
        )
        .await?
        .ok_or_else(|| ClaimError::NotFound(id.clone()))?;

    let outcome = match (modified.changed, modified.record.step.previous()) {
        (true, Some(from)) => AdvanceOutcome::Advanced {
            from,
            to: modified.record.step,
        },
        _ => AdvanceOutcome::AlreadyComplete,
    };

    match outcome {
        AdvanceOutcome::Advanced { from, to } => info!(
            claim_id = %id,
            from = from.index(),
            to = to.index(),
            status = to.status_label(),
            "Claim advanced"
        ),
        AdvanceOutcome::AlreadyComplete => {
            info!(claim_id = %id, "Claim already complete; advance ignored")
        }
    }

    Ok((modified.record, outcome))
}
