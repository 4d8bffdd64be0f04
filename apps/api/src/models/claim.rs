use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::claims::ids::ClaimId;
use crate::claims::ClaimError;

/// Position of a claim in the fixed review pipeline.
///
/// Ordering follows the pipeline: `Submitted < Reviewing < Determination < Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Submitted,
    Reviewing,
    Determination,
    Paid,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::Submitted,
        Step::Reviewing,
        Step::Determination,
        Step::Paid,
    ];

    pub fn index(self) -> u8 {
        match self {
            Step::Submitted => 0,
            Step::Reviewing => 1,
            Step::Determination => 2,
            Step::Paid => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Step> {
        Step::ALL.get(usize::from(index)).copied()
    }

    /// The following step, or `None` when already terminal.
    pub fn next(self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Step::from_index)
    }

    pub fn is_terminal(self) -> bool {
        self == Step::Paid
    }

    /// Human-readable status label shown on the dashboard chip.
    pub fn status_label(self) -> &'static str {
        match self {
            Step::Submitted => "Submitted",
            Step::Reviewing => "Under Review",
            Step::Determination => "Determination Pending",
            Step::Paid => "Payment Issued",
        }
    }

    pub fn progress(self) -> u8 {
        match self {
            Step::Submitted => 10,
            Step::Reviewing => 33,
            Step::Determination => 66,
            Step::Paid => 100,
        }
    }

    /// Short label used by the four-stage step indicator.
    pub fn indicator_label(self) -> &'static str {
        match self {
            Step::Submitted => "Submitted",
            Step::Reviewing => "Reviewing",
            Step::Determination => "Determine",
            Step::Paid => "Paid",
        }
    }

    /// Label of the admin button that moves a claim out of this step.
    pub fn admin_action_label(self) -> &'static str {
        match self {
            Step::Submitted => "Review",
            Step::Reviewing => "Determine",
            Step::Determination => "Authorize Pay",
            Step::Paid => "Completed",
        }
    }
}

impl Serialize for Step {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u8::deserialize(deserializer)?;
        Step::from_index(index)
            .ok_or_else(|| serde::de::Error::custom(format!("step {index} is out of range 0..=3")))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Unique within the owning claim; assigned monotonically.
    pub id: u64,
    pub message: String,
    /// Display-formatted wall-clock time, e.g. `Dec 22, 2:30 PM`.
    pub date: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkLogStatus {
    Applied,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogEntry {
    pub id: Uuid,
    pub job_title: String,
    pub company: String,
    pub date_applied: NaiveDate,
    pub status: WorkLogStatus,
}

/// One claimant's benefit application.
///
/// `status` and `progress` are not stored: they are derived from `step` on
/// every read so they can never drift from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub id: ClaimId,
    pub first_name: String,
    pub last_name: String,
    pub submitted_at: DateTime<Utc>,
    pub step: Step,
    pub estimated_completion: String,
    pub week: String,
    pub notifications: Vec<Notification>,
    pub work_log: Vec<WorkLogEntry>,
}

impl ClaimRecord {
    pub fn status(&self) -> &'static str {
        self.step.status_label()
    }

    pub fn progress(&self) -> u8 {
        self.step.progress()
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Next free notification id for this claim.
    pub fn next_notification_id(&self) -> u64 {
        self.notifications
            .iter()
            .map(|n| n.id)
            .max()
            .map_or(1, |max| max + 1)
    }
}

/// Mutable free-text fields that may be merged over an existing claim.
///
/// Identity, submission time and pipeline position are deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPatch {
    pub estimated_completion: Option<String>,
    pub week: Option<String>,
}

impl ClaimPatch {
    pub fn is_empty(&self) -> bool {
        self.estimated_completion.is_none() && self.week.is_none()
    }

    /// Merges the set fields over `record`. Returns true if anything changed.
    pub fn apply(&self, record: &mut ClaimRecord) -> bool {
        let mut changed = false;
        if let Some(estimate) = &self.estimated_completion {
            if *estimate != record.estimated_completion {
                record.estimated_completion = estimate.clone();
                changed = true;
            }
        }
        if let Some(week) = &self.week {
            if *week != record.week {
                record.week = week.clone();
                changed = true;
            }
        }
        changed
    }
}

/// Row shape of the `claims` table.
#[derive(Debug, Clone, FromRow)]
pub struct ClaimRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub submitted_at: DateTime<Utc>,
    pub step: i16,
    pub estimated_completion: String,
    pub week: String,
    pub notifications: Json<Vec<Notification>>,
    pub work_log: Json<Vec<WorkLogEntry>>,
}

impl TryFrom<ClaimRow> for ClaimRecord {
    type Error = ClaimError;

    fn try_from(row: ClaimRow) -> Result<Self, Self::Error> {
        let step = u8::try_from(row.step)
            .ok()
            .and_then(Step::from_index)
            .ok_or_else(|| {
                ClaimError::Storage(format!("claim {} has invalid step {}", row.id, row.step))
            })?;

        Ok(ClaimRecord {
            id: row.id.parse()?,
            first_name: row.first_name,
            last_name: row.last_name,
            submitted_at: row.submitted_at,
            step,
            estimated_completion: row.estimated_completion,
            week: row.week,
            notifications: row.notifications.0,
            work_log: row.work_log.0,
        })
    }
}
