//! Read-side view of a claim, rebuilt from the stored record on every read.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::claims::ids::ClaimId;
use crate::models::claim::{ClaimRecord, Notification, Step, WorkLogEntry};

const SUBMITTED_ON_FORMAT: &str = "%b %-d, %Y";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StepIndicator {
    pub label: &'static str,
    pub reached: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NextAction {
    pub label: &'static str,
    pub can_advance: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimView {
    pub id: ClaimId,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub submitted_at: DateTime<Utc>,
    pub submitted_on: String,
    pub step: Step,
    pub status: &'static str,
    pub progress: u8,
    pub estimated_completion: String,
    pub week: String,
    pub steps: [StepIndicator; 4],
    pub next_action: NextAction,
    pub notifications: Vec<Notification>,
    pub work_log: Vec<WorkLogEntry>,
}

pub fn project(record: &ClaimRecord) -> ClaimView {
    ClaimView {
        id: record.id.clone(),
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
        display_name: record.display_name(),
        submitted_at: record.submitted_at,
        submitted_on: record.submitted_at.format(SUBMITTED_ON_FORMAT).to_string(),
        step: record.step,
        status: record.status(),
        progress: record.progress(),
        estimated_completion: record.estimated_completion.clone(),
        week: record.week.clone(),
        steps: Step::ALL.map(|s| StepIndicator {
            label: s.indicator_label(),
            reached: record.step >= s,
        }),
        next_action: NextAction {
            label: record.step.admin_action_label(),
            can_advance: !record.step.is_terminal(),
        },
        notifications: record.notifications.clone(),
        work_log: record.work_log.clone(),
    }
}

/// Projects every record, most recently submitted first.
pub fn project_newest_first(records: &[ClaimRecord]) -> Vec<ClaimView> {
    let mut views: Vec<ClaimView> = records.iter().map(project).collect();
    views.sort_by(|a, b| {
        b.submitted_at
            .cmp(&a.submitted_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    views
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::claims::intake::{new_claim_record, NewClaimRequest};
    use crate::claims::transitions::advance;
    use crate::models::claim::ClaimPatch;

    fn record_at(id: &str, at: DateTime<Utc>) -> ClaimRecord {
        let request = NewClaimRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        };
        new_claim_record(id.parse().unwrap(), &request, at).unwrap()
    }

    #[test]
    fn test_step_indicator_tracks_step() {
        let mut record = record_at("MN-2025-1000", Utc::now());
        advance(&mut record, Utc::now());

        let view = project(&record);
        let reached: Vec<bool> = view.steps.iter().map(|s| s.reached).collect();
        assert_eq!(reached, vec![true, true, false, false]);
        let labels: Vec<&str> = view.steps.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Submitted", "Reviewing", "Determine", "Paid"]);
        assert_eq!(view.status, "Under Review");
        assert_eq!(view.progress, 33);
        assert_eq!(view.next_action.label, "Determine");
    }

    #[test]
    fn test_terminal_claim_cannot_advance() {
        let mut record = record_at("MN-2025-1000", Utc::now());
        record.step = Step::Paid;
        let view = project(&record);
        assert!(!view.next_action.can_advance);
        assert_eq!(view.next_action.label, "Completed");
        assert!(view.steps.iter().all(|s| s.reached));
    }

    #[test]
    fn test_submitted_on_and_display_name() {
        let at = Utc.with_ymd_and_hms(2024, 12, 22, 10, 0, 0).unwrap();
        let view = project(&record_at("MN-2024-555", at));
        assert_eq!(view.submitted_on, "Dec 22, 2024");
        assert_eq!(view.display_name, "Jane Doe");
    }

    #[test]
    fn test_projection_reflects_patch_merge() {
        let original = record_at("MN-2025-1000", Utc::now());
        let mut patched = original.clone();
        ClaimPatch {
            week: Some("Jan 5 - Jan 11".to_string()),
            ..Default::default()
        }
        .apply(&mut patched);

        let before = project(&original);
        let after = project(&patched);
        assert_eq!(after.week, "Jan 5 - Jan 11");
        assert_eq!(after.estimated_completion, before.estimated_completion);
        assert_eq!(after.display_name, before.display_name);
        assert_eq!(after.step, before.step);
        assert_eq!(after.notifications, before.notifications);
    }

    #[test]
    fn test_newest_first_ordering() {
        let now = Utc::now();
        let records = vec![
            record_at("MN-2025-1000", now - Duration::days(2)),
            record_at("MN-2025-1001", now),
            record_at("MN-2025-1002", now - Duration::days(1)),
        ];
        let ids: Vec<String> = project_newest_first(&records)
            .into_iter()
            .map(|v| v.id.to_string())
            .collect();
        assert_eq!(ids, vec!["MN-2025-1001", "MN-2025-1002", "MN-2025-1000"]);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let value = serde_json::to_value(project(&record_at("MN-2025-1000", Utc::now()))).unwrap();
        assert_eq!(value["step"], 0);
        assert_eq!(value["progress"], 10);
        assert_eq!(value["nextAction"]["canAdvance"], true);
        assert!(value["workLog"].as_array().unwrap().is_empty());
        assert!(value.get("estimatedCompletion").is_some());
    }
}
