use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    Accepted,
    InProgress,
    Completed,
    Paid,
    Cancelled,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Accepted => "accepted",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Paid => "paid",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Paid | JobStatus::Cancelled)
    }
}

/// User-triggerable job transitions. Payment confirmation is not listed
/// here: `COMPLETED -> PAID` is driven exclusively by the webhook
/// reconciler through the invoice manager.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum JobAction {
    Accept,
    Start,
    Complete,
    Cancel,
}

impl JobAction {
    pub fn target_status(&self) -> JobStatus {
        match self {
            JobAction::Accept => JobStatus::Accepted,
            JobAction::Start => JobStatus::InProgress,
            JobAction::Complete => JobStatus::Completed,
            JobAction::Cancel => JobStatus::Cancelled,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            JobAction::Accept => "accept",
            JobAction::Start => "start",
            JobAction::Complete => "complete",
            JobAction::Cancel => "cancel",
        }
    }
}

/// The job transition table. Returns the resulting status when `action`
/// is legal from `current`, `None` otherwise. Pure; persistence applies
/// the result with a conditional write keyed on `current`.
pub fn next_status(current: JobStatus, action: JobAction) -> Option<JobStatus> {
    match (current, action) {
        (JobStatus::Open, JobAction::Accept) => Some(JobStatus::Accepted),
        (JobStatus::Accepted, JobAction::Start) => Some(JobStatus::InProgress),
        // a provider may complete straight from accepted
        (JobStatus::Accepted, JobAction::Complete) => Some(JobStatus::Completed),
        (JobStatus::InProgress, JobAction::Complete) => Some(JobStatus::Completed),
        (current, JobAction::Cancel) if !current.is_terminal() => Some(JobStatus::Cancelled),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub budget: BigDecimal,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// True when `user_id` is one of the two parties on the job.
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.client_id == user_id || self.provider_id == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [JobStatus; 6] = [
        JobStatus::Open,
        JobStatus::Accepted,
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::Paid,
        JobStatus::Cancelled,
    ];

    const ALL_ACTIONS: [JobAction; 4] = [
        JobAction::Accept,
        JobAction::Start,
        JobAction::Complete,
        JobAction::Cancel,
    ];

    #[test]
    fn test_happy_path_transitions() {
        assert_eq!(
            next_status(JobStatus::Open, JobAction::Accept),
            Some(JobStatus::Accepted)
        );
        assert_eq!(
            next_status(JobStatus::Accepted, JobAction::Start),
            Some(JobStatus::InProgress)
        );
        assert_eq!(
            next_status(JobStatus::InProgress, JobAction::Complete),
            Some(JobStatus::Completed)
        );
    }

    #[test]
    fn test_complete_allowed_from_accepted() {
        assert_eq!(
            next_status(JobStatus::Accepted, JobAction::Complete),
            Some(JobStatus::Completed)
        );
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        for status in ALL_STATUSES {
            let result = next_status(status, JobAction::Cancel);
            if status.is_terminal() {
                assert_eq!(result, None, "cancel must be rejected from {:?}", status);
            } else {
                assert_eq!(result, Some(JobStatus::Cancelled));
            }
        }
    }

    #[test]
    fn test_all_other_transitions_rejected() {
        let allowed = [
            (JobStatus::Open, JobAction::Accept),
            (JobStatus::Accepted, JobAction::Start),
            (JobStatus::Accepted, JobAction::Complete),
            (JobStatus::InProgress, JobAction::Complete),
            (JobStatus::Open, JobAction::Cancel),
            (JobStatus::Accepted, JobAction::Cancel),
            (JobStatus::InProgress, JobAction::Cancel),
            (JobStatus::Completed, JobAction::Cancel),
        ];

        for status in ALL_STATUSES {
            for action in ALL_ACTIONS {
                let expected_legal = allowed.contains(&(status, action));
                assert_eq!(
                    next_status(status, action).is_some(),
                    expected_legal,
                    "({:?}, {:?}) legality mismatch",
                    status,
                    action
                );
            }
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(JobStatus::Paid.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(!JobStatus::Open.is_terminal());
        assert!(!JobStatus::Completed.is_terminal());
    }
}
