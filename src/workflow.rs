use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },
    #[error("unknown status value '{0}'")]
    UnknownStatus(String),
}

/// Lifecycle shared by supervisions and activity reports. One-directional:
/// once a record reaches the foundation it is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReviewStatus {
    Draft,
    Submitted,
    SentToFoundation,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Draft => "draft",
            ReviewStatus::Submitted => "submitted",
            ReviewStatus::SentToFoundation => "sent_to_foundation",
        }
    }

    pub fn parse(value: &str) -> Result<ReviewStatus, WorkflowError> {
        match value {
            "draft" => Ok(ReviewStatus::Draft),
            "submitted" => Ok(ReviewStatus::Submitted),
            "sent_to_foundation" => Ok(ReviewStatus::SentToFoundation),
            other => Err(WorkflowError::UnknownStatus(other.to_string())),
        }
    }

    pub fn submit(self) -> Result<ReviewStatus, WorkflowError> {
        match self {
            ReviewStatus::Draft => Ok(ReviewStatus::Submitted),
            other => Err(WorkflowError::InvalidTransition {
                from: other.as_str(),
                to: "submitted",
            }),
        }
    }

    pub fn send_to_foundation(self) -> Result<ReviewStatus, WorkflowError> {
        match self {
            ReviewStatus::Submitted => Ok(ReviewStatus::SentToFoundation),
            other => Err(WorkflowError::InvalidTransition {
                from: other.as_str(),
                to: "sent_to_foundation",
            }),
        }
    }

    /// Items may only be added or changed while the record is a draft.
    pub fn allows_scoring(&self) -> bool {
        matches!(self, ReviewStatus::Draft)
    }
}

/// RAB proposals add a foundation decision; a rejection sends the proposal
/// back to draft for revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RabStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl RabStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RabStatus::Draft => "draft",
            RabStatus::Submitted => "submitted",
            RabStatus::Approved => "approved",
            RabStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<RabStatus, WorkflowError> {
        match value {
            "draft" => Ok(RabStatus::Draft),
            "submitted" => Ok(RabStatus::Submitted),
            "approved" => Ok(RabStatus::Approved),
            "rejected" => Ok(RabStatus::Rejected),
            other => Err(WorkflowError::UnknownStatus(other.to_string())),
        }
    }

    pub fn submit(self) -> Result<RabStatus, WorkflowError> {
        match self {
            RabStatus::Draft => Ok(RabStatus::Submitted),
            other => Err(WorkflowError::InvalidTransition {
                from: other.as_str(),
                to: "submitted",
            }),
        }
    }

    pub fn approve(self) -> Result<RabStatus, WorkflowError> {
        match self {
            RabStatus::Submitted => Ok(RabStatus::Approved),
            other => Err(WorkflowError::InvalidTransition {
                from: other.as_str(),
                to: "approved",
            }),
        }
    }

    pub fn reject(self) -> Result<RabStatus, WorkflowError> {
        match self {
            RabStatus::Submitted => Ok(RabStatus::Rejected),
            other => Err(WorkflowError::InvalidTransition {
                from: other.as_str(),
                to: "rejected",
            }),
        }
    }

    /// A rejected proposal reopens as a draft for revision.
    pub fn reopen(self) -> Result<RabStatus, WorkflowError> {
        match self {
            RabStatus::Rejected => Ok(RabStatus::Draft),
            other => Err(WorkflowError::InvalidTransition {
                from: other.as_str(),
                to: "draft",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_flow_is_one_directional() {
        let status = ReviewStatus::Draft;
        let status = status.submit().unwrap();
        assert_eq!(status, ReviewStatus::Submitted);
        let status = status.send_to_foundation().unwrap();
        assert_eq!(status, ReviewStatus::SentToFoundation);

        assert!(status.submit().is_err());
        assert!(status.send_to_foundation().is_err());
    }

    #[test]
    fn draft_cannot_skip_submission() {
        assert_eq!(
            ReviewStatus::Draft.send_to_foundation(),
            Err(WorkflowError::InvalidTransition {
                from: "draft",
                to: "sent_to_foundation",
            })
        );
    }

    #[test]
    fn scoring_locked_after_submit() {
        assert!(ReviewStatus::Draft.allows_scoring());
        assert!(!ReviewStatus::Submitted.allows_scoring());
        assert!(!ReviewStatus::SentToFoundation.allows_scoring());
    }

    #[test]
    fn rejected_rab_returns_to_draft() {
        let status = RabStatus::Draft.submit().unwrap();
        let status = status.reject().unwrap();
        assert_eq!(status, RabStatus::Rejected);
        assert_eq!(status.reopen().unwrap(), RabStatus::Draft);
    }

    #[test]
    fn rejected_rab_must_reopen_before_resubmission() {
        assert_eq!(
            RabStatus::Rejected.submit(),
            Err(WorkflowError::InvalidTransition {
                from: "rejected",
                to: "submitted",
            })
        );
        let revised = RabStatus::Rejected.reopen().unwrap();
        assert_eq!(revised.submit().unwrap(), RabStatus::Submitted);
    }

    #[test]
    fn approved_rab_is_terminal() {
        let status = RabStatus::Submitted.approve().unwrap();
        assert!(status.submit().is_err());
        assert!(status.reject().is_err());
        assert!(status.reopen().is_err());
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            ReviewStatus::Draft,
            ReviewStatus::Submitted,
            ReviewStatus::SentToFoundation,
        ] {
            assert_eq!(ReviewStatus::parse(status.as_str()).unwrap(), status);
        }
        for status in [
            RabStatus::Draft,
            RabStatus::Submitted,
            RabStatus::Approved,
            RabStatus::Rejected,
        ] {
            assert_eq!(RabStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(ReviewStatus::parse("archived").is_err());
    }
}
