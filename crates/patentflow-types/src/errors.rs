//! Error types for the workflow engine
//!
//! Every failure here is local and recoverable: either nothing happened or
//! the caller must retry with corrected input. A half-applied transition is
//! worse than a rejected one, so no error variant is allowed to leave a
//! patent's stage partially changed.

use crate::{PatentId, Stage};

/// Errors that can occur in workflow operations
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Patent not found: {0}")]
    PatentNotFound(PatentId),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: Stage, to: Stage },

    #[error("Stale state for patent {patent}: expected stage {expected}, found {actual}")]
    StaleState {
        patent: PatentId,
        expected: Stage,
        actual: Stage,
    },

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("OA sequence violation for patent {patent}: sequence {sequence}")]
    SequenceViolation { patent: PatentId, sequence: u32 },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkflowError::InvalidTransition {
            from: Stage::NoProgress,
            to: Stage::UsptoFiling,
        };
        assert_eq!(
            err.to_string(),
            "Invalid transition: NO_PROGRESS -> USPTO_FILING"
        );
    }

    #[test]
    fn test_stale_state_display() {
        let err = WorkflowError::StaleState {
            patent: PatentId::new("p-1"),
            expected: Stage::DocumentPrep,
            actual: Stage::AttorneyReview,
        };
        let msg = err.to_string();
        assert!(msg.contains("p-1"));
        assert!(msg.contains("DOCUMENT_PREP"));
    }
}
