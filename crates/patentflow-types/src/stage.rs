//! Prosecution stages: the authoritative lifecycle position of a patent
//!
//! A patent has exactly one [`Stage`] at any time, and the stage only
//! changes through a recorded [`crate::WorkflowTransition`]. The happy path
//! is totally ordered; `OaResponse` is re-entrant — a patent can cycle
//! through multiple Office Action rounds while remaining in that stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle position of a patent in the prosecution pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Nothing has happened yet
    NoProgress,
    /// Translation files exist and work is underway
    Translating,
    /// Translation is done and awaiting review sign-off
    TranslationReview,
    /// Required filing documents are being assembled
    DocumentPrep,
    /// Document set complete; attorney is reviewing before filing
    AttorneyReview,
    /// Filed with the USPTO; application number assigned
    UsptoFiling,
    /// An Office Action was received and a response is in flight
    OaResponse,
    /// Prosecution closed: registration number issued
    UsptoRegistered,
}

impl Stage {
    /// All stages in happy-path order
    pub const ALL: [Stage; 8] = [
        Stage::NoProgress,
        Stage::Translating,
        Stage::TranslationReview,
        Stage::DocumentPrep,
        Stage::AttorneyReview,
        Stage::UsptoFiling,
        Stage::OaResponse,
        Stage::UsptoRegistered,
    ];

    /// Whether this stage has no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::UsptoRegistered)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::NoProgress => write!(f, "NO_PROGRESS"),
            Stage::Translating => write!(f, "TRANSLATING"),
            Stage::TranslationReview => write!(f, "TRANSLATION_REVIEW"),
            Stage::DocumentPrep => write!(f, "DOCUMENT_PREP"),
            Stage::AttorneyReview => write!(f, "ATTORNEY_REVIEW"),
            Stage::UsptoFiling => write!(f, "USPTO_FILING"),
            Stage::OaResponse => write!(f, "OA_RESPONSE"),
            Stage::UsptoRegistered => write!(f, "USPTO_REGISTERED"),
        }
    }
}

/// The external event that causes a transition edge to fire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionTrigger {
    /// First translation file attached to the patent
    FileUpload,
    /// Explicit "translation complete" user action
    TranslationCompleteButton,
    /// Document set completion fraction reached 1.0
    AllRequiredDocsUploaded,
    /// US application number field populated
    ApplicationNumberEntered,
    /// An Office Action arrived for a filed application
    OaReceived,
    /// US registration number field populated
    RegistrationNumberEntered,
}

impl fmt::Display for TransitionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionTrigger::FileUpload => write!(f, "FILE_UPLOAD"),
            TransitionTrigger::TranslationCompleteButton => {
                write!(f, "TRANSLATION_COMPLETE_BUTTON")
            }
            TransitionTrigger::AllRequiredDocsUploaded => write!(f, "ALL_REQUIRED_DOCS_UPLOADED"),
            TransitionTrigger::ApplicationNumberEntered => {
                write!(f, "APPLICATION_NUMBER_ENTERED")
            }
            TransitionTrigger::OaReceived => write!(f, "OA_RECEIVED"),
            TransitionTrigger::RegistrationNumberEntered => {
                write!(f, "REGISTRATION_NUMBER_ENTERED")
            }
        }
    }
}
