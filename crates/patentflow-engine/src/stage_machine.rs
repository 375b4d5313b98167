//! Stage state machine: the authoritative transition table
//!
//! The table is the single source of truth for which stage changes are
//! legal. It is deliberately not transitive — you can only ask whether a
//! single edge exists, never whether a stage is eventually reachable. Each
//! stage has at most one outgoing edge, so `next_stage` is deterministic
//! with no tie-break to resolve.
//!
//! The machine does not poll conditions. For automatic edges the calling
//! component verifies the trigger condition independently and pushes the
//! event; manual edges require an explicit user action and are never fired
//! from condition evaluation.

use patentflow_types::{Stage, TransitionTrigger, WorkflowError, WorkflowResult};

/// One row of the transition table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: Stage,
    pub to: Stage,
    pub trigger: TransitionTrigger,
    /// Fires automatically once its condition is verified true
    pub auto: bool,
}

/// The complete transition table, happy path first
pub const TRANSITION_TABLE: [TransitionRule; 6] = [
    TransitionRule {
        from: Stage::NoProgress,
        to: Stage::Translating,
        trigger: TransitionTrigger::FileUpload,
        auto: true,
    },
    TransitionRule {
        from: Stage::Translating,
        to: Stage::DocumentPrep,
        trigger: TransitionTrigger::TranslationCompleteButton,
        auto: false,
    },
    TransitionRule {
        from: Stage::DocumentPrep,
        to: Stage::AttorneyReview,
        trigger: TransitionTrigger::AllRequiredDocsUploaded,
        auto: true,
    },
    TransitionRule {
        from: Stage::AttorneyReview,
        to: Stage::UsptoFiling,
        trigger: TransitionTrigger::ApplicationNumberEntered,
        auto: true,
    },
    TransitionRule {
        from: Stage::UsptoFiling,
        to: Stage::OaResponse,
        trigger: TransitionTrigger::OaReceived,
        auto: true,
    },
    TransitionRule {
        from: Stage::OaResponse,
        to: Stage::UsptoRegistered,
        trigger: TransitionTrigger::RegistrationNumberEntered,
        auto: true,
    },
];

/// Whether the single edge `from -> to` exists in the table
pub fn can_transition(from: Stage, to: Stage) -> bool {
    transition_rule(from, to).is_some()
}

/// The unique next stage for `from`, if it has an outgoing edge
pub fn next_stage(from: Stage) -> Option<Stage> {
    TRANSITION_TABLE
        .iter()
        .find(|rule| rule.from == from)
        .map(|rule| rule.to)
}

/// The rule for the edge `from -> to`, if present
pub fn transition_rule(from: Stage, to: Stage) -> Option<&'static TransitionRule> {
    TRANSITION_TABLE
        .iter()
        .find(|rule| rule.from == from && rule.to == to)
}

/// Look up the edge `from -> to`, rejecting anything not in the table
///
/// A rejected request is a no-op: the caller gets `InvalidTransition` and
/// the stage is untouched.
pub fn request(from: Stage, to: Stage) -> WorkflowResult<&'static TransitionRule> {
    transition_rule(from, to).ok_or(WorkflowError::InvalidTransition { from, to })
}
