//! Workflow engine for the patent prosecution pipeline
//!
//! The engine synchronizes a patent's prosecution stage across three UI
//! subsystems (translation, document preparation, filing) that each see
//! only part of the underlying state. It is a library, not a service:
//! subsystems push events into the [`WorkflowOrchestrator`], which reads
//! aggregate state through injected repository traits, consults the
//! [`stage_machine`] transition table, and records every stage change as a
//! `WorkflowTransition`.
//!
//! # Components
//!
//! - [`stage_machine`]: the authoritative transition table — which edges
//!   exist, what triggers them, and whether they fire automatically.
//! - [`completion`]: pure derivation of document slot status and the
//!   aggregate completion fraction of a patent's document set.
//! - [`oa_rounds`]: the ordered Office-Action round cycle.
//! - [`projection`]: per-context status labels and page stage filters —
//!   the same stage reads differently to different audiences.
//! - [`conditions`]: the named-condition evaluator behind automatic
//!   transitions.
//! - [`orchestrator`]: the entry points called when an external event
//!   occurs; decides whether a transition fires and emits the audit record
//!   plus notification text.
//!
//! # Design Principles
//!
//! 1. The machine never polls. Callers push events; the engine verifies
//!    conditions at that moment and either commits or no-ops.
//! 2. Stage changes are single-writer per patent: the stage write is a
//!    compare-and-set, so at most one racing evaluation wins.
//! 3. Re-delivered events are no-ops, never duplicates. The orchestrator
//!    re-checks the current stage before acting.

#![deny(unsafe_code)]

pub mod completion;
pub mod conditions;
pub mod oa_rounds;
pub mod orchestrator;
pub mod projection;
pub mod stage_machine;

pub use completion::{compute_completion, derive_item_status};
pub use conditions::{required_conditions, should_auto_transition, AutoTransitionDecision};
pub use oa_rounds::OaRoundTracker;
pub use orchestrator::{
    create_transition_record, DocumentPrepOutcome, generate_notification_message, StageUpdate,
    TranslationOutcome, WorkflowOrchestrator,
};
pub use projection::{page_stages, stage_label, stage_name, StageContext};
pub use stage_machine::{can_transition, next_stage, transition_rule, TransitionRule};
