//! Workflow transition audit records
//!
//! Every actual stage change produces exactly one [`WorkflowTransition`].
//! Records are immutable and append-only; they are the audit trail and the
//! only legitimate way a patent's stage moves.

use crate::{PatentId, Stage, TransitionId, TransitionTrigger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one stage change
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowTransition {
    pub transition_id: TransitionId,
    pub patent_id: PatentId,
    pub from_stage: Stage,
    pub to_stage: Stage,
    /// The event that fired the edge
    pub trigger: TransitionTrigger,
    /// Who caused the triggering event (user id or system actor)
    pub triggered_by: String,
    pub triggered_at: DateTime<Utc>,
    /// Whether the edge fired automatically from a verified condition
    pub auto_triggered: bool,
    /// The entity whose change fired the edge (document set, filing, round)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_entity_id: Option<String>,
}

impl WorkflowTransition {
    pub fn new(
        patent_id: PatentId,
        from_stage: Stage,
        to_stage: Stage,
        trigger: TransitionTrigger,
        triggered_by: impl Into<String>,
        auto_triggered: bool,
    ) -> Self {
        Self {
            transition_id: TransitionId::generate(),
            patent_id,
            from_stage,
            to_stage,
            trigger,
            triggered_by: triggered_by.into(),
            triggered_at: Utc::now(),
            auto_triggered,
            related_entity_id: None,
        }
    }

    pub fn with_related_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.related_entity_id = Some(entity_id.into());
        self
    }
}
