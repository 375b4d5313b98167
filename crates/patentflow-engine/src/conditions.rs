//! Condition evaluator for automatic transitions
//!
//! Each stage with an outgoing automatic edge names the boolean conditions
//! that must hold before the edge fires. Callers supply the conditions they
//! know about as a map; a required key absent from the supplied map is
//! treated as not required (vacuously satisfied), never as false. That
//! lenient reading keeps partial condition checks possible — callers that
//! want strict evaluation must supply every key explicitly.

use crate::stage_machine;
use patentflow_types::Stage;
use std::collections::HashMap;

/// Condition key: a translation file has been attached
pub const COND_TRANSLATION_FILE_UPLOADED: &str = "translation_file_uploaded";
/// Condition key: every essential document slot is filled
pub const COND_DOCUMENTS_UPLOADED: &str = "documents_uploaded";
/// Condition key: the US application number field is populated
pub const COND_APPLICATION_NUMBER_ENTERED: &str = "application_number_entered";
/// Condition key: an Office Action has been received
pub const COND_OA_RECEIVED: &str = "oa_received";
/// Condition key: the US registration number field is populated
pub const COND_REGISTRATION_NUMBER_ENTERED: &str = "registration_number_entered";

/// The named conditions required before `stage`'s automatic edge may fire
///
/// Stages whose outgoing edge is manual (or absent) require nothing — they
/// can never fire from condition evaluation.
pub fn required_conditions(stage: Stage) -> &'static [&'static str] {
    match stage {
        Stage::NoProgress => &[COND_TRANSLATION_FILE_UPLOADED],
        Stage::DocumentPrep => &[COND_DOCUMENTS_UPLOADED],
        Stage::AttorneyReview => &[COND_APPLICATION_NUMBER_ENTERED],
        Stage::UsptoFiling => &[COND_OA_RECEIVED],
        Stage::OaResponse => &[COND_REGISTRATION_NUMBER_ENTERED],
        Stage::Translating | Stage::TranslationReview | Stage::UsptoRegistered => &[],
    }
}

/// The outcome of an auto-transition evaluation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoTransitionDecision {
    pub should_transition: bool,
    pub next_stage: Option<Stage>,
}

impl AutoTransitionDecision {
    fn no() -> Self {
        Self {
            should_transition: false,
            next_stage: None,
        }
    }

    fn yes(next: Stage) -> Self {
        Self {
            should_transition: true,
            next_stage: Some(next),
        }
    }
}

/// Decide whether `stage`'s automatic edge should fire given the supplied
/// condition map
///
/// Returns transition-worthy only when every required condition that is
/// present in the map is true. Manual edges never qualify, regardless of
/// conditions.
pub fn should_auto_transition(
    stage: Stage,
    conditions: &HashMap<String, bool>,
) -> AutoTransitionDecision {
    let Some(next) = stage_machine::next_stage(stage) else {
        return AutoTransitionDecision::no();
    };
    let Some(rule) = stage_machine::transition_rule(stage, next) else {
        return AutoTransitionDecision::no();
    };
    if !rule.auto {
        return AutoTransitionDecision::no();
    }

    let satisfied = required_conditions(stage)
        .iter()
        .all(|key| conditions.get(*key).copied().unwrap_or(true));

    if satisfied {
        AutoTransitionDecision::yes(next)
    } else {
        AutoTransitionDecision::no()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(pairs: &[(&str, bool)]) -> HashMap<String, bool> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_application_number_fires_filing_edge() {
        let decision = should_auto_transition(
            Stage::AttorneyReview,
            &conditions(&[(COND_APPLICATION_NUMBER_ENTERED, true)]),
        );
        assert!(decision.should_transition);
        assert_eq!(decision.next_stage, Some(Stage::UsptoFiling));
    }

    #[test]
    fn test_false_condition_blocks() {
        let decision = should_auto_transition(
            Stage::DocumentPrep,
            &conditions(&[(COND_DOCUMENTS_UPLOADED, false)]),
        );
        assert!(!decision.should_transition);
        assert_eq!(decision.next_stage, None);
    }

    #[test]
    fn test_absent_required_key_is_vacuously_satisfied() {
        // The map says nothing about documents_uploaded at all.
        let decision = should_auto_transition(Stage::DocumentPrep, &HashMap::new());
        assert!(decision.should_transition);
        assert_eq!(decision.next_stage, Some(Stage::AttorneyReview));
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let decision = should_auto_transition(
            Stage::DocumentPrep,
            &conditions(&[
                (COND_DOCUMENTS_UPLOADED, true),
                ("review_completed", false),
            ]),
        );
        assert!(decision.should_transition);
    }

    #[test]
    fn test_manual_edge_never_fires() {
        // Translating -> DocumentPrep is a manual edge; conditions are
        // irrelevant.
        let decision = should_auto_transition(
            Stage::Translating,
            &conditions(&[("anything", true)]),
        );
        assert!(!decision.should_transition);
    }

    #[test]
    fn test_terminal_stage_never_fires() {
        let decision = should_auto_transition(Stage::UsptoRegistered, &HashMap::new());
        assert!(!decision.should_transition);
    }
}
