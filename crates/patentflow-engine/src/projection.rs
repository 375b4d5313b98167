//! Status projection: what each subsystem calls a stage
//!
//! A single stage is described differently to different audiences, and
//! some stages are invisible to some audiences entirely — the document and
//! filing subsystems only begin surfacing state once `DocumentPrep` is
//! reached. The tables here are total functions over `(Stage, Context)`
//! pairs, so a missing label is a compile-time gap, not a runtime hole.
//!
//! There are three vocabularies:
//! - [`stage_label`]: the per-context UI label (may be blank),
//! - [`page_stages`]: which stages a subsystem's list view displays,
//! - [`stage_name`]: the stage-name-only vocabulary used in notification
//!   messages (never blank).

use patentflow_types::Stage;
use serde::{Deserialize, Serialize};

/// The subsystem asking for a label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageContext {
    Translation,
    Document,
    Filing,
}

/// The label shown for a stage in one subsystem context
///
/// An empty string means the stage is deliberately invisible in that
/// context.
pub fn stage_label(stage: Stage, context: StageContext) -> &'static str {
    match context {
        StageContext::Translation => match stage {
            Stage::NoProgress => "Not started",
            Stage::Translating => "Translation in progress",
            Stage::TranslationReview => "Translation under review",
            Stage::DocumentPrep => "Translation complete",
            Stage::AttorneyReview => "Translation complete",
            Stage::UsptoFiling => "Translation complete",
            Stage::OaResponse => "Translation complete",
            Stage::UsptoRegistered => "Translation complete",
        },
        StageContext::Document => match stage {
            Stage::NoProgress => "",
            Stage::Translating => "",
            Stage::TranslationReview => "",
            Stage::DocumentPrep => "Preparing documents",
            Stage::AttorneyReview => "Under attorney review",
            Stage::UsptoFiling => "Documents filed",
            Stage::OaResponse => "Documents filed",
            Stage::UsptoRegistered => "Documents filed",
        },
        StageContext::Filing => match stage {
            Stage::NoProgress => "",
            Stage::Translating => "",
            Stage::TranslationReview => "",
            Stage::DocumentPrep => "Awaiting documents",
            Stage::AttorneyReview => "Ready to file",
            Stage::UsptoFiling => "Filed with USPTO",
            Stage::OaResponse => "Office Action pending",
            Stage::UsptoRegistered => "Registered",
        },
    }
}

/// The stages a subsystem's list view should ever display
///
/// Boundary stages (`DocumentPrep`, `AttorneyReview`) appear in two
/// subsystems at once — that overlap is intentional, since a patent at a
/// hand-off point concerns both sides.
pub fn page_stages(context: StageContext) -> &'static [Stage] {
    match context {
        StageContext::Translation => &[Stage::NoProgress, Stage::Translating, Stage::DocumentPrep],
        StageContext::Document => &[Stage::DocumentPrep, Stage::AttorneyReview],
        StageContext::Filing => &[Stage::AttorneyReview, Stage::UsptoFiling],
    }
}

/// The stage name used in notification messages — never blank
pub fn stage_name(stage: Stage) -> &'static str {
    match stage {
        Stage::NoProgress => "No Progress",
        Stage::Translating => "Translating",
        Stage::TranslationReview => "Translation Review",
        Stage::DocumentPrep => "Document Preparation",
        Stage::AttorneyReview => "Attorney Review",
        Stage::UsptoFiling => "USPTO Filing",
        Stage::OaResponse => "OA Response",
        Stage::UsptoRegistered => "USPTO Registered",
    }
}
