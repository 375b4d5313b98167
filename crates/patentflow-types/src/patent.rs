//! Patent root entity and translation records

use crate::{PatentId, Stage, TranslationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A patent application — the aggregate root for all workflow state
///
/// Child entities (translations, document set, filing, OA rounds) reference
/// the patent by id and are owned by it; removing the patent logically
/// removes its workflow state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Patent {
    /// Stable identifier
    pub patent_id: PatentId,
    /// Human-readable title, used in notification messages
    pub title: String,
    /// The single authoritative lifecycle position
    pub stage: Stage,
    /// When the patent record was registered
    pub created_at: DateTime<Utc>,
    /// When the stage last changed
    pub updated_at: DateTime<Utc>,
}

impl Patent {
    /// Register a new patent at the initial stage
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            patent_id: PatentId::generate(),
            title: title.into(),
            stage: Stage::NoProgress,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, patent_id: PatentId) -> Self {
        self.patent_id = patent_id;
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }
}

/// Progress of a single translation job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranslationStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// One translation record belonging to a patent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Translation {
    pub translation_id: TranslationId,
    pub patent_id: PatentId,
    pub status: TranslationStatus,
    /// When the translation reached `Completed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Translation {
    pub fn new(patent_id: PatentId) -> Self {
        Self {
            translation_id: TranslationId::generate(),
            patent_id,
            status: TranslationStatus::NotStarted,
            completed_at: None,
        }
    }

    pub fn with_status(mut self, status: TranslationStatus) -> Self {
        if status == TranslationStatus::Completed {
            self.completed_at = Some(Utc::now());
        }
        self.status = status;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TranslationStatus::Completed
    }
}

/// Whether every translation in the slice is completed
///
/// An empty slice reports `true`; callers that require at least one
/// translation must check emptiness themselves.
pub fn all_translations_completed(translations: &[Translation]) -> bool {
    translations.iter().all(Translation::is_completed)
}

/// Whether at least one translation in the slice is completed
///
/// This is the input to the Specification document slot: the slot links to
/// the translated text the moment any translation finishes.
pub fn any_translation_completed(translations: &[Translation]) -> bool {
    translations.iter().any(Translation::is_completed)
}
