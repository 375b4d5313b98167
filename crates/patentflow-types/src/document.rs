//! Document set model: the required-document checklist for a patent
//!
//! Each patent owns at most one [`DocumentSet`], an ordered collection of
//! slots from a fixed catalog. A slot's [`DocumentItemStatus`] is always a
//! pure function of the files uploaded for it (plus translation completion
//! for the Specification slot) — it is never stored as authoritative state.

use crate::{DocumentSetId, FileId, PatentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed catalog of document slots
///
/// `Other` is a free-form slot excluded from completion math.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentSlot {
    Declaration,
    Ads,
    Ids,
    Assignment,
    Specification,
    Drawings,
    IdsAttachments,
    Other,
}

impl DocumentSlot {
    /// The full catalog in checklist order
    pub const CATALOG: [DocumentSlot; 8] = [
        DocumentSlot::Declaration,
        DocumentSlot::Ads,
        DocumentSlot::Ids,
        DocumentSlot::Assignment,
        DocumentSlot::Specification,
        DocumentSlot::Drawings,
        DocumentSlot::IdsAttachments,
        DocumentSlot::Other,
    ];

    /// The essential slots — everything counted toward completion
    pub fn essential() -> impl Iterator<Item = DocumentSlot> {
        Self::CATALOG.into_iter().filter(DocumentSlot::is_essential)
    }

    pub fn is_essential(&self) -> bool {
        !matches!(self, DocumentSlot::Other)
    }

    /// Human-readable slot name
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentSlot::Declaration => "Declaration",
            DocumentSlot::Ads => "ADS",
            DocumentSlot::Ids => "IDS",
            DocumentSlot::Assignment => "Assignment",
            DocumentSlot::Specification => "Specification",
            DocumentSlot::Drawings => "Drawings",
            DocumentSlot::IdsAttachments => "IDS Attachments",
            DocumentSlot::Other => "Other",
        }
    }
}

/// Who a file was uploaded by, in workflow terms
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadKind {
    /// Draft prepared by the attorney for the applicant to finalize
    AttorneyDraft,
    /// Final version signed off by the applicant
    UserFinal,
}

/// An uploaded-file fact: presence only, byte transfer is out of scope
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_id: FileId,
    pub slot: DocumentSlot,
    pub kind: UploadKind,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedFile {
    pub fn new(slot: DocumentSlot, kind: UploadKind, uploaded_by: impl Into<String>) -> Self {
        Self {
            file_id: FileId::generate(),
            slot,
            kind,
            uploaded_by: uploaded_by.into(),
            uploaded_at: Utc::now(),
        }
    }
}

/// Derived status of a document slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentItemStatus {
    /// No file attached
    NotUploaded,
    /// Only an attorney-draft file attached
    AttorneyUploaded,
    /// Only a user-final file attached
    UserUploaded,
    /// Both an attorney draft and a user final attached
    Completed,
    /// Specification only: no completed translation exists yet
    TranslationWaiting,
    /// Specification only: a completed translation is linked
    TranslationLinked,
}

impl DocumentItemStatus {
    /// Whether this status counts toward the completion fraction
    pub fn counts_toward_completion(&self) -> bool {
        matches!(
            self,
            DocumentItemStatus::Completed
                | DocumentItemStatus::UserUploaded
                | DocumentItemStatus::AttorneyUploaded
                | DocumentItemStatus::TranslationLinked
        )
    }
}

/// One checklist slot and the files uploaded against it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentItem {
    pub slot: DocumentSlot,
    pub files: Vec<UploadedFile>,
}

impl DocumentItem {
    pub fn empty(slot: DocumentSlot) -> Self {
        Self {
            slot,
            files: Vec::new(),
        }
    }

    pub fn attach(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    pub fn remove(&mut self, file_id: &FileId) {
        self.files.retain(|f| &f.file_id != file_id);
    }

    pub fn has_kind(&self, kind: UploadKind) -> bool {
        self.files.iter().any(|f| f.kind == kind)
    }
}

/// The ordered required-document checklist for one patent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentSet {
    pub document_set_id: DocumentSetId,
    pub patent_id: PatentId,
    /// One item per catalog slot, in checklist order
    pub items: Vec<DocumentItem>,
    pub created_at: DateTime<Utc>,
}

impl DocumentSet {
    /// Seed a document set with the default slot catalog, all slots empty
    pub fn seeded(patent_id: PatentId) -> Self {
        Self {
            document_set_id: DocumentSetId::generate(),
            patent_id,
            items: DocumentSlot::CATALOG
                .into_iter()
                .map(DocumentItem::empty)
                .collect(),
            created_at: Utc::now(),
        }
    }

    pub fn item(&self, slot: DocumentSlot) -> Option<&DocumentItem> {
        self.items.iter().find(|i| i.slot == slot)
    }

    pub fn item_mut(&mut self, slot: DocumentSlot) -> Option<&mut DocumentItem> {
        self.items.iter_mut().find(|i| i.slot == slot)
    }

    /// Items for essential slots only, in checklist order
    pub fn essential_items(&self) -> impl Iterator<Item = &DocumentItem> {
        self.items.iter().filter(|i| i.slot.is_essential())
    }
}

/// Aggregate completion of a document set over its essential slots
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Slots whose status counts toward completion
    pub completed: usize,
    /// Total essential slots
    pub total: usize,
    /// completed / total; 0.0 for an empty essential list
    pub fraction: f64,
}

impl Completion {
    pub fn new(completed: usize, total: usize) -> Self {
        let fraction = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };
        Self {
            completed,
            total,
            fraction,
        }
    }

    /// Ready for filing: every essential slot counts toward completion
    pub fn is_ready(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}
