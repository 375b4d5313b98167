//! USPTO filing record and its post-filing child collections
//!
//! `FilingChange` and `MiscDocument` are plain child collections with no
//! state-machine behavior: amendments and ad-hoc attachments recorded
//! against a filed application.

use crate::{DocumentSetId, FilingId, PatentId, UploadedFile};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A USPTO filing built from a completed document set
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Filing {
    pub filing_id: FilingId,
    pub patent_id: PatentId,
    /// Which document set snapshot this filing was built from
    pub document_preparation_id: DocumentSetId,
    /// Whether the source document set was complete at creation
    pub documents_ready: bool,
    /// When document preparation completed
    pub prepared_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_application_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_filing_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub us_registration_number: Option<String>,
    /// Free-form amendment events
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FilingChange>,
    /// Ad-hoc post-filing attachments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub misc_documents: Vec<MiscDocument>,
}

impl Filing {
    /// Create a filing referencing the document set it was built from
    pub fn new(patent_id: PatentId, document_preparation_id: DocumentSetId) -> Self {
        Self {
            filing_id: FilingId::generate(),
            patent_id,
            document_preparation_id,
            documents_ready: true,
            prepared_at: Utc::now(),
            us_application_number: None,
            us_filing_date: None,
            us_registration_number: None,
            changes: Vec::new(),
            misc_documents: Vec::new(),
        }
    }

    pub fn with_application_number(mut self, number: impl Into<String>) -> Self {
        self.us_application_number = Some(number.into());
        self
    }

    pub fn with_filing_date(mut self, date: NaiveDate) -> Self {
        self.us_filing_date = Some(date);
        self
    }

    pub fn with_registration_number(mut self, number: impl Into<String>) -> Self {
        self.us_registration_number = Some(number.into());
        self
    }

    /// Record an amendment event
    pub fn add_change(&mut self, change: FilingChange) {
        self.changes.push(change);
    }

    /// Attach an ad-hoc post-filing document
    pub fn add_misc_document(&mut self, doc: MiscDocument) {
        self.misc_documents.push(doc);
    }
}

/// A free-form amendment event against a filing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilingChange {
    pub change_id: String,
    pub description: String,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<UploadedFile>,
}

impl FilingChange {
    pub fn new(description: impl Into<String>, recorded_by: impl Into<String>) -> Self {
        Self {
            change_id: Uuid::new_v4().to_string(),
            description: description.into(),
            recorded_by: recorded_by.into(),
            recorded_at: Utc::now(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: UploadedFile) -> Self {
        self.files.push(file);
        self
    }
}

/// An ad-hoc attachment recorded after filing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MiscDocument {
    pub document_id: String,
    pub name: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

impl MiscDocument {
    pub fn new(name: impl Into<String>, uploaded_by: impl Into<String>) -> Self {
        Self {
            document_id: Uuid::new_v4().to_string(),
            name: name.into(),
            uploaded_by: uploaded_by.into(),
            uploaded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentSlot, UploadKind};

    #[test]
    fn test_filing_references_document_set() {
        let set_id = DocumentSetId::new("set-1");
        let filing = Filing::new(PatentId::new("p-1"), set_id.clone());
        assert_eq!(filing.document_preparation_id, set_id);
        assert!(filing.documents_ready);
        assert!(filing.us_application_number.is_none());
    }

    #[test]
    fn test_child_collections() {
        let mut filing = Filing::new(PatentId::new("p-1"), DocumentSetId::new("set-1"));
        filing.add_change(
            FilingChange::new("Claim amendment after examiner interview", "attorney-1").with_file(
                UploadedFile::new(DocumentSlot::Other, UploadKind::AttorneyDraft, "attorney-1"),
            ),
        );
        filing.add_misc_document(MiscDocument::new("Power of attorney", "user-1"));

        assert_eq!(filing.changes.len(), 1);
        assert_eq!(filing.changes[0].files.len(), 1);
        assert_eq!(filing.misc_documents.len(), 1);
    }
}
