//! Office Action rounds: the repeating received → respond → complete cycle
//!
//! Rounds are totally ordered by a dense, 1-based `sequence` assigned at
//! creation. Deleting a round leaves a gap; surviving rounds are never
//! renumbered. The `response_deadline` is passive data — nothing in the
//! engine fires deadline-based transitions.

use crate::{OaRoundId, PatentId, UploadedFile};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a single Office Action round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OaRoundStatus {
    /// The Office Action arrived; nothing drafted yet
    Received,
    /// A response is being drafted
    InProgress,
    /// The response was sent to the USPTO
    Responded,
    /// The round is closed
    Completed,
}

impl OaRoundStatus {
    /// Whether the round still needs work
    pub fn is_open(&self) -> bool {
        matches!(self, OaRoundStatus::Received | OaRoundStatus::InProgress)
    }
}

impl fmt::Display for OaRoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OaRoundStatus::Received => write!(f, "RECEIVED"),
            OaRoundStatus::InProgress => write!(f, "IN_PROGRESS"),
            OaRoundStatus::Responded => write!(f, "RESPONDED"),
            OaRoundStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Which side of the round a document belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OaDocumentCategory {
    /// Sent by the examiner (the Office Action itself, cited art)
    Received,
    /// Prepared by the applicant side (the response, amendments)
    Response,
}

/// A timestamped comment on a round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OaComment {
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl OaComment {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

/// One Office Action cycle for a patent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OaRound {
    pub round_id: OaRoundId,
    pub patent_id: PatentId,
    /// 1-based position; dense and increasing at creation time
    pub sequence: u32,
    pub status: OaRoundStatus,
    /// When the Office Action arrived
    pub received_date: NaiveDate,
    /// Statutory response deadline (passive data, no timer)
    pub response_deadline: NaiveDate,
    /// When the round was completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_date: Option<DateTime<Utc>>,
    /// Documents received from the examiner
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub received_documents: Vec<UploadedFile>,
    /// Documents prepared in response
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_documents: Vec<UploadedFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<OaComment>,
}

impl OaRound {
    /// Create a round at the given sequence position, status `Received`
    pub fn new(
        patent_id: PatentId,
        sequence: u32,
        received_date: NaiveDate,
        response_deadline: NaiveDate,
    ) -> Self {
        Self {
            round_id: OaRoundId::generate(),
            patent_id,
            sequence,
            status: OaRoundStatus::Received,
            received_date,
            response_deadline,
            response_date: None,
            received_documents: Vec::new(),
            response_documents: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Attach a document to the appropriate side of the round
    pub fn attach_document(&mut self, category: OaDocumentCategory, file: UploadedFile) {
        match category {
            OaDocumentCategory::Received => self.received_documents.push(file),
            OaDocumentCategory::Response => self.response_documents.push(file),
        }
    }

    pub fn add_comment(&mut self, comment: OaComment) {
        self.comments.push(comment);
    }

    /// Whether the round has no documents on either side
    pub fn has_no_documents(&self) -> bool {
        self.received_documents.is_empty() && self.response_documents.is_empty()
    }
}
