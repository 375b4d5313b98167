//! Repository interfaces consumed by the workflow engine

use crate::StorageResult;
use async_trait::async_trait;
use patentflow_types::{
    DocumentSet, Filing, OaRound, OaRoundId, Patent, PatentId, Translation, WorkflowTransition,
};

/// Storage interface for patents and their owned workflow entities.
#[async_trait]
pub trait PatentStore: Send + Sync {
    /// Get one patent by id.
    async fn get_patent(&self, patent_id: &PatentId) -> StorageResult<Option<Patent>>;

    /// Insert or replace a patent record.
    async fn put_patent(&self, patent: Patent) -> StorageResult<()>;

    /// List all patents.
    async fn list_patents(&self) -> StorageResult<Vec<Patent>>;

    /// Move a patent's stage and record the transition, atomically.
    ///
    /// The stage write is a compare-and-set on `transition.from_stage`: it
    /// fails with `Conflict` if the patent's current stage has moved on.
    /// On success the transition record lands in the append-only log in
    /// the same operation — the stage never changes without its audit
    /// record, and no record exists for a stage change that lost the race.
    /// Per-patent transition serialization hangs on this single primitive.
    async fn commit_transition(&self, transition: WorkflowTransition) -> StorageResult<()>;

    /// Get the patent's document set, if one has been created.
    async fn get_document_set(&self, patent_id: &PatentId) -> StorageResult<Option<DocumentSet>>;

    /// Insert or replace the patent's document set.
    async fn put_document_set(&self, set: DocumentSet) -> StorageResult<()>;

    /// Get the patent's filing, if one has been created.
    async fn get_filing(&self, patent_id: &PatentId) -> StorageResult<Option<Filing>>;

    /// Insert or replace the patent's filing.
    async fn put_filing(&self, filing: Filing) -> StorageResult<()>;

    /// List the patent's translations.
    async fn list_translations(&self, patent_id: &PatentId) -> StorageResult<Vec<Translation>>;

    /// Insert or replace a translation record.
    async fn put_translation(&self, translation: Translation) -> StorageResult<()>;

    /// List the patent's OA rounds, ordered by sequence.
    async fn list_oa_rounds(&self, patent_id: &PatentId) -> StorageResult<Vec<OaRound>>;

    /// Insert or replace an OA round.
    async fn put_oa_round(&self, round: OaRound) -> StorageResult<()>;

    /// Remove an OA round. Surviving rounds keep their sequence numbers.
    async fn delete_oa_round(&self, round_id: &OaRoundId) -> StorageResult<()>;
}

/// Read side of the append-only workflow transition log.
///
/// Records are only ever written through [`PatentStore::commit_transition`]
/// and are never mutated or deleted; this is the audit trail.
#[async_trait]
pub trait TransitionLog: Send + Sync {
    /// List records for one patent, oldest first.
    async fn list_for_patent(
        &self,
        patent_id: &PatentId,
    ) -> StorageResult<Vec<WorkflowTransition>>;
}
