//! OA round tracker: the repeating Office-Action cycle
//!
//! Rounds are appended with `sequence = max + 1`, so sequences are dense
//! and increasing at creation time. Deleting a round leaves a gap and
//! never renumbers survivors. Adding a round while a prior round is still
//! open with no documents at all is rejected — an empty open round would
//! otherwise be silently orphaned.

use chrono::{NaiveDate, Utc};
use patentflow_store::PatentStore;
use patentflow_types::{
    OaRound, OaRoundId, OaRoundStatus, PatentId, WorkflowError, WorkflowResult,
};
use std::sync::Arc;

/// The sequence the next appended round must carry
pub fn next_sequence(existing: &[OaRound]) -> u32 {
    existing.iter().map(|r| r.sequence).max().unwrap_or(0) + 1
}

/// Reject a candidate sequence that is out of order or already taken
///
/// For callers importing rounds whose sequence was assigned elsewhere;
/// [`OaRoundTracker::add_round`] assigns its own via [`next_sequence`] and
/// needs no check.
pub fn validate_new_sequence(existing: &[OaRound], candidate: u32) -> WorkflowResult<()> {
    let expected = next_sequence(existing);
    if candidate != expected {
        let patent = existing
            .first()
            .map(|r| r.patent_id.clone())
            .unwrap_or_else(|| PatentId::new("unknown"));
        return Err(WorkflowError::SequenceViolation {
            patent,
            sequence: candidate,
        });
    }
    Ok(())
}

/// Reject appending while a prior round is still open and completely empty
fn guard_open_empty_round(existing: &[OaRound]) -> WorkflowResult<()> {
    if let Some(orphan) = existing
        .iter()
        .find(|r| r.status.is_open() && r.has_no_documents())
    {
        return Err(WorkflowError::InvalidState(format!(
            "round {} is still {} with no documents; attach the Office Action or delete it first",
            orphan.sequence, orphan.status
        )));
    }
    Ok(())
}

/// Tracks the Office Action rounds of each patent through the store
pub struct OaRoundTracker {
    store: Arc<dyn PatentStore>,
}

impl OaRoundTracker {
    pub fn new(store: Arc<dyn PatentStore>) -> Self {
        Self { store }
    }

    /// Append a new round for the patent
    ///
    /// The round starts as `Received` with empty document and comment
    /// lists. Fails with `InvalidState` while a prior round is still open
    /// and empty.
    pub async fn add_round(
        &self,
        patent_id: &PatentId,
        received_date: NaiveDate,
        response_deadline: NaiveDate,
    ) -> WorkflowResult<OaRound> {
        let existing = self.store.list_oa_rounds(patent_id).await?;
        guard_open_empty_round(&existing)?;

        let sequence = next_sequence(&existing);
        let round = OaRound::new(
            patent_id.clone(),
            sequence,
            received_date,
            response_deadline,
        );
        self.store.put_oa_round(round.clone()).await?;
        tracing::info!(patent = %patent_id, sequence, "OA round added");
        Ok(round)
    }

    /// Close a round: status `Completed`, response date stamped now
    ///
    /// The caller should then signal the orchestrator
    /// (`on_oa_round_completed`) so the patent's stage can follow.
    pub async fn complete_round(
        &self,
        patent_id: &PatentId,
        round_id: &OaRoundId,
    ) -> WorkflowResult<OaRound> {
        let rounds = self.store.list_oa_rounds(patent_id).await?;
        let mut round = rounds
            .into_iter()
            .find(|r| &r.round_id == round_id)
            .ok_or_else(|| {
                WorkflowError::InvalidState(format!("round {round_id} not found"))
            })?;

        round.status = OaRoundStatus::Completed;
        round.response_date = Some(Utc::now());
        self.store.put_oa_round(round.clone()).await?;
        tracing::info!(patent = %patent_id, sequence = round.sequence, "OA round completed");
        Ok(round)
    }

    /// Remove a round. Surviving rounds keep their sequences (gaps are
    /// permitted once a round is deleted).
    pub async fn delete_round(&self, round_id: &OaRoundId) -> WorkflowResult<()> {
        self.store.delete_oa_round(round_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patentflow_store::InMemoryWorkflowStore;
    use patentflow_types::{
        DocumentSlot, OaDocumentCategory, Patent, Stage, UploadKind, UploadedFile,
    };

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        )
    }

    async fn tracker_with_patent() -> (OaRoundTracker, Arc<InMemoryWorkflowStore>, PatentId) {
        let store = Arc::new(InMemoryWorkflowStore::new());
        let patent = Patent::new("P").with_stage(Stage::UsptoFiling);
        let id = patent.patent_id.clone();
        store.put_patent(patent).await.unwrap();
        (OaRoundTracker::new(store.clone()), store, id)
    }

    fn oa_file() -> UploadedFile {
        UploadedFile::new(DocumentSlot::Other, UploadKind::AttorneyDraft, "examiner")
    }

    #[tokio::test]
    async fn test_three_rounds_sequence_one_two_three() {
        let (tracker, store, id) = tracker_with_patent().await;
        let (received, deadline) = dates();

        for expected in 1..=3u32 {
            let round = tracker.add_round(&id, received, deadline).await.unwrap();
            assert_eq!(round.sequence, expected);
            assert_eq!(round.status, OaRoundStatus::Received);

            // Attach the Office Action so the next append is not blocked
            // by the open-empty-round guard.
            let mut round = round;
            round.attach_document(OaDocumentCategory::Received, oa_file());
            store.put_oa_round(round).await.unwrap();
        }

        let rounds = store.list_oa_rounds(&id).await.unwrap();
        let sequences: Vec<u32> = rounds.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_open_empty_round_blocks_append() {
        let (tracker, _store, id) = tracker_with_patent().await;
        let (received, deadline) = dates();

        tracker.add_round(&id, received, deadline).await.unwrap();
        let err = tracker.add_round(&id, received, deadline).await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_complete_round_stamps_response_date() {
        let (tracker, _store, id) = tracker_with_patent().await;
        let (received, deadline) = dates();

        let round = tracker.add_round(&id, received, deadline).await.unwrap();
        let completed = tracker.complete_round(&id, &round.round_id).await.unwrap();
        assert_eq!(completed.status, OaRoundStatus::Completed);
        assert!(completed.response_date.is_some());
    }

    #[tokio::test]
    async fn test_delete_leaves_gap() {
        let (tracker, store, id) = tracker_with_patent().await;
        let (received, deadline) = dates();

        let mut first = tracker.add_round(&id, received, deadline).await.unwrap();
        first.attach_document(OaDocumentCategory::Received, oa_file());
        let first_id = first.round_id.clone();
        store.put_oa_round(first).await.unwrap();

        let mut second = tracker.add_round(&id, received, deadline).await.unwrap();
        second.attach_document(OaDocumentCategory::Received, oa_file());
        store.put_oa_round(second).await.unwrap();

        tracker.delete_round(&first_id).await.unwrap();

        let rounds = store.list_oa_rounds(&id).await.unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].sequence, 2);

        // The gap stays: the next round appends after the surviving max.
        let third = tracker.add_round(&id, received, deadline).await.unwrap();
        assert_eq!(third.sequence, 3);
    }

    #[test]
    fn test_validate_rejects_duplicate_sequence() {
        let (received, deadline) = dates();
        let existing = vec![OaRound::new(PatentId::new("p-1"), 1, received, deadline)];
        let err = validate_new_sequence(&existing, 1).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::SequenceViolation { sequence: 1, .. }
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_order_sequence() {
        let (received, deadline) = dates();
        let existing = vec![OaRound::new(PatentId::new("p-1"), 1, received, deadline)];
        assert!(validate_new_sequence(&existing, 3).is_err());
        assert!(validate_new_sequence(&existing, 2).is_ok());
    }
}
