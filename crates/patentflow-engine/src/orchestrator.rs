//! Workflow orchestrator: the entry points for external events
//!
//! Each entry point is a short-lived unit of work: read current aggregate
//! state through the store, decide whether a transition fires, and commit
//! the stage change together with its audit record. Re-delivered events
//! are no-ops — the orchestrator checks the current stage before acting
//! and treats a no-longer-applicable precondition as "nothing happened",
//! never as an error.
//!
//! Supporting entities (the document set seed, the filing seed) are
//! persisted before the stage commit, so a failed entity write aborts the
//! whole evaluation with no stage change. A stage commit that loses the
//! compare-and-set race is downgraded to a no-op; the winning evaluation
//! already recorded the transition.

use crate::completion::compute_completion;
use crate::projection::stage_name;
use crate::stage_machine;
use patentflow_store::{PatentStore, TransitionLog};
use patentflow_types::{
    all_translations_completed, any_translation_completed, DocumentSet, Filing, Patent, PatentId,
    Stage, Translation, WorkflowError, WorkflowResult, WorkflowTransition,
};
use std::sync::Arc;

/// A committed stage change plus the notification text describing it
#[derive(Clone, Debug)]
pub struct StageUpdate {
    pub transition: WorkflowTransition,
    pub notification: String,
}

/// Outcome of a "translation completed" evaluation
#[derive(Clone, Debug, Default)]
pub struct TranslationOutcome {
    /// Whether a new document set was seeded (false when one already
    /// existed and was reused)
    pub create_document_set: bool,
    /// The document set in effect, persisted before the stage change
    pub document_set_seed: Option<DocumentSet>,
    pub stage_update: Option<StageUpdate>,
}

/// Outcome of a "document preparation completed" evaluation
#[derive(Clone, Debug, Default)]
pub struct DocumentPrepOutcome {
    /// Whether a new filing was created (false when one already existed
    /// and was reused)
    pub create_filing: bool,
    /// The filing in effect, persisted before the stage change
    pub filing_seed: Option<Filing>,
    pub stage_update: Option<StageUpdate>,
}

/// The notification text for a committed transition
///
/// Built from the stage-name vocabulary, not the per-context UI labels.
pub fn generate_notification_message(
    transition: &WorkflowTransition,
    patent_title: &str,
) -> String {
    let mode = if transition.auto_triggered {
        "auto"
    } else {
        "manually"
    };
    format!(
        "{}\n{} → {} stage {} transitioned.",
        patent_title,
        stage_name(transition.from_stage),
        stage_name(transition.to_stage),
        mode
    )
}

/// Build a transition record for the edge `from -> to`
///
/// Validates the edge against the transition table; the trigger and auto
/// flag come from the matched rule, never from the caller.
pub fn create_transition_record(
    patent_id: PatentId,
    from: Stage,
    to: Stage,
    triggered_by: &str,
    related_entity_id: Option<String>,
) -> WorkflowResult<WorkflowTransition> {
    let rule = stage_machine::request(from, to)?;
    let mut transition =
        WorkflowTransition::new(patent_id, from, to, rule.trigger, triggered_by, rule.auto);
    if let Some(related) = related_entity_id {
        transition = transition.with_related_entity(related);
    }
    Ok(transition)
}

/// Evaluates external events against the stage machine and records the
/// resulting transitions
pub struct WorkflowOrchestrator {
    store: Arc<dyn PatentStore>,
    log: Arc<dyn TransitionLog>,
}

impl WorkflowOrchestrator {
    pub fn new(store: Arc<dyn PatentStore>, log: Arc<dyn TransitionLog>) -> Self {
        Self { store, log }
    }

    async fn patent(&self, patent_id: &PatentId) -> WorkflowResult<Patent> {
        self.store
            .get_patent(patent_id)
            .await?
            .ok_or_else(|| WorkflowError::PatentNotFound(patent_id.clone()))
    }

    /// Commit the edge `patent.stage -> to` and append its audit record.
    ///
    /// Returns `None` when the compare-and-set loses a race — the stale
    /// precondition downgrades to a no-op rather than forcing the edge.
    async fn fire(
        &self,
        patent: &Patent,
        to: Stage,
        triggered_by: &str,
        related_entity_id: Option<String>,
    ) -> WorkflowResult<Option<StageUpdate>> {
        match self.try_fire(patent, to, triggered_by, related_entity_id).await {
            Ok(update) => Ok(Some(update)),
            Err(WorkflowError::StaleState {
                patent,
                expected,
                actual,
            }) => {
                tracing::debug!(
                    patent = %patent,
                    expected = %expected,
                    actual = %actual,
                    "Stale precondition at commit, downgraded to no-op"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Commit the edge, surfacing a lost compare-and-set as `StaleState`.
    async fn try_fire(
        &self,
        patent: &Patent,
        to: Stage,
        triggered_by: &str,
        related_entity_id: Option<String>,
    ) -> WorkflowResult<StageUpdate> {
        let transition = create_transition_record(
            patent.patent_id.clone(),
            patent.stage,
            to,
            triggered_by,
            related_entity_id,
        )?;

        match self.store.commit_transition(transition.clone()).await {
            Ok(()) => {
                tracing::info!(
                    patent = %patent.patent_id,
                    from = %transition.from_stage,
                    to = %transition.to_stage,
                    auto = transition.auto_triggered,
                    "Stage transitioned"
                );
                let notification = generate_notification_message(&transition, &patent.title);
                Ok(StageUpdate {
                    transition,
                    notification,
                })
            }
            Err(err) if err.is_conflict() => {
                let actual = self.patent(&patent.patent_id).await?.stage;
                Err(WorkflowError::StaleState {
                    patent: patent.patent_id.clone(),
                    expected: patent.stage,
                    actual,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// First translation file attached: `NoProgress -> Translating`, auto
    pub async fn on_first_translation_upload(
        &self,
        patent_id: &PatentId,
        triggered_by: &str,
    ) -> WorkflowResult<Option<StageUpdate>> {
        let patent = self.patent(patent_id).await?;
        if patent.stage != Stage::NoProgress {
            tracing::debug!(patent = %patent_id, stage = %patent.stage, "Upload event ignored");
            return Ok(None);
        }
        self.fire(&patent, Stage::Translating, triggered_by, None)
            .await
    }

    /// Explicit "translation complete" action
    ///
    /// If every translation for the patent is completed (and at least one
    /// exists), seeds the default document set and moves the patent to
    /// `DocumentPrep`. Re-delivery after the patent has moved on is a
    /// no-op with nothing created.
    pub async fn on_translation_completed(
        &self,
        patent_id: &PatentId,
        translations: &[Translation],
        triggered_by: &str,
    ) -> WorkflowResult<TranslationOutcome> {
        let patent = self.patent(patent_id).await?;

        if translations.is_empty() || !all_translations_completed(translations) {
            tracing::debug!(patent = %patent_id, "Translations not all completed, no-op");
            return Ok(TranslationOutcome::default());
        }
        if patent.stage != Stage::Translating {
            tracing::debug!(
                patent = %patent_id,
                stage = %patent.stage,
                "Translation-complete event ignored at current stage"
            );
            return Ok(TranslationOutcome::default());
        }

        // Seed before the stage commit: a failed write here aborts the
        // evaluation with the stage untouched. An already-present set is
        // reused, never overwritten — a racing evaluation may have seeded
        // it first.
        let (seed, created) = match self.store.get_document_set(patent_id).await? {
            Some(existing) => (existing, false),
            None => {
                let seed = DocumentSet::seeded(patent_id.clone());
                self.store.put_document_set(seed.clone()).await?;
                (seed, true)
            }
        };

        let stage_update = self
            .fire(
                &patent,
                Stage::DocumentPrep,
                triggered_by,
                Some(seed.document_set_id.to_string()),
            )
            .await?;

        Ok(TranslationOutcome {
            create_document_set: created,
            document_set_seed: Some(seed),
            stage_update,
        })
    }

    /// Document set completion reached 1.0: create the filing and move to
    /// `AttorneyReview`, auto
    pub async fn on_document_preparation_completed(
        &self,
        document_set: &DocumentSet,
        triggered_by: &str,
    ) -> WorkflowResult<DocumentPrepOutcome> {
        let patent = self.patent(&document_set.patent_id).await?;
        let translations = self.store.list_translations(&document_set.patent_id).await?;
        let translation_completed = any_translation_completed(&translations);

        let completion = compute_completion(document_set, translation_completed);
        if !completion.is_ready() {
            tracing::debug!(
                patent = %document_set.patent_id,
                fraction = completion.fraction,
                "Document set not ready for filing"
            );
            return Ok(DocumentPrepOutcome::default());
        }
        if patent.stage != Stage::DocumentPrep {
            tracing::debug!(
                patent = %document_set.patent_id,
                stage = %patent.stage,
                "Document-prep-complete event ignored at current stage"
            );
            return Ok(DocumentPrepOutcome::default());
        }

        // Same reuse rule as the document set seed: an existing filing
        // belongs to the evaluation that won, so it is never overwritten.
        let (filing, created) = match self.store.get_filing(&document_set.patent_id).await? {
            Some(existing) => (existing, false),
            None => {
                let filing = Filing::new(
                    document_set.patent_id.clone(),
                    document_set.document_set_id.clone(),
                );
                self.store.put_filing(filing.clone()).await?;
                (filing, true)
            }
        };

        let stage_update = self
            .fire(
                &patent,
                Stage::AttorneyReview,
                triggered_by,
                Some(filing.filing_id.to_string()),
            )
            .await?;

        Ok(DocumentPrepOutcome {
            create_filing: created,
            filing_seed: Some(filing),
            stage_update,
        })
    }

    /// US application number populated: `AttorneyReview -> UsptoFiling`,
    /// auto
    pub async fn on_application_number_entered(
        &self,
        patent_id: &PatentId,
        application_number: &str,
        triggered_by: &str,
    ) -> WorkflowResult<Option<StageUpdate>> {
        if application_number.trim().is_empty() {
            return Ok(None);
        }
        let patent = self.patent(patent_id).await?;
        if patent.stage != Stage::AttorneyReview {
            return Ok(None);
        }

        let filing_id = match self.store.get_filing(patent_id).await? {
            Some(filing) => {
                let filing = filing.with_application_number(application_number);
                let id = filing.filing_id.to_string();
                self.store.put_filing(filing).await?;
                Some(id)
            }
            None => None,
        };

        self.fire(&patent, Stage::UsptoFiling, triggered_by, filing_id)
            .await
    }

    /// An Office Action arrived: `UsptoFiling -> OaResponse`, auto
    ///
    /// Idempotent while the patent is already responding to an earlier
    /// round — `OaResponse` is re-entrant and never transitions to itself.
    pub async fn on_oa_received(
        &self,
        patent_id: &PatentId,
        round_id: &str,
        triggered_by: &str,
    ) -> WorkflowResult<Option<StageUpdate>> {
        self.ensure_oa_response(patent_id, round_id, triggered_by)
            .await
    }

    /// An OA round was completed
    ///
    /// The patent stays in (or enters) `OaResponse`; the next round or the
    /// registration number decides where it goes from there.
    pub async fn on_oa_round_completed(
        &self,
        patent_id: &PatentId,
        round_id: &str,
        triggered_by: &str,
    ) -> WorkflowResult<Option<StageUpdate>> {
        self.ensure_oa_response(patent_id, round_id, triggered_by)
            .await
    }

    async fn ensure_oa_response(
        &self,
        patent_id: &PatentId,
        round_id: &str,
        triggered_by: &str,
    ) -> WorkflowResult<Option<StageUpdate>> {
        let patent = self.patent(patent_id).await?;
        match patent.stage {
            Stage::OaResponse => Ok(None),
            Stage::UsptoFiling => {
                self.fire(
                    &patent,
                    Stage::OaResponse,
                    triggered_by,
                    Some(round_id.to_string()),
                )
                .await
            }
            _ => Ok(None),
        }
    }

    /// US registration number populated: `OaResponse -> UsptoRegistered`,
    /// auto — prosecution closes
    pub async fn on_registration_number_entered(
        &self,
        patent_id: &PatentId,
        registration_number: &str,
        triggered_by: &str,
    ) -> WorkflowResult<Option<StageUpdate>> {
        if registration_number.trim().is_empty() {
            return Ok(None);
        }
        let patent = self.patent(patent_id).await?;
        if patent.stage != Stage::OaResponse {
            return Ok(None);
        }

        let filing_id = match self.store.get_filing(patent_id).await? {
            Some(filing) => {
                let filing = filing.with_registration_number(registration_number);
                let id = filing.filing_id.to_string();
                self.store.put_filing(filing).await?;
                Some(id)
            }
            None => None,
        };

        self.fire(&patent, Stage::UsptoRegistered, triggered_by, filing_id)
            .await
    }

    /// The audit trail for one patent, oldest first
    pub async fn transition_history(
        &self,
        patent_id: &PatentId,
    ) -> WorkflowResult<Vec<WorkflowTransition>> {
        Ok(self.log.list_for_patent(patent_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use patentflow_store::{InMemoryWorkflowStore, StorageError, StorageResult};
    use patentflow_types::{
        DocumentSlot, OaRound, OaRoundId, TranslationStatus, UploadKind, UploadedFile,
    };

    fn harness() -> (WorkflowOrchestrator, Arc<InMemoryWorkflowStore>) {
        let store = Arc::new(InMemoryWorkflowStore::new());
        let orchestrator = WorkflowOrchestrator::new(store.clone(), store.clone());
        (orchestrator, store)
    }

    /// Store double that delegates to an in-memory store but can be told
    /// to fail specific writes or report every commit as a lost race.
    struct UnreliableStore {
        inner: Arc<InMemoryWorkflowStore>,
        fail_document_set_writes: bool,
        fail_filing_writes: bool,
        conflict_on_commit: bool,
    }

    impl UnreliableStore {
        fn wrapping(inner: Arc<InMemoryWorkflowStore>) -> Self {
            Self {
                inner,
                fail_document_set_writes: false,
                fail_filing_writes: false,
                conflict_on_commit: false,
            }
        }
    }

    #[async_trait]
    impl PatentStore for UnreliableStore {
        async fn get_patent(&self, patent_id: &PatentId) -> StorageResult<Option<Patent>> {
            self.inner.get_patent(patent_id).await
        }

        async fn put_patent(&self, patent: Patent) -> StorageResult<()> {
            self.inner.put_patent(patent).await
        }

        async fn list_patents(&self) -> StorageResult<Vec<Patent>> {
            self.inner.list_patents().await
        }

        async fn commit_transition(&self, transition: WorkflowTransition) -> StorageResult<()> {
            if self.conflict_on_commit {
                return Err(StorageError::Conflict("stage moved on".into()));
            }
            self.inner.commit_transition(transition).await
        }

        async fn get_document_set(
            &self,
            patent_id: &PatentId,
        ) -> StorageResult<Option<DocumentSet>> {
            self.inner.get_document_set(patent_id).await
        }

        async fn put_document_set(&self, set: DocumentSet) -> StorageResult<()> {
            if self.fail_document_set_writes {
                return Err(StorageError::Backend("document set store offline".into()));
            }
            self.inner.put_document_set(set).await
        }

        async fn get_filing(&self, patent_id: &PatentId) -> StorageResult<Option<Filing>> {
            self.inner.get_filing(patent_id).await
        }

        async fn put_filing(&self, filing: Filing) -> StorageResult<()> {
            if self.fail_filing_writes {
                return Err(StorageError::Backend("filing store offline".into()));
            }
            self.inner.put_filing(filing).await
        }

        async fn list_translations(
            &self,
            patent_id: &PatentId,
        ) -> StorageResult<Vec<Translation>> {
            self.inner.list_translations(patent_id).await
        }

        async fn put_translation(&self, translation: Translation) -> StorageResult<()> {
            self.inner.put_translation(translation).await
        }

        async fn list_oa_rounds(&self, patent_id: &PatentId) -> StorageResult<Vec<OaRound>> {
            self.inner.list_oa_rounds(patent_id).await
        }

        async fn put_oa_round(&self, round: OaRound) -> StorageResult<()> {
            self.inner.put_oa_round(round).await
        }

        async fn delete_oa_round(&self, round_id: &OaRoundId) -> StorageResult<()> {
            self.inner.delete_oa_round(round_id).await
        }
    }

    fn unreliable_harness(
        double: UnreliableStore,
    ) -> (WorkflowOrchestrator, Arc<InMemoryWorkflowStore>) {
        let inner = double.inner.clone();
        let orchestrator = WorkflowOrchestrator::new(Arc::new(double), inner.clone());
        (orchestrator, inner)
    }

    async fn register_patent(store: &InMemoryWorkflowStore, stage: Stage) -> PatentId {
        let patent = Patent::new("Self-sealing fuel line").with_stage(stage);
        let id = patent.patent_id.clone();
        store.put_patent(patent).await.unwrap();
        id
    }

    fn completed_translations(patent_id: &PatentId, n: usize) -> Vec<Translation> {
        (0..n)
            .map(|_| {
                Translation::new(patent_id.clone()).with_status(TranslationStatus::Completed)
            })
            .collect()
    }

    fn fill_essential_slots(set: &mut DocumentSet) {
        for slot in DocumentSlot::essential() {
            if slot == DocumentSlot::Specification {
                continue; // derived from translation completion
            }
            let item = set.item_mut(slot).unwrap();
            item.attach(UploadedFile::new(slot, UploadKind::AttorneyDraft, "atty"));
            item.attach(UploadedFile::new(slot, UploadKind::UserFinal, "user"));
        }
    }

    #[tokio::test]
    async fn test_first_upload_starts_translating() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::NoProgress).await;

        let update = orchestrator
            .on_first_translation_upload(&id, "u-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.transition.to_stage, Stage::Translating);
        assert!(update.transition.auto_triggered);

        // Re-delivery is a no-op.
        let again = orchestrator
            .on_first_translation_upload(&id, "u-1")
            .await
            .unwrap();
        assert!(again.is_none());
        assert_eq!(store.list_for_patent(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_translation_completed_seeds_document_set() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::Translating).await;
        let translations = completed_translations(&id, 2);

        let outcome = orchestrator
            .on_translation_completed(&id, &translations, "u-1")
            .await
            .unwrap();
        assert!(outcome.create_document_set);

        let seed = outcome.document_set_seed.unwrap();
        assert_eq!(seed.items.len(), DocumentSlot::CATALOG.len());
        assert!(store.get_document_set(&id).await.unwrap().is_some());

        let update = outcome.stage_update.unwrap();
        assert_eq!(update.transition.to_stage, Stage::DocumentPrep);
        // Manual edge: fired by the explicit button, not a condition poll.
        assert!(!update.transition.auto_triggered);
        assert_eq!(
            update.transition.related_entity_id.as_deref(),
            Some(seed.document_set_id.0.as_str())
        );
    }

    #[tokio::test]
    async fn test_translation_completed_requires_all_completed() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::Translating).await;

        let mut translations = completed_translations(&id, 1);
        translations.push(
            Translation::new(id.clone()).with_status(TranslationStatus::InProgress),
        );

        let outcome = orchestrator
            .on_translation_completed(&id, &translations, "u-1")
            .await
            .unwrap();
        assert!(!outcome.create_document_set);
        assert!(outcome.stage_update.is_none());
        assert_eq!(store.get_patent(&id).await.unwrap().unwrap().stage, Stage::Translating);
    }

    #[tokio::test]
    async fn test_translation_completed_empty_list_is_noop() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::Translating).await;

        let outcome = orchestrator
            .on_translation_completed(&id, &[], "u-1")
            .await
            .unwrap();
        assert!(!outcome.create_document_set);
    }

    #[tokio::test]
    async fn test_document_prep_not_ready_below_full_fraction() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::DocumentPrep).await;
        for t in completed_translations(&id, 1) {
            store.put_translation(t).await.unwrap();
        }

        let mut set = DocumentSet::seeded(id.clone());
        fill_essential_slots(&mut set);
        // Empty one slot again: completion drops below 1.0.
        set.item_mut(DocumentSlot::Drawings).unwrap().files.clear();

        let outcome = orchestrator
            .on_document_preparation_completed(&set, "system")
            .await
            .unwrap();
        assert!(!outcome.create_filing);
        assert!(outcome.filing_seed.is_none());
        assert_eq!(store.get_patent(&id).await.unwrap().unwrap().stage, Stage::DocumentPrep);
    }

    #[tokio::test]
    async fn test_document_prep_completed_creates_filing_once() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::DocumentPrep).await;
        for t in completed_translations(&id, 1) {
            store.put_translation(t).await.unwrap();
        }

        let mut set = DocumentSet::seeded(id.clone());
        fill_essential_slots(&mut set);
        store.put_document_set(set.clone()).await.unwrap();

        let outcome = orchestrator
            .on_document_preparation_completed(&set, "system")
            .await
            .unwrap();
        assert!(outcome.create_filing);

        let filing = outcome.filing_seed.unwrap();
        assert!(filing.documents_ready);
        assert_eq!(filing.document_preparation_id, set.document_set_id);

        let update = outcome.stage_update.unwrap();
        assert_eq!(update.transition.from_stage, Stage::DocumentPrep);
        assert_eq!(update.transition.to_stage, Stage::AttorneyReview);
        assert!(update.transition.auto_triggered);

        // Idempotence: the same fully-complete set evaluated again
        // produces no second filing and no second transition.
        let again = orchestrator
            .on_document_preparation_completed(&set, "system")
            .await
            .unwrap();
        assert!(!again.create_filing);
        assert_eq!(store.list_for_patent(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_application_number_moves_to_filing() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::AttorneyReview).await;
        store
            .put_filing(Filing::new(id.clone(), patentflow_types::DocumentSetId::new("set-1")))
            .await
            .unwrap();

        let update = orchestrator
            .on_application_number_entered(&id, "17/123,456", "u-2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.transition.to_stage, Stage::UsptoFiling);
        assert!(update.transition.auto_triggered);

        let filing = store.get_filing(&id).await.unwrap().unwrap();
        assert_eq!(filing.us_application_number.as_deref(), Some("17/123,456"));
    }

    #[tokio::test]
    async fn test_blank_application_number_is_noop() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::AttorneyReview).await;

        let update = orchestrator
            .on_application_number_entered(&id, "   ", "u-2")
            .await
            .unwrap();
        assert!(update.is_none());
        assert_eq!(
            store.get_patent(&id).await.unwrap().unwrap().stage,
            Stage::AttorneyReview
        );
    }

    #[tokio::test]
    async fn test_oa_response_is_reentrant() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::UsptoFiling).await;

        let update = orchestrator
            .on_oa_received(&id, "round-1", "system")
            .await
            .unwrap();
        assert_eq!(update.unwrap().transition.to_stage, Stage::OaResponse);

        // A second round arrives while already responding: no transition.
        let update = orchestrator
            .on_oa_received(&id, "round-2", "system")
            .await
            .unwrap();
        assert!(update.is_none());

        let update = orchestrator
            .on_oa_round_completed(&id, "round-2", "system")
            .await
            .unwrap();
        assert!(update.is_none());
        assert_eq!(store.list_for_patent(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_registration_closes_prosecution() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::OaResponse).await;

        let update = orchestrator
            .on_registration_number_entered(&id, "11,999,999", "u-3")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.transition.to_stage, Stage::UsptoRegistered);

        let patent = store.get_patent(&id).await.unwrap().unwrap();
        assert!(patent.stage.is_terminal());
    }

    #[tokio::test]
    async fn test_unknown_patent_is_an_error() {
        let (orchestrator, _store) = harness();
        let err = orchestrator
            .on_first_translation_upload(&PatentId::new("ghost"), "u-1")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::PatentNotFound(_)));
    }

    #[tokio::test]
    async fn test_notification_wording() {
        let transition = create_transition_record(
            PatentId::new("p-1"),
            Stage::DocumentPrep,
            Stage::AttorneyReview,
            "system",
            None,
        )
        .unwrap();
        let message = generate_notification_message(&transition, "Self-sealing fuel line");
        assert_eq!(
            message,
            "Self-sealing fuel line\nDocument Preparation → Attorney Review stage auto transitioned."
        );

        let manual = create_transition_record(
            PatentId::new("p-1"),
            Stage::Translating,
            Stage::DocumentPrep,
            "u-1",
            None,
        )
        .unwrap();
        let message = generate_notification_message(&manual, "Self-sealing fuel line");
        assert!(message.ends_with("stage manually transitioned."));
    }

    #[tokio::test]
    async fn test_create_transition_record_rejects_unknown_edge() {
        let err = create_transition_record(
            PatentId::new("p-1"),
            Stage::NoProgress,
            Stage::UsptoRegistered,
            "u-1",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_full_pipeline_audit_trail() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::NoProgress).await;

        orchestrator
            .on_first_translation_upload(&id, "u-1")
            .await
            .unwrap();

        let translations = completed_translations(&id, 1);
        for t in &translations {
            store.put_translation(t.clone()).await.unwrap();
        }
        let outcome = orchestrator
            .on_translation_completed(&id, &translations, "u-1")
            .await
            .unwrap();
        let mut set = outcome.document_set_seed.unwrap();
        fill_essential_slots(&mut set);
        store.put_document_set(set.clone()).await.unwrap();

        orchestrator
            .on_document_preparation_completed(&set, "system")
            .await
            .unwrap();
        orchestrator
            .on_application_number_entered(&id, "17/000,001", "u-2")
            .await
            .unwrap();
        orchestrator
            .on_oa_received(&id, "round-1", "system")
            .await
            .unwrap();
        orchestrator
            .on_registration_number_entered(&id, "12,000,001", "u-2")
            .await
            .unwrap();

        let history = orchestrator.transition_history(&id).await.unwrap();
        let path: Vec<Stage> = history.iter().map(|t| t.to_stage).collect();
        assert_eq!(
            path,
            vec![
                Stage::Translating,
                Stage::DocumentPrep,
                Stage::AttorneyReview,
                Stage::UsptoFiling,
                Stage::OaResponse,
                Stage::UsptoRegistered,
            ]
        );
        // One record per actual stage change, each chained to the last.
        for pair in history.windows(2) {
            assert_eq!(pair[0].to_stage, pair[1].from_stage);
        }
    }

    #[tokio::test]
    async fn test_document_set_write_failure_aborts_without_stage_change() {
        let inner = Arc::new(InMemoryWorkflowStore::new());
        let id = register_patent(&inner, Stage::Translating).await;
        let translations = completed_translations(&id, 1);

        let mut double = UnreliableStore::wrapping(inner.clone());
        double.fail_document_set_writes = true;
        let (orchestrator, store) = unreliable_harness(double);

        let err = orchestrator
            .on_translation_completed(&id, &translations, "u-1")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::DependencyUnavailable(_)));

        // The whole evaluation aborted: stage untouched, nothing seeded,
        // nothing logged.
        assert_eq!(
            store.get_patent(&id).await.unwrap().unwrap().stage,
            Stage::Translating
        );
        assert!(store.get_document_set(&id).await.unwrap().is_none());
        assert!(store.list_for_patent(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filing_write_failure_aborts_without_stage_change() {
        let inner = Arc::new(InMemoryWorkflowStore::new());
        let id = register_patent(&inner, Stage::DocumentPrep).await;
        for t in completed_translations(&id, 1) {
            inner.put_translation(t).await.unwrap();
        }
        let mut set = DocumentSet::seeded(id.clone());
        fill_essential_slots(&mut set);
        inner.put_document_set(set.clone()).await.unwrap();

        let mut double = UnreliableStore::wrapping(inner.clone());
        double.fail_filing_writes = true;
        let (orchestrator, store) = unreliable_harness(double);

        let err = orchestrator
            .on_document_preparation_completed(&set, "system")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::DependencyUnavailable(_)));

        assert_eq!(
            store.get_patent(&id).await.unwrap().unwrap().stage,
            Stage::DocumentPrep
        );
        assert!(store.get_filing(&id).await.unwrap().is_none());
        assert!(store.list_for_patent(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lost_commit_race_downgrades_to_noop() {
        let inner = Arc::new(InMemoryWorkflowStore::new());
        let id = register_patent(&inner, Stage::NoProgress).await;

        let mut double = UnreliableStore::wrapping(inner.clone());
        double.conflict_on_commit = true;
        let (orchestrator, store) = unreliable_harness(double);

        // The losing evaluation sees Ok(None), never an error.
        let update = orchestrator
            .on_first_translation_upload(&id, "u-1")
            .await
            .unwrap();
        assert!(update.is_none());
        assert!(store.list_for_patent(&id).await.unwrap().is_empty());
        assert_eq!(
            store.get_patent(&id).await.unwrap().unwrap().stage,
            Stage::NoProgress
        );
    }

    #[tokio::test]
    async fn test_existing_document_set_reused_not_overwritten() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::Translating).await;
        let translations = completed_translations(&id, 1);

        let existing = DocumentSet::seeded(id.clone());
        let existing_id = existing.document_set_id.clone();
        store.put_document_set(existing).await.unwrap();

        let outcome = orchestrator
            .on_translation_completed(&id, &translations, "u-1")
            .await
            .unwrap();
        assert!(!outcome.create_document_set);
        assert_eq!(
            outcome.document_set_seed.unwrap().document_set_id,
            existing_id
        );
        assert_eq!(
            store
                .get_document_set(&id)
                .await
                .unwrap()
                .unwrap()
                .document_set_id,
            existing_id
        );
    }

    #[tokio::test]
    async fn test_existing_filing_reused_not_overwritten() {
        let (orchestrator, store) = harness();
        let id = register_patent(&store, Stage::DocumentPrep).await;
        for t in completed_translations(&id, 1) {
            store.put_translation(t).await.unwrap();
        }
        let mut set = DocumentSet::seeded(id.clone());
        fill_essential_slots(&mut set);
        store.put_document_set(set.clone()).await.unwrap();

        let existing = Filing::new(id.clone(), set.document_set_id.clone());
        let existing_id = existing.filing_id.clone();
        store.put_filing(existing).await.unwrap();

        let outcome = orchestrator
            .on_document_preparation_completed(&set, "system")
            .await
            .unwrap();
        assert!(!outcome.create_filing);
        assert_eq!(outcome.filing_seed.unwrap().filing_id, existing_id);

        // The stored filing and the audit record agree on the id.
        let stored = store.get_filing(&id).await.unwrap().unwrap();
        assert_eq!(stored.filing_id, existing_id);
        let update = outcome.stage_update.unwrap();
        assert_eq!(
            update.transition.related_entity_id.as_deref(),
            Some(existing_id.0.as_str())
        );
    }
}
