//! In-memory reference implementation of the storage traits
//!
//! Deterministic and test-friendly. The stage compare-and-set holds the
//! patent map's write lock for the whole check-then-write, which is what
//! makes it atomic here; a SQL backend would use a conditional UPDATE.

use crate::traits::{PatentStore, TransitionLog};
use crate::{StorageError, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use patentflow_types::{
    DocumentSet, Filing, OaRound, OaRoundId, Patent, PatentId, Translation, WorkflowTransition,
};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory workflow storage adapter.
#[derive(Default)]
pub struct InMemoryWorkflowStore {
    patents: RwLock<HashMap<PatentId, Patent>>,
    document_sets: RwLock<HashMap<PatentId, DocumentSet>>,
    filings: RwLock<HashMap<PatentId, Filing>>,
    translations: RwLock<HashMap<PatentId, Vec<Translation>>>,
    oa_rounds: RwLock<HashMap<PatentId, Vec<OaRound>>>,
    transitions: RwLock<Vec<WorkflowTransition>>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(what: &str) -> StorageError {
    StorageError::Backend(format!("{what} lock poisoned"))
}

#[async_trait]
impl PatentStore for InMemoryWorkflowStore {
    async fn get_patent(&self, patent_id: &PatentId) -> StorageResult<Option<Patent>> {
        let guard = self.patents.read().map_err(|_| poisoned("patents"))?;
        Ok(guard.get(patent_id).cloned())
    }

    async fn put_patent(&self, patent: Patent) -> StorageResult<()> {
        let mut guard = self.patents.write().map_err(|_| poisoned("patents"))?;
        guard.insert(patent.patent_id.clone(), patent);
        Ok(())
    }

    async fn list_patents(&self) -> StorageResult<Vec<Patent>> {
        let guard = self.patents.read().map_err(|_| poisoned("patents"))?;
        let mut patents: Vec<Patent> = guard.values().cloned().collect();
        patents.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(patents)
    }

    async fn commit_transition(&self, transition: WorkflowTransition) -> StorageResult<()> {
        // Lock order: patents before transitions, everywhere.
        let mut patents = self.patents.write().map_err(|_| poisoned("patents"))?;
        let mut log = self
            .transitions
            .write()
            .map_err(|_| poisoned("transitions"))?;

        let patent = patents
            .get_mut(&transition.patent_id)
            .ok_or_else(|| StorageError::NotFound(format!("patent {}", transition.patent_id)))?;

        if patent.stage != transition.from_stage {
            return Err(StorageError::Conflict(format!(
                "patent {} is at stage {}, expected {}",
                transition.patent_id, patent.stage, transition.from_stage
            )));
        }

        patent.stage = transition.to_stage;
        patent.updated_at = Utc::now();
        tracing::trace!(
            patent = %transition.patent_id,
            from = %transition.from_stage,
            to = %transition.to_stage,
            "Stage committed"
        );
        log.push(transition);
        Ok(())
    }

    async fn get_document_set(&self, patent_id: &PatentId) -> StorageResult<Option<DocumentSet>> {
        let guard = self
            .document_sets
            .read()
            .map_err(|_| poisoned("document_sets"))?;
        Ok(guard.get(patent_id).cloned())
    }

    async fn put_document_set(&self, set: DocumentSet) -> StorageResult<()> {
        let mut guard = self
            .document_sets
            .write()
            .map_err(|_| poisoned("document_sets"))?;
        guard.insert(set.patent_id.clone(), set);
        Ok(())
    }

    async fn get_filing(&self, patent_id: &PatentId) -> StorageResult<Option<Filing>> {
        let guard = self.filings.read().map_err(|_| poisoned("filings"))?;
        Ok(guard.get(patent_id).cloned())
    }

    async fn put_filing(&self, filing: Filing) -> StorageResult<()> {
        let mut guard = self.filings.write().map_err(|_| poisoned("filings"))?;
        guard.insert(filing.patent_id.clone(), filing);
        Ok(())
    }

    async fn list_translations(&self, patent_id: &PatentId) -> StorageResult<Vec<Translation>> {
        let guard = self
            .translations
            .read()
            .map_err(|_| poisoned("translations"))?;
        Ok(guard.get(patent_id).cloned().unwrap_or_default())
    }

    async fn put_translation(&self, translation: Translation) -> StorageResult<()> {
        let mut guard = self
            .translations
            .write()
            .map_err(|_| poisoned("translations"))?;
        let records = guard.entry(translation.patent_id.clone()).or_default();
        match records
            .iter_mut()
            .find(|t| t.translation_id == translation.translation_id)
        {
            Some(existing) => *existing = translation,
            None => records.push(translation),
        }
        Ok(())
    }

    async fn list_oa_rounds(&self, patent_id: &PatentId) -> StorageResult<Vec<OaRound>> {
        let guard = self.oa_rounds.read().map_err(|_| poisoned("oa_rounds"))?;
        let mut rounds = guard.get(patent_id).cloned().unwrap_or_default();
        rounds.sort_by_key(|r| r.sequence);
        Ok(rounds)
    }

    async fn put_oa_round(&self, round: OaRound) -> StorageResult<()> {
        let mut guard = self.oa_rounds.write().map_err(|_| poisoned("oa_rounds"))?;
        let rounds = guard.entry(round.patent_id.clone()).or_default();
        match rounds.iter_mut().find(|r| r.round_id == round.round_id) {
            Some(existing) => *existing = round,
            None => rounds.push(round),
        }
        Ok(())
    }

    async fn delete_oa_round(&self, round_id: &OaRoundId) -> StorageResult<()> {
        let mut guard = self.oa_rounds.write().map_err(|_| poisoned("oa_rounds"))?;
        for rounds in guard.values_mut() {
            rounds.retain(|r| &r.round_id != round_id);
        }
        Ok(())
    }
}

#[async_trait]
impl TransitionLog for InMemoryWorkflowStore {
    async fn list_for_patent(
        &self,
        patent_id: &PatentId,
    ) -> StorageResult<Vec<WorkflowTransition>> {
        let guard = self
            .transitions
            .read()
            .map_err(|_| poisoned("transitions"))?;
        Ok(guard
            .iter()
            .filter(|t| &t.patent_id == patent_id)
            .cloned()
            .collect())
    }
}
