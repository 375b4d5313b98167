//! Document completion model: pure derivation of slot status
//!
//! Slot status is a function of the files uploaded for the slot and, for
//! the Specification slot, of whether any completed translation exists for
//! the patent. It is recomputed on every read — nothing here caches, so a
//! file add or remove can never leave a stale status behind.

use patentflow_types::{
    Completion, DocumentItem, DocumentItemStatus, DocumentSet, DocumentSlot, UploadKind,
};

/// Derive the status of one document slot
///
/// The Specification slot is special: it tracks translation completion for
/// the owning patent, not its own file uploads. Every other slot is
/// classified by which upload kinds are present.
pub fn derive_item_status(
    item: &DocumentItem,
    translation_completed: bool,
) -> DocumentItemStatus {
    if item.slot == DocumentSlot::Specification {
        return if translation_completed {
            DocumentItemStatus::TranslationLinked
        } else {
            DocumentItemStatus::TranslationWaiting
        };
    }

    let has_draft = item.has_kind(UploadKind::AttorneyDraft);
    let has_final = item.has_kind(UploadKind::UserFinal);

    match (has_draft, has_final) {
        (true, true) => DocumentItemStatus::Completed,
        (false, true) => DocumentItemStatus::UserUploaded,
        (true, false) => DocumentItemStatus::AttorneyUploaded,
        (false, false) => DocumentItemStatus::NotUploaded,
    }
}

/// Compute the aggregate completion of a document set
///
/// Only essential slots count; the optional `Other` slot is excluded from
/// the math. An empty essential list yields fraction 0.0, not a division
/// error.
pub fn compute_completion(set: &DocumentSet, translation_completed: bool) -> Completion {
    let mut completed = 0;
    let mut total = 0;
    for item in set.essential_items() {
        total += 1;
        if derive_item_status(item, translation_completed).counts_toward_completion() {
            completed += 1;
        }
    }
    Completion::new(completed, total)
}
