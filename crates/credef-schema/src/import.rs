//! # Import Coordinator
//!
//! Fetching vocabulary candidates is the only suspend point in the editing
//! model. While a fetch is in flight the user keeps editing, and may start
//! another import. The coordinator makes the last fetch win:
//!
//! ```text
//! begin_import ──▶ ImportTicket { generation, revision, target }
//!                        │
//!                   (fetch awaits)
//!                        │
//!                        ▼
//! complete_import ──▶ generation is latest && revision unchanged ? apply : Stale
//! ```
//!
//! A stale result is dropped without touching the tree. Starting a new
//! import or calling `cancel` invalidates every outstanding ticket.

use thiserror::Error;

use credef_core::PropertyId;

use crate::tree::{PropertyTree, StructuralViolation};
use crate::vocabulary::{resolve_import, ImportReport, VocabularyCandidate, VocabularySource};

/// Proof that an import was started against a particular tree state.
///
/// Deliberately neither `Clone` nor `Copy`: a ticket is spent by
/// completing it.
#[derive(Debug, PartialEq, Eq)]
pub struct ImportTicket {
    generation: u64,
    revision: u64,
    target: Option<PropertyId>,
}

impl ImportTicket {
    /// The container the import will land in (`None` for the top level).
    pub fn target(&self) -> Option<PropertyId> {
        self.target
    }
}

/// Candidates fetched for a ticket, waiting to be applied.
#[derive(Debug)]
pub struct PendingImport {
    pub ticket: ImportTicket,
    pub candidates: Vec<VocabularyCandidate>,
}

/// What happened when an import was completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Candidates were resolved into the tree.
    Applied(ImportReport),
    /// The target container no longer exists.
    TargetMissing,
    /// A newer import superseded this one, or the tree changed while the
    /// fetch was in flight. Nothing was applied.
    Stale,
}

/// Failure of a fetch-and-apply import.
#[derive(Error, Debug)]
pub enum ImportError<E>
where
    E: std::error::Error + 'static,
{
    /// The vocabulary collaborator could not be queried.
    #[error("vocabulary fetch failed: {0}")]
    Fetch(#[source] E),

    #[error(transparent)]
    Structural(#[from] StructuralViolation),
}

/// Issues and checks import tickets for one editing session.
#[derive(Debug, Default)]
pub struct ImportCoordinator {
    generation: u64,
}

impl ImportCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an import, superseding any import still in flight.
    pub fn begin(&mut self, tree: &PropertyTree, target: Option<PropertyId>) -> ImportTicket {
        self.generation += 1;
        ImportTicket {
            generation: self.generation,
            revision: tree.revision(),
            target,
        }
    }

    /// Invalidate every outstanding ticket.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    /// Whether a ticket would still be applied against `tree`.
    pub fn is_current(&self, ticket: &ImportTicket, tree: &PropertyTree) -> bool {
        ticket.generation == self.generation && ticket.revision == tree.revision()
    }

    /// Apply fetched candidates if the ticket is still current.
    pub fn complete(
        &mut self,
        ticket: ImportTicket,
        tree: &mut PropertyTree,
        candidates: &[VocabularyCandidate],
    ) -> Result<ImportOutcome, StructuralViolation> {
        if !self.is_current(&ticket, tree) {
            tracing::warn!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                ticket_revision = ticket.revision,
                tree_revision = tree.revision(),
                "discarding stale vocabulary import"
            );
            return Ok(ImportOutcome::Stale);
        }

        Ok(match resolve_import(tree, ticket.target, candidates)? {
            Some(report) => ImportOutcome::Applied(report),
            None => ImportOutcome::TargetMissing,
        })
    }
}

/// Fetch candidates for a ticket without holding the tree.
///
/// The caller keeps ownership of the editing session during the await and
/// hands the result back to [`ImportCoordinator::complete`] (or
/// `EditorState::apply_import`).
pub async fn fetch_for_ticket<S: VocabularySource>(
    source: &S,
    ticket: ImportTicket,
    classification: &str,
) -> Result<PendingImport, S::Error> {
    let candidates = source.fetch_candidates(classification).await?;
    tracing::debug!(
        classification,
        count = candidates.len(),
        "vocabulary candidates fetched"
    );
    Ok(PendingImport { ticket, candidates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::PropertyUpdate;

    fn candidates() -> Vec<VocabularyCandidate> {
        vec![VocabularyCandidate {
            id: "vp-1".into(),
            name: "salary".into(),
            display_name: None,
            description: None,
            value_type: "currency".into(),
            constraints: None,
        }]
    }

    #[test]
    fn test_current_ticket_applies() {
        let mut tree = PropertyTree::new();
        let mut coordinator = ImportCoordinator::new();
        let ticket = coordinator.begin(&tree, None);
        let outcome = coordinator.complete(ticket, &mut tree, &candidates()).unwrap();
        assert!(matches!(outcome, ImportOutcome::Applied(ref r) if r.imported_count() == 1));
        assert_eq!(tree.properties().len(), 1);
    }

    #[test]
    fn test_superseded_ticket_is_stale() {
        let mut tree = PropertyTree::new();
        let mut coordinator = ImportCoordinator::new();
        let first = coordinator.begin(&tree, None);
        let second = coordinator.begin(&tree, None);

        assert_eq!(
            coordinator.complete(first, &mut tree, &candidates()).unwrap(),
            ImportOutcome::Stale
        );
        assert!(tree.is_empty());
        assert!(matches!(
            coordinator.complete(second, &mut tree, &candidates()).unwrap(),
            ImportOutcome::Applied(_)
        ));
    }

    #[test]
    fn test_tree_edit_during_fetch_makes_ticket_stale() {
        let mut tree = PropertyTree::new();
        let mut coordinator = ImportCoordinator::new();
        let ticket = coordinator.begin(&tree, None);
        let id = tree.add_property(None).unwrap().unwrap();
        tree.update_property(id, PropertyUpdate::new().name("manual"));

        assert_eq!(
            coordinator.complete(ticket, &mut tree, &candidates()).unwrap(),
            ImportOutcome::Stale
        );
        assert_eq!(tree.properties().len(), 1);
    }

    #[test]
    fn test_cancel_invalidates() {
        let mut tree = PropertyTree::new();
        let mut coordinator = ImportCoordinator::new();
        let ticket = coordinator.begin(&tree, None);
        coordinator.cancel();
        assert!(!coordinator.is_current(&ticket, &tree));
        assert_eq!(
            coordinator.complete(ticket, &mut tree, &candidates()).unwrap(),
            ImportOutcome::Stale
        );
    }

    #[test]
    fn test_deleted_target_reports_missing() {
        let mut tree = PropertyTree::new();
        let target = tree.add_property(None).unwrap().unwrap();
        let mut coordinator = ImportCoordinator::new();
        // Ticket taken after the delete, so only the target lookup can fail.
        tree.delete_property(target);
        let ticket = coordinator.begin(&tree, Some(target));
        assert_eq!(
            coordinator.complete(ticket, &mut tree, &candidates()).unwrap(),
            ImportOutcome::TargetMissing
        );
    }
}
