//! # Editor State
//!
//! One editing session over one [`SchemaProject`]: the project itself, the
//! selected node, the set of expanded nodes, and the import coordinator.
//!
//! Selection and expansion are bookkeeping only. They never change tree
//! structure, and they are cleaned up whenever a node they mention is
//! destroyed. Replacing the project (new project, finished import of a
//! whole definition) resets all of it and cancels imports in flight.

use std::collections::HashSet;

use credef_core::PropertyId;

use crate::import::{
    fetch_for_ticket, ImportCoordinator, ImportError, ImportOutcome, ImportTicket, PendingImport,
};
use crate::model::{PropertyType, SchemaMetadata, SchemaProject};
use crate::tree::{Direction, PropertyTree, PropertyUpdate, StructuralViolation};
use crate::vocabulary::{VocabularyCandidate, VocabularySource};

/// A single-owner editing session.
#[derive(Debug)]
pub struct EditorState {
    project: SchemaProject,
    selected: Option<PropertyId>,
    expanded: HashSet<PropertyId>,
    imports: ImportCoordinator,
}

impl EditorState {
    /// Start a session on a fresh, empty project.
    pub fn new(metadata: SchemaMetadata) -> Self {
        Self::from_project(SchemaProject::new(metadata))
    }

    /// Start a session on an existing project.
    pub fn from_project(project: SchemaProject) -> Self {
        Self {
            project,
            selected: None,
            expanded: HashSet::new(),
            imports: ImportCoordinator::new(),
        }
    }

    pub fn project(&self) -> &SchemaProject {
        &self.project
    }

    pub fn tree(&self) -> &PropertyTree {
        &self.project.properties
    }

    pub fn metadata(&self) -> &SchemaMetadata {
        &self.project.metadata
    }

    /// Metadata edits do not touch the tree.
    pub fn metadata_mut(&mut self) -> &mut SchemaMetadata {
        &mut self.project.metadata
    }

    /// Hand the project back, e.g. to the persistence collaborator.
    pub fn into_project(self) -> SchemaProject {
        self.project
    }

    /// Discard the current project and start an empty one.
    pub fn new_project(&mut self, metadata: SchemaMetadata) {
        self.replace_project(SchemaProject::new(metadata));
    }

    /// Swap in a different project, resetting all session bookkeeping.
    pub fn replace_project(&mut self, project: SchemaProject) {
        self.project = project;
        self.selected = None;
        self.expanded.clear();
        self.imports.cancel();
    }

    // ── Structure ────────────────────────────────────────────────────

    pub fn add_property(
        &mut self,
        parent: Option<PropertyId>,
    ) -> Result<Option<PropertyId>, StructuralViolation> {
        self.project.properties.add_property(parent)
    }

    /// Delete a node and forget any selection or expansion inside it.
    pub fn delete_property(&mut self, id: PropertyId) -> bool {
        let Some(removed) = self.project.properties.delete_property(id) else {
            return false;
        };
        for gone in removed.subtree_ids() {
            self.expanded.remove(&gone);
            if self.selected == Some(gone) {
                self.selected = None;
            }
        }
        true
    }

    pub fn move_property(&mut self, id: PropertyId, direction: Direction) -> bool {
        self.project.properties.move_property(id, direction)
    }

    /// Apply a field patch. A type change that discards children also
    /// forgets selection and expansion inside them.
    pub fn update_property(&mut self, id: PropertyId, update: PropertyUpdate) -> bool {
        let before: HashSet<PropertyId> = self.tree().ids().into_iter().collect();
        if !self.project.properties.update_property(id, update) {
            return false;
        }
        self.forget_missing(&before);
        true
    }

    pub fn set_items(
        &mut self,
        id: PropertyId,
        item_type: PropertyType,
    ) -> Result<Option<PropertyId>, StructuralViolation> {
        let before: HashSet<PropertyId> = self.tree().ids().into_iter().collect();
        let result = self.project.properties.set_items(id, item_type)?;
        self.forget_missing(&before);
        Ok(result)
    }

    fn forget_missing(&mut self, before: &HashSet<PropertyId>) {
        let now: HashSet<PropertyId> = self.tree().ids().into_iter().collect();
        for gone in before.difference(&now) {
            self.expanded.remove(gone);
            if self.selected == Some(*gone) {
                self.selected = None;
            }
        }
    }

    // ── Selection & expansion ────────────────────────────────────────

    /// Select a node, or clear the selection with `None`. Ids not in the
    /// tree clear the selection.
    pub fn select_property(&mut self, id: Option<PropertyId>) {
        self.selected = id.filter(|id| self.project.properties.contains(*id));
    }

    pub fn selected(&self) -> Option<PropertyId> {
        self.selected
    }

    /// Flip the expanded state of a node. Ids not in the tree are ignored.
    pub fn toggle_expanded(&mut self, id: PropertyId) {
        if !self.expanded.remove(&id) && self.project.properties.contains(id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: PropertyId) -> bool {
        self.expanded.contains(&id)
    }

    /// Expand every container node.
    pub fn expand_all(&mut self) {
        let containers: Vec<PropertyId> = self
            .tree()
            .ids()
            .into_iter()
            .filter(|id| {
                self.tree()
                    .find(*id)
                    .is_some_and(|n| n.may_have_children())
            })
            .collect();
        self.expanded.extend(containers);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn expanded(&self) -> &HashSet<PropertyId> {
        &self.expanded
    }

    // ── Vocabulary import ────────────────────────────────────────────

    /// Start an import into `target` (top level when `None`), superseding
    /// any import still in flight.
    pub fn begin_import(&mut self, target: Option<PropertyId>) -> ImportTicket {
        self.imports.begin(&self.project.properties, target)
    }

    pub fn cancel_import(&mut self) {
        self.imports.cancel();
    }

    /// Apply candidates for a ticket, or discard them if the ticket is stale.
    pub fn complete_import(
        &mut self,
        ticket: ImportTicket,
        candidates: &[VocabularyCandidate],
    ) -> Result<ImportOutcome, StructuralViolation> {
        self.imports
            .complete(ticket, &mut self.project.properties, candidates)
    }

    /// Apply the result of [`fetch_for_ticket`](crate::import::fetch_for_ticket).
    pub fn apply_import(
        &mut self,
        pending: PendingImport,
    ) -> Result<ImportOutcome, StructuralViolation> {
        self.complete_import(pending.ticket, &pending.candidates)
    }

    /// Fetch candidates for `classification` and apply them to `target`.
    ///
    /// The session is borrowed for the whole fetch, so nothing else can
    /// supersede the ticket. Callers that keep editing during the fetch use
    /// [`begin_import`](Self::begin_import) with
    /// [`fetch_for_ticket`] and [`apply_import`](Self::apply_import).
    pub async fn import_from_source<S: VocabularySource>(
        &mut self,
        source: &S,
        target: Option<PropertyId>,
        classification: &str,
    ) -> Result<ImportOutcome, ImportError<S::Error>> {
        let ticket = self.begin_import(target);
        let pending = fetch_for_ticket(source, ticket, classification)
            .await
            .map_err(ImportError::Fetch)?;
        Ok(self.apply_import(pending)?)
    }
}
