//! # Tree Mutation Engine
//!
//! [`PropertyTree`] owns the top-level property sequence and is the only
//! way to create, relocate, edit, or destroy nodes.
//!
//! ## Outcomes
//!
//! ```text
//! illegal mutation   ──▶ Err(StructuralViolation)   tree untouched
//! id not in tree     ──▶ Ok(None) / None / false     tree untouched
//! boundary move      ──▶ false                       tree untouched
//! anything else      ──▶ applied, revision += 1
//! ```
//!
//! Every operation validates before it writes, so an observer holding the
//! tree never sees a half-applied change. All structural operations are
//! built on one depth-first walk that visits `object.properties` in order
//! and then `array.items`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use credef_core::PropertyId;

use crate::model::{Constraints, PropertyNode, PropertyType};

// ─── Errors ──────────────────────────────────────────────────────────

/// A mutation or load that would break a tree invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralViolation {
    /// Named children can only be added to an `object` node.
    #[error("cannot add a property under {id}: a {actual} node has no named properties")]
    NotAnObject {
        /// The requested parent.
        id: PropertyId,
        /// Its actual type.
        actual: PropertyType,
    },

    /// An item definition can only be set on an `array` node.
    #[error("cannot set items on {id}: a {actual} node has no item definition")]
    NotAnArray {
        /// The requested array node.
        id: PropertyId,
        /// Its actual type.
        actual: PropertyType,
    },

    /// A loaded tree carried the same id twice.
    #[error("duplicate property id {0}")]
    DuplicateId(PropertyId),

    /// A loaded node carried children its type does not permit.
    #[error("property {id} of type {property_type} carries children its type does not permit")]
    IllegalChildren {
        /// The offending node.
        id: PropertyId,
        /// Its declared type.
        property_type: PropertyType,
    },
}

// ─── Mutation Inputs ─────────────────────────────────────────────────

/// Direction for [`PropertyTree::move_property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A field patch for [`PropertyTree::update_property`]. Unset fields are
/// left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyUpdate {
    pub name: Option<String>,
    pub display_name: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub property_type: Option<PropertyType>,
    pub required: Option<bool>,
    pub constraints: Option<Option<Constraints>>,
}

impl PropertyUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = Some(display_name);
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = Some(property_type);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn constraints(mut self, constraints: Option<Constraints>) -> Self {
        self.constraints = Some(constraints);
        self
    }
}

// ─── Property Tree ───────────────────────────────────────────────────

/// The mutable property tree of one project.
///
/// Serializes as the bare top-level node array. Deserialization re-checks
/// id uniqueness and child legality, so a persisted tree that breaks an
/// invariant is rejected at load rather than discovered at compile time.
///
/// Equality compares content only; the revision counter is session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<PropertyNode>", into = "Vec<PropertyNode>")]
pub struct PropertyTree {
    roots: Vec<PropertyNode>,
    revision: u64,
}

impl PartialEq for PropertyTree {
    fn eq(&self, other: &Self) -> bool {
        self.roots == other.roots
    }
}

impl PropertyTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from already-formed nodes, checking every invariant.
    pub fn from_nodes(roots: Vec<PropertyNode>) -> Result<Self, StructuralViolation> {
        let mut seen = std::collections::HashSet::new();
        for node in &roots {
            check_node(node, &mut seen)?;
        }
        Ok(Self { roots, revision: 0 })
    }

    /// Top-level properties in order.
    pub fn properties(&self) -> &[PropertyNode] {
        &self.roots
    }

    /// Monotonic counter bumped by every applied mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Every id in the tree, depth-first.
    pub fn ids(&self) -> Vec<PropertyId> {
        let mut out = Vec::new();
        for node in &self.roots {
            node.collect_ids(&mut out);
        }
        out
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.find(id).is_some()
    }

    /// Depth-first lookup by id.
    pub fn find(&self, id: PropertyId) -> Option<&PropertyNode> {
        find_in(&self.roots, id)
    }

    /// Ids from the top level down to `id`, inclusive. `None` when the id
    /// is not in the tree.
    pub fn path_of(&self, id: PropertyId) -> Option<Vec<PropertyId>> {
        let mut trail = Vec::new();
        path_in(&self.roots, id, &mut trail).then_some(trail)
    }

    /// The enclosing container of `id`. `None` for top-level nodes and for
    /// ids not in the tree.
    pub fn parent_of(&self, id: PropertyId) -> Option<PropertyId> {
        let path = self.path_of(id)?;
        path.len().checked_sub(2).map(|index| path[index])
    }

    fn find_mut(&mut self, id: PropertyId) -> Option<&mut PropertyNode> {
        find_in_mut(&mut self.roots, id)
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    /// Append a new default node (`string`, empty name).
    ///
    /// With no parent the node goes to the end of the top-level sequence.
    /// With a parent it goes to the end of that object's `properties`.
    /// Returns `Ok(None)` when the parent id is not in the tree.
    pub fn add_property(
        &mut self,
        parent: Option<PropertyId>,
    ) -> Result<Option<PropertyId>, StructuralViolation> {
        let node = PropertyNode::new(PropertyType::String);
        let id = node.id;

        match parent {
            None => self.roots.push(node),
            Some(parent_id) => {
                let Some(parent) = self.find_mut(parent_id) else {
                    tracing::debug!(parent = %parent_id, "add_property: parent not found");
                    return Ok(None);
                };
                if parent.property_type != PropertyType::Object {
                    return Err(StructuralViolation::NotAnObject {
                        id: parent_id,
                        actual: parent.property_type,
                    });
                }
                parent.properties.push(node);
            }
        }

        self.bump();
        tracing::debug!(node_id = %id, parent = ?parent, "property added");
        Ok(Some(id))
    }

    /// Remove a node and its entire subtree. Returns the removed subtree,
    /// or `None` when the id is not in the tree.
    pub fn delete_property(&mut self, id: PropertyId) -> Option<PropertyNode> {
        let removed = remove_in(&mut self.roots, id)?;
        self.bump();
        tracing::debug!(node_id = %id, "property deleted");
        Some(removed)
    }

    /// Swap a node with its neighbour. Returns `false` (and changes nothing)
    /// when the node is already at that boundary, is an array's item
    /// definition, or is not in the tree.
    pub fn move_property(&mut self, id: PropertyId, direction: Direction) -> bool {
        let moved = move_in(&mut self.roots, id, direction).unwrap_or(false);
        if moved {
            self.bump();
            tracing::debug!(node_id = %id, ?direction, "property moved");
        }
        moved
    }

    /// Apply a field patch. Returns `false` when the id is not in the tree.
    ///
    /// Renaming an array renames its item definitions too.
    /// A type change to a non-container discards all children. A change
    /// between `object` and `array` discards the old container's children.
    pub fn update_property(&mut self, id: PropertyId, update: PropertyUpdate) -> bool {
        let Some(node) = self.find_mut(id) else {
            return false;
        };

        if let Some(name) = update.name {
            // Item definitions carry their array's name down the chain.
            let mut item = node.items.as_deref_mut();
            while let Some(current) = item {
                current.name = name.clone();
                item = current.items.as_deref_mut();
            }
            node.name = name;
        }
        if let Some(display_name) = update.display_name {
            node.display_name = display_name;
        }
        if let Some(description) = update.description {
            node.description = description;
        }
        if let Some(required) = update.required {
            node.required = required;
        }
        if let Some(constraints) = update.constraints {
            node.constraints = constraints;
        }
        if let Some(new_type) = update.property_type {
            if new_type != node.property_type {
                if new_type != PropertyType::Object {
                    node.properties.clear();
                }
                if new_type != PropertyType::Array {
                    node.items = None;
                }
                node.property_type = new_type;
            }
        }

        self.bump();
        tracing::debug!(node_id = %id, "property updated");
        true
    }

    /// Give an `array` node a fresh item definition of the given type,
    /// replacing (and destroying) any existing one. The item inherits the
    /// array's name. Returns `Ok(None)` when the id is not in the tree.
    pub fn set_items(
        &mut self,
        id: PropertyId,
        item_type: PropertyType,
    ) -> Result<Option<PropertyId>, StructuralViolation> {
        let Some(node) = self.find_mut(id) else {
            return Ok(None);
        };
        if node.property_type != PropertyType::Array {
            return Err(StructuralViolation::NotAnArray {
                id,
                actual: node.property_type,
            });
        }

        let mut item = PropertyNode::new(item_type);
        item.name = node.name.clone();
        let item_id = item.id;
        node.items = Some(Box::new(item));

        self.bump();
        tracing::debug!(node_id = %id, item_id = %item_id, %item_type, "array items set");
        Ok(Some(item_id))
    }

    /// Record the catalogue origin of a node. Returns `false` when the id
    /// is not in the tree.
    pub(crate) fn set_source_vocab_property_id(
        &mut self,
        id: PropertyId,
        source: Option<String>,
    ) -> bool {
        let Some(node) = self.find_mut(id) else {
            return false;
        };
        node.source_vocab_property_id = source;
        self.bump();
        true
    }
}

impl TryFrom<Vec<PropertyNode>> for PropertyTree {
    type Error = StructuralViolation;

    fn try_from(roots: Vec<PropertyNode>) -> Result<Self, Self::Error> {
        Self::from_nodes(roots)
    }
}

impl From<PropertyTree> for Vec<PropertyNode> {
    fn from(tree: PropertyTree) -> Self {
        tree.roots
    }
}

// ─── Depth-First Walks ───────────────────────────────────────────────

fn find_in(nodes: &[PropertyNode], id: PropertyId) -> Option<&PropertyNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_below(node, id) {
            return Some(found);
        }
    }
    None
}

fn find_below(node: &PropertyNode, id: PropertyId) -> Option<&PropertyNode> {
    if let Some(found) = find_in(&node.properties, id) {
        return Some(found);
    }
    match node.items.as_deref() {
        Some(items) if items.id == id => Some(items),
        Some(items) => find_below(items, id),
        None => None,
    }
}

fn path_in(nodes: &[PropertyNode], id: PropertyId, trail: &mut Vec<PropertyId>) -> bool {
    for node in nodes {
        trail.push(node.id);
        if node.id == id || path_below(node, id, trail) {
            return true;
        }
        trail.pop();
    }
    false
}

fn path_below(node: &PropertyNode, id: PropertyId, trail: &mut Vec<PropertyId>) -> bool {
    if path_in(&node.properties, id, trail) {
        return true;
    }
    match node.items.as_deref() {
        Some(items) => path_in(std::slice::from_ref(items), id, trail),
        None => false,
    }
}

fn find_in_mut(nodes: &mut [PropertyNode], id: PropertyId) -> Option<&mut PropertyNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_below_mut(node, id) {
            return Some(found);
        }
    }
    None
}

fn find_below_mut(node: &mut PropertyNode, id: PropertyId) -> Option<&mut PropertyNode> {
    if let Some(found) = find_in_mut(&mut node.properties, id) {
        return Some(found);
    }
    match node.items.as_deref_mut() {
        Some(items) if items.id == id => Some(items),
        Some(items) => find_below_mut(items, id),
        None => None,
    }
}

fn remove_in(nodes: &mut Vec<PropertyNode>, id: PropertyId) -> Option<PropertyNode> {
    for index in 0..nodes.len() {
        if nodes[index].id == id {
            return Some(nodes.remove(index));
        }
        if let Some(removed) = remove_below(&mut nodes[index], id) {
            return Some(removed);
        }
    }
    None
}

fn remove_below(node: &mut PropertyNode, id: PropertyId) -> Option<PropertyNode> {
    if let Some(removed) = remove_in(&mut node.properties, id) {
        return Some(removed);
    }
    let items_match = node.items.as_ref().is_some_and(|items| items.id == id);
    if items_match {
        return node.items.take().map(|items| *items);
    }
    node.items
        .as_deref_mut()
        .and_then(|items| remove_below(items, id))
}

/// `None` when the id is not below `nodes`; `Some(moved)` otherwise.
fn move_in(nodes: &mut [PropertyNode], id: PropertyId, direction: Direction) -> Option<bool> {
    for index in 0..nodes.len() {
        if nodes[index].id == id {
            let neighbour = match direction {
                Direction::Up => index.checked_sub(1),
                Direction::Down => (index + 1 < nodes.len()).then_some(index + 1),
            };
            return Some(match neighbour {
                Some(other) => {
                    nodes.swap(index, other);
                    true
                }
                None => false,
            });
        }
        if let Some(outcome) = move_below(&mut nodes[index], id, direction) {
            return Some(outcome);
        }
    }
    None
}

fn move_below(node: &mut PropertyNode, id: PropertyId, direction: Direction) -> Option<bool> {
    if let Some(outcome) = move_in(&mut node.properties, id, direction) {
        return Some(outcome);
    }
    match node.items.as_deref_mut() {
        // An item definition has no siblings.
        Some(items) if items.id == id => Some(false),
        Some(items) => move_below(items, id, direction),
        None => None,
    }
}

fn check_node(
    node: &PropertyNode,
    seen: &mut std::collections::HashSet<PropertyId>,
) -> Result<(), StructuralViolation> {
    if !seen.insert(node.id) {
        return Err(StructuralViolation::DuplicateId(node.id));
    }
    let illegal = match node.property_type {
        PropertyType::Object => node.items.is_some(),
        PropertyType::Array => !node.properties.is_empty(),
        _ => node.items.is_some() || !node.properties.is_empty(),
    };
    if illegal {
        return Err(StructuralViolation::IllegalChildren {
            id: node.id,
            property_type: node.property_type,
        });
    }
    for child in &node.properties {
        check_node(child, seen)?;
    }
    if let Some(items) = &node.items {
        check_node(items, seen)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(tree: &mut PropertyTree, parent: Option<PropertyId>, name: &str) -> PropertyId {
        let id = tree.add_property(parent).unwrap().unwrap();
        tree.update_property(id, PropertyUpdate::new().name(name));
        id
    }

    fn object(tree: &mut PropertyTree, parent: Option<PropertyId>, name: &str) -> PropertyId {
        let id = named(tree, parent, name);
        tree.update_property(id, PropertyUpdate::new().property_type(PropertyType::Object));
        id
    }

    fn top_level_names(tree: &PropertyTree) -> Vec<String> {
        tree.properties().iter().map(|n| n.name().to_string()).collect()
    }

    // ── add_property ─────────────────────────────────────────────────

    #[test]
    fn test_add_top_level_defaults() {
        let mut tree = PropertyTree::new();
        let id = tree.add_property(None).unwrap().unwrap();
        let node = tree.find(id).unwrap();
        assert_eq!(node.property_type(), PropertyType::String);
        assert_eq!(node.name(), "");
        assert_eq!(tree.properties().len(), 1);
        assert_eq!(tree.revision(), 1);
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut tree = PropertyTree::new();
        named(&mut tree, None, "a");
        named(&mut tree, None, "b");
        named(&mut tree, None, "c");
        assert_eq!(top_level_names(&tree), ["a", "b", "c"]);
    }

    #[test]
    fn test_add_child_to_object() {
        let mut tree = PropertyTree::new();
        let address = object(&mut tree, None, "address");
        let city = named(&mut tree, Some(address), "city");
        let parent = tree.find(address).unwrap();
        assert_eq!(parent.properties().len(), 1);
        assert_eq!(parent.properties()[0].id(), city);
    }

    #[test]
    fn test_add_child_to_scalar_is_rejected_without_mutation() {
        let mut tree = PropertyTree::new();
        let leaf = named(&mut tree, None, "age");
        let before = tree.clone();
        let err = tree.add_property(Some(leaf)).unwrap_err();
        assert_eq!(
            err,
            StructuralViolation::NotAnObject {
                id: leaf,
                actual: PropertyType::String
            }
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_add_child_to_array_is_rejected() {
        let mut tree = PropertyTree::new();
        let tags = named(&mut tree, None, "tags");
        tree.update_property(tags, PropertyUpdate::new().property_type(PropertyType::Array));
        assert!(matches!(
            tree.add_property(Some(tags)),
            Err(StructuralViolation::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_add_under_missing_parent_is_noop() {
        let mut tree = PropertyTree::new();
        named(&mut tree, None, "a");
        let revision = tree.revision();
        assert_eq!(tree.add_property(Some(PropertyId::new())).unwrap(), None);
        assert_eq!(tree.revision(), revision);
        assert_eq!(tree.len(), 1);
    }

    // ── delete_property ──────────────────────────────────────────────

    #[test]
    fn test_delete_removes_subtree() {
        let mut tree = PropertyTree::new();
        let address = object(&mut tree, None, "address");
        let city = named(&mut tree, Some(address), "city");
        let geo = object(&mut tree, Some(address), "geo");
        let lat = named(&mut tree, Some(geo), "lat");
        let keep = named(&mut tree, None, "name");

        let removed = tree.delete_property(address).unwrap();
        assert_eq!(removed.subtree_ids(), vec![address, city, geo, lat]);
        for gone in [address, city, geo, lat] {
            assert!(!tree.contains(gone));
        }
        assert!(tree.contains(keep));
    }

    #[test]
    fn test_delete_array_items() {
        let mut tree = PropertyTree::new();
        let tags = named(&mut tree, None, "tags");
        tree.update_property(tags, PropertyUpdate::new().property_type(PropertyType::Array));
        let item = tree.set_items(tags, PropertyType::String).unwrap().unwrap();
        assert!(tree.delete_property(item).is_some());
        assert!(tree.find(tags).unwrap().items().is_none());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut tree = PropertyTree::new();
        named(&mut tree, None, "a");
        let before = tree.clone();
        assert!(tree.delete_property(PropertyId::new()).is_none());
        assert_eq!(tree, before);
    }

    // ── move_property ────────────────────────────────────────────────

    #[test]
    fn test_move_down_then_boundary() {
        let mut tree = PropertyTree::new();
        let a = named(&mut tree, None, "A");
        let b = named(&mut tree, None, "B");
        assert!(tree.move_property(a, Direction::Down));
        assert_eq!(top_level_names(&tree), ["B", "A"]);
        assert!(!tree.move_property(a, Direction::Down));
        assert_eq!(top_level_names(&tree), ["B", "A"]);
        assert!(!tree.move_property(b, Direction::Up));
        assert_eq!(top_level_names(&tree), ["B", "A"]);
    }

    #[test]
    fn test_boundary_move_leaves_revision_alone() {
        let mut tree = PropertyTree::new();
        let a = named(&mut tree, None, "A");
        let revision = tree.revision();
        assert!(!tree.move_property(a, Direction::Up));
        assert!(!tree.move_property(a, Direction::Down));
        assert_eq!(tree.revision(), revision);
    }

    #[test]
    fn test_move_nested_sibling() {
        let mut tree = PropertyTree::new();
        let address = object(&mut tree, None, "address");
        named(&mut tree, Some(address), "street");
        let city = named(&mut tree, Some(address), "city");
        assert!(tree.move_property(city, Direction::Up));
        let names: Vec<_> = tree
            .find(address)
            .unwrap()
            .properties()
            .iter()
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(names, ["city", "street"]);
    }

    #[test]
    fn test_move_items_is_noop() {
        let mut tree = PropertyTree::new();
        let tags = named(&mut tree, None, "tags");
        tree.update_property(tags, PropertyUpdate::new().property_type(PropertyType::Array));
        let item = tree.set_items(tags, PropertyType::String).unwrap().unwrap();
        assert!(!tree.move_property(item, Direction::Up));
    }

    // ── update_property ──────────────────────────────────────────────

    #[test]
    fn test_type_change_to_scalar_discards_children() {
        let mut tree = PropertyTree::new();
        let address = object(&mut tree, None, "address");
        let city = named(&mut tree, Some(address), "city");
        assert!(tree.update_property(
            address,
            PropertyUpdate::new().property_type(PropertyType::String)
        ));
        assert!(tree.find(address).unwrap().properties().is_empty());
        assert!(!tree.contains(city));
    }

    #[test]
    fn test_type_change_array_to_object_discards_items() {
        let mut tree = PropertyTree::new();
        let tags = named(&mut tree, None, "tags");
        tree.update_property(tags, PropertyUpdate::new().property_type(PropertyType::Array));
        let item = tree.set_items(tags, PropertyType::String).unwrap().unwrap();
        tree.update_property(tags, PropertyUpdate::new().property_type(PropertyType::Object));
        assert!(!tree.contains(item));
        assert!(tree.find(tags).unwrap().items().is_none());
    }

    #[test]
    fn test_same_type_update_keeps_children() {
        let mut tree = PropertyTree::new();
        let address = object(&mut tree, None, "address");
        let city = named(&mut tree, Some(address), "city");
        tree.update_property(
            address,
            PropertyUpdate::new()
                .property_type(PropertyType::Object)
                .required(true),
        );
        assert!(tree.contains(city));
        assert!(tree.find(address).unwrap().is_required());
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut tree = PropertyTree::new();
        assert!(!tree.update_property(PropertyId::new(), PropertyUpdate::new().name("x")));
        assert_eq!(tree.revision(), 0);
    }

    // ── set_items ────────────────────────────────────────────────────

    #[test]
    fn test_set_items_inherits_name_and_replaces() {
        let mut tree = PropertyTree::new();
        let tags = named(&mut tree, None, "tags");
        tree.update_property(tags, PropertyUpdate::new().property_type(PropertyType::Array));
        let first = tree.set_items(tags, PropertyType::String).unwrap().unwrap();
        let second = tree.set_items(tags, PropertyType::Integer).unwrap().unwrap();
        let items = tree.find(tags).unwrap().items().unwrap();
        assert_eq!(items.id(), second);
        assert_eq!(items.name(), "tags");
        assert_eq!(items.property_type(), PropertyType::Integer);
        assert!(!tree.contains(first));
    }

    #[test]
    fn test_rename_array_renames_item_chain() {
        let mut tree = PropertyTree::new();
        let grid = named(&mut tree, None, "grid");
        tree.update_property(grid, PropertyUpdate::new().property_type(PropertyType::Array));
        let row = tree.set_items(grid, PropertyType::Array).unwrap().unwrap();
        let cell = tree.set_items(row, PropertyType::String).unwrap().unwrap();

        tree.update_property(grid, PropertyUpdate::new().name("matrix"));
        assert_eq!(tree.find(row).unwrap().name(), "matrix");
        assert_eq!(tree.find(cell).unwrap().name(), "matrix");
    }

    #[test]
    fn test_set_items_on_object_is_rejected() {
        let mut tree = PropertyTree::new();
        let address = object(&mut tree, None, "address");
        assert!(matches!(
            tree.set_items(address, PropertyType::String),
            Err(StructuralViolation::NotAnArray { .. })
        ));
    }

    // ── loading ──────────────────────────────────────────────────────

    #[test]
    fn test_serde_round_trip_keeps_structure() {
        let mut tree = PropertyTree::new();
        let address = object(&mut tree, None, "address");
        named(&mut tree, Some(address), "city");
        let json = serde_json::to_string(&tree).unwrap();
        let loaded: PropertyTree = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.properties(), tree.properties());
        assert_eq!(loaded.revision(), 0);
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let id = PropertyId::new();
        let json = serde_json::json!([
            {"id": id, "name": "a", "type": "string"},
            {"id": id, "name": "b", "type": "string"}
        ]);
        let err = serde_json::from_value::<PropertyTree>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate property id"));
    }

    #[test]
    fn test_load_rejects_children_on_scalar() {
        let json = serde_json::json!([{
            "id": PropertyId::new(),
            "name": "age",
            "type": "integer",
            "properties": [{"id": PropertyId::new(), "name": "x", "type": "string"}]
        }]);
        assert!(serde_json::from_value::<PropertyTree>(json).is_err());
    }

    // ── path_of / parent_of ──────────────────────────────────────────

    #[test]
    fn test_path_and_parent_through_items() {
        let mut tree = PropertyTree::new();
        let address = object(&mut tree, None, "address");
        let tags = named(&mut tree, Some(address), "tags");
        tree.update_property(tags, PropertyUpdate::new().property_type(PropertyType::Array));
        let item = tree.set_items(tags, PropertyType::String).unwrap().unwrap();

        assert_eq!(tree.path_of(item), Some(vec![address, tags, item]));
        assert_eq!(tree.parent_of(item), Some(tags));
        assert_eq!(tree.parent_of(address), None);
        assert_eq!(tree.path_of(PropertyId::new()), None);
    }
}
