//! # Vocabulary Import Resolver
//!
//! Merges catalogued vocabulary properties into a property tree without
//! duplicating what is already there.
//!
//! ## Resolution Rules
//!
//! 1. The candidate's catalogue `valueType` is mapped onto [`PropertyType`]
//!    through a fixed table; unknown value types fall back to `string`.
//! 2. A candidate is skipped when the target container already has a child
//!    that was imported from the same catalogue id, or a child with the
//!    same name. Skipped candidates never overwrite the existing node.
//! 3. Accepted candidates are inserted through
//!    [`PropertyTree::add_property`] and then populated.
//!
//! Partial success is the normal outcome; the [`ImportReport`] lists both
//! sides.

use std::future::Future;

use serde::{Deserialize, Serialize};

use credef_core::PropertyId;

use crate::model::{Constraints, PropertyNode, PropertyType};
use crate::tree::{PropertyTree, PropertyUpdate, StructuralViolation};

// ─── Candidates ──────────────────────────────────────────────────────

/// A catalogued vocabulary property offered for import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyCandidate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
}

/// The seam to the vocabulary collaborator.
///
/// Queries are restartable: calling again yields a fresh list.
pub trait VocabularySource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the candidate properties catalogued under a classification.
    fn fetch_candidates(
        &self,
        classification: &str,
    ) -> impl Future<Output = Result<Vec<VocabularyCandidate>, Self::Error>> + Send;
}

// ─── Value Type Mapping ──────────────────────────────────────────────

/// Where a catalogue value type lands in the property model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub property_type: PropertyType,
    /// Format implied by the value type (`currency`, `date`, ...).
    pub format: Option<&'static str>,
    /// Item mapping for array value types.
    pub items: Option<Box<MappedType>>,
}

impl MappedType {
    fn scalar(property_type: PropertyType, format: Option<&'static str>) -> Self {
        Self {
            property_type,
            format,
            items: None,
        }
    }
}

/// Map a catalogue `valueType` onto the property model.
///
/// Accepts `array-of-X`, `array<X>`, `X[]` and `list-of-X` for arrays.
/// Anything unrecognised becomes `string`.
pub fn map_value_type(value_type: &str) -> MappedType {
    let normalized: String = value_type
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect();

    if let Some(inner) = array_element_type(&normalized) {
        return MappedType {
            property_type: PropertyType::Array,
            format: None,
            items: Some(Box::new(map_value_type(inner))),
        };
    }

    use PropertyType as P;
    match normalized.as_str() {
        "string" | "text" | "varchar" => MappedType::scalar(P::String, None),
        "integer" | "int" | "long" => MappedType::scalar(P::Integer, None),
        "number" | "decimal" | "float" | "double" => MappedType::scalar(P::Number, None),
        "currency" | "money" => MappedType::scalar(P::Number, Some("currency")),
        "percentage" | "percent" => MappedType::scalar(P::Number, Some("percentage")),
        "boolean" | "bool" => MappedType::scalar(P::Boolean, None),
        "date" => MappedType::scalar(P::String, Some("date")),
        "datetime" | "date-time" | "timestamp" => MappedType::scalar(P::String, Some("date-time")),
        "time" => MappedType::scalar(P::String, Some("time")),
        "email" => MappedType::scalar(P::String, Some("email")),
        "uri" | "url" => MappedType::scalar(P::String, Some("uri")),
        "uuid" => MappedType::scalar(P::String, Some("uuid")),
        "object" => MappedType::scalar(P::Object, None),
        "array" | "list" => MappedType {
            property_type: P::Array,
            format: None,
            items: Some(Box::new(MappedType::scalar(P::String, None))),
        },
        other => {
            tracing::debug!(value_type = other, "unrecognised vocabulary value type, using string");
            MappedType::scalar(P::String, None)
        }
    }
}

fn array_element_type(normalized: &str) -> Option<&str> {
    if let Some(inner) = normalized
        .strip_prefix("array-of-")
        .or_else(|| normalized.strip_prefix("list-of-"))
    {
        return Some(inner);
    }
    if let Some(inner) = normalized
        .strip_prefix("array<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return Some(inner);
    }
    normalized.strip_suffix("[]")
}

// ─── Report ──────────────────────────────────────────────────────────

/// Why a candidate was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// A sibling was already imported from the same catalogue entry.
    AlreadyImported,
    /// A sibling already uses the candidate's name.
    NameTaken,
}

/// A candidate the resolver declined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCandidate {
    pub candidate_id: String,
    pub name: String,
    pub reason: SkipReason,
    /// The sibling that caused the skip.
    pub existing: PropertyId,
}

/// Result of one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: Vec<PropertyId>,
    pub skipped: Vec<SkippedCandidate>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    /// Number of candidates skipped as duplicates.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

// ─── Resolver ────────────────────────────────────────────────────────

/// Import candidates under `target` (an `object` node) or at the top
/// level when `target` is `None`.
///
/// Returns `Ok(None)` when the target id is not in the tree, and
/// `Err(NotAnObject)` when it is not an object. Both are decided before
/// any node is created.
pub fn resolve_import(
    tree: &mut PropertyTree,
    target: Option<PropertyId>,
    candidates: &[VocabularyCandidate],
) -> Result<Option<ImportReport>, StructuralViolation> {
    if let Some(target_id) = target {
        match tree.find(target_id) {
            None => {
                tracing::debug!(target = %target_id, "import target not found");
                return Ok(None);
            }
            Some(node) if node.property_type() != PropertyType::Object => {
                return Err(StructuralViolation::NotAnObject {
                    id: target_id,
                    actual: node.property_type(),
                });
            }
            Some(_) => {}
        }
    }

    let mut report = ImportReport::default();
    for candidate in candidates {
        let siblings = match target {
            None => tree.properties(),
            Some(target_id) => tree.find(target_id).map(|n| n.properties()).unwrap_or(&[]),
        };

        if let Some((existing, reason)) = find_duplicate(siblings, candidate) {
            tracing::debug!(
                candidate = %candidate.id,
                name = %candidate.name,
                ?reason,
                "vocabulary candidate skipped"
            );
            report.skipped.push(SkippedCandidate {
                candidate_id: candidate.id.clone(),
                name: candidate.name.clone(),
                reason,
                existing,
            });
            continue;
        }

        let Some(id) = tree.add_property(target)? else {
            continue;
        };
        populate(tree, id, candidate);
        report.imported.push(id);
    }

    tracing::debug!(
        imported = report.imported_count(),
        skipped = report.skipped_count(),
        "vocabulary import resolved"
    );
    Ok(Some(report))
}

fn find_duplicate(
    siblings: &[PropertyNode],
    candidate: &VocabularyCandidate,
) -> Option<(PropertyId, SkipReason)> {
    if let Some(existing) = siblings
        .iter()
        .find(|n| n.source_vocab_property_id() == Some(candidate.id.as_str()))
    {
        return Some((existing.id(), SkipReason::AlreadyImported));
    }
    siblings
        .iter()
        .find(|n| !candidate.name.is_empty() && n.name() == candidate.name)
        .map(|existing| (existing.id(), SkipReason::NameTaken))
}

fn populate(tree: &mut PropertyTree, id: PropertyId, candidate: &VocabularyCandidate) {
    let mapped = map_value_type(&candidate.value_type);
    tree.update_property(
        id,
        PropertyUpdate::new()
            .name(candidate.name.clone())
            .display_name(candidate.display_name.clone())
            .description(candidate.description.clone())
            .property_type(mapped.property_type),
    );
    tree.set_source_vocab_property_id(id, Some(candidate.id.clone()));
    apply_mapping(tree, id, &mapped, candidate.constraints.clone());
}

/// Attach the mapped format and candidate constraints to the innermost
/// leaf, creating item definitions along the way for array types.
fn apply_mapping(
    tree: &mut PropertyTree,
    id: PropertyId,
    mapped: &MappedType,
    constraints: Option<Constraints>,
) {
    if let Some(item_mapping) = &mapped.items {
        if let Ok(Some(item_id)) = tree.set_items(id, item_mapping.property_type) {
            apply_mapping(tree, item_id, item_mapping, constraints);
        }
        return;
    }

    let mut merged = constraints.unwrap_or_default();
    if merged.format.is_none() {
        merged.format = mapped.format.map(str::to_string);
    }
    if !merged.is_empty() {
        tree.update_property(id, PropertyUpdate::new().constraints(Some(merged)));
    }
}
