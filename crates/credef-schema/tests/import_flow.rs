//! Fetch-then-apply imports through an in-memory vocabulary source.
//!
//! The source parks each fetch on a oneshot channel so the test decides
//! when (and in which order) results come back.

use std::collections::HashMap;
use std::sync::Mutex;

use credef_schema::{
    fetch_for_ticket, EditorState, ImportError, ImportOutcome, PropertyType, PropertyUpdate,
    SchemaMetadata, VocabularyCandidate, VocabularySource,
};
use tokio::sync::oneshot;

#[derive(Debug, thiserror::Error)]
#[error("classification '{0}' is not catalogued")]
struct UnknownClassification(String);

#[derive(Default)]
struct StaticCatalog {
    entries: HashMap<String, Vec<VocabularyCandidate>>,
}

impl StaticCatalog {
    fn with(mut self, classification: &str, candidates: Vec<VocabularyCandidate>) -> Self {
        self.entries.insert(classification.to_string(), candidates);
        self
    }
}

impl VocabularySource for StaticCatalog {
    type Error = UnknownClassification;

    async fn fetch_candidates(
        &self,
        classification: &str,
    ) -> Result<Vec<VocabularyCandidate>, Self::Error> {
        self.entries
            .get(classification)
            .cloned()
            .ok_or_else(|| UnknownClassification(classification.to_string()))
    }
}

/// Each fetch waits until the test releases it.
#[derive(Default)]
struct GatedCatalog {
    gates: Mutex<HashMap<String, oneshot::Receiver<Vec<VocabularyCandidate>>>>,
}

impl GatedCatalog {
    fn gate(&self, classification: &str) -> oneshot::Sender<Vec<VocabularyCandidate>> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(classification.to_string(), rx);
        tx
    }
}

impl VocabularySource for GatedCatalog {
    type Error = UnknownClassification;

    fn fetch_candidates(
        &self,
        classification: &str,
    ) -> impl std::future::Future<Output = Result<Vec<VocabularyCandidate>, Self::Error>> + Send
    {
        let gate = self.gates.lock().unwrap().remove(classification);
        let classification = classification.to_string();
        async move {
            match gate {
                Some(rx) => rx.await.map_err(|_| UnknownClassification(classification)),
                None => Err(UnknownClassification(classification)),
            }
        }
    }
}

fn candidate(id: &str, name: &str, value_type: &str) -> VocabularyCandidate {
    VocabularyCandidate {
        id: id.into(),
        name: name.into(),
        display_name: None,
        description: None,
        value_type: value_type.into(),
        constraints: None,
    }
}

#[tokio::test]
async fn test_import_from_source_applies_candidates() {
    let catalog = StaticCatalog::default().with(
        "employment",
        vec![
            candidate("vp-1", "salary", "currency"),
            candidate("vp-2", "start_date", "date"),
        ],
    );
    let mut editor = EditorState::new(SchemaMetadata::titled("Employment"));

    let outcome = editor
        .import_from_source(&catalog, None, "employment")
        .await
        .unwrap();
    let report = match outcome {
        ImportOutcome::Applied(report) => report,
        other => panic!("expected applied import, got {other:?}"),
    };
    assert_eq!(report.imported_count(), 2);

    let again = editor
        .import_from_source(&catalog, None, "employment")
        .await
        .unwrap();
    assert!(matches!(again, ImportOutcome::Applied(ref r) if r.skipped_count() == 2));
    assert_eq!(editor.tree().len(), 2);
}

#[tokio::test]
async fn test_fetch_failure_leaves_tree_untouched() {
    let catalog = StaticCatalog::default();
    let mut editor = EditorState::new(SchemaMetadata::titled("Employment"));
    let err = editor
        .import_from_source(&catalog, None, "missing")
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Fetch(_)));
    assert!(editor.tree().is_empty());
}

#[tokio::test]
async fn test_import_into_scalar_target_is_structural_error() {
    let catalog = StaticCatalog::default().with("x", vec![candidate("vp-1", "a", "text")]);
    let mut editor = EditorState::new(SchemaMetadata::titled("T"));
    let leaf = editor.add_property(None).unwrap().unwrap();
    let err = editor
        .import_from_source(&catalog, Some(leaf), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Structural(_)));
    assert_eq!(editor.tree().len(), 1);
}

#[tokio::test]
async fn test_last_fetch_wins() {
    let catalog = GatedCatalog::default();
    let release_old = catalog.gate("old");
    let release_new = catalog.gate("new");
    let mut editor = EditorState::new(SchemaMetadata::titled("T"));

    let old_fetch = fetch_for_ticket(&catalog, editor.begin_import(None), "old");
    let new_fetch = fetch_for_ticket(&catalog, editor.begin_import(None), "new");

    // The newer request resolves first, the older one last.
    release_new.send(vec![candidate("vp-new", "fresh", "text")]).unwrap();
    let new = new_fetch.await.unwrap();
    assert!(matches!(
        editor.apply_import(new).unwrap(),
        ImportOutcome::Applied(_)
    ));

    release_old.send(vec![candidate("vp-old", "stale", "text")]).unwrap();
    let old = old_fetch.await.unwrap();
    assert_eq!(editor.apply_import(old).unwrap(), ImportOutcome::Stale);

    let names: Vec<&str> = editor.tree().properties().iter().map(|n| n.name()).collect();
    assert_eq!(names, ["fresh"]);
}

#[tokio::test]
async fn test_edit_during_fetch_discards_result() {
    let catalog = GatedCatalog::default();
    let release = catalog.gate("employment");
    let mut editor = EditorState::new(SchemaMetadata::titled("T"));

    let ticket = editor.begin_import(None);
    let fetch = fetch_for_ticket(&catalog, ticket, "employment");

    let manual = editor.add_property(None).unwrap().unwrap();
    editor.update_property(
        manual,
        PropertyUpdate::new()
            .name("salary")
            .property_type(PropertyType::Integer),
    );

    release.send(vec![candidate("vp-1", "salary", "currency")]).unwrap();
    let pending = fetch.await.unwrap();
    assert_eq!(editor.apply_import(pending).unwrap(), ImportOutcome::Stale);

    let node = editor.tree().find(manual).unwrap();
    assert_eq!(node.property_type(), PropertyType::Integer);
    assert_eq!(node.source_vocab_property_id(), None);
}
