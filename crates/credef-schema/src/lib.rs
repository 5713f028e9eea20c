//! # credef-schema: Property-Tree Schema Model & Dual-Format Compiler
//!
//! The in-memory model of a credential's attributes, the operations that
//! edit it, and the two compilers that publish it.
//!
//! ## Components
//!
//! - **Model** (`model.rs`): [`PropertyNode`], [`PropertyType`],
//!   [`Constraints`], [`SchemaMetadata`], [`SchemaProject`]. A node may
//!   have children only when its type is `object` or `array`.
//!
//! - **Mutation engine** (`tree.rs`): [`PropertyTree`] owns the nodes by
//!   value. Illegal mutations return [`StructuralViolation`] and leave the
//!   tree untouched; unknown ids are no-ops.
//!
//! - **Editor** (`editor.rs`): [`EditorState`] adds selection, expansion
//!   and import bookkeeping on top of one project.
//!
//! - **Vocabulary import** (`vocabulary.rs`, `import.rs`): maps catalogue
//!   candidates onto the model without duplicating existing nodes, with
//!   last-fetch-wins coordination across the async fetch.
//!
//! - **Context URL** (`context_url.rs`): pure derivation of the URL a
//!   context document identifies itself with.
//!
//! - **Compiler** (`compile/`): JSON Schema and JSON-LD context passes,
//!   plus [`compile_project`] which adds a content digest.
//!
//! - **Checks** (`validate.rs`, `audit.rs`): post-compile well-formedness
//!   and `additionalProperties` consistency.
//!
//! ## Crate Policy
//!
//! - Depends only on `credef-core` internally.
//! - Compiler passes never mutate the tree and never fail on a tree that
//!   loaded successfully; degenerate nodes produce warnings.

pub mod audit;
pub mod compile;
pub mod context_url;
pub mod editor;
pub mod import;
pub mod model;
pub mod tree;
pub mod validate;
pub mod vocabulary;

// ─── Model re-exports ───────────────────────────────────────────────

pub use model::{
    Constraints, PropertyNode, PropertyType, SchemaMetadata, SchemaMode, SchemaProject,
};
pub use tree::{Direction, PropertyTree, PropertyUpdate, StructuralViolation};

// ─── Editing re-exports ─────────────────────────────────────────────

pub use editor::EditorState;
pub use import::{
    fetch_for_ticket, ImportCoordinator, ImportError, ImportOutcome, ImportTicket, PendingImport,
};
pub use vocabulary::{
    map_value_type, resolve_import, ImportReport, MappedType, SkipReason, SkippedCandidate,
    VocabularyCandidate, VocabularySource,
};

// ─── Compiler re-exports ────────────────────────────────────────────

pub use compile::{
    compile_checked_as, compile_project, compile_project_as, context_document, validation_schema,
    CompileOptions, Compiled, CompiledArtifact, CompilerWarning, WarningKind,
    DEFAULT_VOCABULARY_BASE_URL,
};
pub use context_url::{
    derive_context_url, derive_context_url_with_base, slugify, DEFAULT_CONTEXT_BASE_URL,
};

// ─── Check re-exports ───────────────────────────────────────────────

pub use audit::{audit_strictness, StrictnessFinding};
pub use validate::{check_context_document, check_schema_document, SchemaCheckError};
