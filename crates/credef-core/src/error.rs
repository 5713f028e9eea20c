//! # Error Types
//!
//! Top-level error hierarchy. All errors use `thiserror` for derive-based
//! `Display` and `Error` implementations.
//!
//! Only genuine failures live here. A lookup miss on a tree id and a
//! duplicate vocabulary candidate are outcomes, not errors, and are
//! reported through return values by the schema crate.

use thiserror::Error;

/// Umbrella error type for the credential definition studio.
#[derive(Error, Debug)]
pub enum CredefError {
    /// Canonicalization of an artifact failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A compiled document failed the well-formedness check for its
    /// format and must not be published.
    #[error("schema check error: {0}")]
    SchemaCheck(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The value could not be converted to or rendered as JSON.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
