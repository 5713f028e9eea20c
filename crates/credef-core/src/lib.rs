//! # credef-core: Foundational Types for the Credential Definition Studio
//!
//! The leaf of the workspace dependency graph. Every other `credef-*` crate
//! depends on it; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** `PropertyId` and `ProjectId` wrap UUIDs so a
//!    project key can never be passed where a tree node id is expected.
//!
//! 2. **`CanonicalBytes` newtype.** Artifact digests are computed only from
//!    JCS-canonical bytes, so two compilations of the same tree always hash
//!    to the same value regardless of map ordering.
//!
//! 3. **Structured errors.** `CredefError` is the umbrella type the binary
//!    sees; domain crates define narrower `thiserror` enums and convert.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credef-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, CredefError};
pub use identity::{ProjectId, PropertyId};
