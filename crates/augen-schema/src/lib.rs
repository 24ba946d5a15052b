//! Descriptor data model for the augen synthesis engine.
//!
//! ## Crate layout
//! - `types`: semantic scalar tags and their capability tables.
//! - `node`: immutable descriptor nodes built once per scanner pass.
//! - `marker`: configuration marker argument shapes (darling).
//! - `diagnostic`: stable-identifier diagnostics and aggregation.
//! - `fingerprint`: structural hashing used as cache identity.
//! - `validate`: staged descriptor validation.

pub mod diagnostic;
pub mod fingerprint;
pub mod marker;
pub mod node;
pub mod types;
pub mod validate;

/// Maximum length for descriptor identifiers.
pub const MAX_IDENT_LEN: usize = 64;

/// Maximum number of members resolved for a complex value object.
pub const MAX_MEMBERS: usize = 64;

/// Maximum depth of a nested union variant tree.
pub const MAX_UNION_DEPTH: usize = 8;

use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        diagnostic::{Diagnostic, DiagnosticId, Diagnostics, Severity},
        fingerprint::{Fingerprint, StructuralHash, StructuralHasher},
        node::*,
        types::ScalarKind,
    };
    pub use serde::Serialize;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("descriptor validation failed: {0}")]
    Validation(diagnostic::Diagnostics),
}
