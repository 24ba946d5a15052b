//! The augen synthesis engine: analysis → descriptor → planning → emission.
//!
//! ## Crate layout
//! - `scan`: syntactic candidate extraction (no symbol resolution).
//! - `build`: candidate + symbol information → immutable `TypeDescriptor`.
//! - `plan`: descriptor → conflict-free generation plan.
//! - `emit`: pure emitters, one per capability family.
//! - `pipeline`: the incremental, concurrent orchestrator.
//!
//! Every stage is a pure function over its inputs; the only shared mutable
//! state lives in the pipeline's structural caches.

pub mod build;
pub mod emit;
pub mod pipeline;
pub mod plan;
pub mod scan;

///
/// Prelude
///

pub mod prelude {
    pub(crate) use augen_schema::{
        diagnostic::{Diagnostic, DiagnosticId, Diagnostics},
        fingerprint::Fingerprint,
        marker::*,
        node::*,
        types::ScalarKind,
    };
    pub(crate) use proc_macro2::TokenStream;
    pub(crate) use quote::{ToTokens, format_ident, quote};
}
