//! ## Crate layout
//! - `error`: the structured validation error carrier for generated code.
//! - `registry`: process-wide metadata registry read by integration layers.
//! - `traits`: runtime traits implemented by synthesized types.
//! - `value`: the type-erased key-value model used for conversions.
//!
//! The attribute macros re-exported at the crate root are the public entry
//! point; everything else exists to support the code they emit.

pub use augen_schema as schema;

pub mod error;
pub mod registry;
pub mod traits;
pub mod value;

pub use augen_macros::{complex_value_object, smart_enum, union_type, value_object};
pub use error::ValidationError;
pub use rust_decimal::Decimal;
pub use value::KeyValue;

/// re-exports
///
/// macros can use these, stops the user having to specify all the
/// dependencies in the Cargo.toml file manually
pub mod __reexports {
    pub use ctor;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Decimal, KeyValue, ValidationError,
        complex_value_object,
        registry::{HasMetadata as _, TypeMetadata},
        smart_enum,
        traits::{Inner as _, ValidatableEnum as _},
        union_type, value_object,
    };
}
