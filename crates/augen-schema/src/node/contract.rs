use serde::Serialize;

use crate::{
    fingerprint::{StructuralHash, StructuralHasher},
    marker::NullHandlingArgs,
    prelude::*,
};

///
/// ValidationContract
///
/// How raw input becomes a valid instance. At most one active contract per
/// descriptor; the factory names are fixed by convention and recorded here
/// so downstream consumers never hardcode them.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ValidationContract {
    /// Value-returning factory; the primary contract.
    pub try_factory: String,

    /// Panicking convenience layered on top of `try_factory`.
    pub panicking_factory: String,

    /// Validation entry point returning the structured error.
    pub validator: String,

    /// Error-carrier type path. The carrier must expose a textual message
    /// and support equality.
    pub error_carrier: String,

    /// Empty/whitespace input yields a null result with no error.
    pub empty_yields_none: bool,

    /// The key type's `Default` value is rejected.
    pub disallow_default: bool,

    /// Optional user-supplied validation hook, run after short-circuits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_with: Option<String>,
}

impl ValidationContract {
    pub const DEFAULT_CARRIER: &'static str = "::augen::ValidationError";

    #[must_use]
    pub fn standard(null_handling: NullHandlingArgs, validate_with: Option<String>) -> Self {
        Self {
            try_factory: "try_new".to_string(),
            panicking_factory: "new".to_string(),
            validator: "validate".to_string(),
            error_carrier: Self::DEFAULT_CARRIER.to_string(),
            empty_yields_none: null_handling.empty_yields_none,
            disallow_default: null_handling.disallow_default,
            validate_with,
        }
    }
}

impl Default for ValidationContract {
    fn default() -> Self {
        Self::standard(NullHandlingArgs::default(), None)
    }
}

impl ValidateNode for ValidationContract {
    fn validate(&self) -> Diagnostics {
        let mut diags = Diagnostics::new();

        if self.error_carrier.is_empty() {
            diags.error(
                DiagnosticId::MarkerArgs,
                &self.try_factory,
                "validation contract requires an error-carrier type",
            );
        }

        diags
    }
}

impl StructuralHash for ValidationContract {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("contract");
        h.write_str(&self.try_factory);
        h.write_str(&self.panicking_factory);
        h.write_str(&self.validator);
        h.write_str(&self.error_carrier);
        h.write_bool(self.empty_yields_none);
        h.write_bool(self.disallow_default);
        self.validate_with.structural_hash(h);
    }
}
