use serde::Serialize;

use crate::{
    fingerprint::{StructuralHash, StructuralHasher},
    marker::{ArithmeticArgs, ConversionArgs, EqualityArgs, OperatorMode},
    prelude::*,
};

///
/// KeyedValueObject
///
/// A value type wrapping exactly one underlying key value with validation.
/// The key member's semantic tag gates which operator families may be
/// requested.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct KeyedValueObject {
    pub def: Def,
    pub key: MemberDescriptor,
    pub contract: ValidationContract,

    pub equality: EqualityArgs,
    pub ordering: OperatorMode,
    pub arithmetic: ArithmeticArgs,
    pub conversion: ConversionArgs,

    pub skip_parse: bool,
    pub skip_display: bool,

    /// Optional well-known constant (e.g. `ZERO`) emitted on the type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_instance: Option<String>,
}

impl KeyedValueObject {
    /// The key's scalar tag. Keyed value objects always wrap a scalar;
    /// wrapping another synthesized type is a builder diagnostic.
    #[must_use]
    pub fn key_kind(&self) -> ScalarKind {
        self.key
            .ty
            .scalar()
            .expect("keyed value object key is always scalar")
    }
}

impl ValidateNode for KeyedValueObject {
    fn validate(&self) -> Diagnostics {
        let mut diags = self.def.validate();
        diags.merge(self.key.validate());
        diags.merge(self.contract.validate());

        let kind = self.key_kind();
        let path = self.def.path();

        if self.arithmetic.any_requested() && !kind.supports_arithmetic() {
            diags.error(
                DiagnosticId::UnsupportedOperator,
                &path,
                format!("arithmetic generation requested on non-numeric key '{kind}'"),
            );
        }

        if self.ordering.is_emitted() && !kind.supports_ord() {
            diags.error(
                DiagnosticId::UnsupportedOperator,
                &path,
                format!("ordering generation requested on unordered key '{kind}'"),
            );
        }

        if self.contract.disallow_default && !kind.supports_default() {
            diags.error(
                DiagnosticId::ConflictingFlags,
                &path,
                format!("disallow_default requested but key '{kind}' has no default value"),
            );
        }

        // Empty-input short-circuiting only means something for text keys.
        if self.contract.empty_yields_none && !kind.is_text() {
            diags.error(
                DiagnosticId::ConflictingFlags,
                &path,
                format!("empty_yields_none requires a string key, found '{kind}'"),
            );
        }

        diags
    }
}

impl StructuralHash for KeyedValueObject {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("keyed");
        self.def.structural_hash(h);
        self.key.structural_hash(h);
        self.contract.structural_hash(h);
        self.equality.structural_hash(h);
        self.ordering.structural_hash(h);
        self.arithmetic.structural_hash(h);
        self.conversion.structural_hash(h);
        h.write_bool(self.skip_parse);
        h.write_bool(self.skip_display);
        self.default_instance.structural_hash(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::NullHandlingArgs;

    fn descriptor(kind: ScalarKind) -> KeyedValueObject {
        KeyedValueObject {
            def: Def::new("demo", "Amount"),
            key: MemberDescriptor::scalar("value", kind),
            contract: ValidationContract::default(),
            equality: EqualityArgs::default(),
            ordering: OperatorMode::Default,
            arithmetic: ArithmeticArgs::default(),
            conversion: ConversionArgs::default(),
            skip_parse: false,
            skip_display: false,
            default_instance: None,
        }
    }

    #[test]
    fn arithmetic_on_string_key_is_a_diagnostic() {
        let mut vo = descriptor(ScalarKind::String);
        vo.arithmetic.mode = Some(OperatorMode::Default);

        let diags = vo.validate();
        assert!(diags.has_errors());
        assert!(diags.iter().any(|d| d.id == DiagnosticId::UnsupportedOperator));
    }

    #[test]
    fn empty_yields_none_requires_text_key() {
        let mut vo = descriptor(ScalarKind::I64);
        vo.contract = ValidationContract::standard(
            NullHandlingArgs {
                empty_yields_none: true,
                disallow_default: false,
            },
            None,
        );

        assert!(vo.validate().has_errors());
    }

    #[test]
    fn numeric_key_with_arithmetic_is_clean() {
        let mut vo = descriptor(ScalarKind::Decimal);
        vo.arithmetic.mode = Some(OperatorMode::Default);

        assert!(vo.validate().is_empty());
    }
}
