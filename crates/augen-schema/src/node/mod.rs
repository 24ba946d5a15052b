mod complex;
mod contract;
mod def;
mod keyed;
mod member;
mod smart_enum;
mod union;

pub use complex::ComplexValueObject;
pub use contract::ValidationContract;
pub use def::{Def, Visibility};
pub use keyed::KeyedValueObject;
pub use member::{DescriptorRef, MemberComparison, MemberDescriptor, SemanticType};
pub use smart_enum::{EnumItem, KeyLit, SmartEnum};
pub use union::{Union, UnionVariant, VariantKind};

use derive_more::Display;
use serde::Serialize;

use crate::{
    diagnostic::Diagnostics,
    fingerprint::{Fingerprint, StructuralHash, StructuralHasher},
};

///
/// ValidateNode
///

pub trait ValidateNode {
    /// Validate local invariants, returning an empty aggregate when clean.
    fn validate(&self) -> Diagnostics {
        Diagnostics::new()
    }
}

///
/// DescriptorKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize)]
#[remain::sorted]
pub enum DescriptorKind {
    ComplexValueObject,
    KeyedValueObject,
    SmartEnum,
    Union,
    UnionVariant,
}

///
/// TypeDescriptor
///
/// One synthesis target. Immutable once built; equality is structural, so
/// two descriptors with identical shape are interchangeable for caching.
/// Planning and emission only ever derive new values from it.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum TypeDescriptor {
    Keyed(KeyedValueObject),
    Complex(ComplexValueObject),
    SmartEnum(SmartEnum),
    Union(Union),
}

impl TypeDescriptor {
    #[must_use]
    pub const fn def(&self) -> &Def {
        match self {
            Self::Keyed(d) => &d.def,
            Self::Complex(d) => &d.def,
            Self::SmartEnum(d) => &d.def,
            Self::Union(d) => &d.def,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> DescriptorKind {
        match self {
            Self::Keyed(_) => DescriptorKind::KeyedValueObject,
            Self::Complex(_) => DescriptorKind::ComplexValueObject,
            Self::SmartEnum(_) => DescriptorKind::SmartEnum,
            Self::Union(_) => DescriptorKind::Union,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        self.def().path()
    }

    /// Structural identity used as the planning/emission cache key.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }
}

impl ValidateNode for TypeDescriptor {
    fn validate(&self) -> Diagnostics {
        match self {
            Self::Keyed(d) => d.validate(),
            Self::Complex(d) => d.validate(),
            Self::SmartEnum(d) => d.validate(),
            Self::Union(d) => d.validate(),
        }
    }
}

impl StructuralHash for TypeDescriptor {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        match self {
            Self::Keyed(d) => d.structural_hash(h),
            Self::Complex(d) => d.structural_hash(h),
            Self::SmartEnum(d) => d.structural_hash(h),
            Self::Union(d) => d.structural_hash(h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        marker::{ArithmeticArgs, ConversionArgs, EqualityArgs, OperatorMode},
        types::ScalarKind,
    };

    fn amount() -> TypeDescriptor {
        TypeDescriptor::Keyed(KeyedValueObject {
            def: Def::new("demo", "Amount"),
            key: MemberDescriptor::scalar("value", ScalarKind::Decimal),
            contract: ValidationContract::default(),
            equality: EqualityArgs::default(),
            ordering: OperatorMode::Default,
            arithmetic: ArithmeticArgs::default(),
            conversion: ConversionArgs::default(),
            skip_parse: false,
            skip_display: false,
            default_instance: None,
        })
    }

    #[test]
    fn structurally_equal_descriptors_share_a_fingerprint() {
        assert_eq!(amount().fingerprint(), amount().fingerprint());
    }

    #[test]
    fn any_field_change_changes_the_fingerprint() {
        let base = amount();
        let mut changed = amount();
        if let TypeDescriptor::Keyed(keyed) = &mut changed {
            keyed.ordering = OperatorMode::None;
        }

        assert_ne!(base.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn serializes_for_tooling() {
        let json = serde_json::to_string(&amount()).expect("serialize");
        assert!(json.contains("\"Amount\""));
    }
}
