//! Staged descriptor validation.
//!
//! Phase 1 checks each node's local invariants; phase 2 enforces rules that
//! need the whole descriptor set (duplicate paths across one compilation
//! unit). Both phases aggregate diagnostics instead of failing fast so a
//! single pass reports everything.

pub mod discriminator;
pub mod members;
pub mod naming;

use std::collections::BTreeMap;

use crate::{
    diagnostic::{DiagnosticId, Diagnostics},
    node::{TypeDescriptor, ValidateNode},
};

/// Validate one descriptor in isolation.
#[must_use]
pub fn validate_descriptor(descriptor: &TypeDescriptor) -> Diagnostics {
    descriptor.validate()
}

/// Validate a resolved descriptor set. Per-descriptor failures stay
/// attached to their own path; unrelated descriptors are unaffected.
#[must_use]
pub fn validate_unit(descriptors: &[TypeDescriptor]) -> Diagnostics {
    let mut diags = Diagnostics::new();

    for descriptor in descriptors {
        diags.merge(descriptor.validate());
    }

    validate_unique_paths(descriptors, &mut diags);

    diags
}

// Two declarations resolving to the same path would race for one cache
// slot and one registry entry.
fn validate_unique_paths(descriptors: &[TypeDescriptor], diags: &mut Diagnostics) {
    let mut seen: BTreeMap<String, &'static str> = BTreeMap::new();

    for descriptor in descriptors {
        let path = descriptor.path();
        let kind = match descriptor.kind() {
            crate::node::DescriptorKind::KeyedValueObject => "keyed value object",
            crate::node::DescriptorKind::ComplexValueObject => "complex value object",
            crate::node::DescriptorKind::SmartEnum => "smart enum",
            crate::node::DescriptorKind::Union => "union",
            crate::node::DescriptorKind::UnionVariant => "union variant",
        };

        if let Some(prev) = seen.insert(path.clone(), kind) {
            diags.error(
                DiagnosticId::DuplicateMember,
                &path,
                format!("'{path}' declared more than once ({prev} and {kind})"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        marker::{ArithmeticArgs, ConversionArgs, EqualityArgs, OperatorMode},
        node::{Def, KeyedValueObject, MemberDescriptor, ValidationContract},
        types::ScalarKind,
    };

    fn keyed(ident: &str) -> TypeDescriptor {
        TypeDescriptor::Keyed(KeyedValueObject {
            def: Def::new("demo", ident),
            key: MemberDescriptor::scalar("value", ScalarKind::I64),
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
    fn duplicate_paths_across_a_unit_are_rejected() {
        let unit = [keyed("Amount"), keyed("Amount")];
        let diags = validate_unit(&unit);

        assert!(diags.has_errors());
    }

    #[test]
    fn distinct_paths_are_clean() {
        let unit = [keyed("Amount"), keyed("Count")];
        assert!(validate_unit(&unit).is_empty());
    }
}
