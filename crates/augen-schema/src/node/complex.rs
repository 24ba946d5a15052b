use serde::Serialize;

use crate::{
    MAX_MEMBERS,
    fingerprint::{StructuralHash, StructuralHasher},
    marker::StringComparison,
    prelude::*,
};

///
/// ComplexValueObject
///
/// A value type composed of multiple independently-typed members, compared
/// member-by-member in declaration order. Cross-member validation hooks are
/// recorded as a single composite contract.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ComplexValueObject {
    pub def: Def,
    pub members: Vec<MemberDescriptor>,
    pub contract: ValidationContract,

    /// Default comparison mode for string members without an override.
    pub string_comparison: StringComparison,

    pub skip_ordering: bool,
    pub skip_display: bool,
}

impl ComplexValueObject {
    #[must_use]
    pub fn member(&self, ident: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.ident == ident)
    }

    /// Whether default string formatting can be emitted: not skipped, and
    /// every member type formats.
    #[must_use]
    pub fn displays(&self) -> bool {
        !self.skip_display
            && self.members.iter().all(|member| match &member.ty {
                SemanticType::Scalar(_) => true,
                SemanticType::Descriptor(dref) => dref.displayed,
            })
    }
}

impl ValidateNode for ComplexValueObject {
    fn validate(&self) -> Diagnostics {
        let mut diags = self.def.validate();
        diags.merge(self.contract.validate());

        let path = self.def.path();

        if self.members.is_empty() {
            diags.error(
                DiagnosticId::EmptyMemberList,
                &path,
                "complex value object requires at least one member",
            );
        }

        if self.members.len() > MAX_MEMBERS {
            diags.error(
                DiagnosticId::MarkerArgs,
                &path,
                format!("member count exceeds maximum of {MAX_MEMBERS}"),
            );
        }

        for member in &self.members {
            diags.merge(member.validate());
        }

        crate::validate::members::validate_unique_members(&path, &self.members, &mut diags);

        diags
    }
}

impl StructuralHash for ComplexValueObject {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("complex");
        self.def.structural_hash(h);
        self.members.structural_hash(h);
        self.contract.structural_hash(h);
        self.string_comparison.structural_hash(h);
        h.write_bool(self.skip_ordering);
        h.write_bool(self.skip_display);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> ComplexValueObject {
        ComplexValueObject {
            def: Def::new("demo", "Range"),
            members: vec![
                MemberDescriptor::scalar("lower", ScalarKind::Decimal),
                MemberDescriptor::scalar("upper", ScalarKind::Decimal),
            ],
            contract: ValidationContract::default(),
            string_comparison: StringComparison::Ordinal,
            skip_ordering: false,
            skip_display: false,
        }
    }

    #[test]
    fn well_formed_descriptor_is_clean() {
        assert!(range().validate().is_empty());
    }

    #[test]
    fn duplicate_member_is_a_hard_failure() {
        let mut vo = range();
        vo.members.push(MemberDescriptor::scalar("lower", ScalarKind::Decimal));

        let diags = vo.validate();
        assert!(diags.iter().any(|d| d.id == DiagnosticId::DuplicateMember));
    }

    #[test]
    fn empty_member_list_is_rejected() {
        let mut vo = range();
        vo.members.clear();

        let diags = vo.validate();
        assert!(diags.iter().any(|d| d.id == DiagnosticId::EmptyMemberList));
    }
}
