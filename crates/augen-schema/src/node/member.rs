use serde::Serialize;

use crate::{
    fingerprint::{Fingerprint, StructuralHash, StructuralHasher},
    marker::StringComparison,
    prelude::*,
    types::ScalarKind,
};

///
/// DescriptorRef
///
/// Directed edge to another synthesized descriptor. Edges form a DAG;
/// cycles are rejected at build time (`RecursiveDescriptor`), so holding
/// path + fingerprint is enough to key into the resolved descriptor set.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DescriptorRef {
    pub path: String,
    pub fingerprint: Fingerprint,

    /// Whether the referenced descriptor emits a total order; ordering
    /// over a member that does not is rejected at planning time.
    pub ordered: bool,

    /// Whether the referenced descriptor emits `Display`; a containing
    /// type's default formatting drops out when a member has none.
    pub displayed: bool,
}

impl StructuralHash for DescriptorRef {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("ref");
        h.write_str(&self.path);
        h.write_u64(self.fingerprint.as_u64());
        h.write_bool(self.ordered);
        h.write_bool(self.displayed);
    }
}

///
/// SemanticType
///
/// Resolved type tag of one member: either a builtin scalar or another
/// synthesized value type.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum SemanticType {
    Scalar(ScalarKind),
    Descriptor(DescriptorRef),
}

impl SemanticType {
    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(*kind),
            Self::Descriptor(_) => None,
        }
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Scalar(kind) if kind.is_text())
    }
}

impl StructuralHash for SemanticType {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        match self {
            Self::Scalar(kind) => {
                h.write_tag("scalar");
                kind.structural_hash(h);
            }
            Self::Descriptor(dref) => {
                h.write_tag("descriptor");
                dref.structural_hash(h);
            }
        }
    }
}

///
/// MemberComparison
///
/// Declared comparison override for one member. A comparer path is the
/// most specific form and wins over a named mode when both are declared.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum MemberComparison {
    Mode(StringComparison),
    Comparer(String),
}

impl StructuralHash for MemberComparison {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        match self {
            Self::Mode(mode) => {
                h.write_tag("mode");
                mode.structural_hash(h);
            }
            Self::Comparer(path) => {
                h.write_tag("comparer");
                h.write_str(path);
            }
        }
    }
}

///
/// MemberDescriptor
///
/// One contributing member, in declaration order. The semantic tag is
/// resolved exactly once, at build time.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MemberDescriptor {
    pub ident: String,
    pub ty: SemanticType,

    /// Declared type path as written in the skeleton, kept for emission.
    pub type_path: String,

    /// `Option<T>` members.
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<MemberComparison>,
}

impl MemberDescriptor {
    #[must_use]
    pub fn scalar(ident: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            ident: ident.into(),
            type_path: kind.keyword().to_string(),
            ty: SemanticType::Scalar(kind),
            nullable: false,
            comparison: None,
        }
    }
}

impl ValidateNode for MemberDescriptor {
    fn validate(&self) -> Diagnostics {
        let mut diags = Diagnostics::new();

        if let Err(msg) = crate::validate::naming::validate_ident(&self.ident) {
            diags.error(DiagnosticId::InvalidIdent, &self.ident, msg);
        }

        // A named string mode on a non-text member is a configuration error.
        if matches!(self.comparison, Some(MemberComparison::Mode(_))) && !self.ty.is_text() {
            diags.error(
                DiagnosticId::ConflictingFlags,
                &self.ident,
                format!(
                    "string comparison override declared on non-string member '{}'",
                    self.ident
                ),
            );
        }

        diags
    }
}

impl StructuralHash for MemberDescriptor {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("member");
        h.write_str(&self.ident);
        self.ty.structural_hash(h);
        h.write_str(&self.type_path);
        h.write_bool(self.nullable);
        self.comparison.structural_hash(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_mode_on_numeric_member_is_rejected() {
        let mut member = MemberDescriptor::scalar("count", ScalarKind::U32);
        member.comparison = Some(MemberComparison::Mode(StringComparison::OrdinalIgnoreCase));

        assert!(member.validate().has_errors());
    }

    #[test]
    fn comparer_override_is_allowed_on_any_member() {
        let mut member = MemberDescriptor::scalar("count", ScalarKind::U32);
        member.comparison = Some(MemberComparison::Comparer("demo::ModuloComparer".into()));

        assert!(member.validate().is_empty());
    }
}
