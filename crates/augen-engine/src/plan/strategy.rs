use serde::Serialize;

use crate::prelude::*;

///
/// ComparisonStrategy
///
/// The resolved comparison/equality/hash strategy for one member. Every
/// strategy is lawful: `eq` agrees with `cmp == Equal` and equal values
/// hash identically. Floats use bit equality and `total_cmp`, which makes
/// them lawfully `Eq`/`Ord` at the cost of distinguishing `-0.0`/`+0.0`.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ComparisonStrategy {
    /// The member type's own `Eq`/`Ord`/`Hash` (ints, decimal, bool, char).
    Natural,

    /// Bitwise equality/hashing, `total_cmp` ordering.
    FloatBits,

    /// Ordinal-style exact comparison for text.
    Ordinal,

    /// ASCII case-folded text comparison.
    OrdinalIgnoreCase,

    /// Another synthesized type; comparison recurses into that member's
    /// own plan through its generated impls.
    Nested { path: String },

    /// Declared `MemberComparer` override.
    Comparer { path: String },
}

impl ComparisonStrategy {
    /// Whether emission can use the plain `==`/`cmp`/`hash` surface.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        matches!(self, Self::Natural | Self::Ordinal | Self::Nested { .. })
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Natural => "natural".to_string(),
            Self::FloatBits => "float-bits".to_string(),
            Self::Ordinal => "ordinal".to_string(),
            Self::OrdinalIgnoreCase => "ordinal-ignore-case".to_string(),
            Self::Nested { path } => format!("nested({path})"),
            Self::Comparer { path } => format!("comparer({path})"),
        }
    }
}

/// Resolve one member's strategy: an explicit override wins; otherwise the
/// default per semantic tag.
#[must_use]
pub fn resolve_member_strategy(
    member: &MemberDescriptor,
    default_string: StringComparison,
) -> ComparisonStrategy {
    if let Some(comparison) = &member.comparison {
        return match comparison {
            MemberComparison::Comparer(path) => ComparisonStrategy::Comparer { path: path.clone() },
            MemberComparison::Mode(StringComparison::Ordinal) => ComparisonStrategy::Ordinal,
            MemberComparison::Mode(StringComparison::OrdinalIgnoreCase) => {
                ComparisonStrategy::OrdinalIgnoreCase
            }
        };
    }

    match &member.ty {
        SemanticType::Scalar(kind) if kind.is_float() => ComparisonStrategy::FloatBits,
        SemanticType::Scalar(kind) if kind.is_text() => match default_string {
            StringComparison::Ordinal => ComparisonStrategy::Ordinal,
            StringComparison::OrdinalIgnoreCase => ComparisonStrategy::OrdinalIgnoreCase,
        },
        SemanticType::Scalar(_) => ComparisonStrategy::Natural,
        SemanticType::Descriptor(dref) => ComparisonStrategy::Nested {
            path: dref.path.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_semantic_tag() {
        let text = MemberDescriptor::scalar("name", ScalarKind::String);
        let count = MemberDescriptor::scalar("count", ScalarKind::U32);
        let ratio = MemberDescriptor::scalar("ratio", ScalarKind::F64);

        assert_eq!(
            resolve_member_strategy(&text, StringComparison::Ordinal),
            ComparisonStrategy::Ordinal
        );
        assert_eq!(
            resolve_member_strategy(&text, StringComparison::OrdinalIgnoreCase),
            ComparisonStrategy::OrdinalIgnoreCase
        );
        assert_eq!(
            resolve_member_strategy(&count, StringComparison::Ordinal),
            ComparisonStrategy::Natural
        );
        assert_eq!(
            resolve_member_strategy(&ratio, StringComparison::Ordinal),
            ComparisonStrategy::FloatBits
        );
    }

    #[test]
    fn explicit_override_beats_the_type_default() {
        let mut text = MemberDescriptor::scalar("name", ScalarKind::String);
        text.comparison = Some(MemberComparison::Mode(StringComparison::Ordinal));

        assert_eq!(
            resolve_member_strategy(&text, StringComparison::OrdinalIgnoreCase),
            ComparisonStrategy::Ordinal
        );
    }

    #[test]
    fn comparer_is_the_most_specific_override() {
        let mut count = MemberDescriptor::scalar("count", ScalarKind::U32);
        count.comparison = Some(MemberComparison::Comparer("demo::Modulo".into()));

        assert_eq!(
            resolve_member_strategy(&count, StringComparison::Ordinal),
            ComparisonStrategy::Comparer {
                path: "demo::Modulo".into()
            }
        );
    }
}
