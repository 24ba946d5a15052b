use serde::Serialize;

use crate::{
    MAX_UNION_DEPTH,
    fingerprint::{StructuralHash, StructuralHasher},
    marker::{DiscriminatorNaming, StringComparison, SwitchMapMode},
    prelude::*,
};

///
/// VariantKind
///
/// Leaf variants carry a concrete payload type; internal nodes embed the
/// nested union's full descriptor (built parent-before-child through the
/// resolver), so a structural change in a child always changes the parent's
/// fingerprint too.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum VariantKind {
    Leaf,
    Nested(Box<Union>),
}

impl VariantKind {
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }
}

impl StructuralHash for VariantKind {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        match self {
            Self::Leaf => h.write_tag("leaf"),
            Self::Nested(union) => {
                h.write_tag("nested");
                union.structural_hash(h);
            }
        }
    }
}

///
/// UnionVariant
///
/// One case of a closed hierarchy: discriminator, payload shape, and its
/// position in the tree.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct UnionVariant {
    pub ident: String,
    pub discriminator: String,

    /// Payload type path as declared; the single constructor parameter.
    pub payload_path: String,

    pub kind: VariantKind,
}

impl UnionVariant {
    #[must_use]
    pub const fn nested(&self) -> Option<&Union> {
        match &self.kind {
            VariantKind::Nested(union) => Some(union),
            VariantKind::Leaf => None,
        }
    }
}

impl StructuralHash for UnionVariant {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("variant");
        h.write_str(&self.ident);
        h.write_str(&self.discriminator);
        h.write_str(&self.payload_path);
        self.kind.structural_hash(h);
    }
}

///
/// Union
///
/// A closed hierarchy of variant types. The variant set is sealed at
/// synthesis time; discriminators are assigned in declaration order through
/// the configured naming mode unless explicitly overridden, and must be
/// unique among siblings.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Union {
    pub def: Def,
    pub naming: DiscriminatorNaming,
    pub switch_map: SwitchMapMode,
    pub string_comparison: StringComparison,
    pub variants: Vec<UnionVariant>,
}

impl Union {
    /// Depth of the variant tree, 1 for a flat union.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .variants
            .iter()
            .filter_map(UnionVariant::nested)
            .map(Self::depth)
            .max()
            .unwrap_or(0)
    }

    /// Leaf count across the whole tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.variants
            .iter()
            .map(|v| v.nested().map_or(1, Self::leaf_count))
            .sum()
    }
}

impl ValidateNode for Union {
    fn validate(&self) -> Diagnostics {
        let mut diags = self.def.validate();
        let path = self.def.path();

        if self.variants.is_empty() {
            diags.error(
                DiagnosticId::EmptyMemberList,
                &path,
                "union requires at least one variant",
            );
        }

        if self.depth() > MAX_UNION_DEPTH {
            diags.error(
                DiagnosticId::UnionTooDeep,
                &path,
                format!("variant tree exceeds maximum depth of {MAX_UNION_DEPTH}"),
            );
        }

        crate::validate::discriminator::validate_sibling_discriminators(&path, self, &mut diags);

        // Nested trees validate recursively; their diagnostics surface on
        // the parent path.
        for variant in &self.variants {
            if let Some(nested) = variant.nested() {
                diags.merge(nested.validate());
            }
        }

        diags
    }
}

impl StructuralHash for Union {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("union");
        self.def.structural_hash(h);
        self.naming.structural_hash(h);
        self.switch_map.structural_hash(h);
        self.string_comparison.structural_hash(h);
        self.variants.structural_hash(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(ident: &str, disc: &str, payload: &str) -> UnionVariant {
        UnionVariant {
            ident: ident.into(),
            discriminator: disc.into(),
            payload_path: payload.into(),
            kind: VariantKind::Leaf,
        }
    }

    fn shape() -> Union {
        Union {
            def: Def::new("demo", "Shape"),
            naming: DiscriminatorNaming::VariantName,
            switch_map: SwitchMapMode::Both,
            string_comparison: StringComparison::Ordinal,
            variants: vec![
                leaf("Circle", "Circle", "Circle"),
                leaf("Square", "Square", "Square"),
            ],
        }
    }

    #[test]
    fn sibling_discriminators_must_be_unique() {
        let mut union = shape();
        union.variants.push(leaf("Round", "Circle", "Round"));

        let diags = union.validate();
        assert!(diags.iter().any(|d| d.id == DiagnosticId::DuplicateDiscriminator));
    }

    #[test]
    fn nested_trees_count_leaves_across_levels() {
        let mut union = shape();
        let mut inner = shape();
        inner.def = Def::new("demo", "Rounded");
        union.variants.push(UnionVariant {
            ident: "Rounded".into(),
            discriminator: "Rounded".into(),
            payload_path: "Rounded".into(),
            kind: VariantKind::Nested(Box::new(inner)),
        });

        assert_eq!(union.leaf_count(), 4);
        assert_eq!(union.depth(), 2);
        assert!(union.validate().is_empty());
    }
}
