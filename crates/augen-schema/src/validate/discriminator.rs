use std::collections::BTreeMap;

use crate::{
    diagnostic::{DiagnosticId, Diagnostics},
    node::Union,
};

/// Discriminators must be unique among siblings. Nested levels are checked
/// by the nested union's own validation; uniqueness is never enforced
/// across levels, only within one.
pub(crate) fn validate_sibling_discriminators(path: &str, node: &Union, diags: &mut Diagnostics) {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();

    for variant in &node.variants {
        if variant.discriminator.is_empty() {
            diags.error(
                DiagnosticId::InvalidIdent,
                path,
                format!("variant '{}' resolves to an empty discriminator", variant.ident),
            );
            continue;
        }

        if let Some(prev) = seen.insert(variant.discriminator.as_str(), variant.ident.as_str()) {
            diags.error(
                DiagnosticId::DuplicateDiscriminator,
                path,
                format!(
                    "variants '{prev}' and '{}' share discriminator '{}'",
                    variant.ident, variant.discriminator
                ),
            );
        }
    }
}
