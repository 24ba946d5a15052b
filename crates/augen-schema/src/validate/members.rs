use std::collections::BTreeMap;

use crate::{
    diagnostic::{DiagnosticId, Diagnostics},
    node::{MemberDescriptor, SmartEnum},
};

/// Duplicate member names are a hard failure: member order is the identity
/// of equality, hashing, and ordering output.
pub(crate) fn validate_unique_members(
    path: &str,
    members: &[MemberDescriptor],
    diags: &mut Diagnostics,
) {
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();

    for (index, member) in members.iter().enumerate() {
        if let Some(prev) = seen.insert(member.ident.as_str(), index) {
            diags.error(
                DiagnosticId::DuplicateMember,
                path,
                format!(
                    "duplicate member '{}' (positions {prev} and {index})",
                    member.ident
                ),
            );
        }
    }
}

/// Item keys must be unique and fit the declared key tag; item idents must
/// be unique; a declared invalid item must name a real variant.
pub(crate) fn validate_enum_items(path: &str, node: &SmartEnum, diags: &mut Diagnostics) {
    let mut seen_idents: BTreeMap<&str, usize> = BTreeMap::new();
    let mut seen_keys: Vec<&crate::node::KeyLit> = Vec::new();

    for (index, item) in node.items.iter().enumerate() {
        if let Some(prev) = seen_idents.insert(item.ident.as_str(), index) {
            diags.error(
                DiagnosticId::DuplicateMember,
                path,
                format!("duplicate instance '{}' (positions {prev} and {index})", item.ident),
            );
        }

        if !item.key.matches(node.key_kind) {
            diags.error(
                DiagnosticId::UnsupportedEnumKey,
                path,
                format!(
                    "instance '{}' declares a {} key but the enum key type is '{}'",
                    item.ident,
                    item.key.kind_name(),
                    node.key_kind
                ),
            );
        }

        if seen_keys.contains(&&item.key) {
            diags.error(
                DiagnosticId::DuplicateEnumKey,
                path,
                format!("instance '{}' reuses an already-assigned key", item.ident),
            );
        } else {
            seen_keys.push(&item.key);
        }
    }

    if let Some(invalid) = &node.invalid_item {
        let names_item = node.items.iter().any(|item| &item.ident == invalid);
        if names_item {
            diags.error(
                DiagnosticId::ConflictingFlags,
                path,
                format!("invalid item '{invalid}' must not also be a keyed instance"),
            );
        }
    }
}
