//! Declaration scanner.
//!
//! Cheap, purely syntactic pass over a compilation unit: it finds the
//! declarations carrying a recognized configuration marker and produces a
//! minimal, diff-stable candidate record for each. No symbol resolution
//! happens here, so unrelated edits elsewhere never invalidate a
//! candidate. Malformed marker arguments pass through unresolved and
//! become a diagnostic at the builder stage.

use augen_schema::{fingerprint::Fingerprint, marker::MarkerKind};
use proc_macro2::TokenStream;
use quote::ToTokens;

///
/// Candidate
///

#[derive(Clone, Debug)]
pub struct Candidate {
    /// Module path within the unit; empty at the root.
    pub module_path: String,
    pub ident: String,
    pub marker: MarkerKind,

    /// Raw marker arguments, unresolved.
    pub args: TokenStream,

    /// Covers the declaration's own tokens only.
    pub fingerprint: Fingerprint,
}

impl Candidate {
    #[must_use]
    pub fn path(&self) -> String {
        if self.module_path.is_empty() {
            self.ident.clone()
        } else {
            format!("{}::{}", self.module_path, self.ident)
        }
    }
}

/// Match an attribute against the recognized marker set by its final path
/// segment.
#[must_use]
pub fn recognized_marker(attr: &syn::Attribute) -> Option<MarkerKind> {
    let segment = attr.path().segments.last()?;

    MarkerKind::from_attribute(&segment.ident.to_string())
}

/// Scan a whole compilation unit, recursing into inline modules.
#[must_use]
pub fn scan_unit(file: &syn::File) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    scan_items(&file.items, "", &mut candidates);

    candidates
}

fn scan_items(items: &[syn::Item], module_path: &str, out: &mut Vec<Candidate>) {
    for item in items {
        match item {
            syn::Item::Mod(module) => {
                if let Some((_, nested)) = &module.content {
                    let nested_path = join_path(module_path, &module.ident.to_string());
                    scan_items(nested, &nested_path, out);
                }
            }
            other => {
                if let Some(candidate) = scan_item(other, module_path) {
                    out.push(candidate);
                }
            }
        }
    }
}

/// Scan one item. Returns the first recognized marker; a declaration never
/// carries more than one (a second marker is caught as a builder
/// diagnostic when its arguments are resolved against the wrong shape).
#[must_use]
pub fn scan_item(item: &syn::Item, module_path: &str) -> Option<Candidate> {
    let (attrs, ident) = match item {
        syn::Item::Struct(node) => (&node.attrs, node.ident.to_string()),
        syn::Item::Enum(node) => (&node.attrs, node.ident.to_string()),
        _ => return None,
    };

    let (marker, attr) = attrs
        .iter()
        .find_map(|attr| recognized_marker(attr).map(|marker| (marker, attr)))?;

    let args = match &attr.meta {
        syn::Meta::Path(_) => TokenStream::new(),
        syn::Meta::List(list) => list.tokens.clone(),
        // Malformed for every marker; passed through for the builder to
        // reject with a stable diagnostic.
        syn::Meta::NameValue(nv) => nv.value.to_token_stream(),
    };

    let fingerprint = Fingerprint::of_text(&format!(
        "{module_path}::{ident} #[{marker}] {}",
        item.to_token_stream()
    ));

    Some(Candidate {
        module_path: module_path.to_string(),
        ident,
        marker,
        args,
        fingerprint,
    })
}

fn join_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}::{segment}")
    }
}
