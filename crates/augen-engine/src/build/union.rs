use convert_case::{Case, Casing};
use darling::{FromMeta, ast::NestedMeta};

use crate::{
    build::{TypeResolver, def_of},
    prelude::*,
    scan::Candidate,
};

/// Build a union's variant tree. A variant whose payload type is itself a
/// union candidate becomes an internal node; the nested descriptor is
/// resolved first (parent waits on child as a data dependency) and
/// embedded, so the parent's structural identity covers the whole tree.
pub(crate) fn build(
    candidate: &Candidate,
    args: &UnionArgs,
    node: &syn::ItemEnum,
    resolver: &mut TypeResolver<'_>,
) -> Result<TypeDescriptor, Diagnostics> {
    let mut diags = Diagnostics::new();
    let path = candidate.path();
    let def = def_of(candidate, &node.vis, &node.generics, &mut diags);

    let mut variants = Vec::with_capacity(node.variants.len());

    for variant in &node.variants {
        let ident = variant.ident.to_string();

        let syn::Fields::Unnamed(fields) = &variant.fields else {
            diags.error(
                DiagnosticId::NonConcreteVariant,
                &path,
                format!("variant '{ident}' must carry exactly one payload"),
            );
            continue;
        };

        if fields.unnamed.len() != 1 {
            diags.error(
                DiagnosticId::NonConcreteVariant,
                &path,
                format!("variant '{ident}' must carry exactly one payload"),
            );
            continue;
        }

        let payload_path = crate::build::last_segment_ident(&fields.unnamed[0].ty)
            .unwrap_or_default();
        if payload_path.is_empty() {
            diags.error(
                DiagnosticId::NonConcreteVariant,
                &path,
                format!("variant '{ident}' payload must be a named type"),
            );
            continue;
        }

        let variant_args = parse_variant_args(variant, &path, &mut diags);
        let discriminator = variant_args
            .name
            .unwrap_or_else(|| apply_naming(args.discriminator_naming, &ident));

        let kind = resolve_variant_kind(
            &payload_path,
            &candidate.module_path,
            resolver,
            &mut diags,
        );

        variants.push(UnionVariant {
            ident,
            discriminator,
            payload_path,
            kind,
        });
    }

    diags.clone().result()?;

    Ok(TypeDescriptor::Union(Union {
        def,
        naming: args.discriminator_naming,
        switch_map: args.switch_map,
        string_comparison: args.string_comparison,
        variants,
    }))
}

// A payload that is itself a union candidate is an internal node; any
// other payload is a concrete leaf. Payload types outside the unit cannot
// be inspected and are trusted to be concrete.
fn resolve_variant_kind(
    payload_ident: &str,
    module: &str,
    resolver: &mut TypeResolver<'_>,
    diags: &mut Diagnostics,
) -> VariantKind {
    let Some((payload_path, _)) = resolver.symbols().resolve(module, payload_ident) else {
        return VariantKind::Leaf;
    };

    let is_union = resolver
        .candidate(&payload_path)
        .is_some_and(|c| c.marker == MarkerKind::Union);
    if !is_union {
        return VariantKind::Leaf;
    }

    match resolver.resolve(&payload_path) {
        Ok(descriptor) => match descriptor.as_ref() {
            TypeDescriptor::Union(nested) => VariantKind::Nested(Box::new(nested.clone())),
            _ => VariantKind::Leaf,
        },
        Err(nested_diags) => {
            diags.merge(nested_diags);
            VariantKind::Leaf
        }
    }
}

fn apply_naming(naming: DiscriminatorNaming, ident: &str) -> String {
    match naming {
        DiscriminatorNaming::VariantName => ident.to_string(),
        DiscriminatorNaming::SnakeCase => ident.to_case(Case::Snake),
        DiscriminatorNaming::KebabCase => ident.to_case(Case::Kebab),
    }
}

fn parse_variant_args(variant: &syn::Variant, owner: &str, diags: &mut Diagnostics) -> VariantArgs {
    let Some(attr) = variant
        .attrs
        .iter()
        .find(|attr| attr.path().segments.last().is_some_and(|s| s.ident == "variant"))
    else {
        return VariantArgs::default();
    };

    let tokens = match &attr.meta {
        syn::Meta::List(list) => list.tokens.clone(),
        _ => proc_macro2::TokenStream::new(),
    };

    NestedMeta::parse_meta_list(tokens)
        .map_err(darling::Error::from)
        .and_then(|nested| VariantArgs::from_list(&nested))
        .unwrap_or_else(|err| {
            diags.error(
                DiagnosticId::MarkerArgs,
                owner,
                format!("invalid variant arguments: {err}"),
            );
            VariantArgs::default()
        })
}
