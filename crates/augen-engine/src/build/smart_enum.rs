use darling::{FromMeta, ast::NestedMeta};

use crate::{
    build::{def_of, last_segment_ident},
    prelude::*,
    scan::Candidate,
};

/// Build a smart enum: a closed set of named instances sharing one key
/// type, optionally with a designated invalid-instance variant.
pub(crate) fn build(
    candidate: &Candidate,
    args: &SmartEnumArgs,
    node: &syn::ItemEnum,
) -> Result<TypeDescriptor, Diagnostics> {
    let mut diags = Diagnostics::new();
    let path = candidate.path();
    let def = def_of(candidate, &node.vis, &node.generics, &mut diags);

    let mut items = Vec::new();
    let mut invalid_item = None;

    for variant in &node.variants {
        let ident = variant.ident.to_string();
        let item_args = parse_item_args(variant, &path, &mut diags);

        if item_args.invalid {
            build_invalid_item(variant, args, &path, &mut invalid_item, &mut diags);
            if item_args.key.is_some() {
                diags.error(
                    DiagnosticId::ConflictingFlags,
                    &path,
                    format!("invalid variant '{ident}' must not declare a key"),
                );
            }
            continue;
        }

        if !matches!(variant.fields, syn::Fields::Unit) {
            diags.error(
                DiagnosticId::UnsupportedSkeleton,
                &path,
                format!("instance '{ident}' must be a unit variant"),
            );
            continue;
        }

        let Some(lit) = &item_args.key else {
            diags.error(
                DiagnosticId::MarkerArgs,
                &path,
                format!("instance '{ident}' is missing #[item(key = ..)]"),
            );
            continue;
        };

        match key_lit(lit) {
            Some(key) => items.push(EnumItem { ident, key }),
            None => diags.error(
                DiagnosticId::UnsupportedEnumKey,
                &path,
                format!("instance '{ident}' declares an unsupported key literal"),
            ),
        }
    }

    diags.clone().result()?;

    Ok(TypeDescriptor::SmartEnum(SmartEnum {
        def,
        key_kind: args.key,
        validatable: args.validatable,
        items,
        invalid_item,
    }))
}

// The invalid variant carries the raw key so a lookup miss can return a
// well-defined invalid-but-non-null instance.
fn build_invalid_item(
    variant: &syn::Variant,
    args: &SmartEnumArgs,
    path: &str,
    invalid_item: &mut Option<String>,
    diags: &mut Diagnostics,
) {
    let ident = variant.ident.to_string();

    if invalid_item.is_some() {
        diags.error(
            DiagnosticId::ConflictingFlags,
            path,
            format!("'{ident}' declares a second invalid variant"),
        );
        return;
    }

    let carries_key = match &variant.fields {
        syn::Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            last_segment_ident(&fields.unnamed[0].ty)
                .and_then(|i| ScalarKind::from_type_ident(&i))
                .is_some_and(|kind| kind == args.key)
        }
        _ => false,
    };

    if carries_key {
        *invalid_item = Some(ident);
    } else {
        diags.error(
            DiagnosticId::MissingInvalidItem,
            path,
            format!("invalid variant '{ident}' must carry exactly the raw key ({})", args.key),
        );
    }
}

fn parse_item_args(variant: &syn::Variant, owner: &str, diags: &mut Diagnostics) -> ItemArgs {
    let Some(attr) = variant
        .attrs
        .iter()
        .find(|attr| attr.path().segments.last().is_some_and(|s| s.ident == "item"))
    else {
        return ItemArgs::default();
    };

    let tokens = match &attr.meta {
        syn::Meta::List(list) => list.tokens.clone(),
        _ => proc_macro2::TokenStream::new(),
    };

    NestedMeta::parse_meta_list(tokens)
        .map_err(darling::Error::from)
        .and_then(|nested| ItemArgs::from_list(&nested))
        .unwrap_or_else(|err| {
            diags.error(
                DiagnosticId::MarkerArgs,
                owner,
                format!("invalid item arguments: {err}"),
            );
            ItemArgs::default()
        })
}

fn key_lit(lit: &syn::Lit) -> Option<KeyLit> {
    match lit {
        syn::Lit::Str(value) => Some(KeyLit::Str(value.value())),
        syn::Lit::Char(value) => Some(KeyLit::Char(value.value())),
        syn::Lit::Bool(value) => Some(KeyLit::Bool(value.value())),
        syn::Lit::Int(value) => value.base10_parse::<i128>().ok().map(KeyLit::Int),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::{build::tests::build_unit, prelude::*};

    #[test]
    fn closed_instance_set_resolves_in_order() {
        let (results, _) = build_unit(
            r#"
            #[smart_enum(key = "string")]
            pub enum Currency {
                #[item(key = "CHF")]
                Chf,
                #[item(key = "EUR")]
                Eur,
            }
            "#,
        );

        let TypeDescriptor::SmartEnum(node) = results[0].as_ref().expect("clean build") else {
            panic!("expected smart enum");
        };

        assert_eq!(node.items.len(), 2);
        assert_eq!(node.items[0].ident, "Chf");
        assert!(matches!(&node.items[0].key, KeyLit::Str(k) if k == "CHF"));
    }

    #[test]
    fn validatable_enum_requires_a_key_carrying_invalid_variant() {
        let (results, _) = build_unit(
            r#"
            #[smart_enum(key = "i32", validatable)]
            pub enum Level {
                #[item(key = 1)]
                Low,
                #[item(invalid)]
                Unknown(i32),
            }
            "#,
        );

        let TypeDescriptor::SmartEnum(node) = results[0].as_ref().expect("clean build") else {
            panic!("expected smart enum");
        };

        assert_eq!(node.invalid_item.as_deref(), Some("Unknown"));
        assert!(node.validatable);
    }

    #[test]
    fn invalid_variant_with_wrong_payload_is_rejected() {
        let (results, _) = build_unit(
            r#"
            #[smart_enum(key = "i32", validatable)]
            pub enum Level {
                #[item(key = 1)]
                Low,
                #[item(invalid)]
                Unknown(String),
            }
            "#,
        );

        let diags = results[0].as_ref().expect_err("must fail");
        assert!(diags.iter().any(|d| d.id == DiagnosticId::MissingInvalidItem));
    }

    #[test]
    fn duplicate_keys_fail_the_build() {
        let (results, _) = build_unit(
            r#"
            #[smart_enum(key = "i32")]
            pub enum Level {
                #[item(key = 1)]
                Low,
                #[item(key = 1)]
                High,
            }
            "#,
        );

        let diags = results[0].as_ref().expect_err("must fail");
        assert!(diags.iter().any(|d| d.id == DiagnosticId::DuplicateEnumKey));
    }
}
