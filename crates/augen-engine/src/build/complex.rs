use darling::{FromMeta, ast::NestedMeta};

use crate::{
    build::{TypeResolver, def_of, resolve_member_type},
    prelude::*,
    scan::Candidate,
};

/// Build a complex value object from a named-field struct. Members resolve
/// in declaration order; cross-member validation hooks become the single
/// composite contract.
pub(crate) fn build(
    candidate: &Candidate,
    args: ComplexValueObjectArgs,
    node: &syn::ItemStruct,
    resolver: &mut TypeResolver<'_>,
) -> Result<TypeDescriptor, Diagnostics> {
    let mut diags = Diagnostics::new();
    let path = candidate.path();
    let def = def_of(candidate, &node.vis, &node.generics, &mut diags);

    let syn::Fields::Named(fields) = &node.fields else {
        diags.error(
            DiagnosticId::UnsupportedSkeleton,
            &path,
            "a complex value object skeleton is a struct with named fields",
        );
        return Err(diags);
    };

    let mut members = Vec::with_capacity(fields.named.len());

    for field in &fields.named {
        let ident = field
            .ident
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let member_args = parse_member_args(field, &path, &mut diags);
        let comparison = resolve_comparison_override(&ident, &member_args, &path, &mut diags);

        let Some((ty, nullable, type_path)) = resolve_member_type(
            &field.ty,
            &candidate.module_path,
            &path,
            resolver,
            &mut diags,
        ) else {
            continue;
        };

        members.push(MemberDescriptor {
            ident,
            ty,
            type_path,
            nullable,
            comparison,
        });
    }

    diags.clone().result()?;

    let contract = ValidationContract::standard(NullHandlingArgs::default(), args.validate_with);

    Ok(TypeDescriptor::Complex(ComplexValueObject {
        def,
        members,
        contract,
        string_comparison: args.string_comparison,
        skip_ordering: args.skip_ordering,
        skip_display: args.skip_display,
    }))
}

fn parse_member_args(field: &syn::Field, owner: &str, diags: &mut Diagnostics) -> MemberArgs {
    let Some(attr) = field
        .attrs
        .iter()
        .find(|attr| attr.path().segments.last().is_some_and(|s| s.ident == "member"))
    else {
        return MemberArgs::default();
    };

    let tokens = match &attr.meta {
        syn::Meta::List(list) => list.tokens.clone(),
        _ => proc_macro2::TokenStream::new(),
    };

    NestedMeta::parse_meta_list(tokens)
        .map_err(darling::Error::from)
        .and_then(|nested| MemberArgs::from_list(&nested))
        .unwrap_or_else(|err| {
            diags.error(
                DiagnosticId::MarkerArgs,
                owner,
                format!("invalid member arguments: {err}"),
            );
            MemberArgs::default()
        })
}

/// A comparer path is more specific than a named mode; when both are
/// declared the comparer wins and the redundancy is surfaced as a warning.
fn resolve_comparison_override(
    member: &str,
    args: &MemberArgs,
    owner: &str,
    diags: &mut Diagnostics,
) -> Option<MemberComparison> {
    match (&args.compare_with, args.comparison) {
        (Some(comparer), Some(_)) => {
            diags.add(Diagnostic::warning(
                DiagnosticId::ConflictingFlags,
                owner,
                format!(
                    "member '{member}' declares both a comparison mode and a comparer; the comparer wins"
                ),
            ));
            Some(MemberComparison::Comparer(comparer.clone()))
        }
        (Some(comparer), None) => Some(MemberComparison::Comparer(comparer.clone())),
        (None, Some(mode)) => Some(MemberComparison::Mode(mode)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::{build::tests::build_unit, prelude::*};

    #[test]
    fn members_keep_declaration_order() {
        let (results, _) = build_unit(
            r"
            #[complex_value_object]
            pub struct Boundary {
                lower: Decimal,
                upper: Decimal,
                label: Option<String>,
            }
            ",
        );

        let TypeDescriptor::Complex(complex) = results[0].as_ref().expect("clean build") else {
            panic!("expected complex descriptor");
        };

        let idents: Vec<&str> = complex.members.iter().map(|m| m.ident.as_str()).collect();
        assert_eq!(idents, ["lower", "upper", "label"]);
        assert!(complex.members[2].nullable);
    }

    #[test]
    fn comparer_beats_mode_with_a_warning() {
        let (results, _) = build_unit(
            r#"
            #[complex_value_object]
            pub struct Tag {
                #[member(comparison = "ordinal_ignore_case", compare_with = "FoldComparer")]
                name: String,
            }
            "#,
        );

        let TypeDescriptor::Complex(complex) = results[0].as_ref().expect("warnings only") else {
            panic!("expected complex descriptor");
        };

        assert!(matches!(
            &complex.members[0].comparison,
            Some(MemberComparison::Comparer(path)) if path == "FoldComparer"
        ));
    }

    #[test]
    fn ignore_case_mode_is_recorded() {
        let (results, _) = build_unit(
            r#"
            #[complex_value_object]
            pub struct Tag {
                #[member(comparison = "ordinal_ignore_case")]
                name: String,
            }
            "#,
        );

        let TypeDescriptor::Complex(complex) = results[0].as_ref().expect("clean build") else {
            panic!("expected complex descriptor");
        };

        assert!(matches!(
            &complex.members[0].comparison,
            Some(MemberComparison::Mode(StringComparison::OrdinalIgnoreCase))
        ));
    }
}
