//! Semantic descriptor builder.
//!
//! Resolves a scanned candidate against the unit's symbol information into
//! an immutable `TypeDescriptor`, or a structured failure. All failures
//! are diagnostics with stable identifiers; nothing here panics on user
//! input.

mod complex;
mod keyed;
mod resolver;
mod smart_enum;
mod symbols;
mod union;

pub use resolver::{ResolvePolicy, TypeResolver};
pub use symbols::SymbolTable;

use darling::{FromMeta, ast::NestedMeta};

use crate::{prelude::*, scan::Candidate};

/// Build one candidate's descriptor. Validation runs before the descriptor
/// is released so callers never observe an inconsistent one.
pub fn build_descriptor(
    candidate: &Candidate,
    resolver: &mut TypeResolver<'_>,
) -> Result<TypeDescriptor, Diagnostics> {
    let path = candidate.path();

    let Some(item) = resolver.symbols().get(&path).cloned() else {
        let mut diags = Diagnostics::new();
        diags.error(
            DiagnosticId::UnknownMemberType,
            &path,
            format!("declaration '{path}' disappeared between scan and build"),
        );
        return Err(diags);
    };

    let descriptor = match (candidate.marker, &item) {
        (MarkerKind::ValueObject, syn::Item::Struct(node)) => {
            let args: ValueObjectArgs = parse_args(candidate)?;
            keyed::build(candidate, args, node, resolver)?
        }
        (MarkerKind::ComplexValueObject, syn::Item::Struct(node)) => {
            let args: ComplexValueObjectArgs = parse_args(candidate)?;
            complex::build(candidate, args, node, resolver)?
        }
        (MarkerKind::SmartEnum, syn::Item::Enum(node)) => {
            let args: SmartEnumArgs = parse_args(candidate)?;
            smart_enum::build(candidate, &args, node)?
        }
        (MarkerKind::Union, syn::Item::Enum(node)) => {
            let args: UnionArgs = parse_args(candidate)?;
            union::build(candidate, &args, node, resolver)?
        }
        (marker, _) => {
            let mut diags = Diagnostics::new();
            diags.error(
                DiagnosticId::UnsupportedSkeleton,
                &path,
                format!("marker '{marker}' does not apply to this declaration shape"),
            );
            return Err(diags);
        }
    };

    augen_schema::validate::validate_descriptor(&descriptor).result()?;

    Ok(descriptor)
}

/// Parse raw marker arguments into their fixed shape. Darling failures
/// (unknown fields, unknown values, missing requireds, malformed syntax)
/// all surface as one `MarkerArgs` diagnostic.
fn parse_args<T: FromMeta>(candidate: &Candidate) -> Result<T, Diagnostics> {
    let parsed = NestedMeta::parse_meta_list(candidate.args.clone())
        .map_err(darling::Error::from)
        .and_then(|nested| T::from_list(&nested));

    parsed.map_err(|err| {
        let mut diags = Diagnostics::new();
        diags.error(
            DiagnosticId::MarkerArgs,
            candidate.path(),
            format!("invalid marker arguments: {err}"),
        );
        diags
    })
}

/// Extract the shared declaration identity.
pub(crate) fn def_of(
    candidate: &Candidate,
    vis: &syn::Visibility,
    generics: &syn::Generics,
    diags: &mut Diagnostics,
) -> Def {
    let arity = generics.params.len();
    if arity > 0 {
        diags.error(
            DiagnosticId::UnsupportedSkeleton,
            candidate.path(),
            "generic skeletons are not supported",
        );
    }

    Def {
        module_path: candidate.module_path.clone(),
        ident: candidate.ident.clone(),
        vis: match vis {
            syn::Visibility::Public(_) => Visibility::Public,
            syn::Visibility::Restricted(_) => Visibility::Crate,
            syn::Visibility::Inherited => Visibility::Private,
        },
        generic_arity: u8::try_from(arity).unwrap_or(u8::MAX),
    }
}

/// Resolve one member's declared type to its semantic tag, unwrapping
/// `Option<T>` into the nullable flag. The tag is resolved here exactly
/// once; everything downstream reads the cached result.
pub(crate) fn resolve_member_type(
    ty: &syn::Type,
    module: &str,
    owner_path: &str,
    resolver: &mut TypeResolver<'_>,
    diags: &mut Diagnostics,
) -> Option<(SemanticType, bool, String)> {
    let (inner, nullable) = unwrap_option(ty);
    let type_path = quote!(#inner).to_string().replace(' ', "");

    let Some(ident) = last_segment_ident(inner) else {
        diags.error(
            DiagnosticId::UnknownMemberType,
            owner_path,
            format!("unsupported member type '{type_path}'"),
        );
        return None;
    };

    if let Some(kind) = ScalarKind::from_type_ident(&ident) {
        return Some((SemanticType::Scalar(kind), nullable, type_path));
    }

    // User-defined member type: it must itself be a synthesis candidate so
    // its comparison strategy can recurse into its own plan.
    let resolved_path = resolver
        .symbols()
        .resolve(module, &ident)
        .map(|(path, _)| path);

    match resolved_path {
        Some(path) if resolver.candidate(&path).is_some() => match resolver.resolve(&path) {
            Ok(descriptor) => {
                let dref = DescriptorRef {
                    path,
                    fingerprint: descriptor.fingerprint(),
                    ordered: descriptor_is_ordered(&descriptor),
                    displayed: descriptor_is_displayed(&descriptor),
                };
                Some((SemanticType::Descriptor(dref), nullable, type_path))
            }
            Err(nested) => {
                diags.merge(nested);
                None
            }
        },
        _ => {
            if resolver.policy() == ResolvePolicy::AssumeSynthesized {
                // Per-declaration front ends cannot see the rest of the
                // unit; the host compiler enforces the traits this assumes.
                let dref = DescriptorRef {
                    path: ident.clone(),
                    fingerprint: Fingerprint::of_text(&ident),
                    ordered: true,
                    displayed: true,
                };
                return Some((SemanticType::Descriptor(dref), nullable, type_path));
            }

            diags.error(
                DiagnosticId::UnknownMemberType,
                owner_path,
                format!("member type '{ident}' is neither a scalar nor a synthesis candidate"),
            );
            None
        }
    }
}

// Whether a synthesized type carries a total order its consumers can lean
// on for member-sequence comparison.
fn descriptor_is_ordered(descriptor: &TypeDescriptor) -> bool {
    match descriptor {
        TypeDescriptor::Keyed(keyed) => keyed.ordering.is_emitted(),
        TypeDescriptor::Complex(complex) => !complex.skip_ordering,
        TypeDescriptor::SmartEnum(_) | TypeDescriptor::Union(_) => false,
    }
}

fn descriptor_is_displayed(descriptor: &TypeDescriptor) -> bool {
    match descriptor {
        TypeDescriptor::Keyed(keyed) => !keyed.skip_display,
        TypeDescriptor::Complex(complex) => complex.displays(),
        TypeDescriptor::SmartEnum(_) => true,
        TypeDescriptor::Union(_) => false,
    }
}

fn unwrap_option(ty: &syn::Type) -> (&syn::Type, bool) {
    if let syn::Type::Path(path) = ty
        && let Some(segment) = path.path.segments.last()
        && segment.ident == "Option"
        && let syn::PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        return (inner, true);
    }

    (ty, false)
}

pub(crate) fn last_segment_ident(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;

    pub(crate) fn build_unit(source: &str) -> (Vec<Result<TypeDescriptor, Diagnostics>>, usize) {
        let file: syn::File = syn::parse_str(source).expect("valid source");
        let symbols = SymbolTable::from_file(&file);
        let candidates = crate::scan::scan_unit(&file);
        let by_path: BTreeMap<String, crate::scan::Candidate> = candidates
            .iter()
            .map(|c| (c.path(), c.clone()))
            .collect();

        let mut resolver = TypeResolver::new(&symbols, &by_path);
        let results = candidates
            .iter()
            .map(|c| build_descriptor(c, &mut resolver))
            .collect();

        (results, candidates.len())
    }

    #[test]
    fn keyed_value_object_resolves() {
        let (results, count) = build_unit(
            r#"
            #[value_object(key = "decimal", arithmetic(mode = "default"))]
            pub struct Amount(Decimal);
            "#,
        );

        assert_eq!(count, 1);
        let descriptor = results[0].as_ref().expect("clean build");
        assert_eq!(descriptor.kind(), DescriptorKind::KeyedValueObject);
        assert_eq!(descriptor.path(), "Amount");
    }

    #[test]
    fn malformed_marker_arguments_become_a_diagnostic() {
        let (results, _) = build_unit(
            r#"
            #[value_object(key = "i64", frobnicate = 1)]
            pub struct Amount(i64);
            "#,
        );

        let diags = results[0].as_ref().expect_err("must fail");
        assert!(diags.iter().any(|d| d.id == DiagnosticId::MarkerArgs));
    }

    #[test]
    fn marker_on_wrong_shape_is_rejected() {
        let (results, _) = build_unit(
            r#"
            #[value_object(key = "i64")]
            pub enum Amount { A }
            "#,
        );

        let diags = results[0].as_ref().expect_err("must fail");
        assert!(diags.iter().any(|d| d.id == DiagnosticId::UnsupportedSkeleton));
    }

    #[test]
    fn unknown_member_type_is_a_diagnostic() {
        let (results, _) = build_unit(
            r"
            #[complex_value_object]
            pub struct Pair {
                left: Widget,
                right: Widget,
            }
            ",
        );

        let diags = results[0].as_ref().expect_err("must fail");
        assert!(diags.iter().any(|d| d.id == DiagnosticId::UnknownMemberType));
    }

    #[test]
    fn member_of_synthesized_type_links_by_reference() {
        let (results, _) = build_unit(
            r#"
            #[value_object(key = "decimal")]
            pub struct Price(Decimal);

            #[complex_value_object]
            pub struct Quote {
                bid: Price,
                ask: Price,
            }
            "#,
        );

        let quote = results[1].as_ref().expect("clean build");
        let TypeDescriptor::Complex(complex) = quote else {
            panic!("expected complex descriptor");
        };

        assert!(matches!(
            &complex.members[0].ty,
            SemanticType::Descriptor(dref) if dref.path == "Price"
        ));
    }

    #[test]
    fn descriptor_build_is_deterministic() {
        let source = r#"
            #[value_object(key = "u16", arithmetic(mode = "default_with_key_overloads"))]
            pub struct SmallCount(u16);
        "#;

        let (a, _) = build_unit(source);
        let (b, _) = build_unit(source);

        let fa = a[0].as_ref().expect("clean").fingerprint();
        let fb = b[0].as_ref().expect("clean").fingerprint();

        assert_eq!(fa, fb);
    }
}
