use crate::{
    build::{TypeResolver, def_of, last_segment_ident},
    prelude::*,
    scan::Candidate,
};

/// Build a keyed value object from a single-field tuple struct.
pub(crate) fn build(
    candidate: &Candidate,
    args: ValueObjectArgs,
    node: &syn::ItemStruct,
    _resolver: &mut TypeResolver<'_>,
) -> Result<TypeDescriptor, Diagnostics> {
    let mut diags = Diagnostics::new();
    let path = candidate.path();
    let def = def_of(candidate, &node.vis, &node.generics, &mut diags);

    let field = match &node.fields {
        syn::Fields::Unnamed(fields) if fields.unnamed.len() == 1 => Some(&fields.unnamed[0]),
        syn::Fields::Unnamed(fields) => {
            diags.error(
                DiagnosticId::AmbiguousKeyMember,
                &path,
                format!(
                    "a keyed value object wraps exactly one key, found {} fields",
                    fields.unnamed.len()
                ),
            );
            None
        }
        _ => {
            diags.error(
                DiagnosticId::UnsupportedSkeleton,
                &path,
                "a keyed value object skeleton is a tuple struct with a single field",
            );
            None
        }
    };

    // The declared field must agree with the marker's key tag; the marker
    // is the configuration of record, the field is the shape of record.
    if let Some(field) = field {
        let declared = last_segment_ident(&field.ty).and_then(|i| ScalarKind::from_type_ident(&i));

        match declared {
            Some(kind) if kind == args.key => {}
            Some(kind) => diags.error(
                DiagnosticId::MarkerArgs,
                &path,
                format!("marker declares key '{}' but the field is '{kind}'", args.key),
            ),
            None => diags.error(
                DiagnosticId::UnknownMemberType,
                &path,
                "keyed value objects wrap a scalar key",
            ),
        }
    }

    diags.clone().result()?;

    let key = MemberDescriptor::scalar("value", args.key);
    let contract = ValidationContract::standard(args.null_handling, args.validate_with.clone());

    let descriptor = TypeDescriptor::Keyed(KeyedValueObject {
        def,
        key,
        contract,
        equality: args.equality,
        ordering: args.ordering,
        arithmetic: args.arithmetic,
        conversion: args.conversion,
        skip_parse: args.skip_parse,
        skip_display: args.skip_display,
        default_instance: args.default_instance,
    });

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use crate::{build::tests::build_unit, prelude::*};

    #[test]
    fn two_field_tuple_is_ambiguous() {
        let (results, _) = build_unit(
            r#"
            #[value_object(key = "i64")]
            pub struct Pair(i64, i64);
            "#,
        );

        let diags = results[0].as_ref().expect_err("must fail");
        assert!(diags.iter().any(|d| d.id == DiagnosticId::AmbiguousKeyMember));
    }

    #[test]
    fn field_and_marker_key_must_agree() {
        let (results, _) = build_unit(
            r#"
            #[value_object(key = "i64")]
            pub struct Amount(u32);
            "#,
        );

        let diags = results[0].as_ref().expect_err("must fail");
        assert!(diags.iter().any(|d| d.id == DiagnosticId::MarkerArgs));
    }

    #[test]
    fn string_key_with_null_handling_builds() {
        let (results, _) = build_unit(
            r#"
            #[value_object(key = "string", null_handling(empty_yields_none = true))]
            pub struct ProductName(String);
            "#,
        );

        let descriptor = results[0].as_ref().expect("clean build");
        let TypeDescriptor::Keyed(keyed) = descriptor else {
            panic!("expected keyed descriptor");
        };

        assert!(keyed.contract.empty_yields_none);
        assert_eq!(keyed.key_kind(), ScalarKind::String);
    }
}
