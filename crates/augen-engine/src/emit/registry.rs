use convert_case::{Case, Casing};

use crate::{
    emit::{EmitError, type_ident},
    plan::Plan,
    prelude::*,
};

/// Metadata-registry registration: a `'static` entry with the descriptor
/// summary and monomorphic conversion functions, registered at startup and
/// reachable lazily through `HasMetadata`. Populated by this generated
/// code, never by the pipeline itself.
pub(crate) fn emit(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let def = descriptor.def();
    let ident = type_ident(def);
    let name = def.path();
    let snake = def.ident.to_case(Case::Snake);
    let fingerprint = descriptor.fingerprint().as_u64();

    let kind_ident = format_ident!("{}", descriptor.kind().to_string());
    let kind_tokens = quote!(::augen::schema::node::DescriptorKind::#kind_ident);

    let to_key_fn = format_ident!("__augen_to_key_{snake}");
    let try_from_key_fn = format_ident!("__augen_try_from_key_{snake}");
    let validate_key_fn = format_ident!("__augen_validate_key_{snake}");
    let register_fn = format_ident!("__augen_register_{snake}");

    let (key_tokens, to_key, try_from_key, validate_key) = match descriptor {
        TypeDescriptor::Keyed(keyed) => keyed_fns(plan, keyed, &ident, &name)?,
        TypeDescriptor::SmartEnum(node) => smart_enum_fns(node, &ident),
        TypeDescriptor::Complex(_) | TypeDescriptor::Union(_) => keyless_fns(&ident, &name),
    };

    Ok(quote! {
        #[doc(hidden)]
        fn #to_key_fn(
            value: &dyn ::core::any::Any,
        ) -> ::core::option::Option<::augen::KeyValue> {
            #to_key
        }

        #[doc(hidden)]
        fn #try_from_key_fn(
            key: ::augen::KeyValue,
        ) -> Result<::std::boxed::Box<dyn ::core::any::Any>, ::augen::ValidationError> {
            #try_from_key
        }

        #[doc(hidden)]
        fn #validate_key_fn(key: &::augen::KeyValue) -> Result<(), ::augen::ValidationError> {
            #validate_key
        }

        impl ::augen::registry::HasMetadata for #ident {
            fn metadata() -> &'static ::augen::registry::TypeMetadata {
                static METADATA: ::augen::registry::TypeMetadata =
                    ::augen::registry::TypeMetadata {
                        type_name: #name,
                        kind: #kind_tokens,
                        key: #key_tokens,
                        fingerprint: #fingerprint,
                        to_key: #to_key_fn,
                        try_from_key: #try_from_key_fn,
                        validate_key: #validate_key_fn,
                    };

                &METADATA
            }
        }

        #[doc(hidden)]
        #[::augen::__reexports::ctor::ctor]
        fn #register_fn() {
            ::augen::registry::register::<#ident>();
        }
    })
}

type RegistryFns = (TokenStream, TokenStream, TokenStream, TokenStream);

fn keyed_fns(
    plan: &Plan,
    keyed: &KeyedValueObject,
    ident: &proc_macro2::Ident,
    name: &str,
) -> Result<RegistryFns, EmitError> {
    let kind = keyed.key_kind();
    let key_ty = kind.as_type();
    let extract = extract_key(kind, &key_ty);

    let key_expr = if kind.supports_copy() {
        quote!(instance.0)
    } else {
        quote!(instance.0.clone())
    };

    let to_key = quote! {
        value
            .downcast_ref::<#ident>()
            .map(|instance| ::augen::KeyValue::from(#key_expr))
    };

    let empty_yields_none = plan
        .factory
        .as_ref()
        .is_some_and(|factory| factory.contract.empty_yields_none);

    let construct = if empty_yields_none {
        quote! {
            match #ident::try_new(key)? {
                Some(instance) => {
                    Ok(::std::boxed::Box::new(instance) as ::std::boxed::Box<dyn ::core::any::Any>)
                }
                None => Err(::augen::ValidationError::no_instance(#name)),
            }
        }
    } else {
        quote! {
            #ident::try_new(key)
                .map(|instance| {
                    ::std::boxed::Box::new(instance) as ::std::boxed::Box<dyn ::core::any::Any>
                })
        }
    };

    let try_from_key = quote! {
        let key: #key_ty = #extract;
        #construct
    };

    let validate_key = quote! {
        let key: #key_ty = {
            let key = key.clone();
            #extract
        };
        #ident::validate(&key)
    };

    Ok((quote!(Some(#kind)), to_key, try_from_key, validate_key))
}

fn smart_enum_fns(node: &SmartEnum, ident: &proc_macro2::Ident) -> RegistryFns {
    let kind = node.key_kind;
    let key_ty = kind.as_type();
    let extract = extract_key(kind, &key_ty);

    let to_key = quote! {
        value
            .downcast_ref::<#ident>()
            .map(|instance| ::augen::KeyValue::from(instance.key()))
    };

    let lookup_arg = if kind.is_text() {
        quote!(key.as_str())
    } else {
        quote!(key)
    };

    let try_from_key = quote! {
        let key: #key_ty = #extract;
        #ident::try_get(#lookup_arg)
            .map(|instance| {
                ::std::boxed::Box::new(instance) as ::std::boxed::Box<dyn ::core::any::Any>
            })
    };

    let validate_key = quote! {
        let key: #key_ty = {
            let key = key.clone();
            #extract
        };
        #ident::try_get(#lookup_arg).map(|_| ())
    };

    (quote!(Some(#kind)), to_key, try_from_key, validate_key)
}

// Kinds without a single key representation still register: integration
// layers can find the descriptor summary, but conversion misses.
fn keyless_fns(ident: &proc_macro2::Ident, name: &str) -> RegistryFns {
    let to_key = quote! {
        let _ = value.downcast_ref::<#ident>();
        None
    };

    let message = format!("'{name}' has no single-key representation");

    let try_from_key = quote! {
        let _ = key;
        Err(::augen::ValidationError::new(#message))
    };

    let validate_key = quote! {
        let _ = key;
        Err(::augen::ValidationError::new(#message))
    };

    (quote!(None), to_key, try_from_key, validate_key)
}

// Narrow values arrive widened in the erased model; extraction narrows
// them back with a range check.
fn extract_key(kind: ScalarKind, key_ty: &TokenStream) -> TokenStream {
    let mismatch = |expected: &str| {
        quote! {
            other => {
                return Err(::augen::ValidationError::new(format!(
                    "expected a {} key, found {}",
                    #expected,
                    other.kind_name()
                )));
            }
        }
    };

    let narrow = |carrier: TokenStream, expected: &str| {
        let arm_mismatch = mismatch(expected);
        quote! {
            match key {
                ::augen::KeyValue::#carrier(v) => {
                    <#key_ty as ::core::convert::TryFrom<_>>::try_from(v).map_err(|_| {
                        ::augen::ValidationError::new("key out of range")
                    })?
                }
                #arm_mismatch
            }
        }
    };

    let direct = |carrier: TokenStream, expected: &str| {
        let arm_mismatch = mismatch(expected);
        quote! {
            match key {
                ::augen::KeyValue::#carrier(v) => v,
                #arm_mismatch
            }
        }
    };

    match kind {
        ScalarKind::Bool => direct(quote!(Bool), "bool"),
        ScalarKind::Char => direct(quote!(Char), "char"),
        ScalarKind::String => direct(quote!(Str), "str"),
        ScalarKind::Decimal => direct(quote!(Decimal), "decimal"),
        ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32 => narrow(quote!(I64), "i64"),
        ScalarKind::I64 => direct(quote!(I64), "i64"),
        ScalarKind::I128 => direct(quote!(I128), "i128"),
        ScalarKind::U8 | ScalarKind::U16 | ScalarKind::U32 => narrow(quote!(U64), "u64"),
        ScalarKind::U64 => direct(quote!(U64), "u64"),
        ScalarKind::U128 => direct(quote!(U128), "u128"),
        ScalarKind::F32 => {
            let arm_mismatch = mismatch("f64");
            quote! {
                match key {
                    ::augen::KeyValue::F64(v) => v as f32,
                    #arm_mismatch
                }
            }
        }
        ScalarKind::F64 => direct(quote!(F64), "f64"),
    }
}
