use crate::{
    emit::{EmitError, Implementor, carrier_tokens, default_literal, parse_path, parse_type},
    plan::Plan,
    prelude::*,
};

/// Construction and validation surface: the value-returning `try_new`, the
/// panicking `new` convenience, and `validate`. Honors the contract's
/// short-circuit flags before any user-supplied hook runs.
pub(crate) fn emit(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let Some(factory) = &plan.factory else {
        return Ok(TokenStream::new());
    };

    match descriptor {
        TypeDescriptor::Keyed(keyed) => emit_keyed(&factory.contract, keyed),
        TypeDescriptor::Complex(complex) => emit_complex(&factory.contract, complex),
        _ => Err(EmitError::inconsistent(
            descriptor.path(),
            "factory plan on a descriptor kind without a construction surface",
        )),
    }
}

fn emit_keyed(contract: &ValidationContract, keyed: &KeyedValueObject) -> Result<TokenStream, EmitError> {
    let owner = keyed.def.path();
    let kind = keyed.key_kind();
    let key_ty = kind.as_type();
    let carrier = carrier_tokens(contract, &owner)?;
    let name = keyed.def.path();

    let hook = match &contract.validate_with {
        Some(path) => {
            let hook_path = parse_path(path, &owner)?;
            quote!(#hook_path(value)?;)
        }
        None => quote!(),
    };

    let disallow_default = if contract.disallow_default {
        quote! {
            if *value == <#key_ty as ::core::default::Default>::default() {
                return Err(#carrier::default_value(#name));
            }
        }
    } else {
        quote!()
    };

    let default_instance = match &keyed.default_instance {
        Some(const_name) => {
            let const_ident = format_ident!("{const_name}");
            let literal = default_literal(kind);
            quote! {
                /// Well-known instance; not routed through validation.
                pub const #const_ident: Self = Self(#literal);
            }
        }
        None => quote!(),
    };

    let body = if contract.empty_yields_none {
        // Empty or whitespace-only input yields a null result with no
        // error, before the user hook runs.
        quote! {
            #default_instance

            pub fn try_new(value: #key_ty) -> Result<::core::option::Option<Self>, #carrier> {
                if value.trim().is_empty() {
                    return Ok(None);
                }

                Self::validate(&value)?;

                Ok(Some(Self(value)))
            }

            pub fn try_new_opt(
                value: ::core::option::Option<#key_ty>,
            ) -> Result<::core::option::Option<Self>, #carrier> {
                match value {
                    Some(value) => Self::try_new(value),
                    None => Ok(None),
                }
            }

            /// Panicking convenience over [`Self::try_new`].
            pub fn new(value: #key_ty) -> ::core::option::Option<Self> {
                match Self::try_new(value) {
                    Ok(instance) => instance,
                    Err(err) => panic!("invalid {}: {err}", #name),
                }
            }

            pub fn validate(value: &#key_ty) -> Result<(), #carrier> {
                if value.trim().is_empty() {
                    return Ok(());
                }

                #disallow_default
                #hook

                Ok(())
            }
        }
    } else {
        quote! {
            #default_instance

            pub fn try_new(value: #key_ty) -> Result<Self, #carrier> {
                Self::validate(&value)?;

                Ok(Self(value))
            }

            /// Panicking convenience over [`Self::try_new`].
            pub fn new(value: #key_ty) -> Self {
                match Self::try_new(value) {
                    Ok(instance) => instance,
                    Err(err) => panic!("invalid {}: {err}", #name),
                }
            }

            pub fn validate(value: &#key_ty) -> Result<(), #carrier> {
                #disallow_default
                #hook

                Ok(())
            }
        }
    };

    Ok(Implementor::inherent(&keyed.def)
        .set_tokens(body)
        .to_token_stream())
}

fn emit_complex(
    contract: &ValidationContract,
    complex: &ComplexValueObject,
) -> Result<TokenStream, EmitError> {
    let owner = complex.def.path();
    let carrier = carrier_tokens(contract, &owner)?;
    let name = complex.def.path();

    let mut params = Vec::new();
    let mut ref_params = Vec::new();
    let mut idents = Vec::new();
    let mut ref_args = Vec::new();

    for member in &complex.members {
        let member_ident = format_ident!("{}", member.ident);
        let inner = parse_type(&member.type_path, &owner)?;
        let ty = if member.nullable {
            quote!(::core::option::Option<#inner>)
        } else {
            quote!(#inner)
        };

        params.push(quote!(#member_ident: #ty));
        ref_params.push(quote!(#member_ident: &#ty));
        ref_args.push(quote!(&#member_ident));
        idents.push(member_ident);
    }

    // The cross-member hook receives every member by reference, in
    // declaration order.
    let hook = match &contract.validate_with {
        Some(path) => {
            let hook_path = parse_path(path, &owner)?;
            quote!(#hook_path(#(#idents),*)?;)
        }
        None => quote!(),
    };

    let body = quote! {
        pub fn try_new(#(#params),*) -> Result<Self, #carrier> {
            Self::validate(#(#ref_args),*)?;

            Ok(Self { #(#idents),* })
        }

        /// Panicking convenience over [`Self::try_new`].
        pub fn new(#(#params),*) -> Self {
            match Self::try_new(#(#idents),*) {
                Ok(instance) => instance,
                Err(err) => panic!("invalid {}: {err}", #name),
            }
        }

        pub fn validate(#(#ref_params),*) -> Result<(), #carrier> {
            #hook

            Ok(())
        }
    };

    Ok(Implementor::inherent(&complex.def)
        .set_tokens(body)
        .to_token_stream())
}
