use crate::{
    emit::{EmitError, carrier_tokens, type_ident},
    plan::Plan,
    prelude::*,
};

/// Key conversions: `From<Self>` into the raw key, `TryFrom<Key>` through
/// the full validation contract, and `AsRef<Key>`. Conversion never
/// bypasses validation.
pub(crate) fn emit(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let Some(conversion) = &plan.conversion else {
        return Ok(TokenStream::new());
    };

    let TypeDescriptor::Keyed(keyed) = descriptor else {
        // Complex value objects have no single key representation; their
        // conversion plan only carries the display flag.
        return Ok(TokenStream::new());
    };

    let owner = keyed.def.path();
    let ident = type_ident(&keyed.def);
    let key_ty = keyed.key_kind().as_type();
    let mut tokens = TokenStream::new();

    if conversion.into_key {
        tokens.extend(quote! {
            impl ::core::convert::From<#ident> for #key_ty {
                fn from(value: #ident) -> Self {
                    value.0
                }
            }
        });
    }

    if conversion.as_ref {
        tokens.extend(quote! {
            impl ::core::convert::AsRef<#key_ty> for #ident {
                fn as_ref(&self) -> &#key_ty {
                    &self.0
                }
            }
        });
    }

    if conversion.try_from_key {
        let factory = plan.factory.as_ref().ok_or_else(|| {
            EmitError::inconsistent(&owner, "key conversion requires a validation contract")
        })?;
        let carrier = carrier_tokens(&factory.contract, &owner)?;
        let name = keyed.def.path();

        // A contract that yields no instance for empty input cannot
        // satisfy `TryFrom`'s instance-or-error shape; the null result
        // maps to a structured error.
        let body = if factory.contract.empty_yields_none {
            quote! {
                Self::try_new(value)?.ok_or_else(|| #carrier::no_instance(#name))
            }
        } else {
            quote! {
                Self::try_new(value)
            }
        };

        tokens.extend(quote! {
            impl ::core::convert::TryFrom<#key_ty> for #ident {
                type Error = #carrier;

                fn try_from(value: #key_ty) -> Result<Self, Self::Error> {
                    #body
                }
            }
        });
    }

    Ok(tokens)
}
