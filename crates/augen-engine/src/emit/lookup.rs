use crate::{
    emit::{EmitError, Implementor},
    plan::Plan,
    prelude::*,
};

/// Smart-enum surface: instance enumeration, key accessor, and lookup by
/// key. A validatable enum additionally gets the infallible `get`, which
/// answers a miss with the designated invalid-carrier variant.
pub(crate) fn emit(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let Some(lookup) = &plan.lookup else {
        return Ok(TokenStream::new());
    };

    let owner = descriptor.path();

    let TypeDescriptor::SmartEnum(node) = descriptor else {
        return Err(EmitError::inconsistent(
            owner,
            "lookup plan on a non-smart-enum descriptor",
        ));
    };

    if lookup.validatable && node.invalid_item.is_none() {
        return Err(EmitError::inconsistent(
            owner,
            "validatable lookup without an invalid item",
        ));
    }

    let name = node.def.path();
    let kind = node.key_kind;
    let key_ty = kind.as_type();
    let text_key = kind.is_text();

    let item_idents: Vec<proc_macro2::Ident> = node
        .items
        .iter()
        .map(|item| format_ident!("{}", item.ident))
        .collect();
    let item_keys: Vec<&KeyLit> = node.items.iter().map(|item| &item.key).collect();

    // Key accessor: string keys hand out borrowed text so both the
    // literal arms and the invalid carrier share one shape.
    let (key_ret, key_invalid_arm, lookup_param, miss_value) = if text_key {
        let invalid = node
            .invalid_item
            .as_ref()
            .map(|invalid| {
                let variant = format_ident!("{invalid}");
                quote!(Self::#variant(key) => key.as_str(),)
            })
            .unwrap_or_default();

        (quote!(&str), invalid, quote!(key: &str), quote!(key.to_string()))
    } else {
        let invalid = node
            .invalid_item
            .as_ref()
            .map(|invalid| {
                let variant = format_ident!("{invalid}");
                quote!(Self::#variant(key) => *key,)
            })
            .unwrap_or_default();

        (quote!(#key_ty), invalid, quote!(key: #key_ty), quote!(key))
    };

    let count = node.items.len();

    let mut body = quote! {
        /// Every named instance, in declaration order.
        pub const ITEMS: &'static [Self] = &[#(Self::#item_idents),*];

        #[must_use]
        pub const fn items() -> &'static [Self] {
            Self::ITEMS
        }

        #[must_use]
        pub const fn count() -> usize {
            #count
        }

        #[must_use]
        pub fn key(&self) -> #key_ret {
            match self {
                #(Self::#item_idents => #item_keys,)*
                #key_invalid_arm
            }
        }

        pub fn try_get(#lookup_param) -> Result<Self, ::augen::ValidationError> {
            match key {
                #(#item_keys => Ok(Self::#item_idents),)*
                other => Err(::augen::ValidationError::unknown_key(#name, other)),
            }
        }
    };

    if lookup.validatable {
        let invalid = node
            .invalid_item
            .as_ref()
            .expect("checked above");
        let invalid_ident = format_ident!("{invalid}");

        body.extend(quote! {
            /// Lookup that never fails: a miss returns the designated
            /// invalid instance carrying the raw key. Callers must check
            /// [`Self::is_valid`].
            #[must_use]
            pub fn get(#lookup_param) -> Self {
                match Self::try_get(key) {
                    Ok(item) => item,
                    Err(_) => Self::#invalid_ident(#miss_value),
                }
            }

            #[must_use]
            pub const fn is_valid(&self) -> bool {
                !matches!(self, Self::#invalid_ident(_))
            }
        });
    }

    let mut tokens = Implementor::inherent(&node.def)
        .set_tokens(body)
        .to_token_stream();

    if lookup.validatable {
        let invalid_ident = format_ident!(
            "{}",
            node.invalid_item.as_ref().expect("checked above")
        );

        tokens.extend(
            Implementor::new(&node.def, quote!(::augen::traits::ValidatableEnum))
                .set_tokens(quote! {
                    fn is_valid(&self) -> bool {
                        !matches!(self, Self::#invalid_ident(_))
                    }
                })
                .to_token_stream(),
        );
    }

    if lookup.display {
        tokens.extend(
            Implementor::new(&node.def, quote!(::std::fmt::Display))
                .set_tokens(quote! {
                    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        write!(f, "{}", self.key())
                    }
                })
                .to_token_stream(),
        );
    }

    if lookup.parse {
        tokens.extend(
            Implementor::new(&node.def, quote!(::std::str::FromStr))
                .set_tokens(quote! {
                    type Err = ::augen::ValidationError;

                    fn from_str(s: &str) -> Result<Self, Self::Err> {
                        Self::try_get(s)
                    }
                })
                .to_token_stream(),
        );
    }

    Ok(tokens)
}
