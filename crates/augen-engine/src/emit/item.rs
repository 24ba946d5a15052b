use crate::{
    emit::{EmitError, Implementor, parse_type, type_ident, vis_tokens},
    plan::Plan,
    prelude::*,
};

/// Re-emit the type skeleton with the derives the strategies allow, plus
/// the member access surface (`Inner` for keyed objects, one accessor per
/// member for complex ones).
pub(crate) fn emit(_plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    match descriptor {
        TypeDescriptor::Keyed(keyed) => emit_keyed(keyed),
        TypeDescriptor::Complex(complex) => emit_complex(complex),
        TypeDescriptor::SmartEnum(node) => Ok(emit_smart_enum(node)),
        TypeDescriptor::Union(union) => Ok(emit_union(union)),
    }
}

fn emit_keyed(keyed: &KeyedValueObject) -> Result<TokenStream, EmitError> {
    let ident = type_ident(&keyed.def);
    let vis = vis_tokens(keyed.def.vis);
    let kind = keyed.key_kind();
    let key_ty = kind.as_type();

    let copy = if kind.supports_copy() {
        quote!(, Copy)
    } else {
        quote!()
    };

    let inner = Implementor::new(&keyed.def, quote!(::augen::traits::Inner<#key_ty>))
        .set_tokens(quote! {
            fn inner(&self) -> &#key_ty {
                &self.0
            }

            fn into_inner(self) -> #key_ty {
                self.0
            }
        })
        .to_token_stream();

    Ok(quote! {
        #[derive(Clone #copy, Debug)]
        #vis struct #ident(#key_ty);

        #inner
    })
}

fn emit_complex(complex: &ComplexValueObject) -> Result<TokenStream, EmitError> {
    let ident = type_ident(&complex.def);
    let vis = vis_tokens(complex.def.vis);
    let owner = complex.def.path();

    let mut fields = Vec::with_capacity(complex.members.len());
    let mut accessors = Vec::with_capacity(complex.members.len());

    for member in &complex.members {
        let member_ident = format_ident!("{}", member.ident);
        let inner = parse_type(&member.type_path, &owner)?;
        let ty = if member.nullable {
            quote!(::core::option::Option<#inner>)
        } else {
            quote!(#inner)
        };

        fields.push(quote!(#member_ident: #ty));
        accessors.push(quote! {
            #[must_use]
            pub fn #member_ident(&self) -> &#ty {
                &self.#member_ident
            }
        });
    }

    let accessors_impl = Implementor::inherent(&complex.def)
        .set_tokens(quote!(#(#accessors)*))
        .to_token_stream();

    Ok(quote! {
        #[derive(Clone, Debug)]
        #vis struct #ident {
            #(#fields),*
        }

        #accessors_impl
    })
}

fn emit_smart_enum(node: &SmartEnum) -> TokenStream {
    let ident = type_ident(&node.def);
    let vis = vis_tokens(node.def.vis);
    let key_ty = node.key_kind.as_type();

    let copy = if node.key_kind.supports_copy() {
        quote!(, Copy)
    } else {
        quote!()
    };

    let mut variants: Vec<TokenStream> = node
        .items
        .iter()
        .map(|item| {
            let variant = format_ident!("{}", item.ident);
            quote!(#variant)
        })
        .collect();

    if let Some(invalid) = &node.invalid_item {
        let variant = format_ident!("{invalid}");
        variants.push(quote!(#variant(#key_ty)));
    }

    quote! {
        #[derive(Clone #copy, Debug, PartialEq, Eq, Hash)]
        #vis enum #ident {
            #(#variants),*
        }
    }
}

fn emit_union(union: &Union) -> TokenStream {
    let ident = type_ident(&union.def);
    let vis = vis_tokens(union.def.vis);

    let variants: Vec<TokenStream> = union
        .variants
        .iter()
        .map(|variant| {
            let variant_ident = format_ident!("{}", variant.ident);
            let payload = format_ident!("{}", variant.payload_path);
            quote!(#variant_ident(#payload))
        })
        .collect();

    quote! {
        #[derive(Clone, Debug)]
        #vis enum #ident {
            #(#variants),*
        }
    }
}
