use crate::{
    emit::{EmitError, Implementor, eq_expr, hash_stmt, member_accesses},
    plan::Plan,
    prelude::*,
};

/// Structural equality and hashing. Two instances are equal iff all
/// compared members are equal under their resolved strategy; hashes
/// combine per-member hashes in member order, so equal values always hash
/// identically.
pub(crate) fn emit(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let Some(equality) = &plan.equality else {
        return Ok(TokenStream::new());
    };

    let owner = descriptor.path();
    let members = member_accesses(&equality.members, descriptor)?;

    let mut comparisons = Vec::with_capacity(members.len());
    let mut hashes = Vec::with_capacity(members.len());

    for member in &members {
        let field = &member.field;
        let ty = &member.ty;

        if member.nullable {
            let pair_eq = eq_expr(&member.strategy, &quote!((*a)), &quote!((*b)), ty, &owner)?;
            comparisons.push(quote! {
                let equal = match (&self.#field, &other.#field) {
                    (Some(a), Some(b)) => #pair_eq,
                    (None, None) => true,
                    _ => false,
                };
                if !equal {
                    return false;
                }
            });

            let inner_hash = hash_stmt(&member.strategy, &quote!((*inner)), ty, &owner)?;
            hashes.push(quote! {
                match &self.#field {
                    Some(inner) => {
                        ::std::hash::Hash::hash(&1u8, state);
                        #inner_hash
                    }
                    None => ::std::hash::Hash::hash(&0u8, state),
                }
            });
        } else {
            let pair_eq = eq_expr(
                &member.strategy,
                &quote!(self.#field),
                &quote!(other.#field),
                ty,
                &owner,
            )?;
            comparisons.push(quote! {
                if !(#pair_eq) {
                    return false;
                }
            });

            let self_hash = hash_stmt(&member.strategy, &quote!(self.#field), ty, &owner)?;
            hashes.push(self_hash);
        }
    }

    let def = descriptor.def();

    let partial_eq = Implementor::new(def, quote!(::std::cmp::PartialEq))
        .set_tokens(quote! {
            fn eq(&self, other: &Self) -> bool {
                #(#comparisons)*
                true
            }
        })
        .to_token_stream();

    let eq = Implementor::new(def, quote!(::std::cmp::Eq))
        .to_token_stream();

    let hash = Implementor::new(def, quote!(::std::hash::Hash))
        .set_tokens(quote! {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                #(#hashes)*
            }
        })
        .to_token_stream();

    let mut tokens = quote! {
        #partial_eq
        #eq
        #hash
    };

    if equality.key_overloads {
        tokens.extend(emit_key_overloads(descriptor, &members)?);
    }

    Ok(tokens)
}

// `PartialEq<Key>` on both operand sides, using the same resolved strategy
// as instance equality.
fn emit_key_overloads(
    descriptor: &TypeDescriptor,
    members: &[crate::emit::MemberAccess],
) -> Result<TokenStream, EmitError> {
    let owner = descriptor.path();

    let TypeDescriptor::Keyed(keyed) = descriptor else {
        return Err(EmitError::inconsistent(
            owner,
            "key overloads require a keyed value object",
        ));
    };

    let member = &members[0];
    let ty = &member.ty;
    let ident = crate::emit::type_ident(&keyed.def);
    let key_ty = keyed.key_kind().as_type();

    let forward = eq_expr(&member.strategy, &quote!(self.0), &quote!((*other)), ty, &owner)?;
    let reverse = eq_expr(&member.strategy, &quote!((*self)), &quote!(other.0), ty, &owner)?;

    Ok(quote! {
        impl ::std::cmp::PartialEq<#key_ty> for #ident {
            fn eq(&self, other: &#key_ty) -> bool {
                #forward
            }
        }

        impl ::std::cmp::PartialEq<#ident> for #key_ty {
            fn eq(&self, other: &#ident) -> bool {
                #reverse
            }
        }
    })
}
