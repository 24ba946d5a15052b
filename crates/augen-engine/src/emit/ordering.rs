use crate::{
    emit::{EmitError, Implementor, cmp_expr, member_accesses, type_ident},
    plan::Plan,
    prelude::*,
};

/// Total order consistent with equality: members compare in declaration
/// order and ties fall through to the next compared member. Key overloads
/// compare through the shared promotion decision so the comparison surface
/// can never diverge from the arithmetic one.
pub(crate) fn emit(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let Some(ordering) = &plan.ordering else {
        return Ok(TokenStream::new());
    };

    let owner = descriptor.path();
    let members = member_accesses(&ordering.members, descriptor)?;

    let mut steps = Vec::with_capacity(members.len());

    for member in &members {
        let field = &member.field;
        let ty = &member.ty;

        let step = if member.nullable {
            let pair_cmp = cmp_expr(&member.strategy, &quote!((*a)), &quote!((*b)), ty, &owner)?;
            quote! {
                let ordering = match (&self.#field, &other.#field) {
                    (Some(a), Some(b)) => #pair_cmp,
                    (None, None) => ::std::cmp::Ordering::Equal,
                    (None, Some(_)) => ::std::cmp::Ordering::Less,
                    (Some(_), None) => ::std::cmp::Ordering::Greater,
                };
                match ordering {
                    ::std::cmp::Ordering::Equal => {}
                    ordering => return ordering,
                }
            }
        } else {
            let pair_cmp = cmp_expr(
                &member.strategy,
                &quote!(self.#field),
                &quote!(other.#field),
                ty,
                &owner,
            )?;
            quote! {
                match #pair_cmp {
                    ::std::cmp::Ordering::Equal => {}
                    ordering => return ordering,
                }
            }
        };

        steps.push(step);
    }

    let def = descriptor.def();

    let ord = Implementor::new(def, quote!(::std::cmp::Ord))
        .set_tokens(quote! {
            fn cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                #(#steps)*
                ::std::cmp::Ordering::Equal
            }
        })
        .to_token_stream();

    let partial_ord = Implementor::new(def, quote!(::std::cmp::PartialOrd))
        .set_tokens(quote! {
            fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::std::cmp::Ordering> {
                Some(::std::cmp::Ord::cmp(self, other))
            }
        })
        .to_token_stream();

    let mut tokens = quote! {
        #ord
        #partial_ord
    };

    if ordering.key_overloads {
        tokens.extend(emit_key_overloads(plan, descriptor, &members)?);
    }

    Ok(tokens)
}

fn emit_key_overloads(
    plan: &Plan,
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
    let ident = type_ident(&keyed.def);
    let kind = keyed.key_kind();
    let key_ty = kind.as_type();

    // Numeric keys compare through the promoted width recorded on the
    // plan; everything else reuses the member strategy directly.
    let (forward, reverse) = if kind.is_numeric() {
        let promotion = plan.promotion.ok_or_else(|| {
            EmitError::inconsistent(&owner, "numeric key without a promotion decision")
        })?;

        if promotion.widens() {
            let out_ty = promotion.output.as_type();
            (
                quote!(#out_ty::from(self.0).cmp(&#out_ty::from(*other))),
                quote!(#out_ty::from(*self).cmp(&#out_ty::from(other.0))),
            )
        } else {
            (
                cmp_expr(&member.strategy, &quote!(self.0), &quote!((*other)), &member.ty, &owner)?,
                cmp_expr(&member.strategy, &quote!((*self)), &quote!(other.0), &member.ty, &owner)?,
            )
        }
    } else {
        (
            cmp_expr(&member.strategy, &quote!(self.0), &quote!((*other)), &member.ty, &owner)?,
            cmp_expr(&member.strategy, &quote!((*self)), &quote!(other.0), &member.ty, &owner)?,
        )
    };

    Ok(quote! {
        impl ::std::cmp::PartialOrd<#key_ty> for #ident {
            fn partial_cmp(&self, other: &#key_ty) -> ::core::option::Option<::std::cmp::Ordering> {
                Some(#forward)
            }
        }

        impl ::std::cmp::PartialOrd<#ident> for #key_ty {
            fn partial_cmp(&self, other: &#ident) -> ::core::option::Option<::std::cmp::Ordering> {
                Some(#reverse)
            }
        }
    })
}
