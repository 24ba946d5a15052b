use crate::{
    emit::{EmitError, type_ident},
    plan::{ArithmeticOp, Plan},
    prelude::*,
};

/// Arithmetic operators for keyed numeric types. The operator output is
/// the raw key type, widened through the plan's promotion decision when
/// the key is narrower than the natural operator width. Each operator is
/// independently toggleable; key overloads land on both operand sides.
pub(crate) fn emit(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let Some(arithmetic) = &plan.arithmetic else {
        return Ok(TokenStream::new());
    };

    let owner = descriptor.path();

    let TypeDescriptor::Keyed(keyed) = descriptor else {
        return Err(EmitError::inconsistent(
            owner,
            "arithmetic plan on a non-keyed descriptor",
        ));
    };

    let kind = keyed.key_kind();
    if !kind.supports_arithmetic() {
        return Err(EmitError::inconsistent(
            owner,
            format!("arithmetic plan on non-numeric key '{kind}'"),
        ));
    }

    let promotion = plan.promotion.ok_or_else(|| {
        EmitError::inconsistent(&owner, "arithmetic plan without a promotion decision")
    })?;

    let ident = type_ident(&keyed.def);
    let key_ty = kind.as_type();
    let out_ty = promotion.output.as_type();

    // One widening rule for every operand position.
    let widen = |expr: TokenStream| -> TokenStream {
        if promotion.widens() {
            quote!(#out_ty::from(#expr))
        } else {
            expr
        }
    };

    let mut tokens = TokenStream::new();

    for (op, mode) in &arithmetic.ops {
        let trait_ident = format_ident!("{}", op.trait_name());
        let method = format_ident!("{}", op.method());
        let op_token = op_token(*op);

        let lhs_self = widen(quote!(self.0));
        let rhs_self = widen(quote!(rhs.0));
        let lhs_raw = widen(quote!(self));
        let rhs_raw = widen(quote!(rhs));

        tokens.extend(quote! {
            impl ::core::ops::#trait_ident for #ident {
                type Output = #out_ty;

                fn #method(self, rhs: Self) -> Self::Output {
                    #lhs_self #op_token #rhs_self
                }
            }
        });

        if mode.key_overloads() {
            tokens.extend(quote! {
                impl ::core::ops::#trait_ident<#key_ty> for #ident {
                    type Output = #out_ty;

                    fn #method(self, rhs: #key_ty) -> Self::Output {
                        #lhs_self #op_token #rhs_raw
                    }
                }

                impl ::core::ops::#trait_ident<#ident> for #key_ty {
                    type Output = #out_ty;

                    fn #method(self, rhs: #ident) -> Self::Output {
                        #lhs_raw #op_token #rhs_self
                    }
                }
            });
        }
    }

    Ok(tokens)
}

fn op_token(op: ArithmeticOp) -> TokenStream {
    match op {
        ArithmeticOp::Add => quote!(+),
        ArithmeticOp::Sub => quote!(-),
        ArithmeticOp::Mul => quote!(*),
        ArithmeticOp::Div => quote!(/),
    }
}
