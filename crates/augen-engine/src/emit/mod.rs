//! Emitters.
//!
//! Each capability family is a pure function `(plan, descriptor) ->
//! tokens` with no knowledge of the other families beyond reading the
//! shared plan. Fragments are assembled in one fixed order so that
//! synthesizing the same descriptor twice yields byte-identical output.
//! An internally inconsistent plan fails loudly with `EmitError` instead
//! of emitting best-effort code.

mod arithmetic;
mod conversion;
mod dispatch;
mod equality;
mod factory;
mod item;
mod lookup;
mod ordering;
mod parsing;
mod registry;

use thiserror::Error as ThisError;

use crate::{
    plan::{ComparisonStrategy, Plan},
    prelude::*,
};

///
/// EmitError
///
/// A plan/descriptor mismatch. Unreachable when the plan came from the
/// planner; surfaced as a `PlanMismatch` diagnostic, never as silently
/// wrong output.
///

#[derive(Debug, ThisError)]
pub enum EmitError {
    #[error("inconsistent plan for '{path}': {detail}")]
    InconsistentPlan { path: String, detail: String },
}

impl EmitError {
    pub(crate) fn inconsistent(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InconsistentPlan {
            path: path.into(),
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn into_diagnostic(self) -> Diagnostic {
        match &self {
            Self::InconsistentPlan { path, .. } => {
                Diagnostic::error(DiagnosticId::PlanMismatch, path.clone(), self.to_string())
            }
        }
    }
}

///
/// SourceFragment
///
/// One synthesized compilation fragment, identified by the descriptor's
/// structural fingerprint.
///

#[derive(Clone, Debug)]
pub struct SourceFragment {
    pub path: String,
    pub fingerprint: Fingerprint,
    pub tokens: TokenStream,
}

impl SourceFragment {
    /// Deterministic text rendering of the fragment.
    #[must_use]
    pub fn text(&self) -> String {
        self.tokens.to_string()
    }
}

/// Emit the whole fragment for one planned descriptor. Family order is
/// fixed; families absent from the plan contribute nothing.
pub fn emit_descriptor(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let mut tokens = item::emit(plan, descriptor)?;

    tokens.extend(factory::emit(plan, descriptor)?);
    tokens.extend(equality::emit(plan, descriptor)?);
    tokens.extend(ordering::emit(plan, descriptor)?);
    tokens.extend(arithmetic::emit(plan, descriptor)?);
    tokens.extend(conversion::emit(plan, descriptor)?);
    tokens.extend(parsing::emit(plan, descriptor)?);
    tokens.extend(lookup::emit(plan, descriptor)?);
    tokens.extend(dispatch::emit(plan, descriptor)?);
    tokens.extend(registry::emit(plan, descriptor)?);

    Ok(tokens)
}

///
/// Implementor
///
/// Small builder for `impl` blocks, so every emitter renders headers the
/// same way.
///

pub(crate) struct Implementor {
    trait_path: Option<TokenStream>,
    self_ty: TokenStream,
    tokens: TokenStream,
}

impl Implementor {
    pub fn new(def: &Def, trait_path: TokenStream) -> Self {
        let ident = format_ident!("{}", def.ident);

        Self {
            trait_path: Some(trait_path),
            self_ty: quote!(#ident),
            tokens: TokenStream::new(),
        }
    }

    pub fn inherent(def: &Def) -> Self {
        let ident = format_ident!("{}", def.ident);

        Self {
            trait_path: None,
            self_ty: quote!(#ident),
            tokens: TokenStream::new(),
        }
    }

    pub fn set_tokens(mut self, tokens: TokenStream) -> Self {
        self.tokens = tokens;
        self
    }
}

impl ToTokens for Implementor {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let self_ty = &self.self_ty;
        let body = &self.tokens;

        tokens.extend(match &self.trait_path {
            Some(trait_path) => quote! {
                impl #trait_path for #self_ty {
                    #body
                }
            },
            None => quote! {
                impl #self_ty {
                    #body
                }
            },
        });
    }
}

//
// shared helpers
//

pub(crate) fn vis_tokens(vis: Visibility) -> TokenStream {
    match vis {
        Visibility::Public => quote!(pub),
        Visibility::Crate => quote!(pub(crate)),
        Visibility::Private => TokenStream::new(),
    }
}

pub(crate) fn type_ident(def: &Def) -> proc_macro2::Ident {
    format_ident!("{}", def.ident)
}

/// Parse a declared member type back into tokens.
pub(crate) fn parse_type(path: &str, owner: &str) -> Result<syn::Type, EmitError> {
    syn::parse_str::<syn::Type>(path)
        .map_err(|err| EmitError::inconsistent(owner, format!("unparsable member type '{path}': {err}")))
}

pub(crate) fn parse_path(path: &str, owner: &str) -> Result<syn::Path, EmitError> {
    syn::parse_str::<syn::Path>(path)
        .map_err(|err| EmitError::inconsistent(owner, format!("unparsable path '{path}': {err}")))
}

/// The error-carrier tokens for a contract.
pub(crate) fn carrier_tokens(
    contract: &ValidationContract,
    owner: &str,
) -> Result<TokenStream, EmitError> {
    let ty = parse_type(&contract.error_carrier, owner)?;

    Ok(quote!(#ty))
}

/// `const` initializer for a key type's well-known default instance.
pub(crate) fn default_literal(kind: ScalarKind) -> TokenStream {
    match kind {
        ScalarKind::Bool => quote!(false),
        ScalarKind::Char => quote!('\0'),
        ScalarKind::Decimal => quote!(::augen::Decimal::ZERO),
        ScalarKind::F32 => quote!(0.0f32),
        ScalarKind::F64 => quote!(0.0f64),
        ScalarKind::String => quote!(::std::string::String::new()),
        ScalarKind::I8 => quote!(0i8),
        ScalarKind::I16 => quote!(0i16),
        ScalarKind::I32 => quote!(0i32),
        ScalarKind::I64 => quote!(0i64),
        ScalarKind::I128 => quote!(0i128),
        ScalarKind::U8 => quote!(0u8),
        ScalarKind::U16 => quote!(0u16),
        ScalarKind::U32 => quote!(0u32),
        ScalarKind::U64 => quote!(0u64),
        ScalarKind::U128 => quote!(0u128),
    }
}

//
// strategy expressions
//
// Each returns an expression over `#lhs`/`#rhs` member access tokens; the
// caller wraps nullable members in an Option match.
//

pub(crate) fn eq_expr(
    strategy: &ComparisonStrategy,
    lhs: &TokenStream,
    rhs: &TokenStream,
    ty: &syn::Type,
    owner: &str,
) -> Result<TokenStream, EmitError> {
    Ok(match strategy {
        ComparisonStrategy::Natural
        | ComparisonStrategy::Ordinal
        | ComparisonStrategy::Nested { .. } => quote!(#lhs == #rhs),
        ComparisonStrategy::FloatBits => quote!(#lhs.to_bits() == #rhs.to_bits()),
        ComparisonStrategy::OrdinalIgnoreCase => quote!(#lhs.eq_ignore_ascii_case(&#rhs)),
        ComparisonStrategy::Comparer { path } => {
            let comparer = parse_path(path, owner)?;
            quote!(<#comparer as ::augen::traits::MemberComparer<#ty>>::eq(&#lhs, &#rhs))
        }
    })
}

pub(crate) fn cmp_expr(
    strategy: &ComparisonStrategy,
    lhs: &TokenStream,
    rhs: &TokenStream,
    ty: &syn::Type,
    owner: &str,
) -> Result<TokenStream, EmitError> {
    Ok(match strategy {
        ComparisonStrategy::Natural
        | ComparisonStrategy::Ordinal
        | ComparisonStrategy::Nested { .. } => quote!(::std::cmp::Ord::cmp(&#lhs, &#rhs)),
        ComparisonStrategy::FloatBits => quote!(#lhs.total_cmp(&#rhs)),
        ComparisonStrategy::OrdinalIgnoreCase => quote! {
            #lhs.bytes()
                .map(|byte| byte.to_ascii_lowercase())
                .cmp(#rhs.bytes().map(|byte| byte.to_ascii_lowercase()))
        },
        ComparisonStrategy::Comparer { path } => {
            let comparer = parse_path(path, owner)?;
            quote!(<#comparer as ::augen::traits::MemberComparer<#ty>>::cmp(&#lhs, &#rhs))
        }
    })
}

pub(crate) fn hash_stmt(
    strategy: &ComparisonStrategy,
    expr: &TokenStream,
    ty: &syn::Type,
    owner: &str,
) -> Result<TokenStream, EmitError> {
    Ok(match strategy {
        ComparisonStrategy::Natural
        | ComparisonStrategy::Ordinal
        | ComparisonStrategy::Nested { .. } => {
            quote!(::std::hash::Hash::hash(&#expr, state);)
        }
        ComparisonStrategy::FloatBits => quote!(::std::hash::Hash::hash(&#expr.to_bits(), state);),
        ComparisonStrategy::OrdinalIgnoreCase => {
            quote!(::std::hash::Hash::hash(&#expr.to_ascii_lowercase(), state);)
        }
        ComparisonStrategy::Comparer { path } => {
            let comparer = parse_path(path, owner)?;
            quote!(<#comparer as ::augen::traits::MemberComparer<#ty>>::hash(&#expr, state);)
        }
    })
}

///
/// MemberAccess
///
/// Field access resolved per descriptor shape: keyed value objects use the
/// tuple index, complex ones the member ident.
///

pub(crate) struct MemberAccess {
    pub field: TokenStream,
    pub ty: syn::Type,
    pub nullable: bool,
    pub strategy: ComparisonStrategy,
}

pub(crate) fn member_accesses(
    plan_members: &[crate::plan::MemberPlan],
    descriptor: &TypeDescriptor,
) -> Result<Vec<MemberAccess>, EmitError> {
    let owner = descriptor.path();

    match descriptor {
        TypeDescriptor::Keyed(keyed) => {
            let member = plan_members.first().ok_or_else(|| {
                EmitError::inconsistent(&owner, "keyed plan without a key member")
            })?;
            let index = syn::Index::from(0);
            let ty_tokens = keyed.key_kind().as_type();
            let ty = syn::parse2::<syn::Type>(ty_tokens)
                .map_err(|err| EmitError::inconsistent(&owner, err.to_string()))?;

            Ok(vec![MemberAccess {
                field: quote!(#index),
                ty,
                nullable: false,
                strategy: member.strategy.clone(),
            }])
        }
        TypeDescriptor::Complex(_) => plan_members
            .iter()
            .map(|member| {
                let ident = format_ident!("{}", member.ident);
                let ty = parse_type(&member.type_path, &owner)?;

                Ok(MemberAccess {
                    field: quote!(#ident),
                    ty,
                    nullable: member.nullable,
                    strategy: member.strategy.clone(),
                })
            })
            .collect(),
        _ => Err(EmitError::inconsistent(
            &owner,
            "member comparison applies to value objects only",
        )),
    }
}
