use std::collections::BTreeMap;

use crate::{
    emit::{EmitError, Implementor, type_ident, vis_tokens},
    plan::{BranchPlan, DispatchPlan, Plan},
    prelude::*,
};

/// Union dispatch surface: per-variant constructors, the discriminator
/// accessor, the exhaustive `switch`/`map` over the flattened leaf set,
/// and the partial-switch builder where a leaf branch overrides a
/// same-path internal-node branch, which overrides the default.
pub(crate) fn emit(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let Some(dispatch) = &plan.dispatch else {
        return Ok(TokenStream::new());
    };

    let owner = descriptor.path();

    let TypeDescriptor::Union(union) = descriptor else {
        return Err(EmitError::inconsistent(
            owner,
            "dispatch plan on a non-union descriptor",
        ));
    };

    // Branch params are decisions; emitters look them up instead of
    // re-deriving the naming scheme.
    let params = ParamIndex::new(dispatch);

    let mut body = emit_constructors(union);
    body.extend(emit_discriminator(union));

    if dispatch.emits_switch {
        body.extend(emit_switch(union, dispatch, &params, &owner)?);
    }

    if dispatch.emits_map {
        body.extend(emit_map(union, dispatch, &params, &owner)?);
    }

    let mut tokens = Implementor::inherent(&union.def)
        .set_tokens(body)
        .to_token_stream();

    if dispatch.emits_switch {
        tokens.extend(emit_partial_switch(union, dispatch, &params, &owner)?);
    }

    Ok(tokens)
}

///
/// ParamIndex
///

struct ParamIndex {
    by_path: BTreeMap<Vec<String>, String>,
}

impl ParamIndex {
    fn new(dispatch: &DispatchPlan) -> Self {
        let by_path = dispatch
            .leaves
            .iter()
            .chain(&dispatch.internals)
            .map(|branch| (branch.variant_path.clone(), branch.param.clone()))
            .collect();

        Self { by_path }
    }

    fn get(&self, path: &[String], owner: &str) -> Result<proc_macro2::Ident, EmitError> {
        self.by_path
            .get(path)
            .map(|param| format_ident!("{param}"))
            .ok_or_else(|| {
                EmitError::inconsistent(owner, format!("no dispatch branch for {path:?}"))
            })
    }
}

// `Shape::circle(value)` convenience constructors, one per direct variant.
fn emit_constructors(union: &Union) -> TokenStream {
    let ctors = union.variants.iter().map(|variant| {
        let method = format_ident!("{}", to_snake(&variant.ident));
        let variant_ident = format_ident!("{}", variant.ident);
        let payload = format_ident!("{}", variant.payload_path);

        quote! {
            #[must_use]
            pub fn #method(value: #payload) -> Self {
                Self::#variant_ident(value)
            }
        }
    });

    quote!(#(#ctors)*)
}

fn emit_discriminator(union: &Union) -> TokenStream {
    let arms = union.variants.iter().map(|variant| {
        let variant_ident = format_ident!("{}", variant.ident);
        let disc = &variant.discriminator;

        quote!(Self::#variant_ident(_) => #disc,)
    });

    quote! {
        /// Discriminator of the active variant at this level.
        #[must_use]
        pub const fn discriminator(&self) -> &'static str {
            match self {
                #(#arms)*
            }
        }
    }
}

// Leaves of the subtree rooted at `prefix`, in depth-first order.
fn subtree_leaves<'a>(dispatch: &'a DispatchPlan, prefix: &[String]) -> Vec<&'a BranchPlan> {
    dispatch
        .leaves
        .iter()
        .filter(|leaf| leaf.variant_path.starts_with(prefix))
        .collect()
}

fn emit_switch(
    union: &Union,
    dispatch: &DispatchPlan,
    params: &ParamIndex,
    owner: &str,
) -> Result<TokenStream, EmitError> {
    let mut signature = Vec::new();
    for leaf in &dispatch.leaves {
        let param = params.get(&leaf.variant_path, owner)?;
        let payload = format_ident!("{}", leaf.payload_path);
        signature.push(quote!(#param: impl FnOnce(&#payload) -> R));
    }

    let mut arms = Vec::new();
    for variant in &union.variants {
        let variant_ident = format_ident!("{}", variant.ident);
        let prefix = vec![variant.ident.clone()];

        let arm = match &variant.kind {
            VariantKind::Leaf => {
                let param = params.get(&prefix, owner)?;
                quote!(Self::#variant_ident(value) => #param(value),)
            }
            VariantKind::Nested(_) => {
                let mut nested_params = Vec::new();
                for leaf in subtree_leaves(dispatch, &prefix) {
                    nested_params.push(params.get(&leaf.variant_path, owner)?);
                }
                quote!(Self::#variant_ident(value) => value.switch(#(#nested_params),*),)
            }
        };

        arms.push(arm);
    }

    Ok(quote! {
        /// Exhaustive dispatch: one branch per leaf variant, checked at
        /// compile time.
        pub fn switch<R>(&self, #(#signature),*) -> R {
            match self {
                #(#arms)*
            }
        }
    })
}

fn emit_map(
    union: &Union,
    dispatch: &DispatchPlan,
    params: &ParamIndex,
    owner: &str,
) -> Result<TokenStream, EmitError> {
    let mut signature = Vec::new();
    for leaf in &dispatch.leaves {
        let param = params.get(&leaf.variant_path, owner)?;
        signature.push(quote!(#param: R));
    }

    let mut arms = Vec::new();
    for variant in &union.variants {
        let variant_ident = format_ident!("{}", variant.ident);
        let prefix = vec![variant.ident.clone()];

        let arm = match &variant.kind {
            VariantKind::Leaf => {
                let param = params.get(&prefix, owner)?;
                quote!(Self::#variant_ident(_) => #param,)
            }
            VariantKind::Nested(_) => {
                let mut nested_params = Vec::new();
                for leaf in subtree_leaves(dispatch, &prefix) {
                    nested_params.push(params.get(&leaf.variant_path, owner)?);
                }
                quote!(Self::#variant_ident(value) => value.map(#(#nested_params),*),)
            }
        };

        arms.push(arm);
    }

    Ok(quote! {
        /// Exhaustive value mapping: one value per leaf variant.
        pub fn map<R>(&self, #(#signature),*) -> R {
            match self {
                #(#arms)*
            }
        }
    })
}

fn emit_partial_switch(
    union: &Union,
    dispatch: &DispatchPlan,
    params: &ParamIndex,
    owner: &str,
) -> Result<TokenStream, EmitError> {
    let ident = type_ident(&union.def);
    let vis = vis_tokens(union.def.vis);
    let builder_ident = format_ident!("{}PartialSwitch", union.def.ident);

    // leaves first, then internal nodes, each in depth-first order
    let branches: Vec<&BranchPlan> = dispatch.leaves.iter().chain(&dispatch.internals).collect();

    let mut fields = Vec::new();
    let mut inits = Vec::new();
    let mut methods = Vec::new();
    let mut param_idents = Vec::new();

    for branch in &branches {
        let param = params.get(&branch.variant_path, owner)?;
        let payload = format_ident!("{}", branch.payload_path);

        fields.push(quote! {
            #param: ::core::option::Option<::std::boxed::Box<dyn FnOnce(&'a #payload) -> R + 'a>>
        });
        inits.push(quote!(#param: None));
        methods.push(quote! {
            #[must_use]
            pub fn #param(mut self, branch: impl FnOnce(&'a #payload) -> R + 'a) -> Self {
                self.#param = Some(::std::boxed::Box::new(branch));
                self
            }
        });
        param_idents.push(param);
    }

    let arms = emit_partial_arms(union, &quote!(#ident), &mut Vec::new(), params, owner, 0)?;

    let partial_switch = Implementor::inherent(&union.def)
        .set_tokens(quote! {
            /// Partial dispatch: supply any subset of branches, finish
            /// with a default. A leaf branch overrides a same-path
            /// internal-node branch; both override the default.
            #[must_use]
            pub fn partial_switch<R>(&self) -> #builder_ident<'_, R> {
                #builder_ident {
                    value: self,
                    #(#inits),*
                }
            }
        })
        .to_token_stream();

    Ok(quote! {
        #partial_switch

        #vis struct #builder_ident<'a, R> {
            value: &'a #ident,
            #(#fields),*
        }

        impl<'a, R> #builder_ident<'a, R> {
            #(#methods)*

            pub fn finish(self, default: impl FnOnce(&'a #ident) -> R) -> R {
                let Self { value, #(#param_idents),* } = self;

                match value {
                    #arms
                }

                default(value)
            }
        }
    })
}

// Arms try the most specific branch first: deeper leaves, then each
// enclosing internal node on the way out. Falls through to the shared
// default after the match.
fn emit_partial_arms(
    union: &Union,
    enum_path: &TokenStream,
    prefix: &mut Vec<String>,
    params: &ParamIndex,
    owner: &str,
    depth: usize,
) -> Result<TokenStream, EmitError> {
    let binding = format_ident!("inner_{depth}");
    let mut arms = Vec::new();

    for variant in &union.variants {
        let variant_ident = format_ident!("{}", variant.ident);
        prefix.push(variant.ident.clone());
        let param = params.get(prefix, owner)?;

        let arm = match &variant.kind {
            VariantKind::Leaf => quote! {
                #enum_path::#variant_ident(#binding) => {
                    if let Some(branch) = #param {
                        return branch(#binding);
                    }
                }
            },
            VariantKind::Nested(nested) => {
                let nested_ident = format_ident!("{}", variant.payload_path);
                let nested_arms = emit_partial_arms(
                    nested,
                    &quote!(#nested_ident),
                    prefix,
                    params,
                    owner,
                    depth + 1,
                )?;

                quote! {
                    #enum_path::#variant_ident(#binding) => {
                        match #binding {
                            #nested_arms
                        }
                        if let Some(branch) = #param {
                            return branch(#binding);
                        }
                    }
                }
            }
        };

        arms.push(arm);
        prefix.pop();
    }

    Ok(quote!(#(#arms)*))
}

fn to_snake(ident: &str) -> String {
    use convert_case::{Case, Casing};

    ident.to_case(Case::Snake)
}
