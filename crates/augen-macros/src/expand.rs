use std::collections::BTreeMap;

use proc_macro2::TokenStream;
use quote::ToTokens;

use augen_engine::{
    build::{ResolvePolicy, SymbolTable, TypeResolver, build_descriptor},
    emit::emit_descriptor,
    plan::plan,
    scan::Candidate,
};
use augen_schema::{fingerprint::Fingerprint, marker::MarkerKind};

/// Run the full synthesis chain for one declaration.
pub(crate) fn expand(marker: MarkerKind, args: TokenStream, input: TokenStream) -> TokenStream {
    let item: syn::Item = match syn::parse2(input) {
        Ok(item) => item,
        Err(err) => return err.to_compile_error(),
    };

    let ident = match &item {
        syn::Item::Struct(node) => node.ident.to_string(),
        syn::Item::Enum(node) => node.ident.to_string(),
        other => {
            return syn::Error::new_spanned(
                other,
                format!("#[{}] applies to structs and enums", marker.attribute()),
            )
            .to_compile_error();
        }
    };

    let candidate = Candidate {
        module_path: String::new(),
        ident: ident.clone(),
        marker,
        args: args.clone(),
        fingerprint: Fingerprint::of_text(&format!(
            "{marker} {args} {}",
            item.to_token_stream()
        )),
    };

    let file = syn::File {
        shebang: None,
        attrs: Vec::new(),
        items: vec![item],
    };
    let symbols = SymbolTable::from_file(&file);

    let mut candidates = BTreeMap::new();
    candidates.insert(candidate.path(), candidate.clone());

    let mut resolver =
        TypeResolver::with_policy(&symbols, &candidates, ResolvePolicy::AssumeSynthesized);

    let descriptor = match build_descriptor(&candidate, &mut resolver) {
        Ok(descriptor) => descriptor,
        Err(diags) => return diags.to_compile_errors(),
    };

    let planned = match plan(&descriptor) {
        Ok(planned) => planned,
        Err(diags) => return diags.to_compile_errors(),
    };

    match emit_descriptor(&planned, &descriptor) {
        Ok(tokens) => tokens,
        Err(emit_err) => {
            let mut diags = augen_schema::diagnostic::Diagnostics::new();
            diags.add(emit_err.into_diagnostic());
            diags.to_compile_errors()
        }
    }
}
