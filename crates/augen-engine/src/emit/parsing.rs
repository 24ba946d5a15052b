use crate::{
    emit::{EmitError, Implementor, carrier_tokens},
    plan::Plan,
    prelude::*,
};

/// Round-trip parse/format entry points. Parsing funnels through the same
/// validation contract as direct construction; it can never bypass it.
pub(crate) fn emit(plan: &Plan, descriptor: &TypeDescriptor) -> Result<TokenStream, EmitError> {
    let Some(conversion) = &plan.conversion else {
        return Ok(TokenStream::new());
    };

    match descriptor {
        TypeDescriptor::Keyed(keyed) => {
            let mut tokens = TokenStream::new();

            if conversion.parse {
                tokens.extend(emit_keyed_parse(plan, keyed)?);
            }
            if conversion.display {
                let display = Implementor::new(&keyed.def, quote!(::std::fmt::Display))
                    .set_tokens(quote! {
                        fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                            ::std::fmt::Display::fmt(&self.0, f)
                        }
                    })
                    .to_token_stream();
                tokens.extend(display);
            }

            Ok(tokens)
        }
        TypeDescriptor::Complex(complex) if conversion.display => emit_complex_display(complex),
        _ => Ok(TokenStream::new()),
    }
}

fn emit_keyed_parse(plan: &Plan, keyed: &KeyedValueObject) -> Result<TokenStream, EmitError> {
    let owner = keyed.def.path();
    let factory = plan.factory.as_ref().ok_or_else(|| {
        EmitError::inconsistent(&owner, "parsing requires a validation contract")
    })?;

    let kind = keyed.key_kind();
    let key_ty = kind.as_type();
    let carrier = carrier_tokens(&factory.contract, &owner)?;
    let name = keyed.def.path();

    let parse_key = if kind.is_text() {
        quote!(let value = s.to_string();)
    } else {
        quote! {
            let value: #key_ty = s.parse().map_err(|_| {
                #carrier::new(format!("unable to parse '{s}' as {}", #name))
            })?;
        }
    };

    let funnel = if factory.contract.empty_yields_none {
        quote!(Self::try_new(value)?.ok_or_else(|| #carrier::no_instance(#name)))
    } else {
        quote!(Self::try_new(value))
    };

    Ok(Implementor::new(&keyed.def, quote!(::std::str::FromStr))
        .set_tokens(quote! {
            type Err = #carrier;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                #parse_key
                #funnel
            }
        })
        .to_token_stream())
}

// Default formatting: `name(member: value, ..)` with nullable members
// rendered as `none` when absent.
fn emit_complex_display(complex: &ComplexValueObject) -> Result<TokenStream, EmitError> {
    let mut locals = Vec::new();
    let mut segments = Vec::new();
    let mut args = Vec::new();

    for member in &complex.members {
        let member_ident = format_ident!("{}", member.ident);

        if member.nullable {
            locals.push(quote! {
                let #member_ident = self
                    .#member_ident
                    .as_ref()
                    .map_or_else(|| "none".to_string(), ::std::string::ToString::to_string);
            });
            segments.push(format!("{}: {{}}", member.ident));
            args.push(quote!(#member_ident));
        } else {
            segments.push(format!("{}: {{}}", member.ident));
            args.push(quote!(self.#member_ident));
        }
    }

    let format = format!("{}({})", complex.def.ident, segments.join(", "));

    Ok(Implementor::new(&complex.def, quote!(::std::fmt::Display))
        .set_tokens(quote! {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                #(#locals)*
                write!(f, #format, #(#args),*)
            }
        })
        .to_token_stream())
}
