//! Attribute-macro front end over the augen synthesis engine.
//!
//! Each macro runs the scan → build → plan → emit chain for exactly one
//! declaration. Unlike the whole-unit pipeline, a macro cannot see the
//! surrounding compilation unit, so unknown member types are assumed to be
//! synthesized and the compiler enforces the resulting trait obligations.

use proc_macro::TokenStream;

mod expand;

use augen_schema::marker::MarkerKind;

/// Keyed value object: a tuple struct wrapping exactly one scalar key.
///
/// ```ignore
/// #[value_object(key = "decimal", arithmetic(mode = "default"))]
/// pub struct Amount(Decimal);
/// ```
#[proc_macro_attribute]
pub fn value_object(args: TokenStream, input: TokenStream) -> TokenStream {
    expand::expand(MarkerKind::ValueObject, args.into(), input.into()).into()
}

/// Complex value object: a named-field struct compared member-by-member
/// in declaration order.
#[proc_macro_attribute]
pub fn complex_value_object(args: TokenStream, input: TokenStream) -> TokenStream {
    expand::expand(MarkerKind::ComplexValueObject, args.into(), input.into()).into()
}

/// Smart enum: a closed set of named instances sharing one key type.
#[proc_macro_attribute]
pub fn smart_enum(args: TokenStream, input: TokenStream) -> TokenStream {
    expand::expand(MarkerKind::SmartEnum, args.into(), input.into()).into()
}

/// Closed union over single-payload variants with generated dispatch.
#[proc_macro_attribute]
pub fn union_type(args: TokenStream, input: TokenStream) -> TokenStream {
    expand::expand(MarkerKind::Union, args.into(), input.into()).into()
}
