//! Configuration marker argument shapes.
//!
//! Every marker carries a fixed, enumerable configuration object parsed
//! with darling; unrecognized fields or values become `MarkerArgs`
//! diagnostics at the builder stage rather than silently falling back.

use darling::FromMeta;
use derive_more::Display;
use serde::Serialize;
use std::str::FromStr;

use crate::{
    fingerprint::{StructuralHash, StructuralHasher},
    types::ScalarKind,
};

///
/// MarkerKind
///
/// The recognized configuration markers. The scanner matches these by the
/// final attribute path segment only; argument resolution happens later.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize)]
#[remain::sorted]
pub enum MarkerKind {
    ComplexValueObject,
    SmartEnum,
    Union,
    ValueObject,
}

impl MarkerKind {
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::ValueObject => "value_object",
            Self::ComplexValueObject => "complex_value_object",
            Self::SmartEnum => "smart_enum",
            Self::Union => "union_type",
        }
    }

    #[must_use]
    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "value_object" => Some(Self::ValueObject),
            "complex_value_object" => Some(Self::ComplexValueObject),
            "smart_enum" => Some(Self::SmartEnum),
            "union_type" => Some(Self::Union),
            _ => None,
        }
    }
}

impl StructuralHash for MarkerKind {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_str(self.attribute());
    }
}

///
/// StringComparison
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize)]
pub enum StringComparison {
    #[default]
    Ordinal,
    OrdinalIgnoreCase,
}

impl FromStr for StringComparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ordinal" => Ok(Self::Ordinal),
            "ordinal_ignore_case" => Ok(Self::OrdinalIgnoreCase),
            other => Err(format!("unknown string comparison '{other}'")),
        }
    }
}

impl FromMeta for StringComparison {
    fn from_string(s: &str) -> Result<Self, darling::Error> {
        s.parse::<Self>()
            .map_err(|_| darling::Error::unknown_value(s))
    }
}

impl StructuralHash for StringComparison {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_bool(matches!(self, Self::OrdinalIgnoreCase));
    }
}

///
/// OperatorMode
///
/// Generation mode for one operator family. `Default` emits operators
/// between two instances only; `DefaultWithKeyOverloads` adds overloads
/// accepting the raw key type on either operand side.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize)]
pub enum OperatorMode {
    None,
    #[default]
    Default,
    DefaultWithKeyOverloads,
}

impl OperatorMode {
    #[must_use]
    pub const fn is_emitted(self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub const fn key_overloads(self) -> bool {
        matches!(self, Self::DefaultWithKeyOverloads)
    }
}

impl FromStr for OperatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "default" => Ok(Self::Default),
            "default_with_key_overloads" => Ok(Self::DefaultWithKeyOverloads),
            other => Err(format!("unknown operator mode '{other}'")),
        }
    }
}

impl FromMeta for OperatorMode {
    fn from_string(s: &str) -> Result<Self, darling::Error> {
        s.parse::<Self>()
            .map_err(|_| darling::Error::unknown_value(s))
    }
}

impl StructuralHash for OperatorMode {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        let tag = match self {
            Self::None => 0u64,
            Self::Default => 1,
            Self::DefaultWithKeyOverloads => 2,
        };
        h.write_u64(tag);
    }
}

///
/// DiscriminatorNaming
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize)]
pub enum DiscriminatorNaming {
    #[default]
    VariantName,
    SnakeCase,
    KebabCase,
}

impl FromStr for DiscriminatorNaming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "variant_name" => Ok(Self::VariantName),
            "snake_case" => Ok(Self::SnakeCase),
            "kebab_case" => Ok(Self::KebabCase),
            other => Err(format!("unknown discriminator naming '{other}'")),
        }
    }
}

impl FromMeta for DiscriminatorNaming {
    fn from_string(s: &str) -> Result<Self, darling::Error> {
        s.parse::<Self>()
            .map_err(|_| darling::Error::unknown_value(s))
    }
}

impl StructuralHash for DiscriminatorNaming {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        let tag = match self {
            Self::VariantName => 0u64,
            Self::SnakeCase => 1,
            Self::KebabCase => 2,
        };
        h.write_u64(tag);
    }
}

///
/// SwitchMapMode
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize)]
pub enum SwitchMapMode {
    None,
    SwitchOnly,
    MapOnly,
    #[default]
    Both,
}

impl SwitchMapMode {
    #[must_use]
    pub const fn emits_switch(self) -> bool {
        matches!(self, Self::SwitchOnly | Self::Both)
    }

    #[must_use]
    pub const fn emits_map(self) -> bool {
        matches!(self, Self::MapOnly | Self::Both)
    }
}

impl FromStr for SwitchMapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "switch_only" => Ok(Self::SwitchOnly),
            "map_only" => Ok(Self::MapOnly),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown switch/map mode '{other}'")),
        }
    }
}

impl FromMeta for SwitchMapMode {
    fn from_string(s: &str) -> Result<Self, darling::Error> {
        s.parse::<Self>()
            .map_err(|_| darling::Error::unknown_value(s))
    }
}

impl StructuralHash for SwitchMapMode {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        let tag = match self {
            Self::None => 0u64,
            Self::SwitchOnly => 1,
            Self::MapOnly => 2,
            Self::Both => 3,
        };
        h.write_u64(tag);
    }
}

fn default_true() -> bool {
    true
}

///
/// EqualityArgs
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, FromMeta, Serialize)]
pub struct EqualityArgs {
    #[darling(default)]
    pub comparison: StringComparison,
}

impl StructuralHash for EqualityArgs {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        self.comparison.structural_hash(h);
    }
}

///
/// ArithmeticArgs
///
/// Family-wide `mode` plus per-operator overrides. A per-operator setting
/// is more specific than the family mode and wins when both are present.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, FromMeta, Serialize)]
pub struct ArithmeticArgs {
    #[darling(default)]
    pub mode: Option<OperatorMode>,

    #[darling(default)]
    pub add: Option<OperatorMode>,

    #[darling(default)]
    pub sub: Option<OperatorMode>,

    #[darling(default)]
    pub mul: Option<OperatorMode>,

    #[darling(default)]
    pub div: Option<OperatorMode>,
}

impl ArithmeticArgs {
    /// True when any operator could be emitted.
    #[must_use]
    pub fn any_requested(&self) -> bool {
        self.mode.is_some_and(OperatorMode::is_emitted)
            || [self.add, self.sub, self.mul, self.div]
                .iter()
                .any(|op| op.is_some_and(OperatorMode::is_emitted))
    }
}

impl StructuralHash for ArithmeticArgs {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        for op in [self.mode, self.add, self.sub, self.mul, self.div] {
            op.structural_hash(h);
        }
    }
}

///
/// ConversionArgs
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromMeta, Serialize)]
pub struct ConversionArgs {
    #[darling(default = "default_true")]
    pub into_key: bool,

    #[darling(default = "default_true")]
    pub try_from_key: bool,

    #[darling(default = "default_true")]
    pub as_ref: bool,
}

impl Default for ConversionArgs {
    fn default() -> Self {
        Self {
            into_key: true,
            try_from_key: true,
            as_ref: true,
        }
    }
}

impl StructuralHash for ConversionArgs {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_bool(self.into_key);
        h.write_bool(self.try_from_key);
        h.write_bool(self.as_ref);
    }
}

///
/// NullHandlingArgs
///

#[derive(Clone, Copy, Debug, Default, FromMeta, Serialize)]
pub struct NullHandlingArgs {
    /// Empty or whitespace-only raw input short-circuits to a null result
    /// with no error, before any user-supplied hook runs.
    #[darling(default)]
    pub empty_yields_none: bool,

    /// Reject the key type's `Default` value at validation time.
    #[darling(default)]
    pub disallow_default: bool,
}

impl StructuralHash for NullHandlingArgs {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_bool(self.empty_yields_none);
        h.write_bool(self.disallow_default);
    }
}

///
/// ValueObjectArgs
///

#[derive(Clone, Debug, FromMeta)]
pub struct ValueObjectArgs {
    pub key: ScalarKind,

    #[darling(default)]
    pub equality: EqualityArgs,

    #[darling(default)]
    pub ordering: OperatorMode,

    #[darling(default)]
    pub arithmetic: ArithmeticArgs,

    #[darling(default)]
    pub conversion: ConversionArgs,

    #[darling(default)]
    pub null_handling: NullHandlingArgs,

    #[darling(default)]
    pub validate_with: Option<String>,

    #[darling(default)]
    pub default_instance: Option<String>,

    #[darling(default)]
    pub skip_parse: bool,

    #[darling(default)]
    pub skip_display: bool,
}

///
/// ComplexValueObjectArgs
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct ComplexValueObjectArgs {
    #[darling(default)]
    pub string_comparison: StringComparison,

    #[darling(default)]
    pub skip_ordering: bool,

    #[darling(default)]
    pub skip_display: bool,

    #[darling(default)]
    pub validate_with: Option<String>,
}

///
/// SmartEnumArgs
///

#[derive(Clone, Debug, FromMeta)]
pub struct SmartEnumArgs {
    pub key: ScalarKind,

    #[darling(default)]
    pub validatable: bool,
}

///
/// UnionArgs
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct UnionArgs {
    #[darling(default)]
    pub discriminator_naming: DiscriminatorNaming,

    #[darling(default)]
    pub switch_map: SwitchMapMode,

    #[darling(default)]
    pub string_comparison: StringComparison,
}

///
/// MemberArgs
///
/// Per-field `#[member(...)]` overrides on complex value objects.
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct MemberArgs {
    #[darling(default)]
    pub comparison: Option<StringComparison>,

    /// Path to a `MemberComparer` implementation. More specific than
    /// `comparison`; wins when both are declared.
    #[darling(default)]
    pub compare_with: Option<String>,
}

///
/// ItemArgs
///
/// Per-variant `#[item(...)]` on smart enums.
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct ItemArgs {
    #[darling(default)]
    pub key: Option<syn::Lit>,

    #[darling(default)]
    pub invalid: bool,
}

///
/// VariantArgs
///
/// Per-variant `#[variant(...)]` on unions.
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct VariantArgs {
    #[darling(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use darling::FromMeta;
    use quote::quote;

    fn parse_value_object(tokens: proc_macro2::TokenStream) -> darling::Result<ValueObjectArgs> {
        let meta: syn::Meta = syn::parse_quote!(value_object(#tokens));
        let nested = darling::ast::NestedMeta::parse_meta_list(match meta {
            syn::Meta::List(list) => list.tokens,
            _ => unreachable!(),
        })
        .expect("meta list");

        ValueObjectArgs::from_list(&nested)
    }

    #[test]
    fn minimal_marker_parses_with_defaults() {
        let args = parse_value_object(quote!(key = "i32")).expect("parse");

        assert_eq!(args.key, ScalarKind::I32);
        assert_eq!(args.ordering, OperatorMode::Default);
        assert!(args.conversion.into_key);
        assert!(!args.null_handling.empty_yields_none);
        assert!(!args.arithmetic.any_requested());
    }

    #[test]
    fn per_operator_modes_parse() {
        let args = parse_value_object(quote!(
            key = "u16",
            arithmetic(mode = "default", div = "none"),
            ordering = "default_with_key_overloads"
        ))
        .expect("parse");

        assert_eq!(args.arithmetic.mode, Some(OperatorMode::Default));
        assert_eq!(args.arithmetic.div, Some(OperatorMode::None));
        assert!(args.ordering.key_overloads());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse_value_object(quote!(key = "i32", frobnicate = true));

        assert!(err.is_err(), "unrecognized arguments must not fall back");
    }

    #[test]
    fn unknown_values_are_rejected() {
        let err = parse_value_object(quote!(key = "i32", ordering = "sometimes"));

        assert!(err.is_err());
    }
}
