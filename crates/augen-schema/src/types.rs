use darling::FromMeta;
use derive_more::Display;
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use serde::Serialize;
use std::str::FromStr;

use crate::fingerprint::{StructuralHash, StructuralHasher};

///
/// ScalarKind
///
/// Semantic tag of a resolved member type. Resolved once per member and
/// cached on the descriptor; every capability decision downstream reads
/// these tables instead of re-inspecting syntax.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize)]
#[remain::sorted]
pub enum ScalarKind {
    Bool,
    Char,
    Decimal,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    I128,
    String,
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl ScalarKind {
    #[must_use]
    pub const fn supports_arithmetic(self) -> bool {
        self.is_numeric()
    }

    // Strings get Ord through their comparison strategy; floats through
    // total_cmp. Every tag has a lawful total order.
    #[must_use]
    pub const fn supports_ord(self) -> bool {
        true
    }

    #[must_use]
    pub const fn supports_copy(self) -> bool {
        !matches!(self, Self::String)
    }

    /// Tags usable as a smart-enum key literal.
    #[must_use]
    pub const fn supports_enum_key(self) -> bool {
        matches!(self, Self::Bool | Self::Char | Self::String) || self.is_int()
    }

    /// Tags with a `Default` value the `disallow_default` flag can reject.
    #[must_use]
    pub const fn supports_default(self) -> bool {
        true
    }

    //
    // grouped helpers
    //

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.is_int() || self.is_float() || self.is_decimal()
    }

    #[must_use]
    pub const fn is_decimal(self) -> bool {
        matches!(self, Self::Decimal)
    }

    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    #[must_use]
    pub const fn is_signed_int(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::I128
        )
    }

    #[must_use]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::U128
        )
    }

    #[must_use]
    pub const fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::String)
    }

    ///
    /// Numeric promotion: operators over a narrower-than-32-bit key yield
    /// the promoted width. Returns `None` when no promotion applies. Both
    /// the arithmetic and the comparison emitters read this one decision.
    ///
    #[must_use]
    pub const fn promoted(self) -> Option<Self> {
        match self {
            Self::I8 | Self::I16 => Some(Self::I32),
            Self::U8 | Self::U16 => Some(Self::U32),
            _ => None,
        }
    }

    /// The Rust type this tag resolves to in emitted code.
    #[must_use]
    pub fn as_type(self) -> TokenStream {
        match self {
            Self::Bool => quote!(bool),
            Self::Char => quote!(char),
            Self::Decimal => quote!(::augen::Decimal),
            Self::F32 => quote!(f32),
            Self::F64 => quote!(f64),
            Self::String => quote!(::std::string::String),
            Self::I8 => quote!(i8),
            Self::I16 => quote!(i16),
            Self::I32 => quote!(i32),
            Self::I64 => quote!(i64),
            Self::I128 => quote!(i128),
            Self::U8 => quote!(u8),
            Self::U16 => quote!(u16),
            Self::U32 => quote!(u32),
            Self::U64 => quote!(u64),
            Self::U128 => quote!(u128),
        }
    }

    /// Spelling used in marker arguments and `FromStr`.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Decimal => "decimal",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::String => "string",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
        }
    }

    /// Resolve a syntactic type path to a tag, if it names a known scalar.
    #[must_use]
    pub fn from_type_ident(ident: &str) -> Option<Self> {
        match ident {
            "String" | "str" => Some(Self::String),
            "Decimal" => Some(Self::Decimal),
            other => other.parse().ok(),
        }
    }
}

impl FromStr for ScalarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "bool" => Self::Bool,
            "char" => Self::Char,
            "decimal" => Self::Decimal,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "i128" => Self::I128,
            "string" => Self::String,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            other => return Err(format!("unknown scalar kind '{other}'")),
        };

        Ok(kind)
    }
}

impl FromMeta for ScalarKind {
    fn from_string(s: &str) -> Result<Self, darling::Error> {
        s.parse::<Self>()
            .map_err(|_| darling::Error::unknown_value(s))
    }
}

impl ToTokens for ScalarKind {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = format_ident!("{self}");

        tokens.extend(quote!(::augen::schema::types::ScalarKind::#ident));
    }
}

impl StructuralHash for ScalarKind {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_str(self.keyword());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_only_widens_narrow_ints() {
        assert_eq!(ScalarKind::I8.promoted(), Some(ScalarKind::I32));
        assert_eq!(ScalarKind::I16.promoted(), Some(ScalarKind::I32));
        assert_eq!(ScalarKind::U8.promoted(), Some(ScalarKind::U32));
        assert_eq!(ScalarKind::U16.promoted(), Some(ScalarKind::U32));

        for kind in [
            ScalarKind::I32,
            ScalarKind::I64,
            ScalarKind::U128,
            ScalarKind::F32,
            ScalarKind::Decimal,
            ScalarKind::String,
        ] {
            assert_eq!(kind.promoted(), None, "{kind} must not promote");
        }
    }

    #[test]
    fn arithmetic_requires_a_numeric_tag() {
        assert!(ScalarKind::I64.supports_arithmetic());
        assert!(ScalarKind::Decimal.supports_arithmetic());
        assert!(!ScalarKind::String.supports_arithmetic());
        assert!(!ScalarKind::Bool.supports_arithmetic());
    }

    #[test]
    fn keyword_round_trips() {
        for kind in [
            ScalarKind::Bool,
            ScalarKind::Decimal,
            ScalarKind::I128,
            ScalarKind::String,
            ScalarKind::U16,
        ] {
            assert_eq!(kind.keyword().parse::<ScalarKind>(), Ok(kind));
        }
    }
}
