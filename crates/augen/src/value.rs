use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

///
/// KeyValue
///
/// Type-erased representation of an underlying key. Integration layers
/// move values through this model instead of naming concrete key types;
/// narrow integer keys widen losslessly into the 64/128-bit carriers.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum KeyValue {
    Bool(bool),
    Char(char),
    Str(String),
    I64(i64),
    I128(i128),
    U64(u64),
    U128(u128),
    F64(f64),
    Decimal(Decimal),
}

impl KeyValue {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::Str(_) => "str",
            Self::I64(_) => "i64",
            Self::I128(_) => "i128",
            Self::U64(_) => "u64",
            Self::U128(_) => "u128",
            Self::F64(_) => "f64",
            Self::Decimal(_) => "decimal",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => value.fmt(f),
            Self::Char(value) => value.fmt(f),
            Self::Str(value) => value.fmt(f),
            Self::I64(value) => value.fmt(f),
            Self::I128(value) => value.fmt(f),
            Self::U64(value) => value.fmt(f),
            Self::U128(value) => value.fmt(f),
            Self::F64(value) => value.fmt(f),
            Self::Decimal(value) => value.fmt(f),
        }
    }
}

impl From<bool> for KeyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<char> for KeyValue {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i8> for KeyValue {
    fn from(value: i8) -> Self {
        Self::I64(i64::from(value))
    }
}

impl From<i16> for KeyValue {
    fn from(value: i16) -> Self {
        Self::I64(i64::from(value))
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        Self::I64(i64::from(value))
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<i128> for KeyValue {
    fn from(value: i128) -> Self {
        Self::I128(value)
    }
}

impl From<u8> for KeyValue {
    fn from(value: u8) -> Self {
        Self::U64(u64::from(value))
    }
}

impl From<u16> for KeyValue {
    fn from(value: u16) -> Self {
        Self::U64(u64::from(value))
    }
}

impl From<u32> for KeyValue {
    fn from(value: u32) -> Self {
        Self::U64(u64::from(value))
    }
}

impl From<u64> for KeyValue {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<u128> for KeyValue {
    fn from(value: u128) -> Self {
        Self::U128(value)
    }
}

impl From<f32> for KeyValue {
    fn from(value: f32) -> Self {
        Self::F64(f64::from(value))
    }
}

impl From<f64> for KeyValue {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<Decimal> for KeyValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_ints_widen_losslessly() {
        assert_eq!(KeyValue::from(7u16), KeyValue::U64(7));
        assert_eq!(KeyValue::from(-3i8), KeyValue::I64(-3));
    }

    #[test]
    fn display_matches_inner_value() {
        assert_eq!(KeyValue::from("CHF").to_string(), "CHF");
        assert_eq!(KeyValue::from(42i32).to_string(), "42");
    }
}
