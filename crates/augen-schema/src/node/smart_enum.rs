use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use serde::Serialize;

use crate::{
    fingerprint::{StructuralHash, StructuralHasher},
    prelude::*,
};

///
/// KeyLit
///
/// A compile-time-enumerable smart-enum key. Floats and decimals are not
/// reliable match-arm literals, so they are rejected as key kinds.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum KeyLit {
    Bool(bool),
    Char(char),
    Int(i128),
    Str(String),
}

impl KeyLit {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::Int(_) => "int",
            Self::Str(_) => "str",
        }
    }

    /// Whether this literal fits the declared key tag.
    #[must_use]
    pub const fn matches(&self, key: ScalarKind) -> bool {
        match self {
            Self::Bool(_) => matches!(key, ScalarKind::Bool),
            Self::Char(_) => matches!(key, ScalarKind::Char),
            Self::Str(_) => matches!(key, ScalarKind::String),
            Self::Int(_) => key.is_int(),
        }
    }
}

impl ToTokens for KeyLit {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self {
            Self::Bool(v) => quote!(#v),
            Self::Char(v) => quote!(#v),
            Self::Str(v) => quote!(#v),
            Self::Int(v) => {
                let lit = proc_macro2::Literal::i128_unsuffixed(*v);
                quote!(#lit)
            }
        });
    }
}

impl StructuralHash for KeyLit {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        match self {
            Self::Bool(v) => {
                h.write_tag("bool");
                h.write_bool(*v);
            }
            Self::Char(v) => {
                h.write_tag("char");
                h.write_u64(u64::from(*v));
            }
            Self::Int(v) => {
                h.write_tag("int");
                h.write_i128(*v);
            }
            Self::Str(v) => {
                h.write_tag("str");
                h.write_str(v);
            }
        }
    }
}

///
/// EnumItem
///
/// One named instance of a smart enum.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EnumItem {
    pub ident: String,
    pub key: KeyLit,
}

impl StructuralHash for EnumItem {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("item");
        h.write_str(&self.ident);
        self.key.structural_hash(h);
    }
}

///
/// SmartEnum
///
/// A closed, compile-time-enumerable set of named instances sharing one
/// key type. A validatable enum designates exactly one payload variant as
/// the invalid-instance factory; lookup misses return it carrying the raw
/// key instead of failing.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SmartEnum {
    pub def: Def,
    pub key_kind: ScalarKind,
    pub validatable: bool,
    pub items: Vec<EnumItem>,

    /// Ident of the `#[item(invalid)]` variant; present iff validatable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_item: Option<String>,
}

impl ValidateNode for SmartEnum {
    fn validate(&self) -> Diagnostics {
        let mut diags = self.def.validate();
        let path = self.def.path();

        if !self.key_kind.supports_enum_key() {
            diags.error(
                DiagnosticId::UnsupportedEnumKey,
                &path,
                format!("'{}' cannot be a smart-enum key", self.key_kind),
            );
        }

        if self.items.is_empty() {
            diags.error(
                DiagnosticId::EmptyMemberList,
                &path,
                "smart enum requires at least one named instance",
            );
        }

        crate::validate::members::validate_enum_items(&path, self, &mut diags);

        match (&self.invalid_item, self.validatable) {
            (None, true) => diags.error(
                DiagnosticId::MissingInvalidItem,
                &path,
                "validatable smart enum requires one #[item(invalid)] variant",
            ),
            (Some(ident), false) => diags.error(
                DiagnosticId::ConflictingFlags,
                &path,
                format!("invalid item '{ident}' declared on a non-validatable enum"),
            ),
            _ => {}
        }

        diags
    }
}

impl StructuralHash for SmartEnum {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("smart_enum");
        self.def.structural_hash(h);
        self.key_kind.structural_hash(h);
        h.write_bool(self.validatable);
        self.items.structural_hash(h);
        self.invalid_item.structural_hash(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn currency() -> SmartEnum {
        SmartEnum {
            def: Def::new("demo", "Currency"),
            key_kind: ScalarKind::String,
            validatable: false,
            items: vec![
                EnumItem {
                    ident: "Chf".into(),
                    key: KeyLit::Str("CHF".into()),
                },
                EnumItem {
                    ident: "Eur".into(),
                    key: KeyLit::Str("EUR".into()),
                },
            ],
            invalid_item: None,
        }
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut e = currency();
        e.items.push(EnumItem {
            ident: "Franc".into(),
            key: KeyLit::Str("CHF".into()),
        });

        let diags = e.validate();
        assert!(diags.iter().any(|d| d.id == DiagnosticId::DuplicateEnumKey));
    }

    #[test]
    fn validatable_without_invalid_item_is_rejected() {
        let mut e = currency();
        e.validatable = true;

        let diags = e.validate();
        assert!(diags.iter().any(|d| d.id == DiagnosticId::MissingInvalidItem));
    }

    #[test]
    fn float_keys_are_rejected() {
        let mut e = currency();
        e.key_kind = ScalarKind::F64;

        let diags = e.validate();
        assert!(diags.iter().any(|d| d.id == DiagnosticId::UnsupportedEnumKey));
    }
}
