use serde::Serialize;

use crate::{
    fingerprint::{StructuralHash, StructuralHasher},
    prelude::*,
};

///
/// Visibility
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Visibility {
    #[default]
    Public,
    Crate,
    Private,
}

impl StructuralHash for Visibility {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        let tag = match self {
            Self::Public => 0u64,
            Self::Crate => 1,
            Self::Private => 2,
        };
        h.write_u64(tag);
    }
}

///
/// Def
///
/// Declaration identity shared by every descriptor kind: where the type
/// lives, what it is called, and how it is declared.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Def {
    pub module_path: String,
    pub ident: String,
    pub vis: Visibility,
    pub generic_arity: u8,
}

impl Def {
    #[must_use]
    pub fn new(module_path: impl Into<String>, ident: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            ident: ident.into(),
            vis: Visibility::Public,
            generic_arity: 0,
        }
    }

    /// Fully-qualified descriptor path used in diagnostics and the registry.
    #[must_use]
    pub fn path(&self) -> String {
        if self.module_path.is_empty() {
            self.ident.clone()
        } else {
            format!("{}::{}", self.module_path, self.ident)
        }
    }
}

impl ValidateNode for Def {
    fn validate(&self) -> Diagnostics {
        let mut diags = Diagnostics::new();

        if let Err(msg) = crate::validate::naming::validate_ident(&self.ident) {
            diags.error(DiagnosticId::InvalidIdent, self.path(), msg);
        }

        diags
    }
}

impl StructuralHash for Def {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_tag("def");
        h.write_str(&self.module_path);
        h.write_str(&self.ident);
        self.vis.structural_hash(h);
        h.write_u64(u64::from(self.generic_arity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_joins_module_and_ident() {
        let def = Def::new("orders::money", "Amount");
        assert_eq!(def.path(), "orders::money::Amount");

        let root = Def::new("", "Amount");
        assert_eq!(root.path(), "Amount");
    }

    #[test]
    fn reserved_ident_fails_validation() {
        let def = Def::new("demo", "crate");
        assert!(def.validate().has_errors());
    }
}
