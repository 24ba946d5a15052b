use serde::Serialize;

use crate::prelude::*;

///
/// PromotionPlan
///
/// The numeric-promotion decision for a keyed numeric type, computed once
/// per plan. Both the arithmetic and the comparison emitters read this
/// value; neither re-derives it, so they can never diverge.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PromotionPlan {
    pub key: ScalarKind,
    pub output: ScalarKind,
}

impl PromotionPlan {
    #[must_use]
    pub fn resolve(key: ScalarKind) -> Self {
        Self {
            key,
            output: key.promoted().unwrap_or(key),
        }
    }

    /// True when the operator surface yields a type other than the
    /// declared key type.
    #[must_use]
    pub fn widens(&self) -> bool {
        self.output != self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_keys_widen_once() {
        let plan = PromotionPlan::resolve(ScalarKind::U16);

        assert!(plan.widens());
        assert_eq!(plan.output, ScalarKind::U32);
    }

    #[test]
    fn natural_width_keys_pass_through() {
        for kind in [ScalarKind::I64, ScalarKind::F32, ScalarKind::Decimal] {
            let plan = PromotionPlan::resolve(kind);
            assert!(!plan.widens());
            assert_eq!(plan.output, kind);
        }
    }
}
