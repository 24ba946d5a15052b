//! Strategy planner.
//!
//! Turns a `TypeDescriptor` into a conflict-free `Plan`: per-member
//! comparison strategies, the promotion decision, per-family operator
//! modes, and the flattened union dispatch surface. Conflicts resolve by
//! letting the more specific setting win, and every resolution is recorded
//! on the plan so emitters never re-derive a decision.

mod promotion;
mod strategy;

pub use promotion::PromotionPlan;
pub use strategy::{ComparisonStrategy, resolve_member_strategy};

use convert_case::{Case, Casing};
use serde::Serialize;

use crate::prelude::*;

///
/// MemberPlan
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MemberPlan {
    pub ident: String,
    pub type_path: String,
    pub nullable: bool,
    pub strategy: ComparisonStrategy,
}

///
/// EqualityPlan / OrderingPlan
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EqualityPlan {
    /// Emit `PartialEq<Key>` overloads on both operand sides.
    pub key_overloads: bool,
    pub members: Vec<MemberPlan>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OrderingPlan {
    pub key_overloads: bool,
    pub members: Vec<MemberPlan>,
}

///
/// ArithmeticPlan
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    pub const ALL: [Self; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    #[must_use]
    pub const fn trait_name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Mul => "Mul",
            Self::Div => "Div",
        }
    }

    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ArithmeticPlan {
    /// Operators that are actually emitted, with their resolved mode.
    pub ops: Vec<(ArithmeticOp, OperatorMode)>,
}

///
/// ConversionPlan
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ConversionPlan {
    pub into_key: bool,
    pub try_from_key: bool,
    pub as_ref: bool,
    pub parse: bool,
    pub display: bool,
}

///
/// FactoryPlan
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FactoryPlan {
    pub contract: ValidationContract,
}

///
/// LookupPlan
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LookupPlan {
    pub validatable: bool,
    pub parse: bool,
    pub display: bool,
}

///
/// DispatchPlan
///
/// The flattened dispatch surface of a union tree, computed once. Leaves
/// appear in declaration order (depth-first); internal nodes only exist on
/// the partial surface, where a more specific leaf branch overrides them.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BranchPlan {
    /// Parameter/builder-method ident, derived from the variant path.
    pub param: String,
    pub payload_path: String,
    /// Variant idents from the root to this node.
    pub variant_path: Vec<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DispatchPlan {
    pub emits_switch: bool,
    pub emits_map: bool,
    pub leaves: Vec<BranchPlan>,
    pub internals: Vec<BranchPlan>,
}

///
/// Decision
///
/// One recorded conflict resolution.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Decision {
    pub subject: String,
    pub outcome: String,
}

///
/// Plan
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Plan {
    pub path: String,
    pub promotion: Option<PromotionPlan>,
    pub equality: Option<EqualityPlan>,
    pub ordering: Option<OrderingPlan>,
    pub arithmetic: Option<ArithmeticPlan>,
    pub conversion: Option<ConversionPlan>,
    pub factory: Option<FactoryPlan>,
    pub lookup: Option<LookupPlan>,
    pub dispatch: Option<DispatchPlan>,
    pub decisions: Vec<Decision>,
}

impl Plan {
    fn empty(path: String) -> Self {
        Self {
            path,
            promotion: None,
            equality: None,
            ordering: None,
            arithmetic: None,
            conversion: None,
            factory: None,
            lookup: None,
            dispatch: None,
            decisions: Vec::new(),
        }
    }
}

/// Produce the plan for one descriptor.
pub fn plan(descriptor: &TypeDescriptor) -> Result<Plan, Diagnostics> {
    match descriptor {
        TypeDescriptor::Keyed(keyed) => plan_keyed(keyed),
        TypeDescriptor::Complex(complex) => plan_complex(complex),
        TypeDescriptor::SmartEnum(node) => Ok(plan_smart_enum(node)),
        TypeDescriptor::Union(union) => plan_union(union),
    }
}

fn plan_keyed(keyed: &KeyedValueObject) -> Result<Plan, Diagnostics> {
    let mut out = Plan::empty(keyed.def.path());
    let kind = keyed.key_kind();

    let strategy = resolve_member_strategy(&keyed.key, keyed.equality.comparison);
    let member = MemberPlan {
        ident: keyed.key.ident.clone(),
        type_path: keyed.key.type_path.clone(),
        nullable: false,
        strategy,
    };

    // Computed once; arithmetic and comparison emitters share it.
    if kind.is_numeric() {
        out.promotion = Some(PromotionPlan::resolve(kind));
    }

    out.equality = Some(EqualityPlan {
        key_overloads: keyed.ordering.key_overloads(),
        members: vec![member.clone()],
    });

    if keyed.ordering.is_emitted() {
        out.ordering = Some(OrderingPlan {
            key_overloads: keyed.ordering.key_overloads(),
            members: vec![member],
        });
    }

    out.arithmetic = plan_arithmetic(&keyed.arithmetic, &keyed.def.path(), &mut out.decisions);

    out.conversion = Some(ConversionPlan {
        into_key: keyed.conversion.into_key,
        try_from_key: keyed.conversion.try_from_key,
        as_ref: keyed.conversion.as_ref,
        parse: !keyed.skip_parse,
        display: !keyed.skip_display,
    });

    out.factory = Some(FactoryPlan {
        contract: keyed.contract.clone(),
    });

    Ok(out)
}

// Per-operator settings are more specific than the family mode and win;
// each such conflict is recorded.
fn plan_arithmetic(
    args: &ArithmeticArgs,
    path: &str,
    decisions: &mut Vec<Decision>,
) -> Option<ArithmeticPlan> {
    let family = args.mode;
    let mut ops = Vec::new();

    for (op, specific) in [
        (ArithmeticOp::Add, args.add),
        (ArithmeticOp::Sub, args.sub),
        (ArithmeticOp::Mul, args.mul),
        (ArithmeticOp::Div, args.div),
    ] {
        let resolved = specific.or(family).unwrap_or(OperatorMode::None);

        if let (Some(specific_mode), Some(family_mode)) = (specific, family)
            && specific_mode != family_mode
        {
            decisions.push(Decision {
                subject: format!("{path}::{}", op.method()),
                outcome: format!(
                    "operator-level '{specific_mode}' overrides family-level '{family_mode}'"
                ),
            });
        }

        if resolved.is_emitted() {
            ops.push((op, resolved));
        }
    }

    if ops.is_empty() { None } else { Some(ArithmeticPlan { ops }) }
}

fn plan_complex(complex: &ComplexValueObject) -> Result<Plan, Diagnostics> {
    let mut out = Plan::empty(complex.def.path());
    let mut diags = Diagnostics::new();

    let members: Vec<MemberPlan> = complex
        .members
        .iter()
        .map(|member| MemberPlan {
            ident: member.ident.clone(),
            type_path: member.type_path.clone(),
            nullable: member.nullable,
            strategy: resolve_member_strategy(member, complex.string_comparison),
        })
        .collect();

    out.equality = Some(EqualityPlan {
        key_overloads: false,
        members: members.clone(),
    });

    if !complex.skip_ordering {
        // Ordering requires every compared member to carry a total order.
        for (member, planned) in complex.members.iter().zip(&members) {
            if let SemanticType::Descriptor(dref) = &member.ty
                && !dref.ordered
                && matches!(planned.strategy, ComparisonStrategy::Nested { .. })
            {
                diags.error(
                    DiagnosticId::UnsupportedOperator,
                    complex.def.path(),
                    format!(
                        "ordering requires member '{}' type '{}' to emit a total order",
                        member.ident, dref.path
                    ),
                );
            }
        }

        out.ordering = Some(OrderingPlan {
            key_overloads: false,
            members,
        });
    }

    let display = complex.displays();
    if !display && !complex.skip_display {
        out.decisions.push(Decision {
            subject: format!("{}::display", complex.def.path()),
            outcome: "default formatting dropped: a member type has none".to_string(),
        });
    }

    out.conversion = Some(ConversionPlan {
        into_key: false,
        try_from_key: false,
        as_ref: false,
        parse: false,
        display,
    });

    out.factory = Some(FactoryPlan {
        contract: complex.contract.clone(),
    });

    diags.result()?;

    Ok(out)
}

fn plan_smart_enum(node: &SmartEnum) -> Plan {
    let mut out = Plan::empty(node.def.path());

    out.lookup = Some(LookupPlan {
        validatable: node.validatable,
        parse: node.key_kind.is_text(),
        display: true,
    });

    out
}

fn plan_union(union: &Union) -> Result<Plan, Diagnostics> {
    let mut out = Plan::empty(union.def.path());
    let mut leaves = Vec::new();
    let mut internals = Vec::new();

    flatten_branches(union, &mut Vec::new(), &mut leaves, &mut internals);

    let mut diags = Diagnostics::new();

    // Parent dispatch delegates into nested dispatch, so an internal node
    // must emit at least the shapes its parent does.
    for variant in &union.variants {
        if let VariantKind::Nested(nested) = &variant.kind {
            if union.switch_map.emits_switch() && !nested.switch_map.emits_switch() {
                diags.error(
                    DiagnosticId::UnsupportedOperator,
                    union.def.path(),
                    format!("nested union '{}' does not emit switch", nested.def.path()),
                );
            }
            if union.switch_map.emits_map() && !nested.switch_map.emits_map() {
                diags.error(
                    DiagnosticId::UnsupportedOperator,
                    union.def.path(),
                    format!("nested union '{}' does not emit map", nested.def.path()),
                );
            }
        }
    }

    // Builder-method idents must be unique across the flattened tree and
    // must not collide with the generated dispatch surface.
    const RESERVED: [&str; 4] = ["switch", "map", "partial_switch", "discriminator"];
    let mut seen = std::collections::BTreeSet::new();
    for branch in leaves.iter().chain(&internals) {
        if !seen.insert(branch.param.clone()) {
            diags.error(
                DiagnosticId::DuplicateDiscriminator,
                union.def.path(),
                format!("dispatch branch '{}' resolves twice", branch.param),
            );
        }
        if RESERVED.contains(&branch.param.as_str()) {
            diags.error(
                DiagnosticId::InvalidIdent,
                union.def.path(),
                format!("dispatch branch '{}' collides with the generated surface", branch.param),
            );
        }
    }
    diags.result()?;

    out.dispatch = Some(DispatchPlan {
        emits_switch: union.switch_map.emits_switch(),
        emits_map: union.switch_map.emits_map(),
        leaves,
        internals,
    });

    Ok(out)
}

// Depth-first, declaration order. Leaf params concatenate the variant path
// so `Rounded -> Pill` dispatches as `rounded_pill`.
fn flatten_branches(
    union: &Union,
    prefix: &mut Vec<String>,
    leaves: &mut Vec<BranchPlan>,
    internals: &mut Vec<BranchPlan>,
) {
    for variant in &union.variants {
        prefix.push(variant.ident.clone());

        let param = prefix
            .iter()
            .map(|segment| segment.to_case(Case::Snake))
            .collect::<Vec<_>>()
            .join("_");

        let branch = BranchPlan {
            param,
            payload_path: variant.payload_path.clone(),
            variant_path: prefix.clone(),
        };

        match &variant.kind {
            VariantKind::Leaf => leaves.push(branch),
            VariantKind::Nested(nested) => {
                internals.push(branch);
                flatten_branches(nested, prefix, leaves, internals);
            }
        }

        prefix.pop();
    }
}
