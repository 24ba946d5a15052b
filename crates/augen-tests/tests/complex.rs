//! Complex value objects: cross-member validation, member-order equality
//! and ordering, comparison overrides, default formatting.

use augen::{Decimal, ValidationError, complex_value_object, traits::MemberComparer};
use std::{
    cmp::Ordering,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

fn check_boundary(lower: &Decimal, upper: &Decimal) -> Result<(), ValidationError> {
    if lower < upper {
        Ok(())
    } else {
        Err(ValidationError::new("lower must be less than upper"))
    }
}

#[complex_value_object(validate_with = "check_boundary")]
pub struct Boundary {
    lower: Decimal,
    upper: Decimal,
}

#[complex_value_object(string_comparison = "ordinal_ignore_case")]
pub struct Customer {
    name: String,
    nickname: Option<String>,
}

pub struct ModuloComparer;

impl MemberComparer<u32> for ModuloComparer {
    fn cmp(a: &u32, b: &u32) -> Ordering {
        (a % 10).cmp(&(b % 10))
    }

    fn hash<H: Hasher>(value: &u32, state: &mut H) {
        (value % 10).hash(state);
    }
}

#[complex_value_object]
pub struct Bucket {
    #[member(compare_with = "ModuloComparer")]
    slot: u32,
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn cross_member_rule_gates_construction() {
    let ok = Boundary::try_new(Decimal::from(1), Decimal::from(2));
    assert!(ok.is_ok());

    let err = Boundary::try_new(Decimal::from(5), Decimal::from(2)).expect_err("rule rejects");
    assert_eq!(err.message(), "lower must be less than upper");
}

#[test]
fn equal_inputs_compare_equal_and_hash_identically() {
    let a = Boundary::try_new(Decimal::from(1), Decimal::from(2)).expect("valid");
    let b = Boundary::try_new(Decimal::from(1), Decimal::from(2)).expect("valid");

    assert_eq!(a, b);
    assert_eq!(a.cmp(&b), Ordering::Equal);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn ordering_breaks_ties_in_declaration_order() {
    let low = Boundary::try_new(Decimal::from(1), Decimal::from(2)).expect("valid");
    let high = Boundary::try_new(Decimal::from(1), Decimal::from(3)).expect("valid");

    // first member ties, the second decides
    assert_eq!(low.cmp(&high), Ordering::Less);
}

#[test]
fn accessors_expose_members_read_only() {
    let boundary = Boundary::try_new(Decimal::from(1), Decimal::from(2)).expect("valid");

    assert_eq!(boundary.lower(), &Decimal::from(1));
    assert_eq!(boundary.upper(), &Decimal::from(2));
}

#[test]
fn default_formatting_lists_members_in_order() {
    let boundary = Boundary::try_new(Decimal::from(1), Decimal::from(2)).expect("valid");

    assert_eq!(boundary.to_string(), "Boundary(lower: 1, upper: 2)");
}

#[test]
fn string_members_follow_the_type_default_comparison() {
    let a = Customer::try_new("Ada".to_string(), None).expect("valid");
    let b = Customer::try_new("ADA".to_string(), None).expect("valid");

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn nullable_members_compare_with_absent_before_present() {
    let none = Customer::try_new("Ada".to_string(), None).expect("valid");
    let some = Customer::try_new("Ada".to_string(), Some("Countess".to_string())).expect("valid");

    assert_ne!(none, some);
    assert_eq!(none.cmp(&some), Ordering::Less);
    assert_eq!(none.to_string(), "Customer(name: Ada, nickname: none)");
}

#[test]
fn declared_comparer_overrides_the_default_strategy() {
    let a = Bucket::try_new(12).expect("valid");
    let b = Bucket::try_new(42).expect("valid");
    let c = Bucket::try_new(13).expect("valid");

    assert_eq!(a, b, "12 and 42 share a slot modulo 10");
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_ne!(a, c);
}
