//! Keyed value objects: factories, validation short-circuits, operators,
//! promotion, conversions, parsing.

use augen::{Decimal, ValidationError, traits::Inner, value_object};
use std::{cmp::Ordering, collections::hash_map::DefaultHasher, hash::{Hash, Hasher}, str::FromStr};

#[value_object(key = "decimal", arithmetic(mode = "default"))]
pub struct Amount(Decimal);

#[value_object(key = "i64", default_instance = "ZERO", null_handling(disallow_default = true))]
pub struct Balance(i64);

#[value_object(
    key = "u16",
    arithmetic(mode = "default_with_key_overloads"),
    ordering = "default_with_key_overloads"
)]
pub struct SmallCount(u16);

fn check_name(value: &String) -> Result<(), ValidationError> {
    if value.len() > 16 {
        return Err(ValidationError::new("name too long"));
    }

    Ok(())
}

#[value_object(
    key = "string",
    null_handling(empty_yields_none = true),
    validate_with = "check_name"
)]
pub struct ProductName(String);

#[value_object(key = "string", equality(comparison = "ordinal_ignore_case"))]
pub struct Tag(String);

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn try_new_accepts_and_wraps() {
    let amount = Amount::try_new(Decimal::from(10)).expect("valid");

    assert_eq!(Decimal::from(amount), Decimal::from(10));
    assert_eq!(amount.inner(), &Decimal::from(10));
    assert_eq!(amount.to_string(), "10");
}

#[test]
fn default_instance_bypasses_the_default_value_check() {
    // the well-known constant exists even though validation rejects zero
    assert_eq!(i64::from(Balance::ZERO), 0);

    let err = Balance::try_new(0).expect_err("default value rejected");
    assert!(err.message().contains("Balance"));

    assert!(Balance::try_new(5).is_ok());
}

#[test]
fn arithmetic_yields_the_raw_key_type() {
    let a = Amount::try_new(Decimal::from(10)).expect("valid");
    let b = Amount::try_new(Decimal::from(4)).expect("valid");

    let sum: Decimal = a + b;
    assert_eq!(sum, Decimal::from(14));

    let diff: Decimal = a - b;
    assert_eq!(diff, Decimal::from(6));
}

#[test]
fn promotion_widens_narrow_keys_consistently() {
    let a = SmallCount::try_new(40_000).expect("valid");
    let b = SmallCount::try_new(40_000).expect("valid");

    // a + b yields the promoted type; the sum exceeds u16::MAX on purpose
    let sum: u32 = a + b;
    assert_eq!(sum, 80_000);

    // key overloads on either operand side, same output type
    let left: u32 = a + 5u16;
    let right: u32 = 5u16 + b;
    assert_eq!(left, 40_005);
    assert_eq!(right, 40_005);

    // the comparison overloads use the same promotion decision
    assert!(a > 5u16);
    assert!(5u16 < b);
    assert!(a == 40_000u16);
}

#[test]
fn equality_implies_identical_ordering_and_hashing() {
    let a = SmallCount::try_new(7).expect("valid");
    let b = SmallCount::try_new(7).expect("valid");

    assert_eq!(a, b);
    assert_eq!(a.cmp(&b), Ordering::Equal);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn empty_and_whitespace_input_yield_none_with_no_error() {
    assert_eq!(ProductName::try_new(String::new()).expect("no error"), None);
    assert_eq!(
        ProductName::try_new("   ".to_string()).expect("no error"),
        None
    );
    assert_eq!(ProductName::try_new_opt(None).expect("no error"), None);
}

#[test]
fn other_invalid_input_yields_a_structured_error() {
    let err = ProductName::try_new("a very very long product name".to_string())
        .expect_err("hook must reject");

    assert_eq!(err, ValidationError::new("name too long"));
    assert_eq!(err.message(), "name too long");
}

#[test]
fn valid_input_yields_an_instance() {
    let name = ProductName::try_new("Widget".to_string())
        .expect("no error")
        .expect("instance");

    assert_eq!(name.to_string(), "Widget");
}

#[test]
fn ignore_case_keys_compare_and_hash_case_folded() {
    let a = Tag::try_new("Rust".to_string()).expect("valid");
    let b = Tag::try_new("rust".to_string()).expect("valid");

    assert_eq!(a, b);
    assert_eq!(a.cmp(&b), Ordering::Equal);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn parsing_funnels_through_validation() {
    let parsed = SmallCount::from_str("41").expect("parses");
    assert_eq!(parsed, SmallCount::try_new(41).expect("valid"));

    assert!(SmallCount::from_str("not a number").is_err());

    let err = ProductName::from_str("a very very long product name").expect_err("hook rejects");
    assert_eq!(err.message(), "name too long");
}

#[test]
fn conversions_round_trip_without_bypassing_validation() {
    let count = SmallCount::try_from(9u16).expect("valid");
    assert_eq!(u16::from(count), 9);
    assert_eq!(count.as_ref(), &9u16);

    // an empty-yields-none contract cannot produce an instance from
    // empty input, so TryFrom reports a structured error instead
    assert!(ProductName::try_from(String::new()).is_err());
}

#[test]
#[should_panic(expected = "invalid")]
fn panicking_factory_is_a_thin_layer_over_try_new() {
    let _ = ProductName::new("a very very long product name".to_string());
}
