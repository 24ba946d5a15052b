//! The metadata registry as an integration layer consumes it: typed and
//! textual lookup, key conversions, validation entry point.

use augen::{
    Decimal, KeyValue,
    registry::{self, HasMetadata},
    schema::{node::DescriptorKind, types::ScalarKind},
    value_object,
};
use std::any::Any;

fn check_positive(value: &Decimal) -> Result<(), augen::ValidationError> {
    if value.is_sign_negative() {
        return Err(augen::ValidationError::new("price must not be negative"));
    }

    Ok(())
}

#[value_object(key = "decimal", validate_with = "check_positive")]
pub struct Price(Decimal);

#[test]
fn synthesized_types_self_register() {
    let meta = registry::lookup::<Price>().expect("registered at startup");

    assert_eq!(meta.type_name, "Price");
    assert_eq!(meta.kind, DescriptorKind::KeyedValueObject);
    assert_eq!(meta.key, Some(ScalarKind::Decimal));
}

#[test]
fn lazy_lookup_and_eager_registration_agree() {
    let lazy = registry::metadata_of::<Price>();
    let eager = registry::lookup::<Price>().expect("registered");

    assert!(std::ptr::eq(lazy, eager));
    assert!(std::ptr::eq(lazy, Price::metadata()));
}

#[test]
fn textual_lookup_finds_the_same_entry() {
    let by_name = registry::find_by_name("Price").expect("registered");

    assert_eq!(by_name.type_name, "Price");
    assert!(registry::find_by_name("no::such::Type").is_none());
}

#[test]
fn conversions_route_through_the_validation_contract() {
    let meta = registry::metadata_of::<Price>();

    let boxed = (meta.try_from_key)(KeyValue::from(Decimal::from(42))).expect("valid key");
    let price = boxed.downcast_ref::<Price>().expect("concrete type");

    let key = (meta.to_key)(price as &dyn Any).expect("same type");
    assert_eq!(key, KeyValue::Decimal(Decimal::from(42)));

    // validation is never bypassed
    let err = (meta.try_from_key)(KeyValue::from(Decimal::from(-1))).expect_err("hook rejects");
    assert_eq!(err.message(), "price must not be negative");

    // wrong key kind is a structured error, not a panic
    assert!((meta.validate_key)(&KeyValue::from("nope")).is_err());
    assert!((meta.validate_key)(&KeyValue::from(Decimal::from(1))).is_ok());
}

#[test]
fn fingerprint_is_stable_for_the_compiled_descriptor() {
    let a = registry::metadata_of::<Price>().fingerprint;
    let b = registry::metadata_of::<Price>().fingerprint;

    assert_eq!(a, b);
    assert_ne!(a, 0);
}
