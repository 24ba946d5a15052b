//! Smart enums: closed instance sets, key lookup, and the documented
//! invalid-instance exception for validatable enums.

use augen::{smart_enum, traits::ValidatableEnum};
use std::str::FromStr;

#[smart_enum(key = "string")]
pub enum Currency {
    #[item(key = "CHF")]
    Chf,
    #[item(key = "EUR")]
    Eur,
    #[item(key = "USD")]
    Usd,
}

#[smart_enum(key = "i32", validatable)]
pub enum Level {
    #[item(key = 1)]
    Low,
    #[item(key = 2)]
    Medium,
    #[item(key = 3)]
    High,
    #[item(invalid)]
    Unknown(i32),
}

#[test]
fn items_enumerate_in_declaration_order() {
    assert_eq!(Currency::items(), &[Currency::Chf, Currency::Eur, Currency::Usd]);
    assert_eq!(Currency::count(), 3);

    // the invalid carrier is not a named instance
    assert_eq!(Level::count(), 3);
    assert_eq!(Level::items().len(), 3);
}

#[test]
fn lookup_by_key_finds_the_instance() {
    assert_eq!(Currency::try_get("EUR").expect("known key"), Currency::Eur);
    assert_eq!(Level::try_get(2).expect("known key"), Level::Medium);
}

#[test]
fn lookup_miss_is_a_structured_error() {
    let err = Currency::try_get("XXX").expect_err("unknown key");

    assert!(err.message().contains("Currency"));
    assert!(err.message().contains("XXX"));
}

#[test]
fn validatable_miss_returns_the_invalid_instance() {
    let level = Level::get(7);

    assert_eq!(level, Level::Unknown(7));
    assert!(!level.is_valid());
    assert_eq!(level.key(), 7);

    let known = Level::get(3);
    assert_eq!(known, Level::High);
    assert!(known.is_valid());
}

#[test]
fn keys_round_trip_through_display_and_parse() {
    assert_eq!(Currency::Chf.key(), "CHF");
    assert_eq!(Currency::Chf.to_string(), "CHF");
    assert_eq!(Currency::from_str("CHF").expect("parses"), Currency::Chf);
    assert!(Currency::from_str("chf").is_err(), "lookup is exact");
}

#[test]
fn the_trait_view_matches_the_inherent_one() {
    fn check(value: &impl ValidatableEnum) -> bool {
        value.is_valid()
    }

    assert!(check(&Level::Low));
    assert!(!check(&Level::Unknown(9)));
}
