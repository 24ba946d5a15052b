use std::{cmp::Ordering, hash::Hasher};

///
/// Inner
///
/// Access to the wrapped key of a keyed value object.
///

pub trait Inner<T> {
    fn inner(&self) -> &T;

    fn into_inner(self) -> T;
}

///
/// ValidatableEnum
///
/// Implemented by validatable smart enums, the one documented exception to
/// the "valid instance or structured error" contract: a lookup miss yields
/// a well-defined invalid-but-non-null instance that must be checked.
///

pub trait ValidatableEnum {
    fn is_valid(&self) -> bool;
}

///
/// MemberComparer
///
/// A declared comparison override for one member. Implementations are unit
/// types referenced by path from the marker; all three operations must
/// agree (`eq` iff `cmp == Equal`, equal values hash identically).
///

pub trait MemberComparer<T: ?Sized> {
    fn cmp(a: &T, b: &T) -> Ordering;

    fn eq(a: &T, b: &T) -> bool {
        Self::cmp(a, b) == Ordering::Equal
    }

    fn hash<H: Hasher>(value: &T, state: &mut H);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hash;

    struct CaseFold;

    impl MemberComparer<String> for CaseFold {
        fn cmp(a: &String, b: &String) -> Ordering {
            a.bytes()
                .map(|byte| byte.to_ascii_lowercase())
                .cmp(b.bytes().map(|byte| byte.to_ascii_lowercase()))
        }

        fn hash<H: Hasher>(value: &String, state: &mut H) {
            value.to_ascii_lowercase().hash(state);
        }
    }

    #[test]
    fn default_eq_agrees_with_cmp() {
        let a = "Hello".to_string();
        let b = "hello".to_string();

        assert!(CaseFold::eq(&a, &b));
        assert_eq!(CaseFold::cmp(&a, &b), Ordering::Equal);
    }
}
