use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use augen_schema::{node::DescriptorKind, types::ScalarKind};

use crate::{error::ValidationError, value::KeyValue};

///
/// TypeMetadata
///
/// Descriptor-derived conversion surface for one synthesized type, read by
/// out-of-core integration layers (ORM value conversion, serializers, web
/// binding) at their own initialization time. Entries are immutable and
/// derived purely from compile-time descriptors, so there is no teardown.
///

pub struct TypeMetadata {
    pub type_name: &'static str,
    pub kind: DescriptorKind,
    pub key: Option<ScalarKind>,

    /// Structural fingerprint of the descriptor this entry was derived
    /// from, for cache-coherence checks in tooling.
    pub fingerprint: u64,

    /// Convert an instance to its underlying key representation. Returns
    /// `None` when the value is not actually of this entry's type.
    pub to_key: fn(&dyn Any) -> Option<KeyValue>,

    /// Construct through the full validation contract.
    pub try_from_key: fn(KeyValue) -> Result<Box<dyn Any>, ValidationError>,

    /// Validation entry point over the erased key model.
    pub validate_key: fn(&KeyValue) -> Result<(), ValidationError>,
}

///
/// REGISTRY
/// lazily-populated, append-mostly side table
///

static REGISTRY: LazyLock<RwLock<HashMap<TypeId, &'static TypeMetadata>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn registry_read() -> RwLockReadGuard<'static, HashMap<TypeId, &'static TypeMetadata>> {
    REGISTRY
        .read()
        .expect("metadata registry poisoned while acquiring read lock")
}

fn registry_write() -> RwLockWriteGuard<'static, HashMap<TypeId, &'static TypeMetadata>> {
    REGISTRY
        .write()
        .expect("metadata registry poisoned while acquiring write lock")
}

///
/// HasMetadata
///
/// Implemented by generated code; `metadata()` returns a `'static` entry
/// built from the type's descriptor.
///

pub trait HasMetadata {
    fn metadata() -> &'static TypeMetadata;
}

/// Register a synthesized type. Idempotent; generated `ctor` blocks call
/// this at startup, and `metadata_of` falls back to it lazily.
pub fn register<T: HasMetadata + 'static>() {
    let mut map = registry_write();
    map.entry(TypeId::of::<T>()).or_insert_with(T::metadata);
}

/// Look up an entry for a statically known type. A miss for a type that
/// was never synthesized is `None`, not an error.
#[must_use]
pub fn lookup<T: 'static>() -> Option<&'static TypeMetadata> {
    registry_read().get(&TypeId::of::<T>()).copied()
}

/// Look up an entry, populating it on first use. Safe for concurrent
/// callers; all observe the same `'static` entry.
#[must_use]
pub fn metadata_of<T: HasMetadata + 'static>() -> &'static TypeMetadata {
    if let Some(found) = lookup::<T>() {
        return found;
    }

    register::<T>();
    T::metadata()
}

/// Textual lookup for integration layers that only hold a type name.
#[must_use]
pub fn find_by_name(name: &str) -> Option<&'static TypeMetadata> {
    registry_read()
        .values()
        .find(|meta| meta.type_name == name)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(i64);

    fn probe_to_key(value: &dyn Any) -> Option<KeyValue> {
        value.downcast_ref::<Probe>().map(|v| KeyValue::from(v.0))
    }

    fn probe_try_from_key(key: KeyValue) -> Result<Box<dyn Any>, ValidationError> {
        match key {
            KeyValue::I64(value) => Ok(Box::new(Probe(value))),
            other => Err(ValidationError::new(format!(
                "expected an i64 key, found {}",
                other.kind_name()
            ))),
        }
    }

    fn probe_validate_key(key: &KeyValue) -> Result<(), ValidationError> {
        key.as_i64()
            .map(|_| ())
            .ok_or_else(|| ValidationError::new("expected an i64 key"))
    }

    static PROBE_METADATA: TypeMetadata = TypeMetadata {
        type_name: "registry::tests::Probe",
        kind: DescriptorKind::KeyedValueObject,
        key: Some(ScalarKind::I64),
        fingerprint: 0xfeed,
        to_key: probe_to_key,
        try_from_key: probe_try_from_key,
        validate_key: probe_validate_key,
    };

    impl HasMetadata for Probe {
        fn metadata() -> &'static TypeMetadata {
            &PROBE_METADATA
        }
    }

    #[test]
    fn populate_on_first_use_then_cached() {
        let first = metadata_of::<Probe>();
        let second = lookup::<Probe>().expect("cached after first use");

        assert!(std::ptr::eq(first, second));
        assert_eq!(first.type_name, "registry::tests::Probe");
    }

    #[test]
    fn conversions_round_trip_through_the_contract() {
        let meta = metadata_of::<Probe>();

        let boxed = (meta.try_from_key)(KeyValue::from(41i64)).expect("valid key");
        let key = (meta.to_key)(boxed.as_ref()).expect("same type");

        assert_eq!(key, KeyValue::I64(41));
        assert!((meta.validate_key)(&KeyValue::from("nope")).is_err());
    }

    #[test]
    fn miss_is_none_not_an_error() {
        struct NeverSynthesized;

        assert!(lookup::<NeverSynthesized>().is_none());
        assert!(find_by_name("no::such::Type").is_none());
    }
}
