use serde::Serialize;
use std::fmt;
use xxhash_rust::xxh3::Xxh3;

///
/// Fingerprint
///
/// Structural identity of a stage output. Two values with identical shape
/// produce identical fingerprints regardless of where or when they were
/// built, which is what makes them usable as incremental-cache keys.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Fingerprint a raw token text. Used by the scanner, where only the
    /// declaration's own tokens may contribute.
    #[must_use]
    pub fn of_text(text: &str) -> Self {
        let mut hasher = StructuralHasher::new();
        hasher.write_str(text);
        hasher.finish()
    }

    /// Fingerprint any structurally hashable value.
    #[must_use]
    pub fn of<T: StructuralHash + ?Sized>(value: &T) -> Self {
        let mut hasher = StructuralHasher::new();
        value.structural_hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

///
/// StructuralHasher
///
/// Length-prefixed xxh3 writer. Length prefixes keep adjacent fields from
/// colliding ("ab" + "c" vs "a" + "bc").
///

pub struct StructuralHasher {
    inner: Xxh3,
}

impl Default for StructuralHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralHasher {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Xxh3::new() }
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_u64(value.len() as u64);
        self.inner.update(value.as_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.inner.update(&value.to_le_bytes());
    }

    pub fn write_u128(&mut self, value: u128) {
        self.inner.update(&value.to_le_bytes());
    }

    pub fn write_i128(&mut self, value: i128) {
        self.inner.update(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.inner.update(&[u8::from(value)]);
    }

    /// Domain-separation tag written at the head of every node.
    pub fn write_tag(&mut self, tag: &'static str) {
        self.write_str(tag);
    }

    #[must_use]
    pub fn finish(&self) -> Fingerprint {
        Fingerprint(self.inner.digest())
    }
}

///
/// StructuralHash
///

pub trait StructuralHash {
    fn structural_hash(&self, h: &mut StructuralHasher);
}

impl StructuralHash for str {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_str(self);
    }
}

impl StructuralHash for String {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_str(self);
    }
}

impl StructuralHash for bool {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_bool(*self);
    }
}

impl StructuralHash for u8 {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_u64(u64::from(*self));
    }
}

impl StructuralHash for u64 {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_u64(*self);
    }
}

impl<T: StructuralHash> StructuralHash for Option<T> {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        match self {
            Some(value) => {
                h.write_bool(true);
                value.structural_hash(h);
            }
            None => h.write_bool(false),
        }
    }
}

impl<T: StructuralHash> StructuralHash for Vec<T> {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        h.write_u64(self.len() as u64);
        for item in self {
            item.structural_hash(h);
        }
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for &T {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        (**self).structural_hash(h);
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for Box<T> {
    fn structural_hash(&self, h: &mut StructuralHasher) {
        (**self).structural_hash(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_input_identical_fingerprint() {
        assert_eq!(Fingerprint::of_text("pub struct A(u8);"), Fingerprint::of_text("pub struct A(u8);"));
    }

    #[test]
    fn length_prefix_separates_adjacent_fields() {
        let mut a = StructuralHasher::new();
        a.write_str("ab");
        a.write_str("c");

        let mut b = StructuralHasher::new();
        b.write_str("a");
        b.write_str("bc");

        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn option_presence_is_part_of_the_shape() {
        let some = Fingerprint::of(&Some("x".to_string()));
        let none = Fingerprint::of(&None::<String>);

        assert_ne!(some, none);
    }
}
