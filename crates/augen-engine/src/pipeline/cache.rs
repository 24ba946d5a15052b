use std::{
    collections::HashMap,
    hash::Hash,
    sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// OnceCache
///
/// Concurrent map with at-most-once computation per key. Keys are
/// structural values, so two unrelated inputs that resolve to the same
/// shape share one computation. Contention is limited to the map lock on
/// slot lookup and to per-key initialization inside the `OnceLock`.
///

pub struct OnceCache<K, V> {
    slots: Mutex<HashMap<K, Arc<OnceLock<V>>>>,
    computations: AtomicU64,
}

impl<K, V> Default for OnceCache<K, V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            computations: AtomicU64::new(0),
        }
    }
}

impl<K, V> OnceCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached value for `key`, computing it at most once across
    /// all concurrent callers.
    pub fn get_or_init(&self, key: &K, init: impl FnOnce() -> V) -> V {
        let slot = {
            let mut slots = self
                .slots
                .lock()
                .expect("cache mutex poisoned while acquiring slot");
            slots.entry(key.clone()).or_default().clone()
        };

        slot.get_or_init(|| {
            self.computations.fetch_add(1, Ordering::Relaxed);
            init()
        })
        .clone()
    }

    /// Number of computations actually run; cache hits do not count.
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .expect("cache mutex poisoned while reading length")
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn equal_keys_compute_once() {
        let cache: OnceCache<u64, u64> = OnceCache::new();

        let first = cache.get_or_init(&7, || 70);
        let second = cache.get_or_init(&7, || 700);

        assert_eq!(first, 70);
        assert_eq!(second, 70, "second caller must observe the cached value");
        assert_eq!(cache.computations(), 1);
    }

    #[test]
    fn concurrent_callers_share_one_computation() {
        let cache: OnceCache<u64, u64> = OnceCache::new();
        let runs = AtomicU32::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    cache.get_or_init(&42, || {
                        runs.fetch_add(1, Ordering::SeqCst);
                        420
                    });
                });
            }
        });

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(cache.computations(), 1);
    }

    #[test]
    fn distinct_keys_compute_independently() {
        let cache: OnceCache<u64, u64> = OnceCache::new();

        cache.get_or_init(&1, || 10);
        cache.get_or_init(&2, || 20);

        assert_eq!(cache.computations(), 2);
        assert_eq!(cache.len(), 2);
    }
}
