use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Bounded, time-limited memo table. Entries older than the TTL are treated
/// as absent; when full, expired entries go first, then the oldest insert.
pub struct TtlCache<K, V> {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let guard = self.entries.lock().expect("memo cache lock poisoned");
        guard
            .get(key)
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, v)| v.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        let mut guard = self.entries.lock().expect("memo cache lock poisoned");
        if !guard.contains_key(&key) && guard.len() >= self.capacity {
            let ttl = self.ttl;
            guard.retain(|_, (at, _)| at.elapsed() < ttl);
            if guard.len() >= self.capacity
                && let Some(oldest) = guard
                    .iter()
                    .min_by_key(|(_, (at, _))| *at)
                    .map(|(k, _)| k.clone())
            {
                guard.remove(&oldest);
            }
        }
        guard.insert(key, (Instant::now(), value));
    }

    /// Returns the cached value or computes, stores and returns a fresh one.
    /// Errors are not cached. The lock is not held while `f` runs.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &K,
        f: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = f()?;
        self.insert(key.clone(), value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("memo cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().expect("memo cache lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::TtlCache;

    #[test]
    fn hit_skips_the_computation() {
        let cache = TtlCache::new(4, Duration::from_secs(60));
        let mut calls = 0;
        for _ in 0..3 {
            let v: Result<i32, ()> = cache.get_or_try_insert_with(&"a", || {
                calls += 1;
                Ok(1)
            });
            assert_eq!(v, Ok(1));
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_ttl_never_hits() {
        let cache = TtlCache::new(4, Duration::ZERO);
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache: TtlCache<&str, i32> = TtlCache::new(4, Duration::from_secs(60));
        let first: Result<i32, &str> = cache.get_or_try_insert_with(&"a", || Err("down"));
        assert_eq!(first, Err("down"));
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let cache = TtlCache::new(2, Duration::from_secs(60));
        cache.insert(1, "one");
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(2, "two");
        cache.insert(3, "three");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&3), Some("three"));
    }
}
