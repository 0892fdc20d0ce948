//! Minimal bounded LRU map.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

struct Slot<V> {
    value: V,
    last_used: u64,
}

/// A map holding at most `capacity` entries, evicting the least recently
/// used one on overflow.
///
/// Eviction scans all entries; capacities here are a few thousand at most.
pub struct LruCache<K, V> {
    map: HashMap<K, Slot<V>>,
    capacity: usize,
    clock: u64,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Creates an empty cache. A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Looks up a value, marking it as recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = self.tick();
        let slot = self.map.get_mut(key)?;
        slot.last_used = now;
        Some(&slot.value)
    }

    /// Returns true if `key` is cached, without touching its recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Inserts a value, evicting the least recently used entry when full.
    /// Returns the previous value for `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let now = self.tick();
        if let Some(slot) = self.map.get_mut(&key) {
            slot.last_used = now;
            return Some(std::mem::replace(&mut slot.value, value));
        }
        if self.map.len() >= self.capacity {
            self.evict_one();
        }
        self.map.insert(
            key,
            Slot {
                value,
                last_used: now,
            },
        );
        None
    }

    fn evict_one(&mut self) {
        let oldest = self
            .map
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.map.remove(&key);
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.remove(key).map(|slot| slot.value)
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.map.retain(|key, slot| keep(key, &slot.value));
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
