//! Process-wide preview caches.
//!
//! Three layers, all keyed by appearance: raw sprite bytes as served by the
//! backend, decoded sprites, and finished preview sequences. Whenever the
//! backend reports a change to an appearance, all three are invalidated for
//! it together.
//!
//! Each appearance also carries a generation, bumped on invalidation. Builders
//! read it before their first backend call and hand it back on insert; an
//! insert whose generation is no longer current is dropped.

mod lru;

pub use lru::LruCache;

use std::collections::HashMap;
use std::sync::Arc;

use appview_model::Category;
use appview_sprite::RgbaImage;
use log::debug;

use crate::config::PreviewConfig;
use crate::sequence::PreviewSequence;

/// Encoded bytes of one sprite.
pub type SpriteBytes = Arc<[u8]>;

/// Sprites of one appearance in aggregated order; `None` where the backend
/// has no data.
pub type SpriteList = Arc<Vec<Option<SpriteBytes>>>;

/// Identity of an appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppearanceKey {
    pub category: Category,
    pub id: u32,
}

impl AppearanceKey {
    pub fn new(category: Category, id: u32) -> Self {
        Self { category, id }
    }

    /// Key of one sprite of this appearance.
    pub fn sprite(self, index: usize) -> SpriteKey {
        SpriteKey {
            appearance: self,
            index,
        }
    }
}

/// Identity of one sprite: its appearance and aggregated index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteKey {
    pub appearance: AppearanceKey,
    pub index: usize,
}

/// Entry counts of each cache layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub sprite_lists: usize,
    pub decoded_sprites: usize,
    pub sequences: usize,
}

/// Generation of an appearance's cached data.
pub type Generation = u64;

/// The three cache layers.
pub struct PreviewCaches {
    sprites: LruCache<AppearanceKey, SpriteList>,
    decoded: LruCache<SpriteKey, Arc<RgbaImage>>,
    sequences: HashMap<AppearanceKey, Arc<PreviewSequence>>,
    generations: HashMap<AppearanceKey, Generation>,
}

impl PreviewCaches {
    /// Creates empty caches sized from `config`.
    pub fn new(config: &PreviewConfig) -> Self {
        Self {
            sprites: LruCache::new(config.sprite_cache_capacity),
            decoded: LruCache::new(config.decoded_cache_capacity),
            sequences: HashMap::new(),
            generations: HashMap::new(),
        }
    }

    /// Current generation of an appearance; 0 until first invalidated.
    pub fn generation(&self, key: AppearanceKey) -> Generation {
        self.generations.get(&key).copied().unwrap_or(0)
    }

    fn is_current(&self, key: AppearanceKey, generation: Generation) -> bool {
        let current = self.generation(key) == generation;
        if !current {
            debug!(
                "dropping stale insert for {} #{} (generation {})",
                key.category, key.id, generation
            );
        }
        current
    }

    pub fn sprite_list(&mut self, key: AppearanceKey) -> Option<SpriteList> {
        self.sprites.get(&key).cloned()
    }

    /// Stores sprite bytes read at `generation`. Returns whether they were kept.
    pub fn insert_sprite_list(
        &mut self,
        key: AppearanceKey,
        generation: Generation,
        sprites: SpriteList,
    ) -> bool {
        if !self.is_current(key, generation) {
            return false;
        }
        self.sprites.insert(key, sprites);
        true
    }

    pub fn decoded(&mut self, key: SpriteKey) -> Option<Arc<RgbaImage>> {
        self.decoded.get(&key).cloned()
    }

    pub fn insert_decoded(
        &mut self,
        key: SpriteKey,
        generation: Generation,
        image: Arc<RgbaImage>,
    ) -> bool {
        if !self.is_current(key.appearance, generation) {
            return false;
        }
        self.decoded.insert(key, image);
        true
    }

    pub fn sequence(&self, key: AppearanceKey) -> Option<Arc<PreviewSequence>> {
        self.sequences.get(&key).cloned()
    }

    pub fn insert_sequence(
        &mut self,
        key: AppearanceKey,
        generation: Generation,
        sequence: Arc<PreviewSequence>,
    ) -> bool {
        if !self.is_current(key, generation) {
            return false;
        }
        self.sequences.insert(key, sequence);
        true
    }

    /// Drops everything cached for one appearance and starts a new generation.
    pub fn invalidate(&mut self, key: AppearanceKey) {
        self.sprites.remove(&key);
        self.decoded.retain(|sprite, _| sprite.appearance != key);
        self.sequences.remove(&key);
        let generation = self.generations.entry(key).or_insert(0);
        *generation += 1;
        debug!(
            "invalidated caches for {} #{}, now generation {}",
            key.category, key.id, generation
        );
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            sprite_lists: self.sprites.len(),
            decoded_sprites: self.decoded.len(),
            sequences: self.sequences.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sequence() -> Arc<PreviewSequence> {
        Arc::new(PreviewSequence {
            group_index: 0,
            frames: vec![RgbaImage::new(1, 1)],
            interval_ms: 100,
        })
    }

    #[test]
    fn test_invalidate_touches_only_one_appearance() {
        let mut caches = PreviewCaches::new(&PreviewConfig::default());
        let torch = AppearanceKey::new(Category::Objects, 2050);
        let other = AppearanceKey::new(Category::Outfits, 2050);

        for key in [torch, other] {
            caches.insert_sprite_list(key, 0, Arc::new(vec![None]));
            caches.insert_decoded(key.sprite(0), 0, Arc::new(RgbaImage::new(1, 1)));
            caches.insert_decoded(key.sprite(1), 0, Arc::new(RgbaImage::new(1, 1)));
            caches.insert_sequence(key, 0, sequence());
        }
        caches.invalidate(torch);
        assert_eq!((caches.generation(torch), caches.generation(other)), (1, 0));

        assert!(caches.sprite_list(torch).is_none());
        assert!(caches.decoded(torch.sprite(1)).is_none());
        assert!(caches.sequence(torch).is_none());
        assert_eq!(
            caches.stats(),
            CacheStats {
                sprite_lists: 1,
                decoded_sprites: 2,
                sequences: 1,
            }
        );
    }

    #[test]
    fn test_decoded_cache_is_bounded() {
        let config = PreviewConfig {
            decoded_cache_capacity: 3,
            ..Default::default()
        };
        let mut caches = PreviewCaches::new(&config);
        let key = AppearanceKey::new(Category::Effects, 1);
        for index in 0..10 {
            caches.insert_decoded(key.sprite(index), 0, Arc::new(RgbaImage::new(1, 1)));
        }
        assert_eq!(caches.stats().decoded_sprites, 3);
        assert!(caches.decoded(key.sprite(9)).is_some());
        assert!(caches.decoded(key.sprite(0)).is_none());
    }

    #[test]
    fn test_inserts_from_before_invalidation_are_dropped() {
        let mut caches = PreviewCaches::new(&PreviewConfig::default());
        let key = AppearanceKey::new(Category::Effects, 7);
        let started = caches.generation(key);

        caches.invalidate(key);

        assert!(!caches.insert_sprite_list(key, started, Arc::new(vec![None])));
        assert!(!caches.insert_decoded(key.sprite(0), started, Arc::new(RgbaImage::new(1, 1))));
        assert!(!caches.insert_sequence(key, started, sequence()));
        assert_eq!(caches.stats(), CacheStats::default());

        let current = caches.generation(key);
        assert!(caches.insert_sequence(key, current, sequence()));
        assert!(caches.sequence(key).is_some());
    }
}
