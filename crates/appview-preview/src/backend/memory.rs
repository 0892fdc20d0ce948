//! In-memory asset backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use appview_model::{AppearanceItem, Category, SpriteReplacement};

use super::{apply_replacements, AssetBackend, BackendError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Backend holding appearances and sprites in memory.
///
/// `persist` only counts calls. Useful for tests and for embedding callers
/// that already hold decoded asset data.
#[derive(Default)]
pub struct MemoryBackend {
    appearances: Mutex<HashMap<(Category, u32), AppearanceItem>>,
    sprites: Mutex<HashMap<u32, Vec<u8>>>,
    persists: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an appearance.
    pub fn insert_appearance(&self, category: Category, item: AppearanceItem) {
        lock(&self.appearances).insert((category, item.id), item);
    }

    /// Adds or replaces the encoded bytes of a sprite id.
    pub fn insert_sprite(&self, sprite_id: u32, bytes: Vec<u8>) {
        lock(&self.sprites).insert(sprite_id, bytes);
    }

    /// Builder form of [`insert_appearance`](Self::insert_appearance).
    pub fn with_appearance(self, category: Category, item: AppearanceItem) -> Self {
        self.insert_appearance(category, item);
        self
    }

    /// Builder form of [`insert_sprite`](Self::insert_sprite).
    pub fn with_sprite(self, sprite_id: u32, bytes: Vec<u8>) -> Self {
        self.insert_sprite(sprite_id, bytes);
        self
    }

    /// Number of `persist` calls so far.
    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

impl AssetBackend for MemoryBackend {
    fn appearance_details(
        &self,
        category: Category,
        id: u32,
    ) -> Result<AppearanceItem, BackendError> {
        lock(&self.appearances)
            .get(&(category, id))
            .cloned()
            .ok_or(BackendError::NotFound { category, id })
    }

    fn appearance_sprites(
        &self,
        category: Category,
        id: u32,
    ) -> Result<Vec<Option<Vec<u8>>>, BackendError> {
        let item = self.appearance_details(category, id)?;
        let sprites = lock(&self.sprites);
        Ok(item
            .frame_groups
            .iter()
            .filter_map(|group| group.sprite_info.as_ref())
            .flat_map(|info| info.sprite_ids.iter())
            .map(|sprite_id| sprites.get(sprite_id).cloned())
            .collect())
    }

    fn replace_sprites(
        &self,
        category: Category,
        id: u32,
        group: usize,
        replacements: &[SpriteReplacement],
    ) -> Result<(), BackendError> {
        let mut appearances = lock(&self.appearances);
        let item = appearances
            .get_mut(&(category, id))
            .ok_or(BackendError::NotFound { category, id })?;
        apply_replacements(item, category, group, replacements)
    }

    fn persist(&self) -> Result<(), BackendError> {
        self.persists.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
