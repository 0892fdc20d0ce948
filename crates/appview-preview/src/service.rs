//! Preview service: the cached path from backend to preview frames.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use appview_model::{AppearanceItem, Category, SpriteReplacement};
use appview_sprite::{OutfitColors, RgbaImage};
use log::{debug, warn};
use tokio::task::JoinSet;

use crate::backend::AssetBackend;
use crate::cache::{AppearanceKey, CacheStats, Generation, PreviewCaches, SpriteList};
use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::sequence::{
    build_outfit_frame, compose_plan, plan_sequence, static_frame_index, OutfitFrameRequest,
    PreviewSequence,
};
use crate::worker::DecodeWorker;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builds and caches previews on top of an [`AssetBackend`].
///
/// Backend calls run on the blocking pool; decoding goes through a shared
/// [`DecodeWorker`]. All methods that touch the backend must run inside a
/// tokio runtime.
pub struct PreviewService {
    backend: Arc<dyn AssetBackend>,
    config: PreviewConfig,
    caches: Mutex<PreviewCaches>,
    worker: DecodeWorker,
}

impl PreviewService {
    /// Creates a service after validating `config`.
    pub fn new(backend: Arc<dyn AssetBackend>, config: PreviewConfig) -> Result<Self, PreviewError> {
        config.validate()?;
        Ok(Self {
            caches: Mutex::new(PreviewCaches::new(&config)),
            worker: DecodeWorker::new(config.decode_concurrency),
            backend,
            config,
        })
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn AssetBackend> {
        &self.backend
    }

    /// Appearance document, fetched from the backend.
    pub async fn appearance(
        &self,
        category: Category,
        id: u32,
    ) -> Result<AppearanceItem, PreviewError> {
        let backend = Arc::clone(&self.backend);
        let item =
            tokio::task::spawn_blocking(move || backend.appearance_details(category, id)).await??;
        Ok(item)
    }

    fn generation(&self, key: AppearanceKey) -> Generation {
        lock(&self.caches).generation(key)
    }

    /// Raw sprite bytes of an appearance, cached.
    pub async fn sprite_list(&self, category: Category, id: u32) -> Result<SpriteList, PreviewError> {
        let key = AppearanceKey::new(category, id);
        self.sprite_list_at(key, self.generation(key)).await
    }

    async fn sprite_list_at(
        &self,
        key: AppearanceKey,
        generation: Generation,
    ) -> Result<SpriteList, PreviewError> {
        let AppearanceKey { category, id } = key;
        if let Some(list) = lock(&self.caches).sprite_list(key) {
            debug!("sprite cache hit for {} #{}", category, id);
            return Ok(list);
        }

        debug!("sprite cache miss for {} #{}", category, id);
        let backend = Arc::clone(&self.backend);
        let raw =
            tokio::task::spawn_blocking(move || backend.appearance_sprites(category, id)).await??;
        let list: SpriteList = Arc::new(
            raw.into_iter()
                .map(|bytes| bytes.map(Arc::<[u8]>::from))
                .collect(),
        );
        lock(&self.caches).insert_sprite_list(key, generation, Arc::clone(&list));
        Ok(list)
    }

    /// Decodes the sprites at `indices`.
    ///
    /// The result has one slot per sprite of the appearance; only requested
    /// slots that decoded successfully are filled.
    pub async fn decoded_sprites(
        &self,
        category: Category,
        id: u32,
        indices: &[usize],
    ) -> Result<Vec<Option<Arc<RgbaImage>>>, PreviewError> {
        let key = AppearanceKey::new(category, id);
        self.decoded_sprites_at(key, self.generation(key), indices).await
    }

    async fn decoded_sprites_at(
        &self,
        key: AppearanceKey,
        generation: Generation,
        indices: &[usize],
    ) -> Result<Vec<Option<Arc<RgbaImage>>>, PreviewError> {
        let AppearanceKey { category, id } = key;
        let list = self.sprite_list_at(key, generation).await?;
        let mut decoded: Vec<Option<Arc<RgbaImage>>> = vec![None; list.len()];

        let mut jobs = JoinSet::new();
        for &index in indices {
            if index >= list.len() || decoded[index].is_some() {
                continue;
            }
            let sprite_key = key.sprite(index);
            if let Some(image) = lock(&self.caches).decoded(sprite_key) {
                decoded[index] = Some(image);
                continue;
            }
            let Some(bytes) = list[index].clone() else {
                warn!("{} #{}: sprite {} has no data", category, id, index);
                continue;
            };
            let worker = self.worker.clone();
            jobs.spawn(async move { (index, worker.decode(sprite_key, bytes).await) });
        }

        while let Some(joined) = jobs.join_next().await {
            let (index, image) = joined?;
            match image {
                Some(image) => {
                    lock(&self.caches).insert_decoded(
                        key.sprite(index),
                        generation,
                        Arc::clone(&image),
                    );
                    decoded[index] = Some(image);
                }
                None => warn!("{} #{}: sprite {} skipped, decode failed", category, id, index),
            }
        }
        Ok(decoded)
    }

    /// Cached preview sequence, without touching the backend.
    pub fn cached_sequence(&self, category: Category, id: u32) -> Option<Arc<PreviewSequence>> {
        lock(&self.caches).sequence(AppearanceKey::new(category, id))
    }

    /// Preview sequence of an appearance.
    ///
    /// Served from cache when possible. `Ok(None)` means the appearance has
    /// nothing to animate or none of its frames could be drawn; such results
    /// are not cached, nor is a sequence whose appearance was invalidated
    /// while it was being built.
    pub async fn preview_sequence(
        &self,
        category: Category,
        id: u32,
    ) -> Result<Option<Arc<PreviewSequence>>, PreviewError> {
        let key = AppearanceKey::new(category, id);
        let generation = {
            let caches = lock(&self.caches);
            if let Some(sequence) = caches.sequence(key) {
                debug!("preview cache hit for {} #{}", category, id);
                return Ok(Some(sequence));
            }
            caches.generation(key)
        };

        let item = self.appearance(category, id).await?;
        let Some(plan) = plan_sequence(category, &item, &self.config)? else {
            debug!("{} #{} has no animated frame group", category, id);
            return Ok(None);
        };
        let sprites = self
            .decoded_sprites_at(key, generation, &plan.sprite_indices())
            .await?;
        let Some(sequence) = compose_plan(&plan, &sprites) else {
            warn!("{} #{}: no preview frame could be drawn", category, id);
            return Ok(None);
        };

        debug!(
            "built preview for {} #{}: {} frames at {} ms",
            category,
            id,
            sequence.len(),
            sequence.interval_ms
        );
        let sequence = Arc::new(sequence);
        lock(&self.caches).insert_sequence(key, generation, Arc::clone(&sequence));
        Ok(Some(sequence))
    }

    /// Placeholder frame: the first sprite of group 0.
    pub async fn static_frame(
        &self,
        category: Category,
        id: u32,
    ) -> Result<Option<RgbaImage>, PreviewError> {
        let key = AppearanceKey::new(category, id);
        let generation = self.generation(key);
        let item = self.appearance(category, id).await?;
        let Some(index) = static_frame_index(&item) else {
            return Ok(None);
        };
        let sprites = self.decoded_sprites_at(key, generation, &[index]).await?;
        Ok(sprites.get(index).and_then(|s| s.as_deref()).cloned())
    }

    /// One interactive outfit frame with tinted color zones.
    pub async fn outfit_frame(
        &self,
        id: u32,
        request: &OutfitFrameRequest,
        colors: &OutfitColors,
    ) -> Result<Option<RgbaImage>, PreviewError> {
        let category = Category::Outfits;
        let key = AppearanceKey::new(category, id);
        let generation = self.generation(key);
        let item = self.appearance(category, id).await?;
        let list = self.sprite_list_at(key, generation).await?;
        // Every slot of the requested group
        let offsets = appview_sprite::compute_offsets(&item);
        let (Some(&base), Some(group)) =
            (offsets.get(request.group), item.frame_groups.get(request.group))
        else {
            return Ok(None);
        };
        let end = (base + group.sprite_count()).min(list.len());
        let indices: Vec<usize> = (base..end).collect();
        let sprites = self.decoded_sprites_at(key, generation, &indices).await?;
        Ok(build_outfit_frame(&item, &sprites, request, colors))
    }

    /// Replaces sprite slots, persists the backend and drops every cached
    /// artifact of the appearance.
    pub async fn replace_sprites_and_save(
        &self,
        category: Category,
        id: u32,
        group: usize,
        replacements: Vec<SpriteReplacement>,
    ) -> Result<(), PreviewError> {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || {
            backend.replace_sprites(category, id, group, &replacements)?;
            backend.persist()
        })
        .await??;

        self.invalidate(category, id);
        Ok(())
    }

    /// Drops every cached artifact of one appearance.
    pub fn invalidate(&self, category: Category, id: u32) {
        lock(&self.caches).invalidate(AppearanceKey::new(category, id));
    }

    pub fn cache_stats(&self) -> CacheStats {
        lock(&self.caches).stats()
    }

    /// Shuts the decode worker down; pending decodes resolve to nothing.
    pub fn shutdown(&self) {
        self.worker.shutdown();
    }
}
