//! Asset backend over a plain directory.
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   Objects/<id>.json      appearance documents, one per id
//!   Outfits/<id>.json
//!   Effects/<id>.json
//!   Missiles/<id>.json
//!   sprites/<sprite_id>.png
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use appview_model::{AppearanceItem, Category, SpriteReplacement};
use log::{debug, info};

use super::{apply_replacements, AssetBackend, BackendError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Backend reading JSON documents and PNG sprites from a directory tree.
///
/// Replacements are held in memory, shadowing the files, until `persist`
/// writes the changed documents back.
pub struct DirectoryBackend {
    root: PathBuf,
    dirty: Mutex<BTreeMap<(Category, u32), AppearanceItem>>,
}

impl DirectoryBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dirty: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of an appearance document.
    pub fn appearance_path(&self, category: Category, id: u32) -> PathBuf {
        self.root.join(category.as_str()).join(format!("{}.json", id))
    }

    /// Path of a sprite image.
    pub fn sprite_path(&self, sprite_id: u32) -> PathBuf {
        self.root.join("sprites").join(format!("{}.png", sprite_id))
    }

    /// Ids of every appearance document in a category, ascending.
    pub fn list_ids(&self, category: Category) -> Result<Vec<u32>, BackendError> {
        let dir = self.root.join(category.as_str());
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// Number of appearances with unsaved replacements.
    pub fn pending_changes(&self) -> usize {
        lock(&self.dirty).len()
    }

    fn load(&self, category: Category, id: u32) -> Result<AppearanceItem, BackendError> {
        let path = self.appearance_path(category, id);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BackendError::NotFound { category, id })
            }
            Err(e) => return Err(e.into()),
        };
        debug!("loaded {}", path.display());
        Ok(AppearanceItem::from_json(&json)?)
    }
}

impl AssetBackend for DirectoryBackend {
    fn appearance_details(
        &self,
        category: Category,
        id: u32,
    ) -> Result<AppearanceItem, BackendError> {
        if let Some(item) = lock(&self.dirty).get(&(category, id)) {
            return Ok(item.clone());
        }
        self.load(category, id)
    }

    fn appearance_sprites(
        &self,
        category: Category,
        id: u32,
    ) -> Result<Vec<Option<Vec<u8>>>, BackendError> {
        let item = self.appearance_details(category, id)?;
        let mut sprites = Vec::new();
        for info in item.frame_groups.iter().filter_map(|g| g.sprite_info.as_ref()) {
            for &sprite_id in &info.sprite_ids {
                match fs::read(self.sprite_path(sprite_id)) {
                    Ok(bytes) => sprites.push(Some(bytes)),
                    Err(e) if e.kind() == ErrorKind::NotFound => sprites.push(None),
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(sprites)
    }

    fn replace_sprites(
        &self,
        category: Category,
        id: u32,
        group: usize,
        replacements: &[SpriteReplacement],
    ) -> Result<(), BackendError> {
        let mut dirty = lock(&self.dirty);
        let mut item = match dirty.get(&(category, id)) {
            Some(item) => item.clone(),
            None => self.load(category, id)?,
        };
        apply_replacements(&mut item, category, group, replacements)?;
        dirty.insert((category, id), item);
        Ok(())
    }

    fn persist(&self) -> Result<(), BackendError> {
        let mut dirty = lock(&self.dirty);
        while let Some(((category, id), item)) = dirty.pop_first() {
            let path = self.appearance_path(category, id);
            let json = match item.to_json_pretty() {
                Ok(json) => json,
                Err(e) => {
                    dirty.insert((category, id), item);
                    return Err(e.into());
                }
            };
            if let Err(e) = fs::write(&path, json) {
                dirty.insert((category, id), item);
                return Err(e.into());
            }
            info!("saved {}", path.display());
        }
        Ok(())
    }
}
