//! Asset backends.
//!
//! The preview engine never reads asset packages itself. It asks an
//! [`AssetBackend`] for appearance documents and raw sprite bytes, keyed by
//! `(category, id)`, and sends sprite replacements back through it.

mod directory;
mod memory;

pub use directory::DirectoryBackend;
pub use memory::MemoryBackend;

use appview_model::{AppearanceItem, Category, ModelError, SpriteReplacement};
use thiserror::Error;

/// Errors reported by asset backends.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{category} #{id} not found")]
    NotFound { category: Category, id: u32 },

    #[error("{category} #{id} has no frame group {group} with sprites")]
    GroupNotFound {
        category: Category,
        id: u32,
        group: usize,
    },

    #[error("sprite slot {index} out of range (group has {len})")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Source of appearance metadata and sprite bytes.
pub trait AssetBackend: Send + Sync {
    /// Full appearance document.
    fn appearance_details(&self, category: Category, id: u32)
        -> Result<AppearanceItem, BackendError>;

    /// Encoded sprites of every frame group, in aggregated order; `None`
    /// where a sprite has no data.
    fn appearance_sprites(
        &self,
        category: Category,
        id: u32,
    ) -> Result<Vec<Option<Vec<u8>>>, BackendError>;

    /// Rewrites sprite slots of one frame group. Changes are kept in memory
    /// until [`persist`](AssetBackend::persist).
    fn replace_sprites(
        &self,
        category: Category,
        id: u32,
        group: usize,
        replacements: &[SpriteReplacement],
    ) -> Result<(), BackendError>;

    /// Writes pending changes to durable storage.
    fn persist(&self) -> Result<(), BackendError>;
}

/// Applies replacements to a frame group of `item`.
///
/// Every slot is checked before any is written, so a failed call leaves the
/// item unchanged.
pub(crate) fn apply_replacements(
    item: &mut AppearanceItem,
    category: Category,
    group: usize,
    replacements: &[SpriteReplacement],
) -> Result<(), BackendError> {
    let id = item.id;
    let info = item
        .frame_groups
        .get_mut(group)
        .and_then(|g| g.sprite_info.as_mut())
        .ok_or(BackendError::GroupNotFound {
            category,
            id,
            group,
        })?;

    let len = info.sprite_ids.len();
    if let Some(bad) = replacements.iter().find(|r| r.local_index >= len) {
        return Err(BackendError::SlotOutOfRange {
            index: bad.local_index,
            len,
        });
    }
    for replacement in replacements {
        info.sprite_ids[replacement.local_index] = replacement.new_sprite_id;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use appview_model::{FrameGroup, SpriteInfo};
    use pretty_assertions::assert_eq;

    fn item() -> AppearanceItem {
        AppearanceItem::new(4)
            .with_group(FrameGroup::new(SpriteInfo::new(vec![1, 2, 3])))
            .with_group(FrameGroup::default())
    }

    #[test]
    fn test_apply_replacements_writes_slots() {
        let mut item = item();
        let replacements = [
            SpriteReplacement {
                local_index: 0,
                new_sprite_id: 10,
            },
            SpriteReplacement {
                local_index: 2,
                new_sprite_id: 30,
            },
        ];
        apply_replacements(&mut item, Category::Objects, 0, &replacements).unwrap();
        assert_eq!(item.sprite_info(0).unwrap().sprite_ids, vec![10, 2, 30]);
    }

    #[test]
    fn test_apply_replacements_is_all_or_nothing() {
        let mut item = item();
        let replacements = [
            SpriteReplacement {
                local_index: 0,
                new_sprite_id: 10,
            },
            SpriteReplacement {
                local_index: 3,
                new_sprite_id: 40,
            },
        ];
        let err = apply_replacements(&mut item, Category::Objects, 0, &replacements).unwrap_err();
        assert!(matches!(err, BackendError::SlotOutOfRange { index: 3, len: 3 }));
        assert_eq!(item.sprite_info(0).unwrap().sprite_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_apply_replacements_needs_sprite_info() {
        let mut item = item();
        for group in [1, 5] {
            let err = apply_replacements(&mut item, Category::Objects, group, &[]).unwrap_err();
            assert!(matches!(err, BackendError::GroupNotFound { .. }));
        }
    }
}
