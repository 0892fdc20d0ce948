//! Preview sequence builder.
//!
//! A preview is the animation of one representative frame group, flattened
//! into an ordered list of composed frames and a single frame interval.
//! Building is split in two steps: [`plan_sequence`] decides which
//! aggregated sprite indices make up each frame (so callers can fetch and
//! decode only those), and [`build_sequence`] composes the decoded sprites.

mod outfit;

pub use outfit::{build_outfit_frame, resolve_direction, resolve_interval, OutfitFrameRequest};

use std::sync::Arc;
use std::time::Duration;

use appview_model::{AppearanceItem, Category};
use appview_sprite::aggregate::compute_offsets;
use appview_sprite::codec::{decompose, sprite_index, SpriteCoord};
use appview_sprite::{compose_layers, RgbaImage};
use log::debug;

use crate::config::PreviewConfig;
use crate::error::PreviewError;

/// Ordered, timed frames of a preview animation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSequence {
    /// Frame group the frames were taken from.
    pub group_index: usize,
    pub frames: Vec<RgbaImage>,
    /// Time each frame is shown, in ms.
    pub interval_ms: u64,
}

impl PreviewSequence {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Aggregated sprite indices of every frame of a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePlan {
    pub group_index: usize,
    /// One entry per phase; each lists the sprites composed into that frame
    /// in paint order.
    pub frames: Vec<Vec<usize>>,
    pub interval_ms: u64,
}

impl SequencePlan {
    /// Every aggregated index the plan reads, deduplicated and sorted.
    pub fn sprite_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.frames.iter().flatten().copied().collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// Picks the frame group a preview animates.
///
/// Outfits prefer group 1 (walking) when it is animated; otherwise the first
/// animated group wins. Returns `None` when nothing is animated.
pub fn select_frame_group(category: Category, item: &AppearanceItem) -> Option<usize> {
    let groups = &item.frame_groups;
    if category.is_outfit() && groups.len() > 1 && groups[1].is_animated() {
        return Some(1);
    }
    groups.iter().position(|group| group.is_animated())
}

/// Plans the frames of a preview.
///
/// Returns `Ok(None)` when the appearance has no animated group, and
/// [`PreviewError::DataInconsistency`] when the selected group's sprite list
/// does not match its pattern dimensions.
pub fn plan_sequence(
    category: Category,
    item: &AppearanceItem,
    config: &PreviewConfig,
) -> Result<Option<SequencePlan>, PreviewError> {
    let Some(group_index) = select_frame_group(category, item) else {
        return Ok(None);
    };
    let Some(info) = item.sprite_info(group_index) else {
        return Ok(None);
    };
    let frame_count = info.frame_count();
    if frame_count <= 1 {
        return Ok(None);
    }
    if !info.has_consistent_sprite_count() {
        return Err(PreviewError::DataInconsistency {
            category,
            id: item.id,
            group: group_index,
            expected: info.expected_sprite_count(),
            actual: info.sprite_ids.len(),
        });
    }

    let base = compute_offsets(item)[group_index];
    let (frames, interval_ms) = if category.is_outfit() {
        let direction = resolve_direction(info);
        let addons = info.pattern_height.max(1);
        let frames = (0..frame_count)
            .map(|phase| {
                (0..addons)
                    .map(|addon| {
                        base + sprite_index(info, SpriteCoord::new(0, direction, addon, 0, phase))
                    })
                    .collect()
            })
            .collect();
        (frames, resolve_interval(info, config))
    } else {
        let origin = decompose(info, 0);
        let frames = (0..frame_count)
            .map(|phase| vec![base + sprite_index(info, origin.at_phase(phase))])
            .collect();
        (frames, config.generic_interval_ms)
    };

    Ok(Some(SequencePlan {
        group_index,
        frames,
        interval_ms,
    }))
}

/// Composes the frames of a plan from decoded sprites in aggregated order.
///
/// Frames whose sprites are all missing are dropped. Returns `None` when no
/// frame survives.
pub fn compose_plan(
    plan: &SequencePlan,
    sprites: &[Option<Arc<RgbaImage>>],
) -> Option<PreviewSequence> {
    let mut frames = Vec::with_capacity(plan.frames.len());
    for (phase, indices) in plan.frames.iter().enumerate() {
        let layers: Vec<&RgbaImage> = indices
            .iter()
            .filter_map(|&index| sprite_at(sprites, index))
            .collect();
        if layers.len() < indices.len() {
            debug!(
                "phase {}: {} of {} sprites missing",
                phase,
                indices.len() - layers.len(),
                indices.len()
            );
        }
        match compose_layers(&layers) {
            Some(frame) => frames.push(frame),
            None => debug!("phase {} skipped, nothing to draw", phase),
        }
    }

    if frames.is_empty() {
        return None;
    }
    Some(PreviewSequence {
        group_index: plan.group_index,
        frames,
        interval_ms: plan.interval_ms,
    })
}

/// Builds a preview sequence from decoded sprites in aggregated order.
pub fn build_sequence(
    category: Category,
    item: &AppearanceItem,
    sprites: &[Option<Arc<RgbaImage>>],
    config: &PreviewConfig,
) -> Result<Option<PreviewSequence>, PreviewError> {
    Ok(plan_sequence(category, item, config)?.and_then(|plan| compose_plan(&plan, sprites)))
}

/// Aggregated index of the placeholder sprite: the first sprite of group 0.
pub fn static_frame_index(item: &AppearanceItem) -> Option<usize> {
    let group = item.frame_groups.first()?;
    (group.sprite_count() > 0).then_some(0)
}

/// First sprite of group 0, used for non-animated appearances.
pub fn build_static_frame(
    item: &AppearanceItem,
    sprites: &[Option<Arc<RgbaImage>>],
) -> Option<RgbaImage> {
    sprite_at(sprites, static_frame_index(item)?).cloned()
}

/// Sprite at an aggregated index, `None` when missing or out of range.
pub(crate) fn sprite_at(sprites: &[Option<Arc<RgbaImage>>], index: usize) -> Option<&RgbaImage> {
    sprites.get(index)?.as_deref()
}
