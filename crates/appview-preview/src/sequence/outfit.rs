//! Outfit-specific preview settings and frame composition.

use std::sync::Arc;

use appview_model::{AppearanceItem, SpriteInfo};
use appview_sprite::aggregate::compute_offsets;
use appview_sprite::codec::{sprite_index, SpriteCoord};
use appview_sprite::{compose_outfit, OutfitColors, OutfitLayer, RgbaImage};

use crate::config::PreviewConfig;

use super::sprite_at;

/// Direction shown in outfit previews.
///
/// Outfits with at least three directions face index 2 (south), two-way
/// outfits face index 1, anything else index 0.
pub fn resolve_direction(info: &SpriteInfo) -> u32 {
    match info.pattern_width.max(1) {
        width if width >= 3 => 2,
        2 => 1,
        _ => 0,
    }
}

/// Frame interval of an outfit preview, in ms.
///
/// Short walk cycles play slowly so they stay readable.
pub fn resolve_interval(info: &SpriteInfo, config: &PreviewConfig) -> u64 {
    match info.frame_count() {
        phases if phases < 4 => config.outfit_slow_interval_ms,
        phases if phases <= 8 => config.outfit_medium_interval_ms,
        _ => config.outfit_fast_interval_ms,
    }
}

/// Selection of one interactive outfit frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitFrameRequest {
    pub group: usize,
    pub direction: u32,
    pub mount: u32,
    pub phase: u32,
    /// Addon rows to draw, in paint order. Row 0 is the bare outfit.
    pub addons: Vec<u32>,
}

impl OutfitFrameRequest {
    /// Bare outfit facing `direction` on phase 0 of `group`.
    pub fn new(group: usize, direction: u32) -> Self {
        Self {
            group,
            direction,
            mount: 0,
            phase: 0,
            addons: vec![0],
        }
    }

    pub fn with_phase(mut self, phase: u32) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_mount(mut self, mount: u32) -> Self {
        self.mount = mount;
        self
    }

    pub fn with_addons(mut self, addons: Vec<u32>) -> Self {
        self.addons = addons;
        self
    }
}

/// Composes one outfit frame with its color zones tinted.
///
/// Direction and mount are clamped into range; addon rows outside the pattern
/// and missing sprites are skipped. Layer 1, when the outfit has one, is the
/// color template of layer 0.
pub fn build_outfit_frame(
    item: &AppearanceItem,
    sprites: &[Option<Arc<RgbaImage>>],
    request: &OutfitFrameRequest,
    colors: &OutfitColors,
) -> Option<RgbaImage> {
    let info = item.sprite_info(request.group)?;
    let base = *compute_offsets(item).get(request.group)?;
    let direction = request.direction.min(info.pattern_width.max(1) - 1);
    let mount = request.mount.min(info.pattern_depth.max(1) - 1);
    let has_template = info.layers >= 2;

    let mut layers = Vec::new();
    for &addon in &request.addons {
        if addon >= info.pattern_height.max(1) {
            continue;
        }
        let coord = SpriteCoord::new(0, direction, addon, mount, request.phase);
        let Some(sprite) = sprite_at(sprites, base + sprite_index(info, coord)) else {
            continue;
        };
        let template = if has_template {
            sprite_at(sprites, base + sprite_index(info, SpriteCoord { layer: 1, ..coord }))
        } else {
            None
        };
        layers.push(OutfitLayer { sprite, template });
    }

    compose_outfit(&layers, colors)
}
