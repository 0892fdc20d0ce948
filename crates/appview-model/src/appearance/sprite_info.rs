//! Sprite block of a frame group and its pattern dimensions.

use serde::{Deserialize, Deserializer, Serialize};

use super::animation::{LoopType, SpriteAnimation};

fn default_dim() -> u32 {
    1
}

/// Reads a pattern dimension, treating `null` like an absent field.
fn dim_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_else(default_dim))
}

/// Axis-aligned box inside a sprite, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub y: u32,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Sprite layout of one frame group.
///
/// `sprite_ids` holds `layers * pattern_width * pattern_height *
/// pattern_depth * frame_count()` entries, ordered by
/// [`PatternDims`]. Validation reports a mismatch; indexing code assumes the
/// invariant holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteInfo {
    /// Direction count.
    #[serde(default = "default_dim", deserialize_with = "dim_or_default")]
    pub pattern_width: u32,
    /// Addon count.
    #[serde(default = "default_dim", deserialize_with = "dim_or_default")]
    pub pattern_height: u32,
    /// Mount count.
    #[serde(default = "default_dim", deserialize_with = "dim_or_default")]
    pub pattern_depth: u32,
    /// Layer count (base + color template for outfits).
    #[serde(
        default = "default_dim",
        deserialize_with = "dim_or_default",
        alias = "pattern_layers"
    )]
    pub layers: u32,
    /// Frame count used when there is no animation block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_frames: Option<u32>,
    /// Sprite ids in pattern order.
    #[serde(default)]
    pub sprite_ids: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<SpriteAnimation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounding_boxes: Vec<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_square: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_opaque: Option<bool>,
}

impl SpriteInfo {
    /// Creates a single-layer, single-pattern block with no animation.
    pub fn new(sprite_ids: Vec<u32>) -> Self {
        Self {
            pattern_width: 1,
            pattern_height: 1,
            pattern_depth: 1,
            layers: 1,
            pattern_frames: None,
            sprite_ids,
            animation: None,
            bounding_boxes: Vec::new(),
            bounding_square: None,
            is_opaque: None,
        }
    }

    /// Sets direction, addon and mount counts.
    pub fn with_pattern(mut self, width: u32, height: u32, depth: u32) -> Self {
        self.pattern_width = width;
        self.pattern_height = height;
        self.pattern_depth = depth;
        self
    }

    /// Sets the layer count.
    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }

    /// Sets the frame count used without an animation block.
    pub fn with_pattern_frames(mut self, frames: u32) -> Self {
        self.pattern_frames = Some(frames);
        self
    }

    /// Attaches an animation block.
    pub fn with_animation(mut self, animation: SpriteAnimation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Number of animation phases.
    ///
    /// The animation's phase count wins when it has phases; otherwise
    /// `pattern_frames`, and 1 when neither is usable.
    pub fn frame_count(&self) -> u32 {
        if let Some(animation) = &self.animation {
            if !animation.phases.is_empty() {
                return animation.phases.len() as u32;
            }
        }
        match self.pattern_frames {
            Some(frames) if frames > 0 => frames,
            _ => 1,
        }
    }

    /// Returns true when there is more than one phase to play.
    pub fn is_animated(&self) -> bool {
        self.frame_count() > 1
    }

    /// Loop policy, [`LoopType::Infinite`] without an animation block.
    pub fn loop_type(&self) -> LoopType {
        self.animation
            .as_ref()
            .map(|a| a.loop_type)
            .unwrap_or_default()
    }

    /// Pattern dimensions used for index arithmetic.
    pub fn dims(&self) -> PatternDims {
        PatternDims::new(
            self.layers,
            self.pattern_width,
            self.pattern_height,
            self.pattern_depth,
            self.frame_count(),
        )
    }

    /// Sprite count implied by the pattern dimensions.
    pub fn expected_sprite_count(&self) -> usize {
        self.dims().sprite_count()
    }

    /// Returns true when `sprite_ids` matches the pattern dimensions.
    pub fn has_consistent_sprite_count(&self) -> bool {
        self.sprite_ids.len() == self.expected_sprite_count()
    }
}

/// The five radices of the sprite index: layer, x (direction), y (addon),
/// z (mount) and phase. Every radix is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternDims {
    pub layers: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub frames: u32,
}

impl PatternDims {
    /// Creates dimensions, raising zero radices to 1.
    pub fn new(layers: u32, width: u32, height: u32, depth: u32, frames: u32) -> Self {
        Self {
            layers: layers.max(1),
            width: width.max(1),
            height: height.max(1),
            depth: depth.max(1),
            frames: frames.max(1),
        }
    }

    /// Total number of sprite slots.
    pub fn sprite_count(&self) -> usize {
        self.layers as usize
            * self.width as usize
            * self.height as usize
            * self.depth as usize
            * self.frames as usize
    }
}
