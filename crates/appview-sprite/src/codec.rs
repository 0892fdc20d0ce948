//! Sprite index codec.
//!
//! A frame group stores its sprites as one flat block. A slot is addressed by
//! five coordinates packed in mixed radix, least significant first:
//! layer, x (direction), y (addon), z (mount), phase.
//!
//! ```text
//! idx = phase mod frames
//! idx = idx * depth  + z
//! idx = idx * height + y
//! idx = idx * width  + x
//! idx = idx * layers + layer
//! ```
//!
//! Only `phase` wraps. The other coordinates are expected to be in range
//! already; out-of-range values are packed as-is and simply address a
//! different (or nonexistent) slot.

use appview_model::{PatternDims, SpriteInfo};

/// A position inside a frame group's sprite block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpriteCoord {
    pub layer: u32,
    /// Direction.
    pub x: u32,
    /// Addon.
    pub y: u32,
    /// Mount.
    pub z: u32,
    pub phase: u32,
}

impl SpriteCoord {
    /// Creates a coordinate.
    pub const fn new(layer: u32, x: u32, y: u32, z: u32, phase: u32) -> Self {
        Self {
            layer,
            x,
            y,
            z,
            phase,
        }
    }

    /// Same coordinate on another phase.
    pub const fn at_phase(self, phase: u32) -> Self {
        Self { phase, ..self }
    }
}

/// Packs a coordinate into a local sprite index.
pub fn encode(dims: &PatternDims, coord: SpriteCoord) -> usize {
    let mut idx = (coord.phase % dims.frames) as usize;
    idx = idx * dims.depth as usize + coord.z as usize;
    idx = idx * dims.height as usize + coord.y as usize;
    idx = idx * dims.width as usize + coord.x as usize;
    idx * dims.layers as usize + coord.layer as usize
}

/// Unpacks a local sprite index into its coordinate.
pub fn decode(dims: &PatternDims, index: usize) -> SpriteCoord {
    let mut u = index;
    let layer = u % dims.layers as usize;
    u /= dims.layers as usize;
    let x = u % dims.width as usize;
    u /= dims.width as usize;
    let y = u % dims.height as usize;
    u /= dims.height as usize;
    let z = u % dims.depth as usize;
    u /= dims.depth as usize;
    let phase = u % dims.frames as usize;

    SpriteCoord::new(layer as u32, x as u32, y as u32, z as u32, phase as u32)
}

/// [`encode`] against a sprite block's own dimensions.
pub fn sprite_index(info: &SpriteInfo, coord: SpriteCoord) -> usize {
    encode(&info.dims(), coord)
}

/// [`decode`] against a sprite block's own dimensions.
pub fn decompose(info: &SpriteInfo, index: usize) -> SpriteCoord {
    decode(&info.dims(), index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appview_model::SpriteAnimation;

    fn dims_grid() -> Vec<PatternDims> {
        let mut grid = Vec::new();
        for layers in 1..=2 {
            for width in [1, 2, 4] {
                for height in [1, 3] {
                    for depth in [1, 2] {
                        for frames in [1, 3, 8] {
                            grid.push(PatternDims::new(layers, width, height, depth, frames));
                        }
                    }
                }
            }
        }
        grid
    }

    #[test]
    fn decode_then_encode_is_identity() {
        for dims in dims_grid() {
            for index in 0..dims.sprite_count() {
                let coord = decode(&dims, index);
                assert_eq!(encode(&dims, coord), index, "dims {:?}", dims);
            }
        }
    }

    #[test]
    fn encode_then_decode_wraps_only_phase() {
        let dims = PatternDims::new(2, 4, 3, 2, 5);
        for phase in 0..12 {
            let coord = SpriteCoord::new(1, 3, 2, 1, phase);
            let decoded = decode(&dims, encode(&dims, coord));
            assert_eq!(decoded, coord.at_phase(phase % 5));
        }
    }

    #[test]
    fn layer_is_least_significant() {
        let dims = PatternDims::new(2, 4, 1, 1, 2);
        assert_eq!(encode(&dims, SpriteCoord::new(1, 0, 0, 0, 0)), 1);
        assert_eq!(encode(&dims, SpriteCoord::new(0, 1, 0, 0, 0)), 2);
        assert_eq!(encode(&dims, SpriteCoord::new(0, 0, 0, 0, 1)), 8);
    }

    #[test]
    fn out_of_range_coordinates_are_not_clamped() {
        let dims = PatternDims::new(1, 2, 1, 1, 1);
        // x = 2 spills into the next radix instead of being clamped
        assert_eq!(encode(&dims, SpriteCoord::new(0, 2, 0, 0, 0)), 2);
        assert_eq!(encode(&dims, SpriteCoord::new(0, 5, 0, 0, 0)), 5);
    }

    #[test]
    fn sprite_info_helpers_use_animation_phase_count() {
        let info = appview_model::SpriteInfo::new(vec![0; 2 * 4 * 3])
            .with_layers(2)
            .with_pattern(4, 1, 1)
            .with_animation(SpriteAnimation::uniform(3, 100, 100));
        let coord = SpriteCoord::new(1, 2, 0, 0, 2);
        let index = sprite_index(&info, coord);
        assert_eq!(index, 2 * 8 + 2 * 2 + 1);
        assert_eq!(decompose(&info, index), coord);
    }
}
