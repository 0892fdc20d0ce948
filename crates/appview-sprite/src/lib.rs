//! Appview sprite engine
//!
//! Pure sprite-space arithmetic and pixel work for appearance previews:
//!
//! - **Index codec**: mixed-radix packing of (layer, direction, addon, mount,
//!   phase) into a frame group's local sprite index
//! - **Aggregator**: offsets of every frame group inside an appearance's flat
//!   sprite list
//! - **Images**: RGBA buffers behind the [`ImageSurface`] drawing capability,
//!   PNG decode and deterministic PNG encode
//! - **Composition**: paint-order layering and outfit color-zone recoloring
//!
//! # Example
//!
//! ```
//! use appview_model::{PatternDims};
//! use appview_sprite::codec::{decode, encode, SpriteCoord};
//!
//! let dims = PatternDims::new(2, 4, 1, 1, 3);
//! let coord = SpriteCoord::new(1, 2, 0, 0, 2);
//! let index = encode(&dims, coord);
//! assert_eq!(index, 21);
//! assert_eq!(decode(&dims, index), coord);
//! ```
//!
//! Nothing in this crate performs I/O beyond the optional PNG file helpers,
//! and nothing here fails on missing data: callers validate sprite counts
//! before indexing.

pub mod aggregate;
pub mod codec;
pub mod color;
pub mod compose;
pub mod image;
pub mod png;
pub mod recolor;

// Re-export main types for convenience
pub use aggregate::{compute_offsets, map_aggregated_index, total_sprite_count, GroupMapping};
pub use codec::SpriteCoord;
pub use color::{ColorZone, OutfitColors, ParseColorError, Rgb};
pub use compose::{compose_layers, compose_outfit, OutfitLayer};
pub use image::{blend_over, ImageError, ImageSurface, RgbaImage};
pub use png::{decode_png, PngConfig, PngError};
pub use recolor::{recolor, recolor_in_place};
