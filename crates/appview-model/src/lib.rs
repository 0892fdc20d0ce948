//! Appview Appearance Model
//!
//! This crate provides the data model for game-asset appearances: items,
//! frame groups, sprite layouts and animation metadata, together with JSON
//! (de)serialization and validation.
//!
//! # Example
//!
//! ```
//! use appview_model::{AppearanceItem, FrameGroup, SpriteAnimation, SpriteInfo};
//! use appview_model::validation::validate_appearance;
//!
//! let item = AppearanceItem::new(2050)
//!     .with_name("Torch")
//!     .with_group(FrameGroup::new(
//!         SpriteInfo::new(vec![10, 11, 12]).with_animation(SpriteAnimation::uniform(3, 100, 100)),
//!     ));
//!
//! assert_eq!(item.sprite_info(0).unwrap().frame_count(), 3);
//! assert!(validate_appearance(&item).is_ok());
//! ```
//!
//! # Modules
//!
//! - [`appearance`]: appearance, frame group, sprite info and animation types
//! - [`error`]: error and warning types for validation
//! - [`validation`]: appearance validation functions

pub mod appearance;
pub mod error;
pub mod validation;

// Re-export commonly used types at the crate root
pub use appearance::{
    AppearanceItem, BoundingBox, Category, FrameGroup, LoopType, PatternDims, SpriteAnimation,
    SpriteInfo, SpritePhase, SpriteReplacement,
};
pub use error::{
    ErrorCode, Issue, ModelError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use validation::validate_appearance;
