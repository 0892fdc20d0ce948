//! Appearance categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The kind of asset an appearance id belongs to.
///
/// Ids are only unique within a category, so every lookup is keyed by
/// `(Category, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Items and map objects.
    Objects,
    /// Creature and player outfits.
    Outfits,
    /// Magic effects.
    Effects,
    /// Projectiles.
    Missiles,
}

impl Category {
    /// All categories, in backend order.
    pub const ALL: [Category; 4] = [
        Category::Objects,
        Category::Outfits,
        Category::Effects,
        Category::Missiles,
    ];

    /// Canonical name, as used in documents and directory names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Objects => "Objects",
            Category::Outfits => "Outfits",
            Category::Effects => "Effects",
            Category::Missiles => "Missiles",
        }
    }

    /// Returns true for outfits, which get addon compositing in previews.
    pub fn is_outfit(&self) -> bool {
        matches!(self, Category::Outfits)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    /// Parses a category name case-insensitively; singular forms are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "objects" | "object" => Ok(Category::Objects),
            "outfits" | "outfit" => Ok(Category::Outfits),
            "effects" | "effect" => Ok(Category::Effects),
            "missiles" | "missile" => Ok(Category::Missiles),
            _ => Err(ModelError::UnknownCategory(s.to_string())),
        }
    }
}
