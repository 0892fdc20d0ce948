//! Appearance types.
//!
//! An appearance is an asset definition (outfit, object, effect, missile)
//! identified by [`Category`] and a numeric id. Its sprites are split into
//! ordered frame groups; for outfits group 0 is idle and group 1 walking.

mod animation;
mod category;
mod sprite_info;

pub use animation::*;
pub use category::*;
pub use sprite_info::*;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One animation variant set inside an appearance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameGroup {
    /// Fixed group tag from the asset package (idle, moving, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_frame_group: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Sprite layout; a group without one contributes no sprites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite_info: Option<SpriteInfo>,
}

impl FrameGroup {
    /// Creates a group around a sprite block.
    pub fn new(sprite_info: SpriteInfo) -> Self {
        Self {
            fixed_frame_group: None,
            id: None,
            sprite_info: Some(sprite_info),
        }
    }

    /// Number of sprite slots this group contributes to the aggregated space.
    pub fn sprite_count(&self) -> usize {
        self.sprite_info
            .as_ref()
            .map_or(0, |info| info.sprite_ids.len())
    }

    /// Frame count of the group, 0 without sprite info.
    pub fn frame_count(&self) -> u32 {
        self.sprite_info.as_ref().map_or(0, SpriteInfo::frame_count)
    }

    /// Returns true when the group has more than one phase.
    pub fn is_animated(&self) -> bool {
        self.sprite_info.as_ref().is_some_and(SpriteInfo::is_animated)
    }
}

/// A complete appearance snapshot as served by the asset backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearanceItem {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Frame groups in semantic order.
    #[serde(default)]
    pub frame_groups: Vec<FrameGroup>,
}

impl AppearanceItem {
    /// Creates an appearance with no frame groups.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: None,
            description: None,
            frame_groups: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a frame group.
    pub fn with_group(mut self, group: FrameGroup) -> Self {
        self.frame_groups.push(group);
        self
    }

    /// Parses an appearance document.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Display name, falling back to `#<id>`.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("#{}", self.id),
        }
    }

    /// Sprite info of a group, if the group exists and has one.
    pub fn sprite_info(&self, group: usize) -> Option<&SpriteInfo> {
        self.frame_groups
            .get(group)
            .and_then(|fg| fg.sprite_info.as_ref())
    }
}

/// Replacement of one slot in a frame group's `sprite_ids`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteReplacement {
    /// Slot inside the group's sprite block.
    pub local_index: usize,
    /// Sprite id written into the slot.
    pub new_sprite_id: u32,
}

#[cfg(test)]
mod tests;
