//! JSON output types for machine-readable CLI output.
//!
//! These back the `--json` flag of `inspect`, `locate`, `validate`,
//! `preview` and `replace`.

use std::fmt::Display;

use appview_model::{Category, Issue};
use serde::{Deserialize, Serialize};

/// Error codes for CLI-level failures.
pub mod error_codes {
    /// Appearance document could not be read or parsed
    pub const LOAD_FAILED: &str = "CLI_001";
}

/// A structured error or warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonIssue {
    /// Stable code (e.g., "E001", "W002", "CLI_001")
    pub code: String,
    pub message: String,
    /// JSON path to the offending field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }
}

impl<C: Display> From<&Issue<C>> for JsonIssue {
    fn from(issue: &Issue<C>) -> Self {
        Self {
            code: issue.code.to_string(),
            message: issue.message.clone(),
            path: Some(issue.path.clone()),
        }
    }
}

/// One frame group in `inspect` output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupSummary {
    pub index: usize,
    /// First aggregated index of the group
    pub offset: usize,
    pub sprite_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_frame_group: Option<i32>,
    /// `[layers, width, height, depth, frames]`, absent without sprite info
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dims: Option<[u32; 5]>,
    pub animated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<u32>,
    /// Tick interval the loop engine would use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
    pub consistent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspectOutput {
    pub category: Category,
    pub id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_sprites: usize,
    /// Frame group a preview would animate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_group: Option<usize>,
    pub groups: Vec<GroupSummary>,
}

/// Position of one sprite slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocateOutput {
    pub aggregated_index: usize,
    pub group_index: usize,
    pub local_index: usize,
    /// `[layer, x, y, z, phase]`
    pub coord: [u32; 5],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidateItem {
    pub id: u32,
    pub ok: bool,
    pub errors: Vec<JsonIssue>,
    pub warnings: Vec<JsonIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidateOutput {
    pub category: Category,
    pub ok: bool,
    pub items: Vec<ValidateItem>,
}

/// One written frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameOutput {
    pub path: String,
    pub width: u32,
    pub height: u32,
    /// BLAKE3 of the PNG bytes
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreviewOutput {
    pub category: Category,
    pub id: u32,
    /// False when only a static frame was written
    pub animated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
    pub frames: Vec<FrameOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gif: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplaceOutput {
    pub category: Category,
    pub id: u32,
    pub group: usize,
    /// Group sprite ids before the change
    pub before: Vec<u32>,
    pub after: Vec<u32>,
}
