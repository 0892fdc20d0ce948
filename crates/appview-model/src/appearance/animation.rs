//! Sprite animation metadata: loop policy and phase timings.

use serde::{Deserialize, Serialize};

/// Loop policy of a sprite animation.
///
/// Stored in documents as the raw integer the asset package uses:
/// `0` infinite, `-1` ping-pong, `1` finite. Any other value is read as
/// [`LoopType::Infinite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum LoopType {
    /// Restart from phase 0 after the last phase, forever.
    #[default]
    Infinite,
    /// Bounce between the first and last phase.
    PingPong,
    /// Play `loop_count` full loops, then stop.
    Finite,
}

impl LoopType {
    /// Raw value as stored in appearance documents.
    pub fn raw(&self) -> i32 {
        match self {
            LoopType::Infinite => 0,
            LoopType::PingPong => -1,
            LoopType::Finite => 1,
        }
    }
}

impl From<i32> for LoopType {
    fn from(value: i32) -> Self {
        match value {
            -1 => LoopType::PingPong,
            1 => LoopType::Finite,
            _ => LoopType::Infinite,
        }
    }
}

impl From<LoopType> for i32 {
    fn from(value: LoopType) -> Self {
        value.raw()
    }
}

impl std::fmt::Display for LoopType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoopType::Infinite => "infinite",
            LoopType::PingPong => "ping-pong",
            LoopType::Finite => "finite",
        };
        f.write_str(name)
    }
}

/// Timing window of one animation phase, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpritePhase {
    /// Shortest display time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    /// Longest display time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_max: Option<u32>,
}

impl SpritePhase {
    /// Creates a phase with the given duration window.
    pub fn new(duration_min: u32, duration_max: u32) -> Self {
        Self {
            duration_min: Some(duration_min),
            duration_max: Some(duration_max),
        }
    }
}

/// Animation block of a [`SpriteInfo`](super::SpriteInfo).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpriteAnimation {
    /// Phase the animation starts on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_start_phase: Option<u32>,
    /// Whether all instances share one clock.
    #[serde(default)]
    pub synchronized: bool,
    /// Whether each instance starts on a random phase.
    #[serde(default)]
    pub random_start_phase: bool,
    /// Loop policy.
    #[serde(default)]
    pub loop_type: LoopType,
    /// Number of loops for [`LoopType::Finite`]; ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<u32>,
    /// Ordered phases; the phase count is the animation's frame count.
    #[serde(default)]
    pub phases: Vec<SpritePhase>,
}

impl SpriteAnimation {
    /// Creates an animation with `count` phases sharing one duration window.
    pub fn uniform(count: usize, duration_min: u32, duration_max: u32) -> Self {
        Self {
            phases: vec![SpritePhase::new(duration_min, duration_max); count],
            ..Default::default()
        }
    }

    /// Sets the loop policy.
    pub fn with_loop_type(mut self, loop_type: LoopType) -> Self {
        self.loop_type = loop_type;
        self
    }

    /// Sets the loop count.
    pub fn with_loop_count(mut self, loop_count: u32) -> Self {
        self.loop_count = Some(loop_count);
        self
    }

    /// `duration_min` of the first phase, if any.
    pub fn first_duration_min(&self) -> Option<u32> {
        self.phases.first().and_then(|p| p.duration_min)
    }
}
