//! Appearance validation logic.
//!
//! Index arithmetic never repairs malformed data, so callers validate an
//! appearance (or at least the frame group they index into) first.


use crate::appearance::{AppearanceItem, LoopType, SpriteInfo};
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};

/// Validates an appearance and returns a validation result.
///
/// # Example
/// ```
/// use appview_model::{AppearanceItem, FrameGroup, SpriteInfo};
/// use appview_model::validation::validate_appearance;
///
/// let item = AppearanceItem::new(1)
///     .with_name("Barrel")
///     .with_group(FrameGroup::new(SpriteInfo::new(vec![42])));
///
/// assert!(validate_appearance(&item).is_ok());
/// ```
pub fn validate_appearance(item: &AppearanceItem) -> ValidationResult {
    let mut result = ValidationResult::default();

    for (index, group) in item.frame_groups.iter().enumerate() {
        let path = format!("frame_groups[{}]", index);
        match &group.sprite_info {
            Some(info) => {
                validate_sprite_info(info, &format!("{}.sprite_info", path), &mut result)
            }
            None => result.add_warning(ValidationWarning::new(
                WarningCode::EmptyFrameGroup,
                "frame group has no sprite info and contributes no sprites",
                path,
            )),
        }
    }

    if item.name.as_deref().is_none_or(str::is_empty) {
        result.add_warning(ValidationWarning::new(
            WarningCode::MissingName,
            format!("appearance {} has no name", item.id),
            "name",
        ));
    }

    result
}

/// Validates one sprite block, appending findings under `path`.
pub fn validate_sprite_info(info: &SpriteInfo, path: &str, result: &mut ValidationResult) {
    validate_dimensions(info, path, result);
    validate_sprite_count(info, path, result);

    if let Some(animation) = &info.animation {
        let phase_count = animation.phases.len() as u32;

        if let Some(frames) = info.pattern_frames {
            if phase_count > 0 && frames != phase_count {
                result.add_error(ValidationError::new(
                    ErrorCode::PhaseCountMismatch,
                    format!(
                        "animation has {} phases but pattern_frames is {}",
                        phase_count, frames
                    ),
                    format!("{}.animation.phases", path),
                ));
            }
        }

        if let Some(start) = animation.default_start_phase {
            if start >= info.frame_count() {
                result.add_error(ValidationError::new(
                    ErrorCode::StartPhaseOutOfRange,
                    format!(
                        "default_start_phase {} is outside {} phase(s)",
                        start,
                        info.frame_count()
                    ),
                    format!("{}.animation.default_start_phase", path),
                ));
            }
        }

        if animation.loop_count.is_some() && animation.loop_type != LoopType::Finite {
            result.add_warning(ValidationWarning::new(
                WarningCode::LoopCountIgnored,
                format!("loop_count is ignored for {} animations", animation.loop_type),
                format!("{}.animation.loop_count", path),
            ));
        }

        for (i, phase) in animation.phases.iter().enumerate() {
            if let (Some(min), Some(max)) = (phase.duration_min, phase.duration_max) {
                if min > max {
                    result.add_warning(ValidationWarning::new(
                        WarningCode::InvertedPhaseDuration,
                        format!("duration_min {} exceeds duration_max {}", min, max),
                        format!("{}.animation.phases[{}]", path, i),
                    ));
                }
            }
        }
    }
}

/// Rejects zero-sized pattern axes.
fn validate_dimensions(info: &SpriteInfo, path: &str, result: &mut ValidationResult) {
    let axes = [
        ("pattern_width", info.pattern_width),
        ("pattern_height", info.pattern_height),
        ("pattern_depth", info.pattern_depth),
        ("layers", info.layers),
    ];
    for (name, value) in axes {
        if value == 0 {
            result.add_error(ValidationError::new(
                ErrorCode::ZeroPatternDimension,
                format!("{} must be at least 1", name),
                format!("{}.{}", path, name),
            ));
        }
    }
}

/// Checks the `sprite_ids` length invariant.
fn validate_sprite_count(info: &SpriteInfo, path: &str, result: &mut ValidationResult) {
    let expected = info.expected_sprite_count();
    let actual = info.sprite_ids.len();
    if expected != actual {
        let dims = info.dims();
        result.add_error(ValidationError::new(
            ErrorCode::SpriteCountMismatch,
            format!(
                "expected {} sprite ids ({} layers x {} x {} x {} x {} frames), found {}",
                expected, dims.layers, dims.width, dims.height, dims.depth, dims.frames, actual
            ),
            format!("{}.sprite_ids", path),
        ));
    }
}
