//! Document errors and validation findings.

use std::fmt;

use thiserror::Error;

/// Failure to read an appearance document or one of its fields.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("unknown appearance category '{0}' (expected objects, outfits, effects or missiles)")]
    UnknownCategory(String),
}

/// Structural faults that make index arithmetic on a frame group unsound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SpriteCountMismatch,
    ZeroPatternDimension,
    PhaseCountMismatch,
    StartPhaseOutOfRange,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SpriteCountMismatch => "E001",
            Self::ZeroPatternDimension => "E002",
            Self::PhaseCountMismatch => "E003",
            Self::StartPhaseOutOfRange => "E004",
        })
    }
}

/// Suspicious but usable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    MissingName,
    /// `loop_count` on an animation that never finishes
    LoopCountIgnored,
    InvertedPhaseDuration,
    EmptyFrameGroup,
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingName => "W001",
            Self::LoopCountIgnored => "W002",
            Self::InvertedPhaseDuration => "W003",
            Self::EmptyFrameGroup => "W004",
        })
    }
}

/// One validation finding, located by the JSON path of the offending field
/// (e.g. `frame_groups[1].sprite_info.sprite_ids`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue<C> {
    pub code: C,
    pub message: String,
    pub path: String,
}

impl<C> Issue<C> {
    pub fn new(code: C, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: path.into(),
        }
    }
}

pub type ValidationError = Issue<ErrorCode>;
pub type ValidationWarning = Issue<WarningCode>;

/// Findings of one validation run. Valid when it holds no errors.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|issue| issue.code == code)
    }

    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|issue| issue.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_render_stably() {
        let errors: Vec<String> = [
            ErrorCode::SpriteCountMismatch,
            ErrorCode::ZeroPatternDimension,
            ErrorCode::PhaseCountMismatch,
            ErrorCode::StartPhaseOutOfRange,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(errors, ["E001", "E002", "E003", "E004"]);

        assert_eq!(WarningCode::MissingName.to_string(), "W001");
        assert_eq!(WarningCode::EmptyFrameGroup.to_string(), "W004");
    }

    #[test]
    fn test_warnings_do_not_fail_validation() {
        let mut result = ValidationResult::default();
        result.add_warning(Issue::new(WarningCode::MissingName, "no name", "name"));
        assert!(result.is_ok());
        assert!(result.has_warning(WarningCode::MissingName));

        result.add_error(Issue::new(
            ErrorCode::PhaseCountMismatch,
            "3 phases but pattern_frames is 4",
            "frame_groups[0].sprite_info.animation.phases",
        ));
        assert!(!result.is_ok());
        assert!(result.has_error(ErrorCode::PhaseCountMismatch));
        assert!(!result.has_error(ErrorCode::SpriteCountMismatch));
    }
}
