//! Error types for the preview engine.

use appview_model::Category;
use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;

/// Errors produced while building previews.
///
/// Missing and undecodable sprites are not errors: the affected frames are
/// skipped and logged.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The asset backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A frame group's sprite count disagrees with its pattern dimensions.
    #[error(
        "{category} #{id} group {group}: sprite count {actual} does not match pattern dimensions (expected {expected})"
    )]
    DataInconsistency {
        category: Category,
        id: u32,
        group: usize,
        expected: usize,
        actual: usize,
    },

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for PreviewError {
    fn from(err: tokio::task::JoinError) -> Self {
        PreviewError::Task(err.to_string())
    }
}
