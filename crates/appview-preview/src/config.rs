//! Preview configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is
//! a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or validating a [`PreviewConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables of the preview engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Shortest tick interval a loop may run at, in ms.
    pub min_interval_ms: u64,
    /// Longest tick interval a loop may run at, in ms.
    pub max_interval_ms: u64,
    /// Tick interval when the first phase has no duration, in ms.
    pub default_interval_ms: u64,
    /// Interval of non-outfit preview sequences, in ms.
    pub generic_interval_ms: u64,
    /// Outfit interval for fewer than 4 phases, in ms.
    pub outfit_slow_interval_ms: u64,
    /// Outfit interval for 4 to 8 phases, in ms.
    pub outfit_medium_interval_ms: u64,
    /// Outfit interval for more than 8 phases, in ms.
    pub outfit_fast_interval_ms: u64,
    /// Maximum number of sprites decoded at once.
    pub decode_concurrency: usize,
    /// Number of appearances whose raw sprite bytes are kept.
    pub sprite_cache_capacity: usize,
    /// Number of decoded sprites kept.
    pub decoded_cache_capacity: usize,
    /// Seed for random start phases; drawn from entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 50,
            max_interval_ms: 1000,
            default_interval_ms: 250,
            generic_interval_ms: 100,
            outfit_slow_interval_ms: 300,
            outfit_medium_interval_ms: 100,
            outfit_fast_interval_ms: 75,
            decode_concurrency: 4,
            sprite_cache_capacity: 64,
            decoded_cache_capacity: 2048,
            seed: None,
        }
    }
}

impl PreviewConfig {
    /// Parses a JSON config and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PreviewConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file and validates it.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks interval ordering and non-zero capacities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "min_interval_ms must be greater than 0".into(),
            ));
        }
        if !(self.min_interval_ms <= self.default_interval_ms
            && self.default_interval_ms <= self.max_interval_ms)
        {
            return Err(ConfigError::Invalid(format!(
                "intervals must satisfy min <= default <= max (got {} <= {} <= {})",
                self.min_interval_ms, self.default_interval_ms, self.max_interval_ms
            )));
        }
        for (name, value) in [
            ("generic_interval_ms", self.generic_interval_ms),
            ("outfit_slow_interval_ms", self.outfit_slow_interval_ms),
            ("outfit_medium_interval_ms", self.outfit_medium_interval_ms),
            ("outfit_fast_interval_ms", self.outfit_fast_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than 0", name)));
            }
        }
        for (name, value) in [
            ("decode_concurrency", self.decode_concurrency),
            ("sprite_cache_capacity", self.sprite_cache_capacity),
            ("decoded_cache_capacity", self.decoded_cache_capacity),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }

    /// Clamps a requested tick interval to the configured bounds.
    pub fn clamp_interval(&self, ms: u64) -> Duration {
        Duration::from_millis(ms.clamp(self.min_interval_ms, self.max_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(PreviewConfig::from_json("{}").unwrap(), PreviewConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = PreviewConfig::from_json(r#"{"decode_concurrency": 1, "seed": 7}"#).unwrap();
        assert_eq!(config.decode_concurrency, 1);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_interval_ms, 1000);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = PreviewConfig::from_json(r#"{"min_interval_ms": 500, "max_interval_ms": 100}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = PreviewConfig {
            decoded_cache_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_interval() {
        let config = PreviewConfig::default();
        assert_eq!(config.clamp_interval(10), Duration::from_millis(50));
        assert_eq!(config.clamp_interval(400), Duration::from_millis(400));
        assert_eq!(config.clamp_interval(5000), Duration::from_millis(1000));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.json");
        std::fs::write(&path, r#"{"generic_interval_ms": 120}"#).unwrap();
        assert_eq!(PreviewConfig::from_json_file(&path).unwrap().generic_interval_ms, 120);
        assert!(PreviewConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}
