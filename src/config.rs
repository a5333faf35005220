use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Optional JSON dictionary (`{"word": ["translation", ...]}`).
    #[serde(default)]
    pub dictionary_path: Option<String>,
    /// When set, entries from `dictionary_path` are merged into the built-in table
    /// instead of replacing it.
    #[serde(default = "default_true")]
    pub extend_builtin_dictionary: bool,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl EngineConfig {
    pub const DEFAULT_CACHE_CAPACITY: usize = 500;

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read engine config", e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| AlignmentError::json("parse engine config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        if self.cache_capacity == 0 {
            return Err(AlignmentError::invalid_input(
                "engine config",
                "cache_capacity must be at least 1",
            ));
        }
        self.scoring.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
            dictionary_path: None,
            extend_builtin_dictionary: true,
            scoring: ScoringConfig::default(),
        }
    }
}

/// Similarity and path-search constants.
///
/// The defaults are compatibility values; none of them is derived from data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_dictionary_score")]
    pub dictionary_score: f64,
    #[serde(default = "default_punctuation_score")]
    pub punctuation_score: f64,
    /// Weight applied to the relative-position heuristic.
    #[serde(default = "default_position_weight")]
    pub position_weight: f64,
    /// Cost of leaving a source or target token unaligned.
    #[serde(default = "default_skip_penalty")]
    pub skip_penalty: f64,
}

impl ScoringConfig {
    pub const DEFAULT_DICTIONARY_SCORE: f64 = 0.9;
    pub const DEFAULT_PUNCTUATION_SCORE: f64 = 0.9;
    pub const DEFAULT_POSITION_WEIGHT: f64 = 0.5;
    pub const DEFAULT_SKIP_PENALTY: f64 = 0.1;

    fn validate(&self) -> Result<(), AlignmentError> {
        let fields = [
            ("dictionary_score", self.dictionary_score),
            ("punctuation_score", self.punctuation_score),
            ("position_weight", self.position_weight),
            ("skip_penalty", self.skip_penalty),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(AlignmentError::invalid_input(
                    "scoring config",
                    format!("{name} must be a finite non-negative number, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            dictionary_score: Self::DEFAULT_DICTIONARY_SCORE,
            punctuation_score: Self::DEFAULT_PUNCTUATION_SCORE,
            position_weight: Self::DEFAULT_POSITION_WEIGHT,
            skip_penalty: Self::DEFAULT_SKIP_PENALTY,
        }
    }
}

fn default_cache_capacity() -> usize {
    EngineConfig::DEFAULT_CACHE_CAPACITY
}
fn default_true() -> bool {
    true
}
fn default_dictionary_score() -> f64 {
    ScoringConfig::DEFAULT_DICTIONARY_SCORE
}
fn default_punctuation_score() -> f64 {
    ScoringConfig::DEFAULT_PUNCTUATION_SCORE
}
fn default_position_weight() -> f64 {
    ScoringConfig::DEFAULT_POSITION_WEIGHT
}
fn default_skip_penalty() -> f64 {
    ScoringConfig::DEFAULT_SKIP_PENALTY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_capacity, 500);
        assert!(config.dictionary_path.is_none());
        assert!(config.extend_builtin_dictionary);
        assert_eq!(config.scoring.dictionary_score, 0.9);
        assert_eq!(config.scoring.punctuation_score, 0.9);
        assert_eq!(config.scoring.position_weight, 0.5);
        assert_eq!(config.scoring.skip_penalty, 0.1);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{ "cache_capacity": 32, "scoring": { "skip_penalty": 0.25 } }"#;
        let config: EngineConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.cache_capacity, 32);
        assert_eq!(config.scoring.skip_penalty, 0.25);
        assert_eq!(config.scoring.position_weight, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = EngineConfig {
            cache_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AlignmentError::InvalidInput { .. })
        ));
    }

    #[test]
    fn negative_penalty_is_rejected() {
        let mut config = EngineConfig::default();
        config.scoring.skip_penalty = -0.1;
        assert!(config.validate().is_err());
        config.scoring.skip_penalty = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_and_validates_file() {
        let path = std::env::temp_dir().join("kata_align_engine_config_load.json");
        std::fs::write(&path, r#"{ "cache_capacity": 8 }"#).expect("write config");
        let config = EngineConfig::load(&path).expect("load config");
        assert_eq!(config.cache_capacity, 8);

        std::fs::write(&path, r#"{ "cache_capacity": 0 }"#).expect("write config");
        assert!(EngineConfig::load(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/engine.json")).unwrap_err();
        assert!(matches!(err, AlignmentError::Io { .. }));
    }
}
