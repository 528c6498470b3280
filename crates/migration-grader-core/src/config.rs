//! Configuration types for migration-grader.

use crate::scoring::ScoreWeights;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration for migration-grader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Detector preset to start from ("all" or "core").
    #[serde(default)]
    pub preset: Option<String>,

    /// File matching configuration.
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Overall-score term weights.
    #[serde(default)]
    pub scoring: ScoreWeights,

    /// Per-detector configurations.
    #[serde(default)]
    pub detectors: HashMap<String, DetectorConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the weights are unusable.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the scoring weights.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWeights`] if a weight is negative or
    /// not finite, or if all weights are zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ScoreWeights {
            file_coverage,
            pattern,
            noise,
        } = self.scoring;
        let all = [file_coverage, pattern, noise];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) || all.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::InvalidWeights {
                file_coverage,
                pattern,
                noise,
            });
        }
        Ok(())
    }

    /// Checks if a detector is enabled (detectors are enabled unless
    /// configured otherwise).
    #[must_use]
    pub fn is_detector_enabled(&self, id: &str) -> bool {
        self.detectors
            .get(id)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the weight override for a detector.
    #[must_use]
    pub fn detector_weight(&self, id: &str) -> Option<u32> {
        self.detectors.get(id).and_then(|c| c.weight)
    }
}

/// File matching configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Extra glob patterns, matched against the normalized path, that are
    /// excluded from grading in addition to the fixed denylist.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Per-detector configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Whether this detector runs.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Scoring weight replacing the tier weight.
    #[serde(default)]
    pub weight: Option<u32>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(migration_grader::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(
        code(migration_grader::config::parse),
        help("run `migration-grader init` to generate a commented template")
    )]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Scoring weights that cannot produce a meaningful score.
    #[error(
        "Invalid scoring weights (file_coverage = {file_coverage}, pattern = {pattern}, noise = {noise})"
    )]
    #[diagnostic(
        code(migration_grader::config::weights),
        help("weights must be finite, non-negative, and not all zero")
    )]
    InvalidWeights {
        /// Configured file coverage weight.
        file_coverage: f64,
        /// Configured pattern weight.
        pattern: f64,
        /// Configured noise weight.
        noise: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.preset.is_none());
        assert!(config.matcher.exclude.is_empty());
        assert_eq!(config.scoring, ScoreWeights::default());
        assert!(config.is_detector_enabled("anything"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "core"

[matcher]
exclude = ["**/generated/**"]

[scoring]
pattern = 0.7
noise = 0.1

[detectors.prop-theme-dark-removed]
enabled = false

[detectors.import-button-moved]
weight = 5
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("core"));
        assert_eq!(config.matcher.exclude, vec!["**/generated/**".to_string()]);
        assert!((config.scoring.file_coverage - 0.20).abs() < f64::EPSILON);
        assert!((config.scoring.pattern - 0.7).abs() < f64::EPSILON);
        assert!(!config.is_detector_enabled("prop-theme-dark-removed"));
        assert!(config.is_detector_enabled("import-button-moved"));
        assert_eq!(config.detector_weight("import-button-moved"), Some(5));
        assert_eq!(config.detector_weight("prop-theme-dark-removed"), None);
    }

    #[test]
    fn test_declarative_sections_are_ignored() {
        let toml = r#"
[[prop-removal]]
id = "drop-legacy"
prop = "legacy"
"#;
        assert!(Config::parse(toml).is_ok());
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = Config::parse("[scoring]\nnoise = -0.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeights { .. }));
    }

    #[test]
    fn test_rejects_all_zero_weights() {
        let toml = "[scoring]\nfile_coverage = 0.0\npattern = 0.0\nnoise = 0.0\n";
        assert!(Config::parse(toml).is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let err = Config::parse("preset = ").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/migration-grader.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
