//! One-call grading from raw configuration text.
//!
//! Composes the preset registry, the declarative detectors defined in the
//! same TOML file and the TypeScript extractor into a [`Grader`].

use migration_grader_core::{
    Config, ConfigError, DetectorRegistry, GradeReport, Grader, RegistryError,
};
use migration_grader_detectors::{load_detectors_from_toml, LoadDetectorsError, Preset};
use migration_grader_ts::TsxExtractor;
use miette::Diagnostic;
use std::path::PathBuf;
use tracing::debug;

/// Errors from assembling a grader out of configuration.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum RunError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}")]
    #[diagnostic(
        code(migration_grader::config::read),
        help("check the --config path, or remove it to use the defaults")
    )]
    Read {
        /// The file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The base configuration is invalid.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// A declarative detector section is invalid.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Detectors(#[from] LoadDetectorsError),

    /// The `preset` key names no known preset.
    #[error("unknown preset `{name}`")]
    #[diagnostic(
        code(migration_grader::config::preset),
        help("valid presets: all, core")
    )]
    UnknownPreset {
        /// The configured name.
        name: String,
    },

    /// A declarative detector reuses a shipped detector id.
    #[error(transparent)]
    #[diagnostic(code(migration_grader::detectors::duplicate))]
    Registry(#[from] RegistryError),
}

/// Parses the base configuration; empty content yields the defaults.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or the weights are invalid.
pub fn load_config(content: &str) -> Result<Config, RunError> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(Config::parse(content)?)
}

/// Resolves the configured preset, defaulting to [`Preset::All`].
///
/// # Errors
///
/// Returns an error for an unknown preset name.
pub fn resolve_preset(config: &Config) -> Result<Preset, RunError> {
    match config.preset.as_deref() {
        None => Ok(Preset::default()),
        Some(name) => Preset::parse(name).ok_or_else(|| RunError::UnknownPreset {
            name: name.to_string(),
        }),
    }
}

/// Builds the preset registry and appends the declarative detectors from
/// `content`.
///
/// # Errors
///
/// Returns an error if the preset is unknown, a declarative section is
/// invalid, or a declarative id collides with a registered one.
pub fn build_registry(content: &str, config: &Config) -> Result<DetectorRegistry, RunError> {
    let mut registry = resolve_preset(config)?.registry();
    if content.trim().is_empty() {
        return Ok(registry);
    }

    let declarative = load_detectors_from_toml(content)?;
    debug!("loaded {} declarative detector(s)", declarative.len());
    for detector in declarative {
        registry.register_box(detector)?;
    }
    Ok(registry)
}

/// Builds a grader from raw `migration-grader.toml` content.
///
/// # Errors
///
/// Returns an error if any part of the configuration is invalid.
pub fn build_grader(content: &str) -> Result<Grader, RunError> {
    let config = load_config(content)?;
    let registry = build_registry(content, &config)?;
    Ok(Grader::builder()
        .registry(registry)
        .config(config)
        .extractor(Box::new(TsxExtractor::new()))
        .build()?)
}

/// Grades `candidate` against `golden` with the configuration in
/// `content`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid. Grading itself never
/// fails.
pub fn grade_diffs(golden: &str, candidate: &str, content: &str) -> Result<GradeReport, RunError> {
    Ok(build_grader(content)?.grade_text(golden, candidate))
}
