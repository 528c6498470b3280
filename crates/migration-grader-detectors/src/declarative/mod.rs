//! Declarative detectors driven by TOML configuration.
//!
//! Lets a project grade its own migration patterns without writing Rust
//! detector code.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! Vec<DetectorDefinition>
//!   ↓ load_detectors_from_toml()
//! Vec<DetectorBox>
//! ```

use migration_grader_core::DetectorBox;
use miette::Diagnostic;
use std::path::{Path, PathBuf};

pub mod config_dto;
pub mod loader;
pub mod model;

/// Errors from parsing TOML and loading declarative detectors.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LoadDetectorsError {
    /// Reading the file failed.
    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(migration_grader::detectors::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(migration_grader::detectors::toml))]
    Toml(#[from] toml::de::Error),

    /// Definition validation failed.
    #[error("{0}")]
    #[diagnostic(
        code(migration_grader::detectors::invalid),
        help("ids are lowercase kebab-case; tiers are basic, intermediate or advanced")
    )]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content and creates every declarative detector it defines.
///
/// Returns `Ok(vec![])` if no declarative sections are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or validation fails.
pub fn load_detectors_from_toml(content: &str) -> Result<Vec<DetectorBox>, LoadDetectorsError> {
    let dto: config_dto::DeclarativeConfigDto = toml::from_str(content)?;
    let definitions = loader::load(dto)?;
    Ok(create_detectors(&definitions))
}

/// Reads a TOML file and creates its declarative detectors.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_detectors_from_file(path: &Path) -> Result<Vec<DetectorBox>, LoadDetectorsError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadDetectorsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_detectors_from_toml(&content)
}

/// Instantiates detectors from validated definitions.
#[must_use]
pub fn create_detectors(definitions: &[model::DetectorDefinition]) -> Vec<DetectorBox> {
    definitions.iter().map(model::DetectorDefinition::build).collect()
}
