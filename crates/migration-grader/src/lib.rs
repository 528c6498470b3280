//! # migration-grader
//!
//! Grades a candidate code migration by comparing its diff against a
//! golden (reference) diff.
//!
//! This is the main facade crate that re-exports the core pipeline, the
//! shipped detectors and the tree-sitter extractor.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! let golden = std::fs::read_to_string("golden.diff")?;
//! let candidate = std::fs::read_to_string("candidate.diff")?;
//!
//! let report = migration_grader::grade_diffs(&golden, &candidate, "")?;
//! println!("{}", report.format_text());
//! ```
//!
//! The third argument is the raw `migration-grader.toml` content; an empty
//! string grades with every shipped detector and default weights.
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use migration_grader::{Grader, detectors::Preset, ts::TsxExtractor};
//!
//! let grader = Grader::builder()
//!     .registry(Preset::Core.registry())
//!     .extractor(Box::new(TsxExtractor::new()))
//!     .build()?;
//!
//! let report = grader.grade_text(&golden, &candidate);
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use migration_grader_core::*;

/// Built-in detectors and presets.
pub mod detectors {
    pub use migration_grader_detectors::*;
}

/// Tree-sitter structure extraction.
pub mod ts {
    pub use migration_grader_ts::*;
}

mod config_file;
mod runner;

pub use config_file::{ConfigFile, ConfigOrigin, SearchPaths, CONFIG_DIR_ENV, PROJECT_FILE_NAMES};
pub use runner::{build_grader, build_registry, grade_diffs, load_config, resolve_preset, RunError};
