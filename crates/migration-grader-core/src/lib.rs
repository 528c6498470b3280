//! # migration-grader-core
//!
//! Core pipeline for grading a candidate code migration against a golden
//! reference diff.
//!
//! This crate provides:
//!
//! - [`parse_diff`] turning unified diff text into [`ChangeRecord`]s
//! - [`match_files`] pairing golden and candidate records by path
//! - [`Detector`] trait and [`DetectorRegistry`] for per-file rule checks
//! - [`scan_noise`] for penalized candidate changes
//! - [`compute_score`] for the weighted overall score
//! - [`Grader`] for orchestrating the whole run into a [`GradeReport`]
//!
//! ## Example
//!
//! ```ignore
//! use migration_grader_core::{DetectorRegistry, Grader};
//!
//! let mut registry = DetectorRegistry::new();
//! registry.register(MyDetector::new())?;
//!
//! let grader = Grader::builder().registry(registry).build()?;
//! let report = grader.grade_text(&golden_diff, &candidate_diff);
//! println!("{}", report.format_text());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod detector;
mod diff;
mod grader;
mod matcher;
mod noise;
mod record;
mod registry;
mod report;
mod scoring;
mod structure;

/// Utility modules for detector implementations.
pub mod utils;

pub use config::{Config, ConfigError, DetectorConfig, MatcherConfig};
pub use detector::{
    evaluate, DetectionOutcome, DetectionState, Detector, DetectorBox, DetectorInput, Tier,
    Verdict, VerdictKind, ViewPair,
};
pub use diff::parse_diff;
pub use grader::{Grader, GraderBuilder};
pub use matcher::{match_files, normalize_path, ExcludeSet, MatchResult, MatchedPair, DEFAULT_EXCLUDES};
pub use noise::{is_formatting_only, scan_noise, NoiseCategory, NoiseInstance};
pub use record::{ChangeRecord, Hunk, HunkTally, LineEntry, Side};
pub use registry::{DetectorRegistry, RegistryError};
pub use report::{FileGrade, FileStatus, GradeReport, WeightedOutcome};
pub use scoring::{
    compute_score, compute_score_with, file_coverage, noise_penalty, pattern_score,
    ScoreBreakdown, ScoreWeights,
};
pub use structure::{
    Attribute, ExtractorBox, ImportDecl, LineSpan, StructureExtractor, StructuredView, TagUsage,
};
