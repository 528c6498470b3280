//! # migration-grader-detectors
//!
//! Built-in detectors for migration-grader.
//!
//! Detectors are parameterized kinds; the shipped [`catalog`] instantiates
//! them for the `@acme/ui` v4 → v5 upgrade, and [`declarative`] lets a
//! configuration file define more.
//!
//! ## Detector Kinds
//!
//! | Kind | Golden diff pattern | Default tier |
//! |------|---------------------|--------------|
//! | [`PropRemoval`] | removes `prop` or `prop="value"` | basic |
//! | [`PropRename`] | swaps prop `from` for `to` | basic |
//! | [`ImportMove`] | moves an import between modules | basic |
//! | [`CallReplacement`] | swaps calls of `from(` for `to(` | basic |
//! | [`ComponentRename`] | swaps `<From>` for `<To>` | intermediate |
//! | [`WrapperRemoval`] | unwraps `<Wrapper>...</Wrapper>` | advanced |
//!
//! ## Usage
//!
//! ```ignore
//! use migration_grader_core::Grader;
//! use migration_grader_detectors::default_registry;
//!
//! let grader = Grader::builder()
//!     .registry(default_registry())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod declarative;

mod call_replacement;
mod component_rename;
mod import_move;
mod presets;
mod prop_removal;
mod prop_rename;
mod swap;
mod wrapper_removal;

pub use call_replacement::CallReplacement;
pub use catalog::{all_detectors, default_registry};
pub use component_rename::ComponentRename;
pub use declarative::{load_detectors_from_file, load_detectors_from_toml, LoadDetectorsError};
pub use import_move::ImportMove;
pub use presets::{core_detectors, Preset};
pub use prop_removal::PropRemoval;
pub use prop_rename::PropRename;
pub use wrapper_removal::WrapperRemoval;

/// Re-export core types for convenience.
pub use migration_grader_core::{DetectionState, Detector, Tier};
