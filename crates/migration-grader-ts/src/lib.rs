//! # migration-grader-ts
//!
//! Tree-sitter powered structured views for migration-grader.
//!
//! Implements the core [`StructureExtractor`](migration_grader_core::StructureExtractor)
//! seam for TypeScript and JavaScript, with and without JSX:
//!
//! - [`TsxExtractor`] collects import declarations and JSX element usages
//!   (name, attributes, direct element children)
//! - [`Dialect`] maps file extensions to the grammar used

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod tsx;

pub use tsx::{Dialect, TsxExtractor};
