//! Subcommand implementations.

pub mod grade;
pub mod init;
pub mod list_detectors;
pub mod output;
