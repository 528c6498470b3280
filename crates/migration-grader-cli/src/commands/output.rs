//! Shared output formatting for grade reports.

use anyhow::{Context, Result};
use migration_grader::GradeReport;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print the report in the specified format.
pub fn print(report: &GradeReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report.format_text()),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Markdown => print!("{}", report.format_markdown()),
    }
    Ok(())
}

fn print_json(report: &GradeReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

/// Writes `report.json` and `report.md` into `dir`, creating it if needed.
pub fn write_reports(report: &GradeReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let json_path = dir.join("report.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let md_path = dir.join("report.md");
    std::fs::write(&md_path, report.format_markdown())
        .with_context(|| format!("Failed to write {}", md_path.display()))?;

    Ok(vec![json_path, md_path])
}
