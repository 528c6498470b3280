//! Grade command implementation.

use anyhow::{bail, Context, Result};
use migration_grader::ts::TsxExtractor;
use migration_grader::{
    build_registry, ConfigFile, DetectorRegistry, GradeReport, Grader, RunError, SearchPaths,
};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::source::DiffSource;
use crate::OutputFormat;

/// Resolved arguments of the grade command.
pub struct GradeOptions {
    /// Reference diff.
    pub golden: DiffSource,
    /// Submitted diff.
    pub candidate: DiffSource,
    /// Stdout format.
    pub format: OutputFormat,
    /// Directory for report.json and report.md.
    pub output_dir: Option<PathBuf>,
    /// Comma-separated detector ids to keep.
    pub detectors: Option<String>,
    /// Minimum passing overall score.
    pub fail_under: Option<f64>,
    /// Where to look for the configuration file.
    pub search: SearchPaths,
}

/// Runs the grade command.
pub fn run(options: &GradeOptions) -> Result<()> {
    let report = grade(options)?;

    super::output::print(&report, options.format)?;
    if let Some(dir) = &options.output_dir {
        let written = super::output::write_reports(&report, dir)?;
        for path in written {
            tracing::info!("Wrote {}", path.display());
        }
    }

    if let Some(threshold) = options.fail_under {
        if !report.passes(threshold) {
            eprintln!(
                "Overall score {:.0} is below --fail-under {threshold}",
                report.score.overall
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Reads both diffs and grades them.
pub fn grade(options: &GradeOptions) -> Result<GradeReport> {
    if options.golden == DiffSource::Stdin && options.candidate == DiffSource::Stdin {
        bail!("Only one of --golden and --candidate can read from stdin");
    }

    let file = ConfigFile::discover(&options.search)
        .map_err(render_diagnostic)
        .context("Failed to read config")?;
    tracing::debug!("Configuration: {}", file);
    let config = file
        .config()
        .map_err(render_diagnostic)
        .context("Failed to load config")?;
    let mut registry = build_registry(&file.content, &config)
        .map_err(render_diagnostic)
        .context("Failed to load detectors")?;
    if let Some(filter) = &options.detectors {
        filter_detectors(&mut registry, filter);
    }

    let grader = Grader::builder()
        .registry(registry)
        .config(config)
        .extractor(Box::new(TsxExtractor::new()))
        .build()
        .context("Failed to build grader")?;

    let golden = options
        .golden
        .read()
        .with_context(|| format!("Failed to read golden diff from {}", options.golden))?;
    let candidate = options
        .candidate
        .read()
        .with_context(|| format!("Failed to read candidate diff from {}", options.candidate))?;

    tracing::info!(
        "Grading {} against {} with {} detectors",
        options.candidate,
        options.golden,
        grader.detector_count()
    );

    Ok(grader.grade_text(&golden, &candidate))
}

/// Keeps miette's code and help text in the error chain.
fn render_diagnostic(e: RunError) -> anyhow::Error {
    anyhow::anyhow!("{:?}", miette::Report::new(e))
}

fn filter_detectors(registry: &mut DetectorRegistry, filter: &str) {
    let wanted: HashSet<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();

    for id in &wanted {
        if registry.get(id).is_none() {
            tracing::warn!("Unknown detector: {}", id);
        }
    }
    registry.retain(|id| wanted.contains(id));
}
