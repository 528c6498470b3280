//! migration-grader CLI tool.
//!
//! Usage:
//! ```bash
//! migration-grader grade --golden golden.diff --candidate candidate.diff
//! migration-grader grade --golden golden.diff --candidate-base main --candidate-head feature
//! migration-grader list-detectors
//! migration-grader init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use migration_grader::SearchPaths;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod source;

/// Grades a candidate code migration against a golden diff
#[derive(Parser)]
#[command(name = "migration-grader")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a candidate diff against a golden diff
    Grade {
        /// Golden diff file (`-` for stdin)
        #[arg(long)]
        golden: Option<PathBuf>,

        /// Candidate diff file (`-` for stdin)
        #[arg(long)]
        candidate: Option<PathBuf>,

        /// Base revision of the golden change (diffs the git checkout)
        #[arg(long, requires = "golden_head")]
        golden_base: Option<String>,

        /// Head revision of the golden change
        #[arg(long, requires = "golden_base")]
        golden_head: Option<String>,

        /// Base revision of the candidate change
        #[arg(long, requires = "candidate_head")]
        candidate_base: Option<String>,

        /// Head revision of the candidate change
        #[arg(long, requires = "candidate_base")]
        candidate_head: Option<String>,

        /// Git checkout used for revision ranges
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Also write report.json and report.md to this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Only run specific detectors (comma-separated ids)
        #[arg(long)]
        detectors: Option<String>,

        /// Exit with status 1 when the overall score is below this value (0-100)
        #[arg(long)]
        fail_under: Option<f64>,
    },

    /// List available detectors
    ListDetectors,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for grade reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// Markdown summary.
    Markdown,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Grade {
            golden,
            candidate,
            golden_base,
            golden_head,
            candidate_base,
            candidate_head,
            repo,
            format,
            output_dir,
            detectors,
            fail_under,
        } => {
            let search = SearchPaths::new(".", cli.config);
            let golden =
                source::DiffSource::from_args("golden", golden, golden_base, golden_head, &repo)?;
            let candidate = source::DiffSource::from_args(
                "candidate",
                candidate,
                candidate_base,
                candidate_head,
                &repo,
            )?;
            commands::grade::run(&commands::grade::GradeOptions {
                golden,
                candidate,
                format,
                output_dir,
                detectors,
                fail_under,
                search,
            })
        }
        Commands::ListDetectors => {
            commands::list_detectors::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
