//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# migration-grader configuration

# Detector preset: "all" (default) or "core" (basic tier only)
preset = "all"

[matcher]
# Extra glob patterns to leave out of grading, on top of
# snapshots and lockfiles
exclude = [
    "**/generated/**",
]

[scoring]
# Weights of the three score terms
file_coverage = 0.20
pattern = 0.65
noise = 0.15

# Per-detector overrides
# [detectors.prop-theme-dark-removed]
# enabled = false
# weight = 2

# Project-specific detectors
# [[prop-removal]]
# id = "prop-size-removed"
# prop = "size"
# tier = "basic"
#
# [[component-rename]]
# id = "component-panel-renamed"
# from = "Panel"
# to = "Card"
#
# [[import-move]]
# id = "import-chart-moved"
# symbol = "Chart"
# from = "@acme/ui/charts"
# to = "@acme/charts"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("migration-grader.toml"), force)?;

    println!("Created migration-grader.toml");
    println!("\nNext steps:");
    println!("  1. Edit migration-grader.toml to tune weights and detectors");
    println!("  2. Run: migration-grader grade --golden golden.diff --candidate candidate.diff");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    Ok(())
}
