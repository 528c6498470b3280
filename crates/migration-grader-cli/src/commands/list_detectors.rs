//! List detectors command implementation.

use migration_grader::detectors::all_detectors;

/// Runs the list-detectors command.
pub fn run() {
    println!("Available detectors:\n");
    println!("{:<36} {:<13} Description", "Id", "Tier");
    println!("{}", "-".repeat(100));

    for detector in all_detectors() {
        let description = if detector.description().is_empty() {
            detector.name()
        } else {
            detector.description()
        };
        println!(
            "{:<36} {:<13} {}",
            detector.id(),
            detector.tier().to_string(),
            description
        );
    }

    println!("\nPresets:");
    println!("  all   - Every shipped detector (default)");
    println!("  core  - Basic-tier prop, import and call rewrites only");

    println!("\nTier weights: basic = 1, intermediate = 2, advanced = 3");

    println!("\nUse --detectors to grade with specific detectors, e.g.:");
    println!("  migration-grader grade --golden g.diff --candidate c.diff \\");
    println!("      --detectors prop-theme-dark-removed,import-button-moved");
}
