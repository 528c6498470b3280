//! Grade report types and rendering.

use crate::detector::{DetectionOutcome, DetectionState};
use crate::noise::NoiseInstance;
use crate::scoring::ScoreBreakdown;

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// A detection outcome paired with the weight it carries in scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedOutcome {
    /// Outcome produced by the detector.
    #[serde(flatten)]
    pub outcome: DetectionOutcome,
    /// Scoring weight (tier weight or configured override).
    pub weight: u32,
}

/// Whether a golden file was matched by the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Both diffs touch the file.
    Matched,
    /// Only the golden diff touches the file.
    Missed,
}

/// Detection outcomes for one golden file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileGrade {
    /// Normalized path.
    pub path: String,
    /// Match status.
    pub status: FileStatus,
    /// One outcome per enabled detector.
    pub outcomes: Vec<WeightedOutcome>,
}

impl FileGrade {
    /// Iterates over outcomes that take part in scoring.
    pub fn graded(&self) -> impl Iterator<Item = &WeightedOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.outcome.state != DetectionState::NotApplicable)
    }
}

/// Complete result of grading a candidate diff against a golden diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Score breakdown on the 0–100 scale.
    pub score: ScoreBreakdown,
    /// Per-file detection results, golden order.
    pub files: Vec<FileGrade>,
    /// Candidate-only file paths.
    pub extra_files: Vec<String>,
    /// Paths dropped by the exclusion list.
    pub excluded_files: Vec<String>,
    /// Noise instances found in the candidate.
    pub noise: Vec<NoiseInstance>,
    /// Number of detectors that ran.
    pub detectors_run: usize,
}

impl GradeReport {
    /// Counts graded outcomes per state, in evaluation order.
    #[must_use]
    pub fn state_counts(&self) -> Vec<(DetectionState, usize)> {
        [
            DetectionState::Correct,
            DetectionState::Incorrect,
            DetectionState::Missing,
            DetectionState::FileMissing,
            DetectionState::Unnecessary,
        ]
        .into_iter()
        .map(|state| {
            let count = self
                .files
                .iter()
                .flat_map(|f| f.outcomes.iter())
                .filter(|o| o.outcome.state == state)
                .count();
            (state, count)
        })
        .collect()
    }

    /// Returns true if the overall score is at least `threshold` (0–100).
    #[must_use]
    pub fn passes(&self, threshold: f64) -> bool {
        self.score.overall >= threshold
    }

    /// Formats the report as plain text for terminal output.
    #[must_use]
    pub fn format_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Overall score: {:.2}", self.score.overall);
        let _ = writeln!(out, "  file coverage: {:.2}", self.score.file_coverage);
        let _ = writeln!(out, "  pattern:       {:.2}", self.score.pattern);
        let _ = writeln!(out, "  noise penalty: {:.2}", self.score.noise_penalty);

        for file in &self.files {
            let graded: Vec<&WeightedOutcome> = file.graded().collect();
            if graded.is_empty() {
                continue;
            }
            let status = match file.status {
                FileStatus::Matched => "matched",
                FileStatus::Missed => "missed",
            };
            let _ = writeln!(out, "\n{} ({status})", file.path);
            for o in graded {
                let _ = writeln!(
                    out,
                    "  [{}] {} (w{}): {}",
                    o.outcome.state, o.outcome.detector_id, o.weight, o.outcome.message
                );
                for detail in &o.outcome.details {
                    let _ = writeln!(out, "      - {detail}");
                }
            }
        }

        if !self.noise.is_empty() {
            let _ = writeln!(out, "\nNoise:");
            for n in &self.noise {
                let location = match n.line {
                    Some(line) => format!("{}:{line}", n.path),
                    None => n.path.clone(),
                };
                let _ = writeln!(
                    out,
                    "  {} {location} (-{:.2}): {}",
                    n.category, n.penalty, n.description
                );
            }
        }

        let _ = writeln!(
            out,
            "\nGraded {} file(s) with {} detector(s); {} extra, {} excluded",
            self.files.len(),
            self.detectors_run,
            self.extra_files.len(),
            self.excluded_files.len()
        );
        out
    }

    /// Formats the report as a Markdown document.
    #[must_use]
    pub fn format_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Migration Grade\n");
        let _ = writeln!(out, "| Metric | Score |");
        let _ = writeln!(out, "|--------|-------|");
        let _ = writeln!(out, "| Overall | {:.2} |", self.score.overall);
        let _ = writeln!(out, "| File coverage | {:.2} |", self.score.file_coverage);
        let _ = writeln!(out, "| Pattern | {:.2} |", self.score.pattern);
        let _ = writeln!(out, "| Noise penalty | {:.2} |", self.score.noise_penalty);

        let _ = writeln!(out, "\n## Outcomes\n");
        for (state, count) in self.state_counts() {
            let _ = writeln!(out, "- {state}: {count}");
        }

        let _ = writeln!(out, "\n## Files\n");
        for file in &self.files {
            let _ = writeln!(out, "### `{}`\n", file.path);
            let graded: Vec<&WeightedOutcome> = file.graded().collect();
            if graded.is_empty() {
                let _ = writeln!(out, "_No applicable detectors._\n");
                continue;
            }
            let _ = writeln!(out, "| Detector | State | Weight | Message |");
            let _ = writeln!(out, "|----------|-------|--------|---------|");
            for o in graded {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} |",
                    o.outcome.detector_id,
                    o.outcome.state,
                    o.weight,
                    o.outcome.message.replace('|', "\\|")
                );
            }
            let _ = writeln!(out);
        }

        if !self.extra_files.is_empty() {
            let _ = writeln!(out, "## Extra files\n");
            for path in &self.extra_files {
                let _ = writeln!(out, "- `{path}`");
            }
            let _ = writeln!(out);
        }

        if !self.noise.is_empty() {
            let _ = writeln!(out, "## Noise\n");
            for n in &self.noise {
                let line = n.line.map(|l| format!(":{l}")).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "- **{}** `{}{line}` (-{:.2}): {}",
                    n.category, n.path, n.penalty, n.description
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseCategory;

    fn report() -> GradeReport {
        GradeReport {
            score: ScoreBreakdown {
                overall: 83.0,
                file_coverage: 100.0,
                pattern: 75.0,
                noise_penalty: 5.0,
            },
            files: vec![FileGrade {
                path: "src/App.tsx".to_string(),
                status: FileStatus::Matched,
                outcomes: vec![
                    WeightedOutcome {
                        outcome: DetectionOutcome::new(
                            "prop-theme-dark-removed",
                            DetectionState::Correct,
                            "theme=\"dark\" removed",
                        ),
                        weight: 3,
                    },
                    WeightedOutcome {
                        outcome: DetectionOutcome::new(
                            "import-button-moved",
                            DetectionState::NotApplicable,
                            "n/a",
                        ),
                        weight: 1,
                    },
                ],
            }],
            extra_files: vec![],
            excluded_files: vec![],
            noise: vec![NoiseInstance::new(
                NoiseCategory::Artifact,
                "src/App.tsx",
                Some(12),
                "debug print call",
            )],
            detectors_run: 2,
        }
    }

    #[test]
    fn text_report_snapshot() {
        insta::assert_snapshot!(report().format_text(), @r#"
        Overall score: 83.00
          file coverage: 100.00
          pattern:       75.00
          noise penalty: 5.00

        src/App.tsx (matched)
          [CORRECT] prop-theme-dark-removed (w3): theme="dark" removed

        Noise:
          artifact src/App.tsx:12 (-0.05): debug print call

        Graded 1 file(s) with 2 detector(s); 0 extra, 0 excluded
        "#);
    }

    #[test]
    fn markdown_lists_graded_outcomes_only() {
        let md = report().format_markdown();
        assert!(md.contains("| prop-theme-dark-removed | CORRECT | 3 |"));
        assert!(!md.contains("import-button-moved"));
        assert!(md.contains("- CORRECT: 1"));
    }

    #[test]
    fn passes_threshold() {
        assert!(report().passes(80.0));
        assert!(!report().passes(90.0));
    }
}
