//! Noise scanner: penalties for candidate changes that do not serve the
//! migration.
//!
//! Five independent scans run over the candidate; their results are
//! concatenated in scan order:
//!
//! | Category | Trigger | Penalty |
//! |----------|---------|---------|
//! | `unnecessary_change` | candidate-only file | 0.01 |
//! | `formatting_only` | matched file whose changes are whitespace-only | 0.02 |
//! | `incorrect_migration` | `INCORRECT` detection outcome | 0.03 |
//! | `artifact` | debug print, debugger, TODO, type-check suppression | 0.05 |
//! | `placeholder_token` | placeholder text left in added lines | 0.05 |

use crate::detector::DetectionState;
use crate::matcher::{normalize_path, MatchResult};
use crate::record::ChangeRecord;
use crate::report::FileGrade;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Closed set of noise categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseCategory {
    /// File changed by the candidate but not by the golden diff.
    UnnecessaryChange,
    /// Matched file whose changes only move whitespace around.
    FormattingOnly,
    /// Detector outcome in the `INCORRECT` state.
    IncorrectMigration,
    /// Debugging or suppression artifact on an added line.
    Artifact,
    /// Placeholder text on an added line.
    PlaceholderToken,
}

impl NoiseCategory {
    /// Fixed per-instance penalty on the 0–1 scale.
    #[must_use]
    pub fn penalty(self) -> f64 {
        match self {
            Self::UnnecessaryChange => 0.01,
            Self::FormattingOnly => 0.02,
            Self::IncorrectMigration => 0.03,
            Self::Artifact | Self::PlaceholderToken => 0.05,
        }
    }

    /// Returns the serialized name of the category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnnecessaryChange => "unnecessary_change",
            Self::FormattingOnly => "formatting_only",
            Self::IncorrectMigration => "incorrect_migration",
            Self::Artifact => "artifact",
            Self::PlaceholderToken => "placeholder_token",
        }
    }
}

impl std::fmt::Display for NoiseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One penalized occurrence of noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseInstance {
    /// Category of the noise.
    pub category: NoiseCategory,
    /// Normalized path of the offending file.
    pub path: String,
    /// Line in the candidate's new file, when the noise is line-level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Human-readable description.
    pub description: String,
    /// Penalty for this instance (fixed by category).
    pub penalty: f64,
}

impl NoiseInstance {
    /// Creates an instance with the category's fixed penalty.
    #[must_use]
    pub fn new(
        category: NoiseCategory,
        path: impl Into<String>,
        line: Option<u32>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            path: path.into(),
            line,
            description: description.into(),
            penalty: category.penalty(),
        }
    }
}

/// A line marker and the description reported when it matches.
struct Marker {
    pattern: Regex,
    label: &'static str,
}

#[allow(clippy::expect_used)]
fn marker(pattern: &str, label: &'static str) -> Marker {
    Marker {
        pattern: Regex::new(pattern).expect("valid regex"),
        label,
    }
}

fn artifact_markers() -> &'static [Marker] {
    static ARTIFACTS: OnceLock<Vec<Marker>> = OnceLock::new();
    ARTIFACTS.get_or_init(|| {
        vec![
            marker(r"\bconsole\.(?:log|debug|info|trace)\s*\(", "debug print call"),
            marker(r"\bdebugger\b", "debugger breakpoint"),
            marker(r"\bTODO\b", "TODO comment"),
            marker(r"@ts-(?:ignore|nocheck|expect-error)\b", "type-checker suppression"),
        ]
    })
}

fn placeholder_markers() -> &'static [Marker] {
    static PLACEHOLDERS: OnceLock<Vec<Marker>> = OnceLock::new();
    PLACEHOLDERS.get_or_init(|| {
        vec![
            marker(r"\bPLACEHOLDER\b", "PLACEHOLDER token"),
            marker(r"\b(?:REPLACE_ME|CHANGEME|FIXME_LATER)\b", "replace-me token"),
            marker(r"<(?:your|insert)[-_ ][^>]*>", "fill-in template token"),
            marker(
                r"(?i)\.\.\.\s*(?:existing|rest of|remaining)\s+(?:code|implementation)",
                "elided-code marker",
            ),
            marker(r"(?i)\blorem ipsum\b", "lorem ipsum filler"),
        ]
    })
}

/// Runs all five noise scans.
///
/// Only the candidate records the matcher kept are scanned: matched
/// candidates and extras. Excluded paths and duplicate records never reach
/// the line scans. `files` supplies the detection outcomes per golden file.
#[must_use]
pub fn scan_noise(matches: &MatchResult, files: &[FileGrade]) -> Vec<NoiseInstance> {
    let graded: Vec<(String, &ChangeRecord)> = matches
        .matched
        .iter()
        .map(|pair| (pair.path.clone(), &pair.candidate))
        .chain(matches.extra.iter().map(|r| (normalize_path(&r.path), r)))
        .collect();

    let mut noise = Vec::new();
    noise.extend(scan_unnecessary(matches));
    noise.extend(scan_formatting_only(matches));
    noise.extend(scan_incorrect(files));
    noise.extend(scan_lines(&graded, NoiseCategory::Artifact, artifact_markers()));
    noise.extend(scan_lines(
        &graded,
        NoiseCategory::PlaceholderToken,
        placeholder_markers(),
    ));
    noise
}

fn scan_unnecessary(matches: &MatchResult) -> Vec<NoiseInstance> {
    matches
        .extra
        .iter()
        .map(|r| {
            NoiseInstance::new(
                NoiseCategory::UnnecessaryChange,
                normalize_path(&r.path),
                None,
                "file changed but not part of the golden diff",
            )
        })
        .collect()
}

fn scan_formatting_only(matches: &MatchResult) -> Vec<NoiseInstance> {
    matches
        .matched
        .iter()
        .filter(|pair| is_formatting_only(&pair.candidate))
        .map(|pair| {
            NoiseInstance::new(
                NoiseCategory::FormattingOnly,
                pair.path.clone(),
                None,
                "changes only differ in whitespace",
            )
        })
        .collect()
}

/// Returns true if the record changes lines but every change is
/// whitespace-only: added and removed lines are equal as sorted multisets
/// once all whitespace is dropped.
#[must_use]
pub fn is_formatting_only(record: &ChangeRecord) -> bool {
    if record.is_empty() {
        return false;
    }
    squashed_sorted(record.added_texts()) == squashed_sorted(record.removed_texts())
}

fn squashed_sorted<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut squashed: Vec<String> = lines
        .map(|l| l.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|l| !l.is_empty())
        .collect();
    squashed.sort();
    squashed
}

fn scan_incorrect(files: &[FileGrade]) -> Vec<NoiseInstance> {
    files
        .iter()
        .flat_map(|file| {
            file.outcomes
                .iter()
                .filter(|o| o.outcome.state == DetectionState::Incorrect)
                .map(move |o| {
                    NoiseInstance::new(
                        NoiseCategory::IncorrectMigration,
                        file.path.clone(),
                        None,
                        format!("{}: {}", o.outcome.detector_id, o.outcome.message),
                    )
                })
        })
        .collect()
}

/// One instance per offending added line, whichever marker hits first.
fn scan_lines(
    records: &[(String, &ChangeRecord)],
    category: NoiseCategory,
    markers: &[Marker],
) -> Vec<NoiseInstance> {
    records
        .iter()
        .flat_map(|(path, record)| {
            record.added.iter().filter_map(move |entry| {
                markers
                    .iter()
                    .find(|m| m.pattern.is_match(&entry.text))
                    .map(|m| NoiseInstance::new(category, path.clone(), Some(entry.line), m.label))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::DetectionOutcome;
    use crate::matcher::{match_files, ExcludeSet, MatchedPair};
    use crate::record::LineEntry;
    use crate::report::{FileStatus, WeightedOutcome};

    fn record(path: &str, removed: &[&str], added: &[&str]) -> ChangeRecord {
        let mut r = ChangeRecord::new(path);
        r.removed = removed
            .iter()
            .zip(1..)
            .map(|(t, n)| LineEntry::new(n, *t))
            .collect();
        r.added = added
            .iter()
            .zip(1..)
            .map(|(t, n)| LineEntry::new(n, *t))
            .collect();
        r
    }

    fn scan(golden: &[ChangeRecord], candidate: &[ChangeRecord]) -> Vec<NoiseInstance> {
        let excludes = ExcludeSet::default();
        let matches = match_files(golden, candidate, &excludes);
        scan_noise(&matches, &[])
    }

    #[test]
    fn extra_file_is_unnecessary_change() {
        let noise = scan(&[], &[record("extra.ts", &["a"], &["b"])]);
        assert_eq!(noise.len(), 1);
        assert_eq!(noise[0].category, NoiseCategory::UnnecessaryChange);
        assert!((noise[0].penalty - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn excluded_files_produce_no_noise() {
        let noise = scan(&[], &[record("yarn.lock", &[], &["// TODO"])]);
        assert!(noise.is_empty());
    }

    #[test]
    fn duplicate_candidate_record_is_scanned_once() {
        let first = record("src\\a.ts", &[], &["debugger;"]);
        let duplicate = record("src/a.ts", &[], &["debugger;"]);
        let golden = record("src/a.ts", &["x"], &["y"]);
        let noise = scan(&[golden], &[first, duplicate]);
        let artifacts: Vec<_> = noise
            .iter()
            .filter(|n| n.category == NoiseCategory::Artifact)
            .collect();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].path, "src/a.ts");
    }

    #[test]
    fn whitespace_only_change_is_formatting() {
        let cand = record("a.ts", &["const x = 1;", "foo( a,b )"], &["foo(a, b)", "const  x=1;"]);
        let noise = scan(&[record("a.ts", &["x"], &["y"])], &[cand]);
        assert_eq!(noise.len(), 1);
        assert_eq!(noise[0].category, NoiseCategory::FormattingOnly);
    }

    #[test]
    fn semantic_change_is_not_formatting() {
        let cand = record("a.ts", &["const x = 1;"], &["const x = 2;"]);
        assert!(!is_formatting_only(&cand));
        assert!(!is_formatting_only(&ChangeRecord::new("empty.ts")));
    }

    #[test]
    fn incorrect_outcomes_become_noise() {
        let files = vec![FileGrade {
            path: "a.tsx".to_string(),
            status: FileStatus::Matched,
            outcomes: vec![
                WeightedOutcome {
                    outcome: DetectionOutcome::new("d1", DetectionState::Incorrect, "re-added"),
                    weight: 1,
                },
                WeightedOutcome {
                    outcome: DetectionOutcome::new("d2", DetectionState::Correct, "ok"),
                    weight: 1,
                },
            ],
        }];
        let noise = scan_incorrect(&files);
        assert_eq!(noise.len(), 1);
        assert_eq!(noise[0].category, NoiseCategory::IncorrectMigration);
        assert_eq!(noise[0].description, "d1: re-added");
    }

    #[test]
    fn artifact_once_per_line() {
        let cand = record(
            "a.ts",
            &[],
            &["console.log('x'); // TODO remove", "debugger;", "// @ts-ignore", "fine();"],
        );
        let golden = record("a.ts", &[], &["fine();"]);
        let noise = scan(&[golden], &[cand]);
        let artifacts: Vec<_> = noise
            .iter()
            .filter(|n| n.category == NoiseCategory::Artifact)
            .collect();
        assert_eq!(artifacts.len(), 3);
        assert_eq!(artifacts[0].line, Some(1));
        assert_eq!(artifacts[0].description, "debug print call");
        assert_eq!(artifacts[2].line, Some(3));
    }

    #[test]
    fn placeholder_tokens_detected() {
        let cand = record(
            "a.ts",
            &[],
            &[
                "const key = '<your-api-key>';",
                "// ... existing code ...",
                "<input placeholder=\"Search\" />",
            ],
        );
        let noise = scan(&[record("a.ts", &[], &["x"])], &[cand]);
        let placeholders: Vec<_> = noise
            .iter()
            .filter(|n| n.category == NoiseCategory::PlaceholderToken)
            .collect();
        assert_eq!(placeholders.len(), 2);
    }

    #[test]
    fn scans_concatenate_in_order() {
        let matches = MatchResult {
            matched: vec![MatchedPair {
                path: "m.ts".to_string(),
                golden: record("m.ts", &["a"], &["b"]),
                candidate: record("m.ts", &["a b"], &["ab"]),
            }],
            extra: vec![record("e.ts", &[], &["debugger"])],
            ..MatchResult::default()
        };
        let noise = scan_noise(&matches, &[]);
        let categories: Vec<NoiseCategory> = noise.iter().map(|n| n.category).collect();
        assert_eq!(
            categories,
            vec![
                NoiseCategory::UnnecessaryChange,
                NoiseCategory::FormattingOnly,
                NoiseCategory::Artifact,
            ]
        );
    }
}
