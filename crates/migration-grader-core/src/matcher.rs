//! Path normalization and golden/candidate file pairing.

use crate::record::ChangeRecord;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// File-name patterns that never take part in grading.
///
/// Snapshot files and package-manager lockfiles are generated output;
/// differences in them say nothing about the migration itself.
pub const DEFAULT_EXCLUDES: &[&str] = &["*.snap", "package-lock.json", "yarn.lock", "pnpm-lock.yaml"];

/// A golden record paired with the candidate record for the same path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// Normalized path shared by both records.
    pub path: String,
    /// Reference record.
    pub golden: ChangeRecord,
    /// Submission record.
    pub candidate: ChangeRecord,
}

/// Result of pairing golden and candidate records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Files touched by both diffs.
    pub matched: Vec<MatchedPair>,
    /// Files the golden diff touches but the candidate does not.
    pub missed: Vec<ChangeRecord>,
    /// Files the candidate touches but the golden diff does not.
    pub extra: Vec<ChangeRecord>,
    /// Normalized paths dropped by the exclusion list (either side).
    pub excluded: Vec<String>,
}

impl MatchResult {
    /// Number of golden files that take part in grading.
    #[must_use]
    pub fn golden_total(&self) -> usize {
        self.matched.len() + self.missed.len()
    }
}

/// Normalizes a diff path for comparison.
///
/// Backslashes become forward slashes and a leading `a/` or `b/` segment
/// is stripped.
///
/// ```
/// use migration_grader_core::normalize_path;
///
/// assert_eq!(normalize_path("b/src\\app.tsx"), "src/app.tsx");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    forward
        .strip_prefix("a/")
        .or_else(|| forward.strip_prefix("b/"))
        .unwrap_or(&forward)
        .to_string()
}

/// Set of exclusion patterns: the fixed denylist plus configured globs.
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    file_patterns: Vec<glob::Pattern>,
    path_patterns: Vec<glob::Pattern>,
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl ExcludeSet {
    /// Creates the default denylist extended with `extra` path globs.
    ///
    /// Invalid extra patterns are logged and ignored.
    #[must_use]
    pub fn new(extra: &[String]) -> Self {
        let file_patterns = DEFAULT_EXCLUDES
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();
        let path_patterns = extra
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("Ignoring invalid exclude pattern `{}`: {}", p, e);
                    None
                }
            })
            .collect();
        Self {
            file_patterns,
            path_patterns,
        }
    }

    /// Returns true if the normalized path must not be graded.
    #[must_use]
    pub fn is_excluded(&self, normalized: &str) -> bool {
        let file_name = normalized.rsplit('/').next().unwrap_or(normalized);
        self.file_patterns.iter().any(|p| p.matches(file_name))
            || self.path_patterns.iter().any(|p| p.matches(normalized))
    }
}

/// Pairs golden and candidate records by exact normalized path.
///
/// Records whose path is excluded land in neither bucket. When one side
/// lists the same path twice the first record wins. Renames are not
/// tracked across the two diffs.
#[must_use]
pub fn match_files(
    golden: &[ChangeRecord],
    candidate: &[ChangeRecord],
    excludes: &ExcludeSet,
) -> MatchResult {
    let mut result = MatchResult::default();
    let mut excluded: HashSet<String> = HashSet::new();

    let mut candidate_by_path: HashMap<String, &ChangeRecord> = HashMap::new();
    let mut candidate_order: Vec<String> = Vec::new();
    for record in candidate {
        let path = normalize_path(&record.path);
        if excludes.is_excluded(&path) {
            excluded.insert(path);
            continue;
        }
        if !candidate_by_path.contains_key(&path) {
            candidate_order.push(path.clone());
            candidate_by_path.insert(path, record);
        }
    }

    let mut seen_golden: HashSet<String> = HashSet::new();
    for record in golden {
        let path = normalize_path(&record.path);
        if excludes.is_excluded(&path) {
            excluded.insert(path);
            continue;
        }
        if !seen_golden.insert(path.clone()) {
            debug!("Ignoring duplicate golden record for {}", path);
            continue;
        }
        match candidate_by_path.get(&path) {
            Some(cand) => result.matched.push(MatchedPair {
                path,
                golden: record.clone(),
                candidate: (*cand).clone(),
            }),
            None => result.missed.push(record.clone()),
        }
    }

    result.extra = candidate_order
        .iter()
        .filter(|path| !seen_golden.contains(*path))
        .filter_map(|path| candidate_by_path.get(path).map(|r| (*r).clone()))
        .collect();

    let mut excluded: Vec<String> = excluded.into_iter().collect();
    excluded.sort();
    result.excluded = excluded;

    debug!(
        "Matched {} file(s), {} missed, {} extra, {} excluded",
        result.matched.len(),
        result.missed.len(),
        result.extra.len(),
        result.excluded.len()
    );

    result
}
