//! Per-file change records produced by the diff parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single added or removed line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineEntry {
    /// Line number (1-indexed). New-file numbering for added lines,
    /// old-file numbering for removed lines.
    pub line: u32,
    /// Line text without the leading `+`/`-` marker.
    pub text: String,
}

impl LineEntry {
    /// Creates a new line entry.
    #[must_use]
    pub fn new(line: u32, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

/// One contiguous block of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// First line of the hunk in the old file.
    pub old_start: u32,
    /// Number of old-file lines covered by the hunk.
    pub old_count: u32,
    /// First line of the hunk in the new file.
    pub new_start: u32,
    /// Number of new-file lines covered by the hunk.
    pub new_count: u32,
    /// Raw hunk body lines, markers included.
    pub lines: Vec<String>,
}

/// Line tallies of a hunk body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HunkTally {
    /// Context lines (present on both sides).
    pub context: u32,
    /// Added lines.
    pub added: u32,
    /// Removed lines.
    pub removed: u32,
}

impl HunkTally {
    /// Old-file lines implied by the tally.
    #[must_use]
    pub fn old_lines(self) -> u32 {
        self.context + self.removed
    }

    /// New-file lines implied by the tally.
    #[must_use]
    pub fn new_lines(self) -> u32 {
        self.context + self.added
    }
}

impl Hunk {
    /// Counts context, added, and removed lines in the hunk body.
    #[must_use]
    pub fn tally(&self) -> HunkTally {
        self.lines
            .iter()
            .fold(HunkTally::default(), |mut tally, line| {
                match line.as_bytes().first() {
                    Some(b'+') => tally.added += 1,
                    Some(b'-') => tally.removed += 1,
                    Some(b'\\') => {}
                    _ => tally.context += 1,
                }
                tally
            })
    }
}

/// Which side of a diff to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The file before the change.
    Old,
    /// The file after the change.
    New,
}

/// Every change a diff makes to one file.
///
/// Produced once by [`parse_diff`](crate::parse_diff) and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Path of the file after the change.
    pub path: String,
    /// Path before a rename, if the file was renamed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    /// Added lines in new-file numbering, strictly increasing.
    pub added: Vec<LineEntry>,
    /// Removed lines in old-file numbering, strictly increasing.
    pub removed: Vec<LineEntry>,
    /// Hunks in file order.
    pub hunks: Vec<Hunk>,
    /// Whether the diff marks this file as binary.
    pub is_binary: bool,
    /// Whether the file was renamed.
    pub is_renamed: bool,
}

impl ChangeRecord {
    /// Creates an empty textual record for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Iterates over the text of every added line.
    pub fn added_texts(&self) -> impl Iterator<Item = &str> {
        self.added.iter().map(|l| l.text.as_str())
    }

    /// Iterates over the text of every removed line.
    pub fn removed_texts(&self) -> impl Iterator<Item = &str> {
        self.removed.iter().map(|l| l.text.as_str())
    }

    /// Returns true if the record carries no line changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Rebuilds the visible fragment of one side of the file from the hunks.
    ///
    /// The result holds context lines plus the removed (old side) or added
    /// (new side) lines, in hunk order. Hunks are separated by a blank line.
    #[must_use]
    pub fn reconstruct(&self, side: Side) -> String {
        self.reconstruct_marked(side).0
    }

    /// Like [`reconstruct`](Self::reconstruct), also returning the 1-based
    /// lines of the fragment that this side changed (as opposed to context).
    #[must_use]
    pub fn reconstruct_marked(&self, side: Side) -> (String, BTreeSet<usize>) {
        let (keep, drop) = match side {
            Side::Old => (b'-', b'+'),
            Side::New => (b'+', b'-'),
        };

        let mut out: Vec<&str> = Vec::new();
        let mut changed = BTreeSet::new();
        for (i, hunk) in self.hunks.iter().enumerate() {
            if i > 0 {
                out.push("");
            }
            for line in &hunk.lines {
                match line.as_bytes().first() {
                    Some(&b) if b == drop || b == b'\\' => continue,
                    Some(&b) if b == keep => {
                        out.push(&line[1..]);
                        changed.insert(out.len());
                    }
                    Some(&b' ') => out.push(&line[1..]),
                    _ => out.push(line.as_str()),
                }
            }
        }

        (out.join("\n"), changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChangeRecord {
        ChangeRecord {
            path: "src/App.tsx".to_string(),
            hunks: vec![Hunk {
                old_start: 1,
                old_count: 3,
                new_start: 1,
                new_count: 3,
                lines: vec![
                    " import React from 'react';".to_string(),
                    "-<Button theme=\"dark\" />".to_string(),
                    "+<Button />".to_string(),
                    " export default App;".to_string(),
                ],
            }],
            ..ChangeRecord::default()
        }
    }

    #[test]
    fn tally_counts_each_marker() {
        let tally = sample().hunks[0].tally();
        assert_eq!(tally.context, 2);
        assert_eq!(tally.added, 1);
        assert_eq!(tally.removed, 1);
        assert_eq!(tally.old_lines(), 3);
        assert_eq!(tally.new_lines(), 3);
    }

    #[test]
    fn tally_ignores_no_newline_marker() {
        let hunk = Hunk {
            old_start: 1,
            old_count: 1,
            new_start: 1,
            new_count: 1,
            lines: vec![
                "-a".to_string(),
                "\\ No newline at end of file".to_string(),
                "+b".to_string(),
            ],
        };
        let tally = hunk.tally();
        assert_eq!(tally.old_lines(), 1);
        assert_eq!(tally.new_lines(), 1);
    }

    #[test]
    fn reconstruct_new_side() {
        let text = sample().reconstruct(Side::New);
        assert_eq!(
            text,
            "import React from 'react';\n<Button />\nexport default App;"
        );
    }

    #[test]
    fn reconstruct_old_side() {
        let text = sample().reconstruct(Side::Old);
        assert!(text.contains("theme=\"dark\""));
        assert!(!text.contains("<Button />"));
    }

    #[test]
    fn marked_lines_follow_hunk_separators() {
        let mut record = sample();
        record.hunks.push(Hunk {
            old_start: 10,
            old_count: 2,
            new_start: 10,
            new_count: 2,
            lines: vec![" <Card />".to_string(), "+<Footer />".to_string()],
        });
        let (text, changed) = record.reconstruct_marked(Side::New);
        assert_eq!(text.lines().nth(5), Some("<Footer />"));
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec![2, 6]);

        let (_, removed) = sample().reconstruct_marked(Side::Old);
        assert_eq!(removed.into_iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn new_record_is_empty() {
        let record = ChangeRecord::new("a.ts");
        assert!(record.is_empty());
        assert!(!record.is_binary);
        assert_eq!(record.path, "a.ts");
    }
}
