//! Unified diff parser.
//!
//! Turns raw `git diff` (or plain unified diff) text into one
//! [`ChangeRecord`] per touched file. The parser is total: chunks it cannot
//! make sense of are dropped instead of failing the whole parse.

use crate::record::{ChangeRecord, Hunk, LineEntry};

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const GIT_BOUNDARY: &str = "diff --git ";
const NULL_DEVICE: &str = "/dev/null";
const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

fn hunk_header_regex() -> &'static Regex {
    static HUNK_HEADER: OnceLock<Regex> = OnceLock::new();
    HUNK_HEADER.get_or_init(|| {
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("valid regex")
    })
}

/// Parses unified diff text into per-file change records.
///
/// Empty or whitespace-only input yields an empty list. Parsing the same
/// text twice yields identical records.
///
/// # Example
///
/// ```
/// use migration_grader_core::parse_diff;
///
/// let diff = "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -1,2 +1,2 @@\n-old\n+new\n unchanged\n";
/// let records = parse_diff(diff);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].path, "f");
/// assert_eq!(records[0].added[0].line, 1);
/// ```
#[must_use]
pub fn parse_diff(text: &str) -> Vec<ChangeRecord> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    split_chunks(text)
        .iter()
        .filter_map(|chunk| {
            let record = parse_chunk(chunk);
            if record.is_none() {
                debug!(
                    "Skipping unrecognized diff chunk: {}",
                    chunk.boundary.unwrap_or("<no boundary>")
                );
            }
            record
        })
        .collect()
}

/// File-scoped slice of the diff text.
struct Chunk<'a> {
    /// Text after `diff --git `, if the chunk came from a git diff.
    boundary: Option<&'a str>,
    lines: Vec<&'a str>,
}

fn split_chunks(text: &str) -> Vec<Chunk<'_>> {
    let lines: Vec<&str> = text.lines().collect();

    if lines.iter().any(|l| l.starts_with(GIT_BOUNDARY)) {
        let mut chunks: Vec<Chunk<'_>> = Vec::new();
        for line in lines {
            if let Some(rest) = line.strip_prefix(GIT_BOUNDARY) {
                chunks.push(Chunk {
                    boundary: Some(rest),
                    lines: Vec::new(),
                });
            } else if let Some(current) = chunks.last_mut() {
                current.lines.push(line);
            }
        }
        return chunks;
    }

    // Plain unified diff: a file starts at `---` directly followed by `+++`,
    // but never inside a hunk body that still has lines to come.
    let mut chunks: Vec<Chunk<'_>> = Vec::new();
    let mut pending = HunkBudget::default();
    for (i, line) in lines.iter().enumerate() {
        if pending.is_open() {
            pending.consume(&BodyLine::classify(line));
        } else if line.starts_with("--- ")
            && lines.get(i + 1).is_some_and(|next| next.starts_with("+++ "))
        {
            chunks.push(Chunk {
                boundary: None,
                lines: Vec::new(),
            });
        } else if let Some((_, old_count, _, new_count)) = parse_hunk_header(line) {
            pending = HunkBudget {
                old: old_count,
                new: new_count,
            };
        }
        if let Some(current) = chunks.last_mut() {
            current.lines.push(line);
        }
    }
    chunks
}

/// Lines a hunk header declares that have not been seen yet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct HunkBudget {
    old: u32,
    new: u32,
}

impl HunkBudget {
    fn is_open(self) -> bool {
        self.old > 0 || self.new > 0
    }

    fn consume(&mut self, line: &BodyLine<'_>) {
        match line {
            BodyLine::Added(_) => self.new = self.new.saturating_sub(1),
            BodyLine::Removed(_) => self.old = self.old.saturating_sub(1),
            BodyLine::Context => {
                self.old = self.old.saturating_sub(1);
                self.new = self.new.saturating_sub(1);
            }
            BodyLine::NoNewline => {}
            // not a body line: the hunk was cut short
            BodyLine::Unknown => *self = Self::default(),
        }
    }
}

fn parse_chunk(chunk: &Chunk<'_>) -> Option<ChangeRecord> {
    let header_end = chunk
        .lines
        .iter()
        .position(|l| l.starts_with("@@"))
        .unwrap_or(chunk.lines.len());
    let headers = &chunk.lines[..header_end];
    let boundary_paths = chunk.boundary.and_then(split_boundary);

    let is_binary = headers
        .iter()
        .any(|l| l.starts_with("Binary files ") || *l == "GIT binary patch");
    if is_binary {
        let (old, new) = boundary_paths?;
        let is_renamed = old != new;
        return Some(ChangeRecord {
            path: new,
            old_path: is_renamed.then_some(old),
            is_binary: true,
            is_renamed,
            ..ChangeRecord::default()
        });
    }

    let rename_from = find_header(headers, "rename from ");
    let rename_to = find_header(headers, "rename to ");

    let mut record = match (rename_from, rename_to) {
        (Some(from), Some(to)) => ChangeRecord {
            path: unquote(to).to_string(),
            old_path: Some(unquote(from).to_string()),
            is_renamed: true,
            ..ChangeRecord::default()
        },
        _ => {
            let new_marker = find_header(headers, "+++ ");
            let old_marker = find_header(headers, "--- ");
            if new_marker.is_none() && old_marker.is_none() {
                return None;
            }
            let path = new_marker
                .and_then(marker_path)
                .or_else(|| old_marker.and_then(marker_path))
                .or_else(|| boundary_paths.map(|(_, new)| new))?;
            ChangeRecord::new(path)
        }
    };

    for body in split_hunks(&chunk.lines[header_end..]) {
        let parsed = parse_hunk(body)?;
        record.added.extend(parsed.added);
        record.removed.extend(parsed.removed);
        record.hunks.push(parsed.hunk);
    }

    Some(record)
}

fn find_header<'a>(headers: &[&'a str], prefix: &str) -> Option<&'a str> {
    headers.iter().find_map(|l| l.strip_prefix(prefix))
}

/// Splits the text after `diff --git ` into its old and new path tokens.
///
/// The literal ` b/` is searched first so that paths containing spaces
/// survive; a naive whitespace split is the fallback.
fn split_boundary(rest: &str) -> Option<(String, String)> {
    if rest.starts_with('"') {
        if let Some(idx) = rest.find("\" \"") {
            let old = unquote(&rest[..=idx]);
            let new = unquote(&rest[idx + 2..]);
            return Some((strip_side(old).to_string(), strip_side(new).to_string()));
        }
    }

    let (old, new) = match rest.find(" b/") {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => {
            let mut parts = rest.split_whitespace();
            (parts.next()?, parts.next()?)
        }
    };
    Some((strip_side(old).to_string(), strip_side(new).to_string()))
}

/// Extracts the path from a `---`/`+++` marker, `None` for the null device.
fn marker_path(marker: &str) -> Option<String> {
    let raw = marker.split('\t').next().unwrap_or(marker).trim_end();
    let raw = unquote(raw);
    if raw == NULL_DEVICE || raw.is_empty() {
        return None;
    }
    Some(strip_side(raw).to_string())
}

fn strip_side(path: &str) -> &str {
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
}

fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}

/// Groups the lines after the headers into hunks, each led by its `@@` line.
fn split_hunks<'a>(lines: &'a [&'a str]) -> Vec<&'a [&'a str]> {
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with("@@"))
        .map(|(i, _)| i)
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(lines.len());
            &lines[start..end]
        })
        .collect()
}

struct ParsedHunk {
    hunk: Hunk,
    added: Vec<LineEntry>,
    removed: Vec<LineEntry>,
}

/// Classification of one hunk body line.
enum BodyLine<'a> {
    Added(&'a str),
    Removed(&'a str),
    Context,
    NoNewline,
    Unknown,
}

impl<'a> BodyLine<'a> {
    fn classify(line: &'a str) -> Self {
        if line == NO_NEWLINE_MARKER || line.starts_with("\\ ") {
            return Self::NoNewline;
        }
        match line.as_bytes().first() {
            Some(b'+') => Self::Added(&line[1..]),
            Some(b'-') => Self::Removed(&line[1..]),
            Some(b' ') | None => Self::Context,
            Some(_) => Self::Unknown,
        }
    }
}

/// Old/new line numbers at a point inside a hunk.
///
/// Held wider than [`LineEntry::line`] so that stepping past the last
/// representable line is detected instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineCursor {
    old: u64,
    new: u64,
}

/// A line entry produced by advancing the cursor.
enum Emitted {
    Added(LineEntry),
    Removed(LineEntry),
}

impl LineCursor {
    fn new(old: u32, new: u32) -> Self {
        Self {
            old: u64::from(old),
            new: u64::from(new),
        }
    }

    /// Returns the cursor after `line` and the entry it produces, if any.
    ///
    /// `None` when `line` would sit beyond the largest line number.
    fn advance(self, line: &BodyLine<'_>) -> Option<(Self, Option<Emitted>)> {
        let step = match *line {
            BodyLine::Added(text) => (
                Self {
                    new: self.new + 1,
                    ..self
                },
                Some(Emitted::Added(LineEntry::new(u32::try_from(self.new).ok()?, text))),
            ),
            BodyLine::Removed(text) => (
                Self {
                    old: self.old + 1,
                    ..self
                },
                Some(Emitted::Removed(LineEntry::new(u32::try_from(self.old).ok()?, text))),
            ),
            BodyLine::Context => {
                u32::try_from(self.old).ok()?;
                u32::try_from(self.new).ok()?;
                (
                    Self {
                        old: self.old + 1,
                        new: self.new + 1,
                    },
                    None,
                )
            }
            BodyLine::NoNewline | BodyLine::Unknown => (self, None),
        };
        Some(step)
    }
}

fn parse_hunk_header(header: &str) -> Option<(u32, u32, u32, u32)> {
    let caps = hunk_header_regex().captures(header)?;
    let number = |idx: usize| -> Option<u32> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(1),
        }
    };
    Some((number(1)?, number(2)?, number(3)?, number(4)?))
}

fn parse_hunk(lines: &[&str]) -> Option<ParsedHunk> {
    let (header, body) = lines.split_first()?;
    let (old_start, old_count, new_start, new_count) = parse_hunk_header(header)?;

    let body_len = body
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |last| last + 1);
    let body = &body[..body_len];

    let start = LineCursor::new(old_start, new_start);
    let (_, raw, added, removed) = body.iter().try_fold(
        (start, Vec::new(), Vec::new(), Vec::new()),
        |(cursor, mut raw, mut added, mut removed), line| {
            let kind = BodyLine::classify(line);
            if !matches!(kind, BodyLine::NoNewline | BodyLine::Unknown) {
                raw.push((*line).to_string());
            }
            let (next, emitted) = cursor.advance(&kind)?;
            match emitted {
                Some(Emitted::Added(entry)) => added.push(entry),
                Some(Emitted::Removed(entry)) => removed.push(entry),
                None => {}
            }
            Some((next, raw, added, removed))
        },
    )?;

    Some(ParsedHunk {
        hunk: Hunk {
            old_start,
            old_count,
            new_start,
            new_count,
            lines: raw,
        },
        added,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str =
        "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -1,2 +1,2 @@\n-old\n+new\n unchanged\n";

    #[test]
    fn parses_simple_modification() {
        let records = parse_diff(SIMPLE);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.path, "f");
        assert_eq!(r.removed, vec![LineEntry::new(1, "old")]);
        assert_eq!(r.added, vec![LineEntry::new(1, "new")]);
        assert!(!r.is_binary);
        assert!(!r.is_renamed);
        assert!(r.old_path.is_none());
    }

    #[test]
    fn empty_and_whitespace_input_yield_nothing() {
        assert!(parse_diff("").is_empty());
        assert!(parse_diff("  \n\t\n").is_empty());
    }

    #[test]
    fn parsing_is_deterministic() {
        assert_eq!(parse_diff(SIMPLE), parse_diff(SIMPLE));
    }

    #[test]
    fn context_lines_advance_both_counters() {
        let diff = "diff --git a/x.ts b/x.ts\n--- a/x.ts\n+++ b/x.ts\n@@ -10,5 +10,6 @@\n a\n b\n-c\n+C\n+D\n d\n e\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.removed, vec![LineEntry::new(12, "c")]);
        assert_eq!(r.added, vec![LineEntry::new(12, "C"), LineEntry::new(13, "D")]);
    }

    #[test]
    fn missing_counts_default_to_one() {
        let diff = "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -3 +3 @@\n-a\n+b\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.hunks[0].old_count, 1);
        assert_eq!(r.hunks[0].new_count, 1);
        assert_eq!(r.added[0].line, 3);
    }

    #[test]
    fn multiple_hunks_keep_file_order() {
        let diff = "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1,1 +1,1 @@\n-a\n+b\n@@ -20,2 +20,3 @@\n ctx\n+new\n ctx2\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.hunks.len(), 2);
        assert_eq!(r.added, vec![LineEntry::new(1, "b"), LineEntry::new(21, "new")]);
        assert!(r.added.windows(2).all(|w| w[0].line < w[1].line));
    }

    #[test]
    fn hunk_tallies_match_declared_counts() {
        let diff = "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1,4 +1,5 @@\n a\n-b\n+B\n+B2\n c\n d\n@@ -9 +10,2 @@\n-z\n+y\n+w\n";
        for hunk in &parse_diff(diff)[0].hunks {
            let tally = hunk.tally();
            assert_eq!(tally.old_lines(), hunk.old_count);
            assert_eq!(tally.new_lines(), hunk.new_count);
        }
    }

    #[test]
    fn no_newline_marker_is_skipped() {
        let diff = "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n\\ No newline at end of file\n+b\n\\ No newline at end of file\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.removed, vec![LineEntry::new(1, "a")]);
        assert_eq!(r.added, vec![LineEntry::new(1, "b")]);
        assert_eq!(r.hunks[0].lines, vec!["-a".to_string(), "+b".to_string()]);
    }

    #[test]
    fn new_file_uses_plus_marker() {
        let diff = "diff --git a/new.ts b/new.ts\nnew file mode 100644\nindex 0000000..e69de29\n--- /dev/null\n+++ b/new.ts\n@@ -0,0 +1,2 @@\n+line1\n+line2\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.path, "new.ts");
        assert_eq!(r.added.len(), 2);
        assert_eq!(r.added[0].line, 1);
        assert!(r.removed.is_empty());
    }

    #[test]
    fn deleted_file_falls_back_to_minus_marker() {
        let diff = "diff --git a/old.ts b/old.ts\ndeleted file mode 100644\n--- a/old.ts\n+++ /dev/null\n@@ -1,2 +0,0 @@\n-line1\n-line2\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.path, "old.ts");
        assert_eq!(r.removed.len(), 2);
    }

    #[test]
    fn both_null_markers_fall_back_to_boundary() {
        let diff = "diff --git a/ghost.ts b/ghost.ts\n--- /dev/null\n+++ /dev/null\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.path, "ghost.ts");
        assert!(r.is_empty());
    }

    #[test]
    fn binary_file_is_flagged() {
        let diff = "diff --git a/logo.png b/logo.png\nindex 1..2 100644\nBinary files a/logo.png and b/logo.png differ\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.path, "logo.png");
        assert!(r.is_binary);
        assert!(!r.is_renamed);
        assert!(r.is_empty());
    }

    #[test]
    fn binary_rename_detected_from_boundary() {
        let diff = "diff --git a/img/a.png b/img/b.png\nGIT binary patch\nliteral 0\nHcmV?d00001\n";
        let r = &parse_diff(diff)[0];
        assert!(r.is_binary);
        assert!(r.is_renamed);
        assert_eq!(r.path, "img/b.png");
        assert_eq!(r.old_path.as_deref(), Some("img/a.png"));
    }

    #[test]
    fn rename_adopts_explicit_paths() {
        let diff = "diff --git a/src/Old.tsx b/src/New.tsx\nsimilarity index 90%\nrename from src/Old.tsx\nrename to src/New.tsx\n--- a/src/Old.tsx\n+++ b/src/New.tsx\n@@ -1 +1 @@\n-export const Old = 1;\n+export const New = 1;\n";
        let r = &parse_diff(diff)[0];
        assert!(r.is_renamed);
        assert_eq!(r.path, "src/New.tsx");
        assert_eq!(r.old_path.as_deref(), Some("src/Old.tsx"));
        assert_eq!(r.added.len(), 1);
    }

    #[test]
    fn pure_rename_without_hunks() {
        let diff = "diff --git a/a.ts b/b.ts\nsimilarity index 100%\nrename from a.ts\nrename to b.ts\n";
        let r = &parse_diff(diff)[0];
        assert!(r.is_renamed);
        assert!(r.hunks.is_empty());
    }

    #[test]
    fn malformed_hunk_header_drops_only_that_file() {
        let diff = "diff --git a/bad b/bad\n--- a/bad\n+++ b/bad\n@@ -x,1 +1 @@\n-a\n+b\ndiff --git a/good b/good\n--- a/good\n+++ b/good\n@@ -1 +1 @@\n-a\n+b\n";
        let records = parse_diff(diff);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "good");
    }

    #[test]
    fn mode_only_chunk_is_skipped() {
        let diff = "diff --git a/run.sh b/run.sh\nold mode 100644\nnew mode 100755\n";
        assert!(parse_diff(diff).is_empty());
    }

    #[test]
    fn boundary_split_prefers_b_slash_token() {
        assert_eq!(
            split_boundary("a/my file.ts b/my file.ts"),
            Some(("my file.ts".to_string(), "my file.ts".to_string()))
        );
        assert_eq!(
            split_boundary("x y"),
            Some(("x".to_string(), "y".to_string()))
        );
        assert_eq!(split_boundary("lonely"), None);
    }

    #[test]
    fn quoted_boundary_paths() {
        assert_eq!(
            split_boundary("\"a/with space.ts\" \"b/with space.ts\""),
            Some(("with space.ts".to_string(), "with space.ts".to_string()))
        );
    }

    #[test]
    fn marker_timestamps_are_stripped() {
        assert_eq!(
            marker_path("b/src/a.ts\t2024-01-01 00:00:00"),
            Some("src/a.ts".to_string())
        );
        assert_eq!(marker_path("/dev/null"), None);
    }

    #[test]
    fn plain_unified_diff_without_git_boundary() {
        let diff = "--- a/one.ts\n+++ b/one.ts\n@@ -1 +1 @@\n-a\n+b\n--- a/two.ts\n+++ b/two.ts\n@@ -5 +5 @@\n-c\n+d\n";
        let records = parse_diff(diff);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].path, "two.ts");
        assert_eq!(records[1].added[0].line, 5);
    }

    #[test]
    fn removed_line_starting_with_dashes_stays_in_hunk() {
        let diff = "diff --git a/q.sql b/q.sql\n--- a/q.sql\n+++ b/q.sql\n@@ -1,2 +1,1 @@\n--- comment\n select 1;\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.removed, vec![LineEntry::new(1, "-- comment")]);
    }

    #[test]
    fn blank_body_line_counts_as_context() {
        let diff = "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1,3 +1,3 @@\n a\n\n-b\n+c\n";
        let r = &parse_diff(diff)[0];
        assert_eq!(r.removed[0].line, 3);
        assert_eq!(r.added[0].line, 3);
    }

    #[test]
    fn text_before_first_boundary_is_ignored() {
        let diff = format!("commit abc123\nAuthor: someone\n\n{SIMPLE}");
        assert_eq!(parse_diff(&diff).len(), 1);
    }

    #[test]
    fn cursor_advance_is_pure() {
        let start = LineCursor::new(4, 7);
        let (after_ctx, none) = start.advance(&BodyLine::Context).unwrap();
        assert!(none.is_none());
        assert_eq!(after_ctx, LineCursor::new(5, 8));
        let (after_add, _) = after_ctx.advance(&BodyLine::Added("x")).unwrap();
        assert_eq!(after_add, LineCursor::new(5, 9));
        assert_eq!(start, LineCursor::new(4, 7));
    }

    #[test]
    fn cursor_stops_past_last_line_number() {
        let last = LineCursor::new(u32::MAX, u32::MAX);
        let (past, _) = last.advance(&BodyLine::Context).unwrap();
        assert!(past.advance(&BodyLine::Context).is_none());
        assert!(past.advance(&BodyLine::Added("x")).is_none());
        assert!(past.advance(&BodyLine::NoNewline).is_some());
    }

    #[test]
    fn hunk_running_past_last_line_drops_only_that_file() {
        let diff = format!(
            "diff --git a/big b/big\n--- a/big\n+++ b/big\n@@ -4294967295,2 +4294967295,2 @@\n a\n b\n{SIMPLE}"
        );
        let records = parse_diff(&diff);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "f");

        let edge = "--- a/e\n+++ b/e\n@@ -4294967295 +4294967295 @@\n-x\n+y\n";
        let r = &parse_diff(edge)[0];
        assert_eq!(r.added, vec![LineEntry::new(u32::MAX, "y")]);
    }

    #[test]
    fn plain_diff_body_lines_that_look_like_headers() {
        let diff = "--- a/q.sql\n+++ b/q.sql\n@@ -1,2 +1,2 @@\n--- old note\n+++ new note\n select 1;\n";
        let records = parse_diff(diff);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "q.sql");
        assert_eq!(records[0].removed, vec![LineEntry::new(1, "-- old note")]);
        assert_eq!(records[0].added, vec![LineEntry::new(1, "++ new note")]);
    }

    #[test]
    fn plain_diff_splits_after_hunk_is_used_up() {
        let diff = "--- a/q.sql\n+++ b/q.sql\n@@ -1 +1 @@\n--- old\n+++ new\n--- a/r.sql\n+++ b/r.sql\n@@ -3 +3 @@\n-x\n+y\n";
        let records = parse_diff(diff);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].added, vec![LineEntry::new(1, "++ new")]);
        assert_eq!(records[1].path, "r.sql");
        assert_eq!(records[1].removed, vec![LineEntry::new(3, "x")]);
    }
}
