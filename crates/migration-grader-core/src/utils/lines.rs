//! Line matching over change-record entries.

use crate::record::LineEntry;

use regex::Regex;

/// A conjunction of regexes that must all match the same line.
#[derive(Debug, Clone)]
pub struct LinePattern {
    all: Vec<Regex>,
}

impl LinePattern {
    /// Creates a pattern from one regex.
    #[must_use]
    pub fn new(regex: Regex) -> Self {
        Self { all: vec![regex] }
    }

    /// Adds a regex the line must also match.
    #[must_use]
    pub fn and(mut self, regex: Regex) -> Self {
        self.all.push(regex);
        self
    }

    /// Returns true if every regex matches `line`.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        self.all.iter().all(|r| r.is_match(line))
    }

    /// Counts matching entries.
    #[must_use]
    pub fn count_in(&self, entries: &[LineEntry]) -> usize {
        entries.iter().filter(|e| self.matches(&e.text)).count()
    }

    /// Returns the first matching entry.
    #[must_use]
    pub fn first_in<'a>(&self, entries: &'a [LineEntry]) -> Option<&'a LineEntry> {
        entries.iter().find(|e| self.matches(&e.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::patterns::{import_from, word};

    #[test]
    fn conjunction_requires_every_regex() {
        let p = LinePattern::new(import_from("@acme/ui")).and(word("Button"));
        assert!(p.matches("import { Button } from '@acme/ui';"));
        assert!(!p.matches("import { Card } from '@acme/ui';"));
        assert!(!p.matches("import { Button } from '@acme/core';"));
    }

    #[test]
    fn counts_and_finds_entries() {
        let entries = vec![
            LineEntry::new(3, "debugger;"),
            LineEntry::new(7, "let x = 1;"),
            LineEntry::new(9, "debugger"),
        ];
        let p = LinePattern::new(word("debugger"));
        assert_eq!(p.count_in(&entries), 2);
        assert_eq!(p.first_in(&entries).map(|e| e.line), Some(3));
    }
}
