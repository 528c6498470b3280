//! Detector for a wrapper component the migration unwraps.
//!
//! # Detected Patterns
//!
//! ```text
//! -<ThemeProvider theme={theme}>
//!    <App />
//! -</ThemeProvider>
//! ```
//!
//! Removing the opening tag without the closing tag (or the reverse) is a
//! partial unwrap and grades `INCORRECT`.

use crate::swap::{Meta, Swap};

use migration_grader_core::utils::{closing_tag, count_tags, opening_tag, LinePattern};
use migration_grader_core::{ChangeRecord, Detector, Tier, Verdict, VerdictKind, ViewPair};

/// Golden diff removes `<wrapper>` together with its closing tag.
#[derive(Debug, Clone)]
pub struct WrapperRemoval {
    meta: Meta,
    wrapper: String,
    close: LinePattern,
    swap: Swap,
}

impl WrapperRemoval {
    /// Creates a wrapper-removal detector. Defaults to the advanced tier.
    #[must_use]
    pub fn new(id: impl Into<String>, wrapper: &str) -> Self {
        Self {
            meta: Meta::new(id, format!("Unwrap {wrapper}"), Tier::Advanced),
            wrapper: wrapper.to_string(),
            close: LinePattern::new(closing_tag(wrapper)),
            swap: Swap::removal(
                LinePattern::new(opening_tag(wrapper)),
                format!("<{wrapper}> wrapper"),
            ),
        }
    }

    /// Sets the tier.
    #[must_use]
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.meta.tier = tier;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }

    fn closing_verdict(&self, golden: &ChangeRecord, candidate: &ChangeRecord) -> Option<Verdict> {
        if let Some(entry) = self.close.first_in(&candidate.added) {
            return Some(
                Verdict::incorrect(format!("closing </{}> still present", self.wrapper))
                    .with_detail(format!("line {}: {}", entry.line, entry.text.trim())),
            );
        }
        let expected = self.close.count_in(&golden.removed);
        let removed = self.close.count_in(&candidate.removed);
        (removed < expected).then(|| {
            Verdict::incorrect(format!(
                "opening <{}> removed but closing tag kept ({removed} of {expected})",
                self.wrapper
            ))
        })
    }
}

impl Detector for WrapperRemoval {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn name(&self) -> &str {
        &self.meta.name
    }

    fn tier(&self) -> Tier {
        self.meta.tier
    }

    fn description(&self) -> &str {
        &self.meta.description
    }

    fn is_applicable(&self, golden: &ChangeRecord) -> bool {
        self.swap.is_applicable(golden)
    }

    fn structured_verdict(
        &self,
        _golden: &ChangeRecord,
        candidate: &ChangeRecord,
        views: ViewPair<'_>,
    ) -> Option<Verdict> {
        self.swap
            .structured_verdict(candidate, views, |view| count_tags(view, &self.wrapper))
    }

    fn text_verdict(&self, golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict {
        let verdict = self.swap.text_verdict(golden, candidate);
        if verdict.kind == VerdictKind::Missing && self.close.count_in(&candidate.removed) > 0 {
            return Verdict::incorrect(format!(
                "closing </{}> removed but opening tag kept",
                self.wrapper
            ));
        }
        if verdict.kind != VerdictKind::Correct {
            return verdict;
        }
        self.closing_verdict(golden, candidate).unwrap_or(verdict)
    }
}
