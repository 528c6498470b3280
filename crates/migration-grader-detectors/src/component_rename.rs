//! Detector for a component the migration renames.
//!
//! # Detected Patterns
//!
//! - `<FlexBox gap={2}>...</FlexBox>` → `<Stack gap={2}>...</Stack>`

use crate::swap::{Meta, Swap};

use migration_grader_core::utils::{closing_tag, count_tags, opening_tag, LinePattern};
use migration_grader_core::{ChangeRecord, Detector, Tier, Verdict, VerdictKind, ViewPair};

/// Golden diff replaces tag `from` with tag `to`.
#[derive(Debug, Clone)]
pub struct ComponentRename {
    meta: Meta,
    from: String,
    close_from: LinePattern,
    swap: Swap,
}

impl ComponentRename {
    /// Creates a rename detector. Defaults to the intermediate tier.
    #[must_use]
    pub fn new(id: impl Into<String>, from: &str, to: &str) -> Self {
        Self {
            meta: Meta::new(
                id,
                format!("Rename component {from} to {to}"),
                Tier::Intermediate,
            ),
            from: from.to_string(),
            close_from: LinePattern::new(closing_tag(from)),
            swap: Swap::replacement(
                LinePattern::new(opening_tag(from)),
                format!("<{from}>"),
                LinePattern::new(opening_tag(to)),
                format!("<{to}>"),
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
}

impl Detector for ComponentRename {
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
            .structured_verdict(candidate, views, |view| count_tags(view, &self.from))
    }

    fn text_verdict(&self, golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict {
        let verdict = self.swap.text_verdict(golden, candidate);
        if verdict.kind != VerdictKind::Correct {
            return verdict;
        }
        match self.close_from.first_in(&candidate.added) {
            Some(entry) => Verdict::incorrect(format!("closing </{}> left behind", self.from))
                .with_detail(format!("line {}: {}", entry.line, entry.text.trim())),
            None => verdict,
        }
    }
}
