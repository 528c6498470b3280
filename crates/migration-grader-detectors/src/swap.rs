//! Shared evaluation for detectors that swap one source form for another.

use migration_grader_core::utils::LinePattern;
use migration_grader_core::{ChangeRecord, StructuredView, Tier, Verdict, ViewPair};

/// Identity shared by every built-in detector.
#[derive(Debug, Clone)]
pub(crate) struct Meta {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub description: String,
}

impl Meta {
    pub fn new(id: impl Into<String>, name: String, tier: Tier) -> Self {
        Self {
            id: id.into(),
            name,
            tier,
            description: String::new(),
        }
    }
}

/// The old form the golden diff removes and, optionally, the new form it
/// adds in its place.
#[derive(Debug, Clone)]
pub(crate) struct Swap {
    old: LinePattern,
    old_label: String,
    new: Option<(LinePattern, String)>,
}

impl Swap {
    pub fn removal(old: LinePattern, old_label: impl Into<String>) -> Self {
        Self {
            old,
            old_label: old_label.into(),
            new: None,
        }
    }

    pub fn replacement(
        old: LinePattern,
        old_label: impl Into<String>,
        new: LinePattern,
        new_label: impl Into<String>,
    ) -> Self {
        Self {
            old,
            old_label: old_label.into(),
            new: Some((new, new_label.into())),
        }
    }

    /// The golden diff removes the old form on net and adds the new form.
    pub fn is_applicable(&self, golden: &ChangeRecord) -> bool {
        let removed = self.old.count_in(&golden.removed);
        if removed == 0 || removed <= self.old.count_in(&golden.added) {
            return false;
        }
        self.new
            .as_ref()
            .map_or(true, |(new, _)| new.count_in(&golden.added) > 0)
    }

    /// The candidate touched the old or the new form at all.
    pub fn attempted(&self, candidate: &ChangeRecord) -> bool {
        self.old.count_in(&candidate.removed) > 0
            || self
                .new
                .as_ref()
                .is_some_and(|(new, _)| new.count_in(&candidate.added) > 0)
    }

    pub fn text_verdict(&self, golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict {
        let old = &self.old_label;
        if !self.attempted(candidate) {
            return Verdict::missing(format!("{old} is left in place"));
        }

        if let Some(entry) = self.old.first_in(&candidate.added) {
            return Verdict::incorrect(format!("{old} is reintroduced"))
                .with_detail(format!("line {}: {}", entry.line, entry.text.trim()));
        }

        let removed = self.old.count_in(&candidate.removed);
        if let Some((new, new_label)) = &self.new {
            if new.count_in(&candidate.added) == 0 {
                return Verdict::incorrect(format!("{old} removed without adding {new_label}"));
            }
            if removed == 0 {
                return Verdict::incorrect(format!("{new_label} added but {old} is kept"));
            }
        }

        let expected = self.old.count_in(&golden.removed);
        if removed < expected {
            return Verdict::incorrect(format!("{old} removed in {removed} of {expected} places"));
        }

        match &self.new {
            Some((_, new_label)) => Verdict::correct(format!("{old} replaced by {new_label}")),
            None => Verdict::correct(format!("{old} removed")),
        }
    }

    /// Conclusive only when the candidate's updated code still carries more
    /// old-form usages than the golden result.
    pub fn structured_verdict(
        &self,
        candidate: &ChangeRecord,
        views: ViewPair<'_>,
        count_old: impl Fn(&StructuredView) -> usize,
    ) -> Option<Verdict> {
        let golden_view = views.golden?;
        let candidate_view = views.candidate?;
        if candidate_view.parse_error.is_some() || !self.attempted(candidate) {
            return None;
        }

        let expected = count_old(golden_view);
        let found = count_old(candidate_view);
        (found > expected).then(|| {
            Verdict::incorrect(format!("{} is still used in the updated code", self.old_label))
                .with_detail(format!("{found} usage(s), golden result has {expected}"))
        })
    }
}
