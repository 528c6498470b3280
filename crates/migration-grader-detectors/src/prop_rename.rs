//! Detector for a JSX prop the migration renames.
//!
//! # Detected Patterns
//!
//! - `<Button kind="primary" />` → `<Button variant="primary" />`
//! - `<Alert onDismiss={close} />` → `<Alert onClose={close} />`

use crate::swap::{Meta, Swap};

use migration_grader_core::utils::{attribute, count_attribute, LinePattern};
use migration_grader_core::{ChangeRecord, Detector, Tier, Verdict, ViewPair};

/// Golden diff replaces attribute `from` with attribute `to`.
#[derive(Debug, Clone)]
pub struct PropRename {
    meta: Meta,
    from: String,
    swap: Swap,
}

impl PropRename {
    /// Creates a rename detector. Defaults to the basic tier.
    #[must_use]
    pub fn new(id: impl Into<String>, from: &str, to: &str) -> Self {
        Self {
            meta: Meta::new(id, format!("Rename prop {from} to {to}"), Tier::Basic),
            from: from.to_string(),
            swap: Swap::replacement(
                LinePattern::new(attribute(from, None)),
                format!("prop {from}"),
                LinePattern::new(attribute(to, None)),
                format!("prop {to}"),
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

impl Detector for PropRename {
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
        self.swap.structured_verdict(candidate, views, |view| {
            count_attribute(view, None, &self.from, None)
        })
    }

    fn text_verdict(&self, golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict {
        self.swap.text_verdict(golden, candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration_grader_core::{parse_diff, DetectionState, DetectorInput};

    const GOLDEN: &str = "\
diff --git a/src/Save.tsx b/src/Save.tsx
--- a/src/Save.tsx
+++ b/src/Save.tsx
@@ -1,1 +1,1 @@
-<Button kind=\"primary\">Save</Button>
+<Button variant=\"primary\">Save</Button>
";

    fn grade(candidate: &str) -> DetectionState {
        let golden = parse_diff(GOLDEN);
        let candidate = parse_diff(candidate);
        PropRename::new("prop-kind-renamed", "kind", "variant")
            .detect(&DetectorInput::new(&golden[0], candidate.first()))
            .state
    }

    #[test]
    fn test_rename_matches() {
        assert_eq!(grade(GOLDEN), DetectionState::Correct);
    }

    #[test]
    fn test_prop_dropped_instead_of_renamed() {
        let candidate = "\
diff --git a/src/Save.tsx b/src/Save.tsx
--- a/src/Save.tsx
+++ b/src/Save.tsx
@@ -1,1 +1,1 @@
-<Button kind=\"primary\">Save</Button>
+<Button>Save</Button>
";
        assert_eq!(grade(candidate), DetectionState::Incorrect);
    }

    #[test]
    fn test_untouched_file_is_file_missing() {
        assert_eq!(grade(""), DetectionState::FileMissing);
    }

    #[test]
    fn test_name_mentions_both_props() {
        let d = PropRename::new("prop-kind-renamed", "kind", "variant");
        assert_eq!(d.name(), "Rename prop kind to variant");
        assert_eq!(d.tier(), Tier::Basic);
    }
}
