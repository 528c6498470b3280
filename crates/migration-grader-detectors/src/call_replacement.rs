//! Detector for a function or hook call the migration replaces.
//!
//! # Detected Patterns
//!
//! - `const classes = makeStyles(styles)` → `const classes = createStyles(styles)`
//! - `useThemeMode<Mode>()` → `useColorScheme<Mode>()`

use crate::swap::{Meta, Swap};

use migration_grader_core::utils::{call, LinePattern};
use migration_grader_core::{ChangeRecord, Detector, Tier, Verdict};

/// Golden diff replaces calls of `from` with calls of `to`.
///
/// Call sites have no structured counterpart; only the text stage runs.
#[derive(Debug, Clone)]
pub struct CallReplacement {
    meta: Meta,
    swap: Swap,
}

impl CallReplacement {
    /// Creates a call-replacement detector. Defaults to the basic tier.
    #[must_use]
    pub fn new(id: impl Into<String>, from: &str, to: &str) -> Self {
        Self {
            meta: Meta::new(id, format!("Replace {from}() with {to}()"), Tier::Basic),
            swap: Swap::replacement(
                LinePattern::new(call(from)),
                format!("{from}()"),
                LinePattern::new(call(to)),
                format!("{to}()"),
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

impl Detector for CallReplacement {
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

    fn text_verdict(&self, golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict {
        self.swap.text_verdict(golden, candidate)
    }
}
