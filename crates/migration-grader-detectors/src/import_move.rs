//! Detector for an import the migration moves to another module.
//!
//! # Detected Patterns
//!
//! - `import { Button } from '@acme/ui/legacy'` →
//!   `import { Button } from '@acme/ui'`
//! - `import '@acme/icons-legacy/styles.css'` style side-effect imports
//!   when no symbol is configured
//!
//! Matching is per line; a multi-line import list is only seen through the
//! line carrying the module specifier.

use crate::swap::{Meta, Swap};

use migration_grader_core::utils::{count_imports, import_from, word, LinePattern};
use migration_grader_core::{ChangeRecord, Detector, Tier, Verdict, ViewPair};

/// Golden diff moves an import (optionally of one symbol) from
/// `from_module` to `to_module`.
#[derive(Debug, Clone)]
pub struct ImportMove {
    meta: Meta,
    symbol: Option<String>,
    from_module: String,
    swap: Swap,
}

impl ImportMove {
    /// Creates an import-move detector. Defaults to the basic tier.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        symbol: Option<&str>,
        from_module: &str,
        to_module: &str,
    ) -> Self {
        let (old, new) = match symbol {
            Some(s) => (
                LinePattern::new(import_from(from_module)).and(word(s)),
                LinePattern::new(import_from(to_module)).and(word(s)),
            ),
            None => (
                LinePattern::new(import_from(from_module)),
                LinePattern::new(import_from(to_module)),
            ),
        };
        let subject = symbol.unwrap_or("import");
        Self {
            meta: Meta::new(
                id,
                format!("Move {subject} from {from_module} to {to_module}"),
                Tier::Basic,
            ),
            symbol: symbol.map(str::to_string),
            from_module: from_module.to_string(),
            swap: Swap::replacement(
                old,
                format!("{subject} from '{from_module}'"),
                new,
                format!("{subject} from '{to_module}'"),
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

impl Detector for ImportMove {
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
            count_imports(view, &self.from_module, self.symbol.as_deref())
        })
    }

    fn text_verdict(&self, golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict {
        self.swap.text_verdict(golden, candidate)
    }
}
