//! Detector for a JSX prop the migration deletes.
//!
//! # Detected Patterns
//!
//! - `<Button theme="dark" />` → `<Button />`
//! - `<Card legacy>` → `<Card>` (bare boolean props)
//!
//! Re-adding the prop anywhere in the candidate's added lines, or removing
//! it from fewer places than the golden diff does, is `INCORRECT`.

use crate::swap::{Meta, Swap};

use migration_grader_core::utils::{attribute, count_attribute, LinePattern};
use migration_grader_core::{ChangeRecord, Detector, Tier, Verdict, ViewPair};

/// Golden diff removes `prop` (optionally only with a given value).
#[derive(Debug, Clone)]
pub struct PropRemoval {
    meta: Meta,
    prop: String,
    value: Option<String>,
    component: Option<String>,
    swap: Swap,
}

impl PropRemoval {
    /// Creates a detector for removing `prop`, or `prop="value"` when a
    /// value is given. Defaults to the basic tier.
    #[must_use]
    pub fn new(id: impl Into<String>, prop: &str, value: Option<&str>) -> Self {
        let label = match value {
            Some(v) => format!("{prop}=\"{v}\""),
            None => prop.to_string(),
        };
        Self {
            meta: Meta::new(id, format!("Remove {label}"), Tier::Basic),
            prop: prop.to_string(),
            value: value.map(str::to_string),
            component: None,
            swap: Swap::removal(LinePattern::new(attribute(prop, value)), label),
        }
    }

    /// Restricts the structured check to usages of one component.
    #[must_use]
    pub fn on_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Sets the tier.
    #[must_use]
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.meta.tier = tier;
        self
    }

    /// Sets the human-readable name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.meta.name = name.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }
}

impl Detector for PropRemoval {
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
            count_attribute(
                view,
                self.component.as_deref(),
                &self.prop,
                self.value.as_deref(),
            )
        })
    }

    fn text_verdict(&self, golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict {
        self.swap.text_verdict(golden, candidate)
    }
}
