//! Validated detector definitions.

use crate::{CallReplacement, ComponentRename, ImportMove, PropRemoval, PropRename, WrapperRemoval};

use migration_grader_core::{DetectorBox, Tier};
use std::fmt;

/// Domain validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Detector id is empty.
    #[error("detector id must not be empty")]
    EmptyId,

    /// Detector id is not kebab-case.
    #[error("detector id `{id}` must be lowercase kebab-case")]
    InvalidId {
        /// The offending id.
        id: String,
    },

    /// A required name field is empty or contains whitespace.
    #[error("`{field}` must be a non-empty name without whitespace, got `{value}`")]
    InvalidName {
        /// Field name.
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

/// A validated kebab-case detector id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetectorId(String);

impl DetectorId {
    /// Validates and wraps an id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or not lowercase kebab-case.
    pub fn new(id: &str) -> Result<Self, ModelError> {
        if id.is_empty() {
            return Err(ModelError::EmptyId);
        }
        let kebab = id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !kebab || id.starts_with('-') || id.ends_with('-') {
            return Err(ModelError::InvalidId { id: id.to_string() });
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DetectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a prop, component, module or function name.
///
/// # Errors
///
/// Returns an error if the value is empty or contains whitespace.
pub fn validate_name(field: &'static str, value: &str) -> Result<String, ModelError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ModelError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// What a declarative detector checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorKind {
    /// Prop removal, optionally value- and component-restricted.
    PropRemoval {
        /// Prop name.
        prop: String,
        /// Prop value.
        value: Option<String>,
        /// Component name for the structured check.
        component: Option<String>,
    },
    /// Prop rename.
    PropRename {
        /// Old prop.
        from: String,
        /// New prop.
        to: String,
    },
    /// Component rename.
    ComponentRename {
        /// Old component.
        from: String,
        /// New component.
        to: String,
    },
    /// Import move.
    ImportMove {
        /// Moved symbol.
        symbol: Option<String>,
        /// Old module.
        from_module: String,
        /// New module.
        to_module: String,
    },
    /// Call replacement.
    CallReplacement {
        /// Old function.
        from: String,
        /// New function.
        to: String,
    },
    /// Wrapper removal.
    WrapperRemoval {
        /// Wrapper component.
        wrapper: String,
    },
}

/// A validated declarative detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorDefinition {
    /// Detector id.
    pub id: DetectorId,
    /// Tier override; the kind's default tier applies when absent.
    pub tier: Option<Tier>,
    /// Description.
    pub description: Option<String>,
    /// What to check.
    pub kind: DetectorKind,
}

impl DetectorDefinition {
    /// Instantiates the detector.
    #[must_use]
    pub fn build(&self) -> DetectorBox {
        let id = self.id.as_str();
        let description = self.description.clone().unwrap_or_default();
        match &self.kind {
            DetectorKind::PropRemoval {
                prop,
                value,
                component,
            } => {
                let mut d = PropRemoval::new(id, prop, value.as_deref()).with_description(description);
                if let Some(component) = component {
                    d = d.on_component(component);
                }
                if let Some(tier) = self.tier {
                    d = d.with_tier(tier);
                }
                Box::new(d)
            }
            DetectorKind::PropRename { from, to } => {
                let d = PropRename::new(id, from, to).with_description(description);
                Box::new(match self.tier {
                    Some(tier) => d.with_tier(tier),
                    None => d,
                })
            }
            DetectorKind::ComponentRename { from, to } => {
                let d = ComponentRename::new(id, from, to).with_description(description);
                Box::new(match self.tier {
                    Some(tier) => d.with_tier(tier),
                    None => d,
                })
            }
            DetectorKind::ImportMove {
                symbol,
                from_module,
                to_module,
            } => {
                let d = ImportMove::new(id, symbol.as_deref(), from_module, to_module)
                    .with_description(description);
                Box::new(match self.tier {
                    Some(tier) => d.with_tier(tier),
                    None => d,
                })
            }
            DetectorKind::CallReplacement { from, to } => {
                let d = CallReplacement::new(id, from, to).with_description(description);
                Box::new(match self.tier {
                    Some(tier) => d.with_tier(tier),
                    None => d,
                })
            }
            DetectorKind::WrapperRemoval { wrapper } => {
                let d = WrapperRemoval::new(id, wrapper).with_description(description);
                Box::new(match self.tier {
                    Some(tier) => d.with_tier(tier),
                    None => d,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_id_validation() {
        assert!(DetectorId::new("prop-size-removed").is_ok());
        assert_eq!(DetectorId::new(""), Err(ModelError::EmptyId));
        assert!(matches!(
            DetectorId::new("Prop_Size"),
            Err(ModelError::InvalidId { .. })
        ));
        assert!(DetectorId::new("-leading").is_err());
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(validate_name("prop", "size"), Ok("size".to_string()));
        assert!(validate_name("prop", "").is_err());
        assert!(validate_name("prop", "two words").is_err());
    }

    #[test]
    fn test_build_applies_tier_override() {
        let def = DetectorDefinition {
            id: DetectorId::new("wrapper-box-removed").unwrap(),
            tier: Some(Tier::Basic),
            description: Some("Box wrappers are gone".to_string()),
            kind: DetectorKind::WrapperRemoval {
                wrapper: "Box".to_string(),
            },
        };
        let detector = def.build();
        assert_eq!(detector.id(), "wrapper-box-removed");
        assert_eq!(detector.tier(), Tier::Basic);
        assert_eq!(detector.description(), "Box wrappers are gone");
    }

    #[test]
    fn test_build_keeps_default_tier() {
        let def = DetectorDefinition {
            id: DetectorId::new("component-panel-renamed").unwrap(),
            tier: None,
            description: None,
            kind: DetectorKind::ComponentRename {
                from: "Panel".to_string(),
                to: "Card".to_string(),
            },
        };
        assert_eq!(def.build().tier(), Tier::Intermediate);
    }
}
