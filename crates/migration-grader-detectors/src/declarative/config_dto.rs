//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to validated definitions via the loader.

use serde::Deserialize;

/// Raw TOML representation of declarative detectors.
///
/// Extends the base `Config` with `[[prop-removal]]`, `[[prop-rename]]`,
/// `[[component-rename]]`, `[[import-move]]`, `[[call-replacement]]` and
/// `[[wrapper-removal]]` sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclarativeConfigDto {
    /// Prop removal detectors.
    #[serde(rename = "prop-removal", default)]
    pub prop_removal: Vec<PropRemovalDto>,

    /// Prop rename detectors.
    #[serde(rename = "prop-rename", default)]
    pub prop_rename: Vec<RenameDto>,

    /// Component rename detectors.
    #[serde(rename = "component-rename", default)]
    pub component_rename: Vec<RenameDto>,

    /// Import move detectors.
    #[serde(rename = "import-move", default)]
    pub import_move: Vec<ImportMoveDto>,

    /// Call replacement detectors.
    #[serde(rename = "call-replacement", default)]
    pub call_replacement: Vec<RenameDto>,

    /// Wrapper removal detectors.
    #[serde(rename = "wrapper-removal", default)]
    pub wrapper_removal: Vec<WrapperRemovalDto>,
}

/// TOML representation of a prop removal.
#[derive(Debug, Clone, Deserialize)]
pub struct PropRemovalDto {
    /// Detector id (e.g., "prop-size-removed").
    pub id: String,
    /// Removed prop name.
    pub prop: String,
    /// Only match this string value.
    #[serde(default)]
    pub value: Option<String>,
    /// Restrict the structured check to this component.
    #[serde(default)]
    pub component: Option<String>,
    /// Tier ("basic", "intermediate", "advanced").
    #[serde(default)]
    pub tier: Option<String>,
    /// Description shown by `list-detectors`.
    #[serde(default)]
    pub description: Option<String>,
}

/// TOML representation of a `from` → `to` rename (props, components,
/// calls).
#[derive(Debug, Clone, Deserialize)]
pub struct RenameDto {
    /// Detector id.
    pub id: String,
    /// Old name.
    pub from: String,
    /// New name.
    pub to: String,
    /// Tier.
    #[serde(default)]
    pub tier: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// TOML representation of an import move.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportMoveDto {
    /// Detector id.
    pub id: String,
    /// Moved symbol; any import of the module when absent.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Old module specifier.
    pub from: String,
    /// New module specifier.
    pub to: String,
    /// Tier.
    #[serde(default)]
    pub tier: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// TOML representation of a wrapper removal.
#[derive(Debug, Clone, Deserialize)]
pub struct WrapperRemovalDto {
    /// Detector id.
    pub id: String,
    /// Wrapper component name.
    pub wrapper: String,
    /// Tier.
    #[serde(default)]
    pub tier: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sections() {
        let toml = r#"
preset = "core"

[[prop-removal]]
id = "prop-size-removed"
prop = "size"
value = "xs"

[[component-rename]]
id = "component-panel-renamed"
from = "Panel"
to = "Card"
tier = "advanced"

[[import-move]]
id = "import-chart-moved"
symbol = "Chart"
from = "@acme/ui/charts"
to = "@acme/charts"
"#;
        let dto: DeclarativeConfigDto = toml::from_str(toml).unwrap();
        assert_eq!(dto.prop_removal.len(), 1);
        assert_eq!(dto.prop_removal[0].value.as_deref(), Some("xs"));
        assert_eq!(dto.component_rename[0].tier.as_deref(), Some("advanced"));
        assert_eq!(dto.import_move[0].symbol.as_deref(), Some("Chart"));
        assert!(dto.prop_rename.is_empty());
        assert!(dto.wrapper_removal.is_empty());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let toml = r#"
[[prop-rename]]
id = "x"
from = "a"
"#;
        assert!(toml::from_str::<DeclarativeConfigDto>(toml).is_err());
    }
}
