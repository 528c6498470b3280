//! Shipped detector catalog for the `@acme/ui` v4 → v5 upgrade.
//!
//! | Id | Kind | Tier |
//! |----|------|------|
//! | `prop-theme-dark-removed` | prop removal | basic |
//! | `prop-theme-light-removed` | prop removal | basic |
//! | `prop-legacy-removed` | prop removal | basic |
//! | `prop-is-block-renamed` | prop rename | basic |
//! | `prop-kind-renamed` | prop rename | basic |
//! | `prop-on-dismiss-renamed` | prop rename | basic |
//! | `import-button-moved` | import move | basic |
//! | `import-icons-moved` | import move | basic |
//! | `call-make-styles-replaced` | call replacement | basic |
//! | `component-flex-box-renamed` | component rename | intermediate |
//! | `component-text-input-renamed` | component rename | intermediate |
//! | `component-modal-renamed` | component rename | intermediate |
//! | `component-tool-tip-renamed` | component rename | intermediate |
//! | `import-use-theme-moved` | import move | intermediate |
//! | `import-dialog-moved` | import move | intermediate |
//! | `prop-elevation-renamed` | prop rename | intermediate |
//! | `call-use-theme-mode-replaced` | call replacement | intermediate |
//! | `call-with-styles-replaced` | call replacement | intermediate |
//! | `wrapper-theme-provider-removed` | wrapper removal | advanced |
//! | `wrapper-legacy-layout-removed` | wrapper removal | advanced |
//! | `wrapper-style-root-removed` | wrapper removal | advanced |
//! | `call-create-legacy-theme-replaced` | call replacement | advanced |
//! | `component-data-table-renamed` | component rename | advanced |
//! | `import-data-table-moved` | import move | advanced |

use crate::{CallReplacement, ComponentRename, ImportMove, PropRemoval, PropRename, WrapperRemoval};

use migration_grader_core::{DetectorBox, DetectorRegistry, Tier};
use tracing::warn;

/// Returns every shipped detector, in catalog order.
#[must_use]
pub fn all_detectors() -> Vec<DetectorBox> {
    let mut detectors = basic_detectors();
    detectors.extend(intermediate_detectors());
    detectors.extend(advanced_detectors());
    detectors
}

/// Builds a registry holding every shipped detector.
#[must_use]
pub fn default_registry() -> DetectorRegistry {
    registry_from(all_detectors())
}

pub(crate) fn registry_from(detectors: Vec<DetectorBox>) -> DetectorRegistry {
    let mut registry = DetectorRegistry::new();
    for detector in detectors {
        if let Err(e) = registry.register_box(detector) {
            warn!("{}", e);
        }
    }
    registry
}

pub(crate) fn basic_detectors() -> Vec<DetectorBox> {
    vec![
        Box::new(
            PropRemoval::new("prop-theme-dark-removed", "theme", Some("dark"))
                .with_description("Components follow the color scheme; theme=\"dark\" is gone"),
        ),
        Box::new(
            PropRemoval::new("prop-theme-light-removed", "theme", Some("light"))
                .with_description("Components follow the color scheme; theme=\"light\" is gone"),
        ),
        Box::new(
            PropRemoval::new("prop-legacy-removed", "legacy", None)
                .with_description("The legacy rendering switch no longer exists"),
        ),
        Box::new(
            PropRename::new("prop-is-block-renamed", "isBlock", "fullWidth")
                .with_description("Button isBlock became fullWidth"),
        ),
        Box::new(
            PropRename::new("prop-kind-renamed", "kind", "variant")
                .with_description("The kind prop became variant across components"),
        ),
        Box::new(
            PropRename::new("prop-on-dismiss-renamed", "onDismiss", "onClose")
                .with_description("Alert and Toast onDismiss became onClose"),
        ),
        Box::new(
            ImportMove::new(
                "import-button-moved",
                Some("Button"),
                "@acme/ui/legacy",
                "@acme/ui",
            )
            .with_description("Button is exported from the package root"),
        ),
        Box::new(
            ImportMove::new("import-icons-moved", None, "@acme/icons-legacy", "@acme/icons")
                .with_description("Icons moved to the @acme/icons package"),
        ),
        Box::new(
            CallReplacement::new("call-make-styles-replaced", "makeStyles", "createStyles")
                .with_description("makeStyles was renamed to createStyles"),
        ),
    ]
}

pub(crate) fn intermediate_detectors() -> Vec<DetectorBox> {
    vec![
        Box::new(
            ComponentRename::new("component-flex-box-renamed", "FlexBox", "Stack")
                .with_description("FlexBox was replaced by Stack"),
        ),
        Box::new(
            ComponentRename::new("component-text-input-renamed", "TextInput", "Input")
                .with_description("TextInput was merged into Input"),
        ),
        Box::new(
            ComponentRename::new("component-modal-renamed", "Modal", "Dialog")
                .with_description("Modal was renamed to Dialog"),
        ),
        Box::new(
            ComponentRename::new("component-tool-tip-renamed", "ToolTip", "Tooltip")
                .with_description("ToolTip casing was normalized"),
        ),
        Box::new(
            ImportMove::new(
                "import-use-theme-moved",
                Some("useTheme"),
                "@acme/ui",
                "@acme/theme",
            )
            .with_tier(Tier::Intermediate)
            .with_description("Theme hooks live in @acme/theme"),
        ),
        Box::new(
            ImportMove::new(
                "import-dialog-moved",
                Some("Dialog"),
                "@acme/ui/overlays",
                "@acme/ui",
            )
            .with_tier(Tier::Intermediate)
            .with_description("Dialog is exported from the package root"),
        ),
        Box::new(
            PropRename::new("prop-elevation-renamed", "elevation", "shadow")
                .with_tier(Tier::Intermediate)
                .with_description("Surface elevation became shadow"),
        ),
        Box::new(
            CallReplacement::new("call-use-theme-mode-replaced", "useThemeMode", "useColorScheme")
                .with_tier(Tier::Intermediate)
                .with_description("useThemeMode was replaced by useColorScheme"),
        ),
        Box::new(
            CallReplacement::new("call-with-styles-replaced", "withStyles", "styled")
                .with_tier(Tier::Intermediate)
                .with_description("The withStyles HOC was replaced by styled"),
        ),
    ]
}

pub(crate) fn advanced_detectors() -> Vec<DetectorBox> {
    vec![
        Box::new(
            WrapperRemoval::new("wrapper-theme-provider-removed", "ThemeProvider")
                .with_description("The root provider is implicit in v5"),
        ),
        Box::new(
            WrapperRemoval::new("wrapper-legacy-layout-removed", "LegacyLayout")
                .with_description("LegacyLayout compatibility wrappers must go"),
        ),
        Box::new(
            WrapperRemoval::new("wrapper-style-root-removed", "StyleRoot")
                .with_description("StyleRoot is no longer needed for media queries"),
        ),
        Box::new(
            CallReplacement::new(
                "call-create-legacy-theme-replaced",
                "createLegacyTheme",
                "createTheme",
            )
            .with_tier(Tier::Advanced)
            .with_description("Themes are built with createTheme and the new token shape"),
        ),
        Box::new(
            ComponentRename::new("component-data-table-renamed", "DataTable", "DataGrid")
                .with_tier(Tier::Advanced)
                .with_description("DataTable was rewritten as DataGrid"),
        ),
        Box::new(
            ImportMove::new(
                "import-data-table-moved",
                None,
                "@acme/ui/table",
                "@acme/data-grid",
            )
            .with_tier(Tier::Advanced)
            .with_description("Tabular components moved to @acme/data-grid"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_and_unique_ids() {
        let detectors = all_detectors();
        assert_eq!(detectors.len(), 24);
        let ids: HashSet<&str> = detectors.iter().map(|d| d.id()).collect();
        assert_eq!(ids.len(), 24);
    }

    #[test]
    fn test_every_tier_is_covered() {
        let detectors = all_detectors();
        for tier in [Tier::Basic, Tier::Intermediate, Tier::Advanced] {
            assert!(detectors.iter().any(|d| d.tier() == tier), "no {tier} detector");
        }
    }

    #[test]
    fn test_tier_groups_are_consistent() {
        assert!(basic_detectors().iter().all(|d| d.tier() == Tier::Basic));
        assert!(intermediate_detectors()
            .iter()
            .all(|d| d.tier() == Tier::Intermediate));
        assert!(advanced_detectors().iter().all(|d| d.tier() == Tier::Advanced));
    }

    #[test]
    fn test_default_registry_holds_catalog() {
        let registry = default_registry();
        assert_eq!(registry.len(), 24);
        assert!(registry.get("prop-theme-dark-removed").is_some());
        assert!(registry.get("wrapper-theme-provider-removed").is_some());
    }

    #[test]
    fn test_every_detector_has_description() {
        assert!(all_detectors().iter().all(|d| !d.description().is_empty()));
    }
}
