//! Detector presets for common configurations.

use crate::catalog::{all_detectors, basic_detectors, registry_from};

use migration_grader_core::{DetectorBox, DetectorRegistry};

/// Preset configurations for migration-grader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every shipped detector.
    #[default]
    All,
    /// Mechanical rewrites only (basic tier).
    Core,
}

impl Preset {
    /// Parses a preset name as used in configuration files.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "all" => Some(Self::All),
            "core" => Some(Self::Core),
            _ => None,
        }
    }

    /// Returns the detectors for this preset.
    #[must_use]
    pub fn detectors(self) -> Vec<DetectorBox> {
        match self {
            Self::All => all_detectors(),
            Self::Core => core_detectors(),
        }
    }

    /// Builds a registry for this preset.
    #[must_use]
    pub fn registry(self) -> DetectorRegistry {
        registry_from(self.detectors())
    }
}

/// Returns the core set of detectors.
///
/// Includes the basic-tier prop, import and call rewrites; component
/// renames and wrapper removals are left out.
#[must_use]
pub fn core_detectors() -> Vec<DetectorBox> {
    basic_detectors()
}
