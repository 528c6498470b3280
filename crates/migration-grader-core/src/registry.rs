//! Detector registry.

use crate::detector::{Detector, DetectorBox};

use thiserror::Error;

/// Errors raised while registering detectors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A detector with the same id is already registered.
    #[error("detector `{0}` is already registered")]
    DuplicateId(String),
}

/// Ordered catalog of detectors handed to the grader.
///
/// Append-only during setup; [`DetectorRegistry::clear`] empties it for
/// repeated evaluation runs.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Vec<DetectorBox>,
}

impl std::fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl DetectorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a list of detectors.
    ///
    /// # Errors
    ///
    /// Returns an error if two detectors share an id.
    pub fn from_detectors<I>(detectors: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = DetectorBox>,
    {
        let mut registry = Self::new();
        for detector in detectors {
            registry.register_box(detector)?;
        }
        Ok(registry)
    }

    /// Registers a detector.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken.
    pub fn register<D: Detector + 'static>(&mut self, detector: D) -> Result<(), RegistryError> {
        self.register_box(Box::new(detector))
    }

    /// Registers a boxed detector.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken.
    pub fn register_box(&mut self, detector: DetectorBox) -> Result<(), RegistryError> {
        if self.get(detector.id()).is_some() {
            return Err(RegistryError::DuplicateId(detector.id().to_string()));
        }
        self.detectors.push(detector);
        Ok(())
    }

    /// Removes every detector.
    pub fn clear(&mut self) {
        self.detectors.clear();
    }

    /// Looks up a detector by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn Detector> {
        self.detectors
            .iter()
            .find(|d| d.id() == id)
            .map(AsRef::as_ref)
    }

    /// Iterates over detectors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(AsRef::as_ref)
    }

    /// Iterates over detector ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.detectors.iter().map(|d| d.id())
    }

    /// Keeps only the detectors whose id satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.detectors.retain(|d| keep(d.id()));
    }

    /// Number of registered detectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// Returns true if no detector is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}
