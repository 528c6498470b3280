//! Grading driver: runs the pipeline from parsed diffs to a report.

use crate::config::{Config, ConfigError};
use crate::detector::{Detector, DetectorInput};
use crate::diff::parse_diff;
use crate::matcher::{match_files, normalize_path, ExcludeSet, MatchedPair};
use crate::noise::scan_noise;
use crate::record::{ChangeRecord, Side};
use crate::registry::DetectorRegistry;
use crate::report::{FileGrade, FileStatus, GradeReport, WeightedOutcome};
use crate::scoring::compute_score_with;
use crate::structure::{ExtractorBox, StructuredView};

use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Builder for configuring a [`Grader`].
#[derive(Default)]
pub struct GraderBuilder {
    registry: Option<DetectorRegistry>,
    config: Option<Config>,
    extractor: Option<ExtractorBox>,
    exclude_patterns: Vec<String>,
}

impl GraderBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the detector registry.
    #[must_use]
    pub fn registry(mut self, registry: DetectorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the structural extractor used for the structured detector stage.
    #[must_use]
    pub fn extractor(mut self, extractor: ExtractorBox) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Adds an exclude glob pattern, matched against normalized paths.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Builds the grader.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured scoring weights are invalid.
    pub fn build(self) -> Result<Grader, ConfigError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.matcher.exclude.iter().cloned());

        Ok(Grader {
            registry: self.registry.unwrap_or_default(),
            excludes: ExcludeSet::new(&exclude_patterns),
            extractor: self.extractor,
            config,
        })
    }
}

/// Grades candidate diffs against golden diffs.
///
/// Use [`Grader::builder()`] to construct an instance.
pub struct Grader {
    registry: DetectorRegistry,
    config: Config,
    excludes: ExcludeSet,
    extractor: Option<ExtractorBox>,
}

impl Grader {
    /// Creates a new builder for configuring a grader.
    #[must_use]
    pub fn builder() -> GraderBuilder {
        GraderBuilder::new()
    }

    /// Returns the detector registry.
    #[must_use]
    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    /// Returns the number of detectors that will run.
    #[must_use]
    pub fn detector_count(&self) -> usize {
        self.active_detectors().count()
    }

    /// Parses both diff texts and grades them.
    #[must_use]
    pub fn grade_text(&self, golden: &str, candidate: &str) -> GradeReport {
        self.grade(&parse_diff(golden), &parse_diff(candidate))
    }

    /// Grades parsed candidate records against parsed golden records.
    #[must_use]
    pub fn grade(&self, golden: &[ChangeRecord], candidate: &[ChangeRecord]) -> GradeReport {
        info!(
            "Grading {} candidate file(s) against {} golden file(s)",
            candidate.len(),
            golden.len()
        );

        let matches = match_files(golden, candidate, &self.excludes);
        let matched: HashMap<&str, &MatchedPair> = matches
            .matched
            .iter()
            .map(|pair| (pair.path.as_str(), pair))
            .collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut files = Vec::with_capacity(matches.golden_total());
        for record in golden {
            let path = normalize_path(&record.path);
            if self.excludes.is_excluded(&path) || !seen.insert(path.clone()) {
                continue;
            }
            let grade = match matched.get(path.as_str()) {
                Some(pair) => self.grade_pair(pair),
                None => self.grade_missed(path, record),
            };
            files.push(grade);
        }

        let noise = scan_noise(&matches, &files);
        let outcomes: Vec<WeightedOutcome> = files
            .iter()
            .flat_map(|f| f.outcomes.iter().cloned())
            .collect();
        let score = compute_score_with(&matches, &outcomes, &noise, &self.config.scoring);

        info!(
            "Grading complete: overall {:.2} ({} outcomes, {} noise instances)",
            score.overall,
            outcomes.len(),
            noise.len()
        );

        GradeReport {
            score,
            files,
            extra_files: matches
                .extra
                .iter()
                .map(|r| normalize_path(&r.path))
                .collect(),
            excluded_files: matches.excluded.clone(),
            noise,
            detectors_run: self.detector_count(),
        }
    }

    fn grade_pair(&self, pair: &MatchedPair) -> FileGrade {
        debug!("Grading matched file: {}", pair.path);

        let golden_view = self.view_of(&pair.path, &pair.golden);
        let candidate_view = self.view_of(&pair.path, &pair.candidate);
        let input = DetectorInput::new(&pair.golden, Some(&pair.candidate))
            .with_views(golden_view.as_ref(), candidate_view.as_ref());

        FileGrade {
            path: pair.path.clone(),
            status: FileStatus::Matched,
            outcomes: self.run_detectors(&input),
        }
    }

    fn grade_missed(&self, path: String, golden: &ChangeRecord) -> FileGrade {
        debug!("Grading missed file: {}", path);

        let input = DetectorInput::new(golden, None);
        FileGrade {
            path,
            status: FileStatus::Missed,
            outcomes: self.run_detectors(&input),
        }
    }

    fn run_detectors(&self, input: &DetectorInput<'_>) -> Vec<WeightedOutcome> {
        self.active_detectors()
            .map(|detector| WeightedOutcome {
                outcome: detector.detect(input),
                weight: self.weight_of(detector),
            })
            .collect()
    }

    fn active_detectors(&self) -> impl Iterator<Item = &dyn Detector> {
        self.registry.iter().filter(|d| {
            let enabled = self.config.is_detector_enabled(d.id());
            if !enabled {
                debug!("Skipping disabled detector: {}", d.id());
            }
            enabled
        })
    }

    fn weight_of(&self, detector: &dyn Detector) -> u32 {
        self.config
            .detector_weight(detector.id())
            .unwrap_or_else(|| detector.tier().weight())
    }

    fn view_of(&self, path: &str, record: &ChangeRecord) -> Option<StructuredView> {
        if record.is_binary || record.hunks.is_empty() {
            return None;
        }
        let extractor = self.extractor.as_ref()?;
        let (text, changed) = record.reconstruct_marked(Side::New);
        // context is parsed for completeness but only written usages count
        let mut view = extractor.extract(path, &text)?;
        view.retain_touching(&changed);
        Some(view)
    }
}
