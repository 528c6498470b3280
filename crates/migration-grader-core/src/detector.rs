//! Detector trait and detection outcome types.

use crate::record::ChangeRecord;
use crate::structure::StructuredView;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Outcome state of one detector on one file pair.
///
/// States are listed in the order a detector evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionState {
    /// The golden diff never exercises this pattern.
    NotApplicable,
    /// The pattern applies but the candidate never touched the file.
    FileMissing,
    /// The candidate performs the expected transformation.
    Correct,
    /// The transformation is partial, or the candidate reintroduces what
    /// the golden diff removed.
    Incorrect,
    /// No evidence of the transformation in the candidate.
    Missing,
    /// Reserved; no built-in detector produces it.
    Unnecessary,
}

impl DetectionState {
    /// Credit toward the pattern score, `None` if the state is not graded.
    #[must_use]
    pub fn credit(self) -> Option<f64> {
        match self {
            Self::NotApplicable => None,
            Self::Correct => Some(1.0),
            Self::Incorrect => Some(0.25),
            Self::Missing | Self::FileMissing | Self::Unnecessary => Some(0.0),
        }
    }

    /// Returns the serialized name of the state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::FileMissing => "FILE_MISSING",
            Self::Correct => "CORRECT",
            Self::Incorrect => "INCORRECT",
            Self::Missing => "MISSING",
            Self::Unnecessary => "UNNECESSARY",
        }
    }
}

impl std::fmt::Display for DetectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty class of a detector, carrying its scoring weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Weight 1.
    Basic,
    /// Weight 2.
    Intermediate,
    /// Weight 3.
    Advanced,
}

impl Tier {
    /// Integer weight of the tier.
    #[must_use]
    pub fn weight(self) -> u32 {
        match self {
            Self::Basic => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }

    /// Parses a lowercase tier name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "basic" => Some(Self::Basic),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

/// Result of running one detector against one file pair.
///
/// Carries no file identity; the caller groups outcomes per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    /// Identifier of the detector that produced this outcome.
    pub detector_id: String,
    /// Outcome state.
    pub state: DetectionState,
    /// Human-readable message.
    pub message: String,
    /// Supporting evidence.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl DetectionOutcome {
    /// Creates a new outcome without details.
    #[must_use]
    pub fn new(
        detector_id: impl Into<String>,
        state: DetectionState,
        message: impl Into<String>,
    ) -> Self {
        Self {
            detector_id: detector_id.into(),
            state,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Adds a supporting detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}

/// Graded states a detector stage may conclude with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictKind {
    /// Maps to [`DetectionState::Correct`].
    Correct,
    /// Maps to [`DetectionState::Incorrect`].
    Incorrect,
    /// Maps to [`DetectionState::Missing`].
    Missing,
}

impl From<VerdictKind> for DetectionState {
    fn from(kind: VerdictKind) -> Self {
        match kind {
            VerdictKind::Correct => Self::Correct,
            VerdictKind::Incorrect => Self::Incorrect,
            VerdictKind::Missing => Self::Missing,
        }
    }
}

/// Conclusion of a detector stage for a present candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Graded state.
    pub kind: VerdictKind,
    /// Human-readable message.
    pub message: String,
    /// Supporting evidence.
    pub details: Vec<String>,
}

impl Verdict {
    fn new(kind: VerdictKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// The expected transformation is present.
    #[must_use]
    pub fn correct(message: impl Into<String>) -> Self {
        Self::new(VerdictKind::Correct, message)
    }

    /// The transformation is partial or undone.
    #[must_use]
    pub fn incorrect(message: impl Into<String>) -> Self {
        Self::new(VerdictKind::Incorrect, message)
    }

    /// No trace of the transformation.
    #[must_use]
    pub fn missing(message: impl Into<String>) -> Self {
        Self::new(VerdictKind::Missing, message)
    }

    /// Adds a supporting detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Converts into an outcome attributed to `detector_id`.
    #[must_use]
    pub fn into_outcome(self, detector_id: &str) -> DetectionOutcome {
        DetectionOutcome {
            detector_id: detector_id.to_string(),
            state: self.kind.into(),
            message: self.message,
            details: self.details,
        }
    }
}

/// Structured views for both sides of a file pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewPair<'a> {
    /// View of the golden record's new side.
    pub golden: Option<&'a StructuredView>,
    /// View of the candidate record's new side.
    pub candidate: Option<&'a StructuredView>,
}

impl ViewPair<'_> {
    /// Returns true if at least one side has a view.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.golden.is_some() || self.candidate.is_some()
    }
}

/// Everything a detector sees for one file.
#[derive(Debug, Clone, Copy)]
pub struct DetectorInput<'a> {
    /// Reference record.
    pub golden: &'a ChangeRecord,
    /// Submission record, absent if the candidate never touched the file.
    pub candidate: Option<&'a ChangeRecord>,
    /// Optional structured views.
    pub views: ViewPair<'a>,
}

impl<'a> DetectorInput<'a> {
    /// Creates an input without structured views.
    #[must_use]
    pub fn new(golden: &'a ChangeRecord, candidate: Option<&'a ChangeRecord>) -> Self {
        Self {
            golden,
            candidate,
            views: ViewPair::default(),
        }
    }

    /// Attaches structured views.
    #[must_use]
    pub fn with_views(
        mut self,
        golden: Option<&'a StructuredView>,
        candidate: Option<&'a StructuredView>,
    ) -> Self {
        self.views = ViewPair { golden, candidate };
        self
    }
}

/// A stateless rule check comparing one golden/candidate file pair.
///
/// Implementors supply the applicability test, a required text stage and
/// optionally a structured stage. The provided [`Detector::detect`]
/// sequences them:
///
/// 1. `is_applicable` on the golden record only, else `NOT_APPLICABLE`;
/// 2. absent candidate gives `FILE_MISSING`;
/// 3. `structured_verdict`, when views exist and it is conclusive;
/// 4. `text_verdict` otherwise.
///
/// # Example
///
/// ```ignore
/// use migration_grader_core::{ChangeRecord, Detector, Tier, Verdict};
///
/// pub struct DropsLegacyImport;
///
/// impl Detector for DropsLegacyImport {
///     fn id(&self) -> &str { "drops-legacy-import" }
///     fn name(&self) -> &str { "Drops legacy import" }
///     fn tier(&self) -> Tier { Tier::Basic }
///
///     fn is_applicable(&self, golden: &ChangeRecord) -> bool {
///         golden.removed_texts().any(|l| l.contains("legacy"))
///     }
///
///     fn text_verdict(&self, _golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict {
///         if candidate.removed_texts().any(|l| l.contains("legacy")) {
///             Verdict::correct("legacy import removed")
///         } else {
///             Verdict::missing("legacy import still present")
///         }
///     }
/// }
/// ```
pub trait Detector: Send + Sync {
    /// Stable kebab-case identifier (e.g. `prop-theme-dark-removed`).
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Difficulty tier.
    fn tier(&self) -> Tier;

    /// Returns a brief description of what this detector checks.
    fn description(&self) -> &str {
        ""
    }

    /// Whether the golden record exercises this detector's pattern.
    fn is_applicable(&self, golden: &ChangeRecord) -> bool;

    /// Structured stage. Return `None` when the views are inconclusive.
    fn structured_verdict(
        &self,
        _golden: &ChangeRecord,
        _candidate: &ChangeRecord,
        _views: ViewPair<'_>,
    ) -> Option<Verdict> {
        None
    }

    /// Line-text stage, used whenever the structured stage is absent or
    /// inconclusive.
    fn text_verdict(&self, golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict;

    /// Runs the full evaluation sequence for one file.
    fn detect(&self, input: &DetectorInput<'_>) -> DetectionOutcome {
        evaluate(self, input)
    }
}

/// Type alias for boxed detector trait objects.
pub type DetectorBox = Box<dyn Detector>;

/// Evaluates `detector` against `input` in the fixed stage order.
pub fn evaluate<D: Detector + ?Sized>(detector: &D, input: &DetectorInput<'_>) -> DetectionOutcome {
    if !detector.is_applicable(input.golden) {
        return DetectionOutcome::new(
            detector.id(),
            DetectionState::NotApplicable,
            "pattern not exercised by the golden diff",
        );
    }

    let Some(candidate) = input.candidate else {
        return DetectionOutcome::new(
            detector.id(),
            DetectionState::FileMissing,
            format!("candidate does not touch {}", input.golden.path),
        );
    };

    let structured = if input.views.is_present() {
        detector.structured_verdict(input.golden, candidate, input.views)
    } else {
        None
    };

    let verdict = match structured {
        Some(verdict) => {
            trace!("{}: structured stage concluded", detector.id());
            verdict
        }
        None => detector.text_verdict(input.golden, candidate),
    };

    verdict.into_outcome(detector.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LineEntry;
    use crate::structure::{LineSpan, TagUsage};

    /// Golden removes `legacy`; structured stage answers only when the
    /// candidate view mentions a `Legacy` tag.
    struct LegacyRemoval;

    impl Detector for LegacyRemoval {
        fn id(&self) -> &str {
            "legacy-removal"
        }
        fn name(&self) -> &str {
            "Legacy removal"
        }
        fn tier(&self) -> Tier {
            Tier::Intermediate
        }
        fn is_applicable(&self, golden: &ChangeRecord) -> bool {
            golden.removed_texts().any(|l| l.contains("legacy"))
        }
        fn structured_verdict(
            &self,
            _golden: &ChangeRecord,
            _candidate: &ChangeRecord,
            views: ViewPair<'_>,
        ) -> Option<Verdict> {
            let view = views.candidate?;
            view.tags_named("Legacy")
                .next()
                .map(|_| Verdict::incorrect("Legacy tag still rendered"))
        }
        fn text_verdict(&self, _golden: &ChangeRecord, candidate: &ChangeRecord) -> Verdict {
            if candidate.removed_texts().any(|l| l.contains("legacy")) {
                Verdict::correct("removed")
            } else {
                Verdict::missing("not removed")
            }
        }
    }

    fn record(removed: &[&str], added: &[&str]) -> ChangeRecord {
        let mut r = ChangeRecord::new("x.tsx");
        r.removed = removed
            .iter()
            .zip(1..)
            .map(|(t, n)| LineEntry::new(n, *t))
            .collect();
        r.added = added
            .iter()
            .zip(1..)
            .map(|(t, n)| LineEntry::new(n, *t))
            .collect();
        r
    }

    fn legacy_view() -> StructuredView {
        StructuredView {
            tags: vec![TagUsage {
                name: "Legacy".to_string(),
                attributes: vec![],
                children: vec![],
                span: LineSpan::default(),
            }],
            ..StructuredView::default()
        }
    }

    #[test]
    fn applicability_ignores_candidate() {
        let golden = record(&[], &["x"]);
        let candidate = record(&["legacy"], &[]);
        let outcome = LegacyRemoval.detect(&DetectorInput::new(&golden, Some(&candidate)));
        assert_eq!(outcome.state, DetectionState::NotApplicable);
    }

    #[test]
    fn absent_candidate_is_file_missing() {
        let golden = record(&["legacy"], &[]);
        let outcome = LegacyRemoval.detect(&DetectorInput::new(&golden, None));
        assert_eq!(outcome.state, DetectionState::FileMissing);
        assert_eq!(outcome.detector_id, "legacy-removal");
    }

    #[test]
    fn not_applicable_wins_over_file_missing() {
        let golden = record(&["modern"], &[]);
        let outcome = LegacyRemoval.detect(&DetectorInput::new(&golden, None));
        assert_eq!(outcome.state, DetectionState::NotApplicable);
    }

    #[test]
    fn text_stage_without_views() {
        let golden = record(&["legacy"], &[]);
        let candidate = record(&["legacy"], &[]);
        let outcome = LegacyRemoval.detect(&DetectorInput::new(&golden, Some(&candidate)));
        assert_eq!(outcome.state, DetectionState::Correct);
    }

    #[test]
    fn conclusive_structured_stage_short_circuits() {
        let golden = record(&["legacy"], &[]);
        let candidate = record(&["legacy"], &[]);
        let view = legacy_view();
        let input = DetectorInput::new(&golden, Some(&candidate)).with_views(None, Some(&view));
        let outcome = LegacyRemoval.detect(&input);
        assert_eq!(outcome.state, DetectionState::Incorrect);
    }

    #[test]
    fn inconclusive_structured_stage_falls_back() {
        let golden = record(&["legacy"], &[]);
        let candidate = record(&[], &[]);
        let empty = StructuredView::default();
        let input = DetectorInput::new(&golden, Some(&candidate)).with_views(Some(&empty), Some(&empty));
        let outcome = LegacyRemoval.detect(&input);
        assert_eq!(outcome.state, DetectionState::Missing);
    }

    #[test]
    fn credits() {
        assert_eq!(DetectionState::NotApplicable.credit(), None);
        assert_eq!(DetectionState::Correct.credit(), Some(1.0));
        assert_eq!(DetectionState::Incorrect.credit(), Some(0.25));
        assert_eq!(DetectionState::Missing.credit(), Some(0.0));
        assert_eq!(DetectionState::FileMissing.credit(), Some(0.0));
    }

    #[test]
    fn tier_weights_and_parse() {
        assert_eq!(Tier::Basic.weight(), 1);
        assert_eq!(Tier::Intermediate.weight(), 2);
        assert_eq!(Tier::Advanced.weight(), 3);
        assert_eq!(Tier::parse("advanced"), Some(Tier::Advanced));
        assert_eq!(Tier::parse("expert"), None);
    }

    #[test]
    fn verdict_keeps_details() {
        let outcome = Verdict::incorrect("partial")
            .with_detail("line 3")
            .into_outcome("d");
        assert_eq!(outcome.state, DetectionState::Incorrect);
        assert_eq!(outcome.details, vec!["line 3".to_string()]);
    }
}
