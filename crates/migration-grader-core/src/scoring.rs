//! Weighted score aggregation.

use crate::matcher::MatchResult;
use crate::noise::NoiseInstance;
use crate::report::WeightedOutcome;

use serde::{Deserialize, Serialize};

/// Final score components, each on the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Weighted overall score.
    pub overall: f64,
    /// Share of golden files the candidate touched.
    pub file_coverage: f64,
    /// Weighted credit over applicable detector outcomes.
    pub pattern: f64,
    /// Clamped sum of noise penalties.
    pub noise_penalty: f64,
}

/// Weights of the three overall-score terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight of file coverage.
    pub file_coverage: f64,
    /// Weight of the pattern score.
    pub pattern: f64,
    /// Weight of the noise term `1 - noise_penalty`.
    pub noise: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            file_coverage: 0.20,
            pattern: 0.65,
            noise: 0.15,
        }
    }
}

/// Computes the score breakdown with the default weights.
#[must_use]
pub fn compute_score(
    matches: &MatchResult,
    outcomes: &[WeightedOutcome],
    noise: &[NoiseInstance],
) -> ScoreBreakdown {
    compute_score_with(matches, outcomes, noise, &ScoreWeights::default())
}

/// Computes the score breakdown with explicit term weights.
///
/// Terms are combined on the 0–1 scale; each reported value is rounded to
/// two decimals and scaled to 0–100.
#[must_use]
pub fn compute_score_with(
    matches: &MatchResult,
    outcomes: &[WeightedOutcome],
    noise: &[NoiseInstance],
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let coverage = file_coverage(matches);
    let pattern = pattern_score(outcomes);
    let penalty = noise_penalty(noise);

    let overall = weights.file_coverage * coverage
        + weights.pattern * pattern
        + weights.noise * (1.0 - penalty);

    ScoreBreakdown {
        overall: to_percent(overall),
        file_coverage: to_percent(coverage),
        pattern: to_percent(pattern),
        noise_penalty: to_percent(penalty),
    }
}

/// Matched share of golden files; 1.0 when the golden diff has none.
#[must_use]
pub fn file_coverage(matches: &MatchResult) -> f64 {
    let total = matches.golden_total();
    if total == 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = matches.matched.len() as f64 / total as f64;
    ratio
}

/// Weighted credit over graded outcomes; 1.0 when nothing is graded.
#[must_use]
pub fn pattern_score(outcomes: &[WeightedOutcome]) -> f64 {
    let (earned, possible) = outcomes
        .iter()
        .filter_map(|o| o.outcome.state.credit().map(|c| (c, f64::from(o.weight))))
        .fold((0.0, 0.0), |(earned, possible), (credit, weight)| {
            (earned + credit * weight, possible + weight)
        });

    if possible == 0.0 {
        1.0
    } else {
        earned / possible
    }
}

/// Sum of penalties, clamped to 1.0.
#[must_use]
pub fn noise_penalty(noise: &[NoiseInstance]) -> f64 {
    noise.iter().map(|n| n.penalty).sum::<f64>().min(1.0)
}

fn to_percent(value: f64) -> f64 {
    (value * 100.0).round()
}
