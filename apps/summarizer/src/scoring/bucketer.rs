//! Score Bucketer: maps a raw competency score to a tier.
//!
//! Thresholds are ascending `(lower_bound, tier)` pairs. Every interval is
//! closed-open except the topmost, which is closed at `MAX_SCORE`.

use thiserror::Error;

use crate::models::competency::{Competency, Tier};

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

/// A single `[lower_bound, next_lower_bound)` cut.
pub type Threshold = (f64, Tier);

/// Overall Leadership uses a four-way split.
pub const OVERALL_LEADERSHIP_THRESHOLDS: &[Threshold] = &[
    (1.0, Tier::Low),
    (2.5, Tier::ModerateLow),
    (3.0, Tier::ModerateHigh),
    (3.5, Tier::High),
];

/// Reasoning & Problem Solving and all six level-specific competencies.
pub const STANDARD_THRESHOLDS: &[Threshold] = &[
    (1.0, Tier::Low),
    (2.5, Tier::Moderate),
    (3.5, Tier::High),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("score {score} is outside [1.00, 5.00]")]
    OutOfRange { score: f64 },
}

/// Returns the threshold table for a competency.
pub fn thresholds_for(competency: Competency) -> &'static [Threshold] {
    match competency {
        Competency::OverallLeadership => OVERALL_LEADERSHIP_THRESHOLDS,
        _ => STANDARD_THRESHOLDS,
    }
}

/// Buckets `score` under `thresholds`.
///
/// Rejects anything outside `[MIN_SCORE, MAX_SCORE]` (including NaN); callers
/// decide whether that rejects the row or the whole input. Never clamps.
pub fn bucket(score: f64, thresholds: &[Threshold]) -> Result<Tier, ScoreError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ScoreError::OutOfRange { score });
    }

    thresholds
        .iter()
        .rev()
        .find(|(lower, _)| score >= *lower)
        .map(|(_, tier)| *tier)
        .ok_or(ScoreError::OutOfRange { score })
}

/// Convenience wrapper: bucket a score with the competency's own thresholds.
pub fn bucket_competency(competency: Competency, score: f64) -> Result<Tier, ScoreError> {
    bucket(score, thresholds_for(competency))
}

/// Every tier a competency can resolve to, lowest first.
pub fn tiers_for(competency: Competency) -> impl Iterator<Item = Tier> {
    thresholds_for(competency).iter().map(|(_, tier)| *tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_specific_boundaries() {
        let c = Competency::DrivesResults;
        assert_eq!(bucket_competency(c, 3.5), Ok(Tier::High));
        assert_eq!(bucket_competency(c, 3.49), Ok(Tier::Moderate));
        assert_eq!(bucket_competency(c, 2.5), Ok(Tier::Moderate));
        assert_eq!(bucket_competency(c, 2.49), Ok(Tier::Low));
        assert_eq!(bucket_competency(c, 1.0), Ok(Tier::Low));
        assert_eq!(bucket_competency(c, 5.0), Ok(Tier::High));
    }

    #[test]
    fn test_overall_leadership_boundaries() {
        let c = Competency::OverallLeadership;
        assert_eq!(bucket_competency(c, 3.5), Ok(Tier::High));
        assert_eq!(bucket_competency(c, 3.49), Ok(Tier::ModerateHigh));
        assert_eq!(bucket_competency(c, 3.0), Ok(Tier::ModerateHigh));
        assert_eq!(bucket_competency(c, 2.99), Ok(Tier::ModerateLow));
        assert_eq!(bucket_competency(c, 2.5), Ok(Tier::ModerateLow));
        assert_eq!(bucket_competency(c, 2.49), Ok(Tier::Low));
    }

    #[test]
    fn test_reasoning_uses_three_tiers() {
        let c = Competency::ReasoningProblemSolving;
        assert_eq!(bucket_competency(c, 3.0), Ok(Tier::Moderate));
        assert_eq!(tiers_for(c).count(), 3);
        assert_eq!(tiers_for(Competency::OverallLeadership).count(), 4);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let c = Competency::SolvesChallenges;
        assert_eq!(
            bucket_competency(c, 5.5),
            Err(ScoreError::OutOfRange { score: 5.5 })
        );
        assert!(bucket_competency(c, 0.99).is_err());
        assert!(bucket_competency(c, f64::NAN).is_err());
        assert!(bucket_competency(c, f64::INFINITY).is_err());
    }

    /// Sweep the whole domain in 0.01 steps: every score lands in exactly one
    /// tier and tiers never go down as the score rises.
    #[test]
    fn test_thresholds_partition_the_domain() {
        for competency in Competency::ALL {
            let thresholds = thresholds_for(competency);
            let rank = |tier: Tier| thresholds.iter().position(|(_, t)| *t == tier).unwrap();

            let mut previous = 0usize;
            for step in 100..=500 {
                let score = step as f64 / 100.0;
                let tier = bucket(score, thresholds)
                    .unwrap_or_else(|e| panic!("{competency} at {score}: {e}"));
                let matching = thresholds
                    .iter()
                    .enumerate()
                    .filter(|(idx, (lower, _))| {
                        let upper = thresholds.get(idx + 1).map(|(l, _)| *l);
                        score >= *lower && upper.map_or(score <= MAX_SCORE, |u| score < u)
                    })
                    .count();
                assert_eq!(matching, 1, "{competency} at {score} matched {matching} intervals");
                assert!(rank(tier) >= previous, "tier regressed at {score}");
                previous = rank(tier);
            }
        }
    }
}
