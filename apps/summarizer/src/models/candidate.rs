use serde::Serialize;
use thiserror::Error;

use crate::models::competency::{Competency, Level, PronounSet};
use crate::scoring::bucketer::{bucket_competency, ScoreError};

/// One input row exactly as read from the table, before any validation.
///
/// `scores` is in `Competency::ALL` order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    pub name: String,
    pub gender: String,
    pub level: String,
    pub scores: [String; 8],
}

/// Per-row rejection. Never aborts the batch on its own; see `ScorePolicy`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("name is empty")]
    MissingName,

    #[error("unknown level '{0}' (expected Apply, Shape or Guide)")]
    UnknownLevel(String),

    #[error("unknown pronoun set '{0}' (expected He/Him, She/Her or They/Them)")]
    UnknownPronounSet(String),

    #[error("{competency} score '{value}' is not a number")]
    InvalidScore {
        competency: Competency,
        value: String,
    },

    #[error("{competency}: {source}")]
    OutOfRangeScore {
        competency: Competency,
        #[source]
        source: ScoreError,
    },
}

impl RowError {
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, RowError::OutOfRangeScore { .. })
    }
}

/// Normalized, validated representation of one candidate.
///
/// Construct via [`CandidateRecord::from_raw`]; every score is guaranteed to be
/// within the bucketer's domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub name: String,
    pub pronoun_set: PronounSet,
    pub level: Level,
    #[serde(skip)]
    scores: [f64; 8],
}

impl CandidateRecord {
    pub fn new(
        name: impl Into<String>,
        pronoun_set: PronounSet,
        level: Level,
        scores: [f64; 8],
    ) -> Result<Self, RowError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(RowError::MissingName);
        }

        for competency in Competency::ALL {
            let score = scores[competency.priority()];
            bucket_competency(competency, score)
                .map_err(|source| RowError::OutOfRangeScore { competency, source })?;
        }

        Ok(Self {
            name,
            pronoun_set,
            level,
            scores,
        })
    }

    /// Validates a raw row. Checks run in column order so the first problem
    /// reported is the left-most one.
    pub fn from_raw(raw: &RawCandidate) -> Result<Self, RowError> {
        if raw.name.trim().is_empty() {
            return Err(RowError::MissingName);
        }

        let pronoun_set = PronounSet::normalize(&raw.gender)
            .ok_or_else(|| RowError::UnknownPronounSet(raw.gender.trim().to_string()))?;

        let level = Level::parse(&raw.level)
            .ok_or_else(|| RowError::UnknownLevel(raw.level.trim().to_string()))?;

        let mut scores = [0.0_f64; 8];
        for competency in Competency::ALL {
            let cell = raw.scores[competency.priority()].trim();
            scores[competency.priority()] =
                cell.parse::<f64>().map_err(|_| RowError::InvalidScore {
                    competency,
                    value: cell.to_string(),
                })?;
        }

        Self::new(&raw.name, pronoun_set, level, scores)
    }

    pub fn score(&self, competency: Competency) -> f64 {
        self.scores[competency.priority()]
    }

    /// `(competency, score)` pairs in declaration order.
    pub fn scores(&self) -> impl Iterator<Item = (Competency, f64)> + '_ {
        Competency::ALL.iter().map(|c| (*c, self.score(*c)))
    }

    /// First whitespace-delimited token of the name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, gender: &str, level: &str, scores: [&str; 8]) -> RawCandidate {
        RawCandidate {
            name: name.to_string(),
            gender: gender.to_string(),
            level: level.to_string(),
            scores: scores.map(str::to_string),
        }
    }

    #[test]
    fn test_from_raw_normalizes_categoricals() {
        let record = CandidateRecord::from_raw(&raw(
            "  Ayesha Obaid Al Mheiri ",
            "She/Her",
            "shape",
            ["2.97", "3", "2.97", "3.15", "2.92", "3.38", "3.92", "2.89"],
        ))
        .unwrap();

        assert_eq!(record.name, "Ayesha Obaid Al Mheiri");
        assert_eq!(record.first_name(), "Ayesha");
        assert_eq!(record.pronoun_set, PronounSet::SheHer);
        assert_eq!(record.level, Level::Shape);
        assert_eq!(record.score(Competency::SolvesChallenges), 3.92);
        assert_eq!(record.score(Competency::OverallLeadership), 2.97);
    }

    #[test]
    fn test_missing_name_rejected() {
        let err = CandidateRecord::from_raw(&raw("   ", "He/Him", "Apply", ["3"; 8])).unwrap_err();
        assert_eq!(err, RowError::MissingName);
    }

    #[test]
    fn test_unknown_level_rejected() {
        let err = CandidateRecord::from_raw(&raw("Sam", "He/Him", "Lead", ["3"; 8])).unwrap_err();
        assert_eq!(err, RowError::UnknownLevel("Lead".to_string()));
    }

    #[test]
    fn test_unknown_pronoun_rejected() {
        let err = CandidateRecord::from_raw(&raw("Sam", "?", "Apply", ["3"; 8])).unwrap_err();
        assert_eq!(err, RowError::UnknownPronounSet("?".to_string()));
    }

    #[test]
    fn test_non_numeric_score_rejected() {
        let mut scores = ["3"; 8];
        scores[3] = "n/a";
        let err = CandidateRecord::from_raw(&raw("Sam", "They/Them", "Guide", scores)).unwrap_err();
        assert_eq!(
            err,
            RowError::InvalidScore {
                competency: Competency::DevelopsTalent,
                value: "n/a".to_string()
            }
        );
        assert!(!err.is_out_of_range());
    }

    #[test]
    fn test_out_of_range_score_rejected_not_clamped() {
        let mut scores = ["3"; 8];
        scores[6] = "5.5";
        let err = CandidateRecord::from_raw(&raw("Sam", "He/Him", "Apply", scores)).unwrap_err();
        assert!(err.is_out_of_range());
        assert!(matches!(
            err,
            RowError::OutOfRangeScore {
                competency: Competency::SolvesChallenges,
                ..
            }
        ));
    }

    #[test]
    fn test_first_name_single_token() {
        let record =
            CandidateRecord::new("Madonna", PronounSet::SheHer, Level::Guide, [3.0; 8]).unwrap();
        assert_eq!(record.first_name(), "Madonna");
    }
}
