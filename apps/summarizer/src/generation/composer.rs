//! Summary Composer: turns one candidate into a deterministic selection plan.
//!
//! No LLM calls. The plan decides WHICH fragments are used and in WHAT order;
//! the generation step only decides how to phrase them.
//!
//! Ordering rule everywhere: score descending, ties broken by competency
//! declaration order. The sort key includes the declaration index, so the
//! result does not depend on the order pairs are fed in.

use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;

use crate::models::candidate::CandidateRecord;
use crate::models::competency::{Competency, Tier};
use crate::scoring::bucketer::{bucket_competency, ScoreError};
use crate::scoring::interpretations::{FragmentError, InterpretationTable};

/// Strengths and development areas each hold exactly this many entries.
pub const HIGHLIGHT_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Fragment(#[from] FragmentError),
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A competency together with the fragment its score selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedFragment {
    pub competency: Competency,
    pub score: f64,
    pub tier: Tier,
    pub text: &'static str,
}

/// Deterministic assembly plan for one candidate. Shared by all three length variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPlan {
    /// Overall Leadership fragment personalized with the first name.
    pub opening_sentence: String,
    pub opening: SelectedFragment,
    /// The six level-specific competencies, highest score first.
    pub body: Vec<SelectedFragment>,
    /// Two highest of all eight, highest first.
    pub strengths: Vec<SelectedFragment>,
    /// Two lowest of all eight, lowest first.
    pub development_areas: Vec<SelectedFragment>,
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

/// Builds the selection plan for `record`.
///
/// Steps:
/// 1. Opening: Overall Leadership tier → fragment → prefixed with first name
/// 2. Body: six level-specific competencies ranked descending
/// 3. Highlights: all eight ranked descending; head → strengths, tail → development areas
pub fn compose(
    record: &CandidateRecord,
    table: &InterpretationTable,
) -> Result<SummaryPlan, ComposeError> {
    let select = |competency: Competency| -> Result<SelectedFragment, ComposeError> {
        let score = record.score(competency);
        let tier = bucket_competency(competency, score)?;
        let text = table.fragment_for(competency, record.level, tier)?;
        Ok(SelectedFragment {
            competency,
            score,
            tier,
            text,
        })
    };

    // Step 1: Opening
    let opening = select(Competency::OverallLeadership)?;
    let opening_sentence = personalize_opening(opening.text, record.first_name());

    // Step 2: Body ordering
    let body = rank_descending(
        Competency::LEVEL_SPECIFIC
            .iter()
            .map(|c| (*c, record.score(*c))),
    )
    .into_iter()
    .map(select)
    .collect::<Result<Vec<_>, _>>()?;

    // Step 3: Strengths / development areas
    let ranked_all = rank_descending(record.scores());
    let (strengths, development_areas) = split_highlights(&ranked_all);

    Ok(SummaryPlan {
        opening_sentence,
        opening,
        body,
        strengths: strengths
            .into_iter()
            .map(select)
            .collect::<Result<Vec<_>, _>>()?,
        development_areas: development_areas
            .into_iter()
            .map(select)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

/// Stable descending ranking with declaration-order tie-break.
pub fn rank_descending(pairs: impl IntoIterator<Item = (Competency, f64)>) -> Vec<Competency> {
    let mut pairs: Vec<(Competency, f64)> = pairs.into_iter().collect();
    pairs.sort_by(|a, b| compare_ranked(*a, *b));
    pairs.into_iter().map(|(c, _)| c).collect()
}

fn compare_ranked(a: (Competency, f64), b: (Competency, f64)) -> Ordering {
    b.1.total_cmp(&a.1)
        .then_with(|| a.0.priority().cmp(&b.0.priority()))
}

/// Takes the first `HIGHLIGHT_COUNT` as strengths and the last `HIGHLIGHT_COUNT`
/// (reported lowest first) as development areas.
///
/// With fewer than `2 * HIGHLIGHT_COUNT` entries the lists would overlap; the
/// development list is trimmed so a competency never appears in both.
fn split_highlights(ranked: &[Competency]) -> (Vec<Competency>, Vec<Competency>) {
    let strengths: Vec<Competency> = ranked.iter().take(HIGHLIGHT_COUNT).copied().collect();
    let development = ranked
        .iter()
        .rev()
        .take(HIGHLIGHT_COUNT)
        .filter(|c| !strengths.contains(*c))
        .copied()
        .collect();
    (strengths, development)
}

/// Turns an Overall Leadership fragment into the opening sentence.
///
/// "Candidate demonstrates …" → "Jane demonstrates …"
/// "Demonstrates …"           → "Jane demonstrates …"
pub fn personalize_opening(fragment: &str, first_name: &str) -> String {
    if let Some(rest) = fragment.strip_prefix("Candidate ") {
        return format!("{first_name} {rest}");
    }

    let mut chars = fragment.chars();
    match chars.next() {
        Some(first) => format!(
            "{first_name} {}{}",
            first.to_lowercase(),
            chars.as_str()
        ),
        None => first_name.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
