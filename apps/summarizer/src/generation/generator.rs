//! Summary Generation: the narrow seam between deterministic selection and the LLM.
//!
//! Flow per candidate: compose plan → build prompt → `SummaryGenerator::generate`
//! (bounded by a timeout) → structure check → `GeneratedSummaries`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::generation::composer::HIGHLIGHT_COUNT;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

/// Literal written to all three output columns when a row fails or is rejected.
pub const ERROR_MARKER: &str = "Error";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// The three length variants. Unknown or missing keys fail deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratedSummaries {
    pub summary_200: String,
    pub summary_150: String,
    pub summary_100: String,
}

impl GeneratedSummaries {
    pub fn error_marker() -> Self {
        Self {
            summary_200: ERROR_MARKER.to_string(),
            summary_150: ERROR_MARKER.to_string(),
            summary_100: ERROR_MARKER.to_string(),
        }
    }

    pub fn variants(&self) -> [(&'static str, &str); 3] {
        [
            ("summary_200", &self.summary_200),
            ("summary_150", &self.summary_150),
            ("summary_100", &self.summary_100),
        ]
    }
}

/// Per-candidate generation failure. Recorded against the row; never aborts the batch.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation service error: {0}")]
    Llm(#[from] LlmError),

    #[error("generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("generation task aborted: {0}")]
    Aborted(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Anything that can turn an assembled prompt into the three summaries.
///
/// Production: `LlmClient`. Tests: in-memory fakes.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedSummaries, LlmError>;
}

#[async_trait]
impl SummaryGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<GeneratedSummaries, LlmError> {
        self.call_json::<GeneratedSummaries>(prompt, JSON_ONLY_SYSTEM).await
    }
}

/// Runs one generation bounded by `timeout`, then checks the output structure.
///
/// Structure problems are logged, not returned: the prose is the model's
/// responsibility and a slightly off-format summary is still usable.
pub async fn generate_summaries(
    generator: &dyn SummaryGenerator,
    prompt: &str,
    timeout: Duration,
    candidate_name: &str,
) -> Result<GeneratedSummaries, GenerationError> {
    let summaries = tokio::time::timeout(timeout, generator.generate(prompt))
        .await
        .map_err(|_| GenerationError::Timeout(timeout))??;

    for (key, text) in summaries.variants() {
        for issue in check_structure(text) {
            warn!("{candidate_name}: {key} {issue}");
        }
    }

    Ok(summaries)
}

// ────────────────────────────────────────────────────────────────────────────
// Structure check
// ────────────────────────────────────────────────────────────────────────────

/// Checks one variant against the output contract: a paragraph, then a
/// `Strengths` list and a `Development Areas` list with two bullets each.
/// Returns human-readable issues; empty means the variant conforms.
pub fn check_structure(text: &str) -> Vec<String> {
    let mut issues = Vec::new();

    let strengths_at = text.find("Strengths");
    let development_at = text.find("Development Areas");

    let (strengths_at, development_at) = match (strengths_at, development_at) {
        (Some(s), Some(d)) if s < d => (s, d),
        (None, _) => return vec!["is missing the Strengths heading".to_string()],
        (_, None) => return vec!["is missing the Development Areas heading".to_string()],
        _ => return vec!["lists Development Areas before Strengths".to_string()],
    };

    if text[..strengths_at].trim().trim_end_matches('*').trim().is_empty() {
        issues.push("has no paragraph before the bullet lists".to_string());
    }

    let strengths = count_bullets(&text[strengths_at..development_at]);
    if strengths != HIGHLIGHT_COUNT {
        issues.push(format!("has {strengths} strength bullets (expected {HIGHLIGHT_COUNT})"));
    }

    let development = count_bullets(&text[development_at..]);
    if development != HIGHLIGHT_COUNT {
        issues.push(format!("has {development} development bullets (expected {HIGHLIGHT_COUNT})"));
    }

    issues
}

fn count_bullets(section: &str) -> usize {
    section
        .lines()
        .map(str::trim_start)
        .filter(|line| {
            (line.starts_with("* ") || line.starts_with("- ") || line.starts_with("• "))
                && !line.starts_with("**")
        })
        .count()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
