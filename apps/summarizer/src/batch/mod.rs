// Batch orchestration: validate rows → compose plans → generate (bounded fan-out) → report.
// Validation and composition complete for every row before the first generation call,
// so input-level and integrity failures never leave a half-processed batch behind.

pub mod table;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::generation::composer::{compose, ComposeError, SummaryPlan};
use crate::generation::generator::{
    generate_summaries, GeneratedSummaries, GenerationError, SummaryGenerator,
};
use crate::generation::prompts::PromptBuilder;
use crate::models::candidate::{CandidateRecord, RawCandidate, RowError};
use crate::scoring::interpretations::{FragmentError, InterpretationTable};

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

/// What to do when a row carries a score outside the bucketer's domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScorePolicy {
    /// Mark the row `Error` and keep going.
    #[default]
    RejectRow,
    /// Refuse the whole input before any generation.
    RejectInput,
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub concurrency: usize,
    pub timeout: Duration,
    pub score_policy: ScorePolicy,
}

impl BatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.batch_concurrency,
            timeout: config.generation_timeout,
            score_policy: ScorePolicy::default(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("row {row} ({name}) rejects the input: {reason}")]
    InputRejected {
        row: usize,
        name: String,
        reason: RowError,
    },

    #[error(transparent)]
    Integrity(#[from] ComposeError),
}

#[derive(Debug)]
pub enum RowOutcome {
    Generated(GeneratedSummaries),
    Rejected(RowError),
    Failed(GenerationError),
}

impl RowOutcome {
    /// Output cells for this row; anything but a generated row gets the error marker.
    pub fn summaries(&self) -> GeneratedSummaries {
        match self {
            RowOutcome::Generated(summaries) => summaries.clone(),
            RowOutcome::Rejected(_) | RowOutcome::Failed(_) => GeneratedSummaries::error_marker(),
        }
    }
}

#[derive(Debug)]
pub struct RowResult {
    /// 1-based position among the data rows.
    pub row: usize,
    pub name: String,
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTotals {
    pub rows: usize,
    pub generated: usize,
    pub rejected: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Rejected,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    pub row: usize,
    pub name: String,
    pub kind: IssueKind,
    pub reason: String,
}

/// Run summary, logged at the end of every batch and optionally written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub score_policy: ScorePolicy,
    pub totals: BatchTotals,
    pub issues: Vec<RowIssue>,
}

impl BatchReport {
    fn build(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        policy: ScorePolicy,
        rows: &[RowResult],
    ) -> Self {
        let mut totals = BatchTotals {
            rows: rows.len(),
            ..BatchTotals::default()
        };
        let mut issues = Vec::new();

        for result in rows {
            let (kind, reason) = match &result.outcome {
                RowOutcome::Generated(_) => {
                    totals.generated += 1;
                    continue;
                }
                RowOutcome::Rejected(err) => {
                    totals.rejected += 1;
                    (IssueKind::Rejected, err.to_string())
                }
                RowOutcome::Failed(err) => {
                    totals.failed += 1;
                    (IssueKind::Failed, err.to_string())
                }
            };
            issues.push(RowIssue {
                row: result.row,
                name: result.name.clone(),
                kind,
                reason,
            });
        }

        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            score_policy: policy,
            totals,
            issues,
        }
    }
}

#[derive(Debug)]
pub struct BatchOutput {
    pub report: BatchReport,
    /// One entry per input row, in input order.
    pub rows: Vec<RowResult>,
}

impl BatchOutput {
    /// Output cells aligned with the input table.
    pub fn summaries(&self) -> Vec<GeneratedSummaries> {
        self.rows.iter().map(|r| r.outcome.summaries()).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedCandidate {
    pub row: usize,
    pub candidate: CandidateRecord,
    pub plan: SummaryPlan,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowRejection {
    pub row: usize,
    pub name: String,
    pub reason: String,
}

/// Deterministic plans for every valid row plus the rows that failed validation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanSet {
    pub plans: Vec<PlannedCandidate>,
    pub rejected: Vec<RowRejection>,
}

/// Validates and composes every row without calling the generation service.
pub fn plan_candidates(
    candidates: &[RawCandidate],
    table: &InterpretationTable,
) -> Result<PlanSet, BatchError> {
    let mut set = PlanSet::default();

    for (index, raw) in candidates.iter().enumerate() {
        let row = index + 1;
        match CandidateRecord::from_raw(raw) {
            Ok(candidate) => {
                let plan = compose(&candidate, table)?;
                set.plans.push(PlannedCandidate { row, candidate, plan });
            }
            Err(reason) => set.rejected.push(RowRejection {
                row,
                name: raw.name.trim().to_string(),
                reason: reason.to_string(),
            }),
        }
    }

    Ok(set)
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// A row that passed validation and composition and is ready for generation.
struct PreparedRow {
    index: usize,
    name: String,
    prompt: String,
}

/// Drives a batch: per-row isolation, ordered output, bounded concurrency.
pub struct Orchestrator {
    generator: Arc<dyn SummaryGenerator>,
    prompts: PromptBuilder,
    table: &'static InterpretationTable,
    options: BatchOptions,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn SummaryGenerator>,
        table: &'static InterpretationTable,
        options: BatchOptions,
    ) -> Result<Self, FragmentError> {
        let prompts = PromptBuilder::new(table)?;
        Ok(Self {
            generator,
            prompts,
            table,
            options,
        })
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub fn plan(&self, candidates: &[RawCandidate]) -> Result<PlanSet, BatchError> {
        plan_candidates(candidates, self.table)
    }

    /// Processes a batch. Only input-level rejection (under `RejectInput`) and
    /// integrity faults abort; every per-row failure lands in the report.
    pub async fn run(&self, candidates: Vec<RawCandidate>) -> Result<BatchOutput, BatchError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = candidates.len();

        info!(
            "Batch {run_id}: {total} rows, concurrency {}, policy {:?}",
            self.options.concurrency, self.options.score_policy
        );

        // ── Phase 1: validate + compose every row ──────────────────────────
        let mut outcomes: BTreeMap<usize, RowOutcome> = BTreeMap::new();
        let mut names: Vec<String> = Vec::with_capacity(total);
        let mut prepared: Vec<PreparedRow> = Vec::new();

        for (index, raw) in candidates.iter().enumerate() {
            let name = raw.name.trim().to_string();
            names.push(name.clone());

            let candidate = match CandidateRecord::from_raw(raw) {
                Ok(candidate) => candidate,
                Err(reason) => {
                    if reason.is_out_of_range()
                        && self.options.score_policy == ScorePolicy::RejectInput
                    {
                        return Err(BatchError::InputRejected {
                            row: index + 1,
                            name,
                            reason,
                        });
                    }
                    warn!("Row {} ({name}) rejected: {reason}", index + 1);
                    outcomes.insert(index, RowOutcome::Rejected(reason));
                    continue;
                }
            };

            let plan = compose(&candidate, self.table)?;
            prepared.push(PreparedRow {
                index,
                name,
                prompt: self.prompts.build(&candidate, &plan),
            });
        }

        // ── Phase 2: generation, at most `concurrency` in flight ───────────
        let pending = prepared.len();
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut join_set = JoinSet::new();

        for row in prepared {
            let generator = Arc::clone(&self.generator);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.options.timeout;

            join_set.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        generate_summaries(generator.as_ref(), &row.prompt, timeout, &row.name)
                            .await
                    }
                    Err(closed) => Err(GenerationError::Aborted(closed.to_string())),
                };
                (row.index, row.name, result)
            });
        }

        let mut completed = 0usize;
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, name, Ok(summaries))) => {
                    completed += 1;
                    info!("[{completed}/{pending}] Generated summaries for {name}");
                    outcomes.insert(index, RowOutcome::Generated(summaries));
                }
                Ok((index, name, Err(err))) => {
                    completed += 1;
                    warn!("[{completed}/{pending}] Generation failed for {name}: {err}");
                    outcomes.insert(index, RowOutcome::Failed(err));
                }
                // The row index is lost with the task; it is filled in below.
                Err(join_err) => error!("Generation task did not complete: {join_err}"),
            }
        }

        let rows: Vec<RowResult> = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let outcome = outcomes.remove(&index).unwrap_or_else(|| {
                    RowOutcome::Failed(GenerationError::Aborted(
                        "generation task panicked".to_string(),
                    ))
                });
                RowResult {
                    row: index + 1,
                    name,
                    outcome,
                }
            })
            .collect();

        let report = BatchReport::build(run_id, started_at, self.options.score_policy, &rows);
        info!(
            "Batch {run_id} finished: {} generated, {} rejected, {} failed (of {})",
            report.totals.generated,
            report.totals.rejected,
            report.totals.failed,
            report.totals.rows
        );

        Ok(BatchOutput { report, rows })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::LlmError;

    /// Echoes the candidate line of the prompt so tests can check row alignment.
    struct EchoGenerator {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        delay: Duration,
        fail_for: Option<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl EchoGenerator {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                delay: Duration::from_millis(0),
                fail_for: None,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    fn name_in(prompt: &str) -> String {
        let (_, tail) = prompt.rsplit_once("* **Name:** ").unwrap();
        tail.lines().next().unwrap().trim().to_string()
    }

    #[async_trait]
    impl SummaryGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<GeneratedSummaries, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());

            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let name = name_in(prompt);
            if self.fail_for == Some(name.as_str()) {
                return Err(LlmError::EmptyContent("SAFETY".to_string()));
            }
            Ok(GeneratedSummaries {
                summary_200: format!("{name} 200"),
                summary_150: format!("{name} 150"),
                summary_100: format!("{name} 100"),
            })
        }
    }

    fn raw(name: &str, level: &str, scores: [&str; 8]) -> RawCandidate {
        RawCandidate {
            name: name.to_string(),
            gender: "she/her".to_string(),
            level: level.to_string(),
            scores: scores.map(str::to_string),
        }
    }

    fn valid(name: &str) -> RawCandidate {
        raw(name, "Apply", ["4", "3.6", "3.9", "3", "3.8", "4.2", "5", "3.1"])
    }

    fn options(concurrency: usize, policy: ScorePolicy) -> BatchOptions {
        BatchOptions {
            concurrency,
            timeout: Duration::from_secs(30),
            score_policy: policy,
        }
    }

    fn orchestrator(generator: Arc<EchoGenerator>, options: BatchOptions) -> Orchestrator {
        Orchestrator::new(generator, InterpretationTable::global(), options).unwrap()
    }

    #[tokio::test]
    async fn test_out_of_range_row_rejected_batch_continues() {
        let generator = Arc::new(EchoGenerator::new());
        let orch = orchestrator(generator.clone(), options(1, ScorePolicy::RejectRow));

        let bad = raw("Over", "Apply", ["5.5", "3", "3", "3", "3", "3", "3", "3"]);
        let output = orch
            .run(vec![valid("Ada"), bad, valid("Grace")])
            .await
            .unwrap();

        assert_eq!(
            generator.calls.load(Ordering::SeqCst),
            2,
            "rejected row never reaches the generator"
        );
        assert_eq!(
            output.report.totals,
            BatchTotals { rows: 3, generated: 2, rejected: 1, failed: 0 }
        );

        let issue = &output.report.issues[0];
        assert_eq!((issue.row, issue.name.as_str(), issue.kind), (2, "Over", IssueKind::Rejected));
        assert!(issue.reason.contains("5.5"), "{}", issue.reason);

        let summaries = output.summaries();
        assert_eq!(summaries[0].summary_200, "Ada 200");
        assert_eq!(summaries[1], GeneratedSummaries::error_marker());
        assert_eq!(summaries[2].summary_100, "Grace 100");
    }

    #[tokio::test]
    async fn test_reject_input_policy_aborts_before_generation() {
        let generator = Arc::new(EchoGenerator::new());
        let orch = orchestrator(generator.clone(), options(1, ScorePolicy::RejectInput));

        let bad = raw("Over", "Apply", ["3", "3", "3", "3", "3", "3", "0.5", "3"]);
        let err = orch.run(vec![valid("Ada"), bad]).await.unwrap_err();

        assert!(matches!(err, BatchError::InputRejected { row: 2, .. }), "{err}");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reject_input_policy_still_tolerates_other_row_errors() {
        let generator = Arc::new(EchoGenerator::new());
        let orch = orchestrator(generator.clone(), options(1, ScorePolicy::RejectInput));

        let unknown_level = raw("Lin", "Lead", ["3", "3", "3", "3", "3", "3", "3", "3"]);
        let output = orch.run(vec![unknown_level, valid("Ada")]).await.unwrap();

        assert_eq!(output.report.totals.rejected, 1);
        assert_eq!(output.report.totals.generated, 1);
    }

    #[tokio::test]
    async fn test_generation_failure_is_isolated() {
        let mut echo = EchoGenerator::new();
        echo.fail_for = Some("Grace");
        let generator = Arc::new(echo);
        let orch = orchestrator(generator.clone(), options(1, ScorePolicy::RejectRow));

        let output = orch
            .run(vec![valid("Ada"), valid("Grace"), valid("Linus")])
            .await
            .unwrap();

        assert_eq!(output.report.totals.failed, 1);
        assert_eq!(output.report.totals.generated, 2);
        assert!(matches!(output.rows[1].outcome, RowOutcome::Failed(GenerationError::Llm(_))));
        assert_eq!(output.report.issues[0].kind, IssueKind::Failed);
        assert_eq!(output.summaries()[2].summary_150, "Linus 150");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_bounded_and_order_preserved() {
        let mut echo = EchoGenerator::new();
        echo.delay = Duration::from_secs(1);
        let generator = Arc::new(echo);
        let orch = orchestrator(generator.clone(), options(3, ScorePolicy::RejectRow));

        let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let output = orch.run(names.iter().map(|n| valid(n)).collect()).await.unwrap();

        assert_eq!(generator.peak.load(Ordering::SeqCst), 3);
        let got: Vec<String> = output.summaries().into_iter().map(|s| s.summary_200).collect();
        let expected: Vec<String> = names.iter().map(|n| format!("{n} 200")).collect();
        assert_eq!(got, expected);
        assert!(output.rows.iter().enumerate().all(|(i, r)| r.row == i + 1));
    }

    #[tokio::test]
    async fn test_sequential_by_default() {
        let generator = Arc::new(EchoGenerator::new());
        let orch = orchestrator(generator.clone(), options(1, ScorePolicy::RejectRow));
        orch.run(vec![valid("A"), valid("B"), valid("C")]).await.unwrap();
        assert_eq!(generator.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_marks_row_failed() {
        let mut echo = EchoGenerator::new();
        echo.delay = Duration::from_secs(600);
        let generator = Arc::new(echo);
        let orch = orchestrator(
            generator,
            BatchOptions {
                concurrency: 1,
                timeout: Duration::from_secs(10),
                score_policy: ScorePolicy::RejectRow,
            },
        );

        let output = orch.run(vec![valid("Slow")]).await.unwrap();
        assert!(matches!(output.rows[0].outcome, RowOutcome::Failed(GenerationError::Timeout(_))));
        assert_eq!(output.summaries()[0], GeneratedSummaries::error_marker());
    }

    #[tokio::test]
    async fn test_prompt_carries_selection_plan() {
        let generator = Arc::new(EchoGenerator::new());
        let orch = orchestrator(generator.clone(), options(1, ScorePolicy::RejectRow));
        orch.run(vec![valid("Sub")]).await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        let prompt = &prompts[0];
        let plan = compose(
            &CandidateRecord::from_raw(&valid("Sub")).unwrap(),
            InterpretationTable::global(),
        )
        .unwrap();
        assert!(prompt.contains(&plan.opening_sentence));
        assert!(plan.strengths.iter().all(|f| prompt.contains(f.text)));
    }

    #[test]
    fn test_plan_splits_valid_and_rejected() {
        let orch = orchestrator(Arc::new(EchoGenerator::new()), options(1, ScorePolicy::RejectRow));
        let nameless = raw("  ", "Apply", ["3", "3", "3", "3", "3", "3", "3", "3"]);
        let set = orch.plan(&[valid("Sub"), nameless]).unwrap();

        assert_eq!(set.plans.len(), 1);
        assert_eq!(set.plans[0].row, 1);
        assert_eq!(set.plans[0].plan.body.len(), 6);
        assert_eq!(set.rejected.len(), 1);
        assert_eq!(set.rejected[0].row, 2);
        assert_eq!(set.rejected[0].reason, "name is empty");

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["plans"][0]["candidate"]["name"], "Sub");
    }

    #[test]
    fn test_report_serializes_totals_and_issues() {
        let rows = vec![
            RowResult {
                row: 1,
                name: "Ada".to_string(),
                outcome: RowOutcome::Generated(GeneratedSummaries::error_marker()),
            },
            RowResult {
                row: 2,
                name: "Lin".to_string(),
                outcome: RowOutcome::Rejected(RowError::UnknownLevel("Lead".to_string())),
            },
        ];
        let report = BatchReport::build(Uuid::new_v4(), Utc::now(), ScorePolicy::RejectRow, &rows);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["score_policy"], "reject-row");
        assert_eq!(json["totals"]["rows"], 2);
        assert_eq!(json["totals"]["rejected"], 1);
        assert_eq!(json["issues"][0]["kind"], "rejected");
        assert_eq!(json["issues"][0]["row"], 2);
        assert!(report.finished_at >= report.started_at);
    }
}
