use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::batch::table::{write_template, InputTable};
use crate::batch::{plan_candidates, BatchOptions, BatchReport, Orchestrator, PlanSet, ScorePolicy};
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::routes;
use crate::scoring::interpretations::InterpretationTable;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "summarizer",
    about = "Turn leadership assessment scores into written candidate summaries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate summaries for every row of an input table
    Generate(GenerateArgs),
    /// Print the deterministic selection plans as JSON (no generation service needed)
    Plan(PlanArgs),
    /// Write a sample input table
    Template(TemplateArgs),
    /// Start the HTTP service
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Input table (CSV)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Output table (CSV): input columns plus the three summaries
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// Also write the batch report as JSON
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
    /// What an out-of-range score rejects
    #[arg(long, value_enum, default_value_t = ScorePolicy::RejectRow)]
    pub(crate) on_invalid_score: ScorePolicy,
    /// Maximum generations in flight (overrides BATCH_CONCURRENCY)
    #[arg(long)]
    pub(crate) concurrency: Option<usize>,
    /// Skip the model reachability check before the batch starts
    #[arg(long)]
    pub(crate) skip_preflight: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PlanArgs {
    /// Input table (CSV)
    #[arg(long)]
    pub(crate) input: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct TemplateArgs {
    /// Where to write the sample table
    #[arg(long, default_value = "sample_input.csv")]
    pub(crate) output: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// What an out-of-range score rejects
    #[arg(long, value_enum, default_value_t = ScorePolicy::RejectRow)]
    pub(crate) on_invalid_score: ScorePolicy,
    /// Skip the model reachability check at startup
    #[arg(long)]
    pub(crate) skip_preflight: bool,
}

pub(crate) async fn run(table: &'static InterpretationTable) -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => {
            let config = load_config()?;
            let client = connect(&config, !args.skip_preflight).await?;

            let mut options = BatchOptions::from_config(&config);
            if let Some(concurrency) = args.concurrency {
                options.concurrency = concurrency.max(1);
            }
            options.score_policy = args.on_invalid_score;

            let orchestrator = Orchestrator::new(Arc::new(client), table, options)?;
            generate(&args, &orchestrator).await.map(|_| ())
        }
        Command::Plan(args) => {
            let plans = plan(&args.input, table)?;
            let json = serde_json::to_string_pretty(&plans).map_err(anyhow::Error::from)?;
            println!("{json}");
            Ok(())
        }
        Command::Template(args) => {
            write_template(File::create(&args.output)?)?;
            info!("Sample input written to {}", args.output.display());
            Ok(())
        }
        Command::Serve(args) => {
            let config = load_config()?;
            let port = args.port.unwrap_or(config.port);
            let state = server_state(&config, &args, table).await?;
            routes::serve(state, port).await
        }
    }
}

/// Wires the HTTP state. The preflight runs here so a bad credential or an
/// unreachable service stops the process before it accepts requests.
pub(crate) async fn server_state(
    config: &Config,
    args: &ServeArgs,
    table: &'static InterpretationTable,
) -> Result<AppState, AppError> {
    let client = connect(config, !args.skip_preflight).await?;

    let mut options = BatchOptions::from_config(config);
    options.score_policy = args.on_invalid_score;

    let orchestrator = Orchestrator::new(Arc::new(client), table, options)?;
    Ok(AppState {
        orchestrator: Arc::new(orchestrator),
    })
}

fn load_config() -> Result<Config, AppError> {
    Config::from_env().map_err(|e| AppError::Configuration(format!("{e:#}")))
}

/// Builds the generation client and, when asked, checks that the configured
/// model is reachable with the configured credential.
async fn connect(config: &Config, preflight: bool) -> Result<LlmClient, AppError> {
    let client = LlmClient::new(config).map_err(|e| AppError::Configuration(e.to_string()))?;
    info!("LLM client initialized (model: {})", client.model());

    if preflight {
        client.check_model().await.map_err(|e| {
            AppError::Configuration(format!(
                "preflight check for model '{}' failed: {e}",
                client.model()
            ))
        })?;
        info!("Preflight check passed");
    }

    Ok(client)
}

/// Reads the input, runs the batch, and writes the output table (and report, if requested).
pub(crate) async fn generate(
    args: &GenerateArgs,
    orchestrator: &Orchestrator,
) -> Result<BatchReport, AppError> {
    let input = InputTable::from_path(&args.input)?;
    info!(
        "Read {} rows from {} (concurrency {})",
        input.len(),
        args.input.display(),
        orchestrator.options().concurrency
    );

    let output = orchestrator.run(input.candidates()).await?;

    input.write_output(BufWriter::new(File::create(&args.output)?), &output.summaries())?;
    info!("Output written to {}", args.output.display());

    if let Some(path) = &args.report {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &output.report).map_err(anyhow::Error::from)?;
        info!("Report written to {}", path.display());
    }

    Ok(output.report)
}

pub(crate) fn plan(input: &Path, table: &InterpretationTable) -> Result<PlanSet, AppError> {
    let input = InputTable::from_path(input)?;
    Ok(plan_candidates(&input.candidates(), table)?)
}
