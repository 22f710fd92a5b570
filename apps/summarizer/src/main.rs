mod batch;
mod cli;
mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::scoring::interpretations::InterpretationTable;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize structured logging. stderr keeps stdout clean for `plan` output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=info,tower_http=info", env!("CARGO_PKG_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting summarizer v{}", env!("CARGO_PKG_VERSION"));

    // An incomplete interpretation table is fatal before any input is read.
    let table = InterpretationTable::global();
    table.verify()?;
    info!("Interpretation table loaded ({} fragments)", table.len());

    cli::run(table).await?;

    Ok(())
}
