//! Axum route handlers for the Summary API.
//!
//! Both batch endpoints take the input table as a raw CSV request body.

use axum::{
    extract::State,
    http::{header, HeaderName},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::batch::table::{write_template, InputTable};
use crate::batch::PlanSet;
use crate::errors::AppError;
use crate::state::AppState;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const RUN_ID_HEADER: HeaderName = HeaderName::from_static("x-batch-run-id");

fn parse_body(body: &str) -> Result<InputTable, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("request body must be a CSV table".to_string()));
    }
    let table = InputTable::read(body.as_bytes())?;
    if table.is_empty() {
        return Err(AppError::Validation("table has no candidate rows".to_string()));
    }
    Ok(table)
}

/// GET /api/v1/template
///
/// Sample input table with the expected headers and two example candidates.
pub async fn handle_template() -> Result<impl IntoResponse, AppError> {
    let mut csv = Vec::new();
    write_template(&mut csv)?;

    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"sample_input.csv\"",
            ),
        ],
        csv,
    ))
}

/// POST /api/v1/plans
///
/// Validates every row and returns the deterministic selection plans.
/// Never calls the generation service.
pub async fn handle_plans(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<PlanSet>, AppError> {
    let table = parse_body(&body)?;
    let plans = state.orchestrator.plan(&table.candidates())?;
    Ok(Json(plans))
}

/// POST /api/v1/summaries
///
/// Full batch: returns the input table with the three summary columns appended.
/// Per-row failures are marked `Error` in the table, not returned as HTTP errors.
pub async fn handle_summaries(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let table = parse_body(&body)?;
    info!("Summary request with {} rows", table.len());

    let output = state.orchestrator.run(table.candidates()).await?;

    let mut csv = Vec::new();
    table.write_output(&mut csv, &output.summaries())?;

    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (RUN_ID_HEADER, output.report.run_id.to_string()),
        ],
        csv,
    ))
}
