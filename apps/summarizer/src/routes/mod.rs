pub mod health;

use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::errors::AppError;
use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/template", get(handlers::handle_template))
        .route("/api/v1/plans", post(handlers::handle_plans))
        .route("/api/v1/summaries", post(handlers::handle_summaries))
        .with_state(state)
}

/// Binds `0.0.0.0:port` and serves until the process is stopped.
pub async fn serve(state: AppState, port: u16) -> Result<(), AppError> {
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once a browser client exists

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
