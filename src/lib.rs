// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod report;
pub mod telemetry;
pub mod validate;

// Analysis pipeline: text primitives, classifier, ranker, influence, anomalies, orchestrator
pub mod analyzer;
pub mod anomaly;
pub mod feed;
pub mod influence;
pub mod sentiment;
pub mod text;
pub mod trending;

// ---- Re-exports for stable public API ----
pub use crate::analyzer::Analyzer;
pub use crate::api::{router, AppState};
pub use crate::error::AnalysisError;
pub use crate::feed::{AnalysisRequest, Message};
pub use crate::report::AnalysisReport;

use axum::Router;

/// Build the full in-process app (config from env/file, router, optional debug routes).
/// Used by the binary and by integration tests, no sockets involved.
pub async fn app() -> anyhow::Result<Router> {
    let state = AppState::from_env()?;
    Ok(api::create_router(state))
}
