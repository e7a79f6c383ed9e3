use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::analyzer::Analyzer;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, FieldError};
use crate::metrics::{self, Metrics};
use crate::report::AnalyzeFeedResponse;
use crate::validate::{validate_request, RawAnalyzeRequest};

pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AnalyzerConfig>,
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(config: AnalyzerConfig) -> Self {
        let analyzer = Analyzer::from_config(&config);
        Self {
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(AnalyzerConfig::from_env()?))
    }
}

/// `/metrics` is only mounted with DEBUG_ROUTES=1.
fn debug_routes_enabled() -> bool {
    std::env::var(ENV_DEBUG_ROUTES).ok().as_deref() == Some("1")
}

pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze-feed", post(analyze_feed))
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if debug_routes_enabled() {
        router = router.merge(Metrics::init().router());
    }
    router
}

/// Alias kept for callers that prefer `api::router(state)`.
pub fn router(state: AppState) -> Router {
    create_router(state)
}

async fn analyze_feed(
    State(state): State<AppState>,
    payload: Result<Json<RawAnalyzeRequest>, JsonRejection>,
) -> Response {
    let raw = match payload {
        Ok(Json(raw)) => raw,
        Err(rejection) => {
            let err = AnalysisError::InvalidPayload(vec![FieldError::new(
                "body",
                rejection.body_text(),
            )]);
            return error_response(err);
        }
    };

    let req = match validate_request(raw, &state.config) {
        Ok(req) => req,
        Err(e) => return error_response(e),
    };

    let received = req.messages.len();
    let analyzer = state.analyzer.clone();
    let joined = tokio::task::spawn_blocking(move || analyzer.analyze(&req)).await;

    match joined {
        Ok(Ok(report)) => {
            metrics::record_analysis(&report, received);
            info!(
                target: "api",
                messages = received,
                ms = report.processing_time_ms,
                anomaly = report.anomaly_detected,
                "analyze-feed ok"
            );
            Json(AnalyzeFeedResponse { analysis: report }).into_response()
        }
        Ok(Err(e)) => error_response(e),
        Err(join_err) => {
            error!(target: "api", error = %join_err, "analysis task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal error", "code": "INTERNAL_ERROR" })),
            )
                .into_response()
        }
    }
}

fn error_response(err: AnalysisError) -> Response {
    metrics::record_rejection(err.code());
    match err {
        AnalysisError::InvalidPayload(details) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Invalid payload. Check the submitted fields.",
                "code": "INVALID_PAYLOAD",
                "details": details,
            })),
        )
            .into_response(),
        AnalysisError::UnsupportedTimeWindow { minutes } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": format!("Time window of {minutes} minutes is not supported in the current version"),
                "code": "UNSUPPORTED_TIME_WINDOW",
            })),
        )
            .into_response(),
        AnalysisError::ContractBreach { reason } => {
            error!(target: "api", %reason, "analyzer contract breach");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal error", "code": "INTERNAL_ERROR" })),
            )
                .into_response()
        }
    }
}
