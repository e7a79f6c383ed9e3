//! Feed Analyzer: Binary Entrypoint
//! Boots the Axum HTTP server through the Shuttle runtime.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up ANALYZER_CONFIG_PATH / ANALYZER_TRENDING_LIMIT / DEBUG_ROUTES.
    let _ = dotenvy::dotenv();

    // No-op unless ANALYZER_DEV_LOG=1 in a dev environment.
    feed_analyzer::telemetry::init_dev_tracing();

    let router = feed_analyzer::app().await?;
    tracing::info!(target: "api", "feed analyzer router ready");

    Ok(router.into())
}
