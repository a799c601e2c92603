use std::path::PathBuf;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::auth;
use super::catalog;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::predict;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Router knobs that live outside the shared state
#[derive(Clone)]
pub struct RouterOptions {
    pub max_upload_bytes: usize,
    /// Serve stored uploads under `/uploads` from this directory
    pub uploads_dir: Option<PathBuf>,
    pub metrics: Option<PrometheusMetrics>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            uploads_dir: None,
            metrics: None,
        }
    }
}

/// Create the full router with application state
pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Public reads
        .route("/catalog", get(catalog::list_catalog))
        .route("/labels", get(catalog::list_labels))
        .route("/login", get(auth::login_hint))
        .nest("/auth", auth::create_auth_router())
        // Gated
        .route(
            "/predict",
            post(predict::predict).layer(DefaultBodyLimit::max(options.max_upload_bytes)),
        );

    if let Some(dir) = options.uploads_dir {
        router = router.nest_service("/uploads", ServeDir::new(dir));
    }

    let mut router = router.with_state(state);

    if let Some(metrics) = options.metrics {
        router = router.merge(create_metrics_router(metrics));
    }

    router
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(logging_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}
