use axum::{routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::api::handlers;
use crate::dashboards::d400_sales_performance::dataset::SalesDataset;

/// State shared by every request. The dataset is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<SalesDataset>,
    pub logo_path: PathBuf,
}

/// All application routes
pub fn configure_routes(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D400 SALES PERFORMANCE DASHBOARD
        // ========================================
        .route(
            "/api/d400/filters",
            get(handlers::d400_sales_performance::get_filter_options),
        )
        .route(
            "/api/d400/sales_performance",
            get(handlers::d400_sales_performance::get_sales_performance)
                .post(handlers::d400_sales_performance::post_sales_performance),
        )
        .route(
            "/api/d400/branding",
            get(handlers::d400_sales_performance::get_branding),
        )
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}
