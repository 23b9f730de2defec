use axum::{extract::State, Json};
use contracts::dashboards::d400_sales_performance::{
    Branding, FilterOptionsResponse, SalesDashboardResponse, SalesFilterRequest,
};

use crate::dashboards::d400_sales_performance::service::{self, DashboardEvent};
use crate::routes::AppState;
use crate::shared::branding::load_branding;

/// GET /api/d400/filters
pub async fn get_filter_options(State(state): State<AppState>) -> Json<FilterOptionsResponse> {
    Json(service::filter_options(&state.dataset))
}

/// GET /api/d400/sales_performance
pub async fn get_sales_performance(
    State(state): State<AppState>,
) -> Json<SalesDashboardResponse> {
    tracing::info!("D400 Dashboard: opened with default filters");
    Json(service::dispatch(&state.dataset, DashboardEvent::Opened))
}

/// POST /api/d400/sales_performance
pub async fn post_sales_performance(
    State(state): State<AppState>,
    Json(request): Json<SalesFilterRequest>,
) -> Json<SalesDashboardResponse> {
    Json(service::dispatch(
        &state.dataset,
        DashboardEvent::FilterChanged(request),
    ))
}

/// GET /api/d400/branding
///
/// The logo is re-read on every call so it can be dropped in without a restart.
pub async fn get_branding(State(state): State<AppState>) -> Json<Branding> {
    Json(load_branding(&state.logo_path))
}
