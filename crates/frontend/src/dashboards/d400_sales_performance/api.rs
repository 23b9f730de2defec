use contracts::dashboards::d400_sales_performance::{
    Branding, FilterOptionsResponse, SalesDashboardResponse, SalesFilterRequest,
};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

const API_BASE: &str = "/api/d400";

/// Regions and categories available for filtering
pub async fn get_filter_options() -> Result<FilterOptionsResponse, String> {
    let url = api_url(&format!("{}/filters", API_BASE));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Runs the dashboard pipeline for the given selection
pub async fn get_sales_performance(
    filter: &SalesFilterRequest,
) -> Result<SalesDashboardResponse, String> {
    let url = api_url(&format!("{}/sales_performance", API_BASE));

    let response = Request::post(&url)
        .json(filter)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Sidebar logo, or the notice to show in its place
pub async fn get_branding() -> Result<Branding, String> {
    let url = api_url(&format!("{}/branding", API_BASE));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
