use contracts::dashboards::d400_sales_performance::{
    FilterOptionsResponse, SalesDashboardResponse, SalesFilterRequest,
};

use super::aggregation::run_catalog;
use super::dataset::SalesDataset;
use super::filter::{apply, Selection};
use super::presentation::{build_kpis, build_panels};

pub const TITLE: &str = "Sales Performance Dashboard";
pub const SUBTITLE: &str = "Analyzing sales data to gain insights.";

/// Something that happened in the dashboard and needs a fresh render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Page opened, every value selected
    Opened,
    FilterChanged(SalesFilterRequest),
}

/// Run the whole pipeline for one event: filter, aggregate, present.
///
/// Nothing is kept between calls; the same dataset and the same event give
/// the same response.
pub fn dispatch(dataset: &SalesDataset, event: DashboardEvent) -> SalesDashboardResponse {
    let request = match event {
        DashboardEvent::Opened => SalesFilterRequest::default(),
        DashboardEvent::FilterChanged(request) => request,
    };

    let selection = Selection::resolve(dataset, &request);
    let view = apply(dataset, &selection.regions, &selection.categories);
    let aggregates = run_catalog(&view);

    tracing::info!(
        "D400 Dashboard: {} of {} rows for regions {:?}, categories {:?}",
        view.len(),
        dataset.len(),
        selection.regions,
        selection.categories
    );

    SalesDashboardResponse {
        title: TITLE.to_string(),
        subtitle: SUBTITLE.to_string(),
        filtered_rows: view.len(),
        total_rows: dataset.len(),
        kpis: build_kpis(&aggregates),
        panels: build_panels(&aggregates),
        selected_regions: selection.regions,
        selected_categories: selection.categories,
    }
}

/// Options and defaults of the two multi-selects
pub fn filter_options(dataset: &SalesDataset) -> FilterOptionsResponse {
    FilterOptionsResponse {
        regions: dataset.regions().to_vec(),
        categories: dataset.categories().to_vec(),
        total_rows: dataset.len(),
    }
}
