use crate::dashboards::d400_sales_performance::ui::SalesPerformanceDashboard;
use leptos::prelude::*;

/// Single-page app: the sales dashboard is the only screen
#[component]
pub fn App() -> impl IntoView {
    view! {
        <SalesPerformanceDashboard />
    }
}
