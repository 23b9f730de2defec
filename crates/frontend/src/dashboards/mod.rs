pub mod d400_sales_performance;

pub use d400_sales_performance::ui::SalesPerformanceDashboard;
