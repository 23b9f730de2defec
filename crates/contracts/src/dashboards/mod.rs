pub mod d400_sales_performance;
