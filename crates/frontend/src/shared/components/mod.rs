pub mod kpi_card;
pub mod multi_select;

pub use kpi_card::KpiCard;
pub use multi_select::MultiSelect;
