use serde::{Deserialize, Serialize};
use std::fmt;

use super::chart::Panel;

/// Sales region of an order.
///
/// Variants are declared alphabetically so the derived `Ord` matches the
/// display order used by grouped charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Central,
    East,
    North,
    South,
    West,
}

impl Region {
    /// Generation order of the synthetic dataset
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::South,
        Region::East,
        Region::West,
        Region::Central,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Central => "Central",
            Region::East => "East",
            Region::North => "North",
            Region::South => "South",
            Region::West => "West",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product category of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Books,
    Clothing,
    Electronics,
    #[serde(rename = "Home Goods")]
    HomeGoods,
}

impl Category {
    /// Generation order of the synthetic dataset
    pub const ALL: [Category; 4] = [
        Category::Electronics,
        Category::Clothing,
        Category::HomeGoods,
        Category::Books,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Books => "Books",
            Category::Clothing => "Clothing",
            Category::Electronics => "Electronics",
            Category::HomeGoods => "Home Goods",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter sent by the dashboard on every selection change.
///
/// `None` selects the full observed domain, `Some(vec![])` selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesFilterRequest {
    #[serde(default)]
    pub regions: Option<Vec<Region>>,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

impl SalesFilterRequest {
    pub fn new(regions: Vec<Region>, categories: Vec<Category>) -> Self {
        Self {
            regions: Some(regions),
            categories: Some(categories),
        }
    }
}

/// Values available in the two multi-selects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    /// Regions in order of first appearance in the dataset
    pub regions: Vec<Region>,
    /// Categories in order of first appearance in the dataset
    pub categories: Vec<Category>,
    pub total_rows: usize,
}

/// How to format a KPI value on the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueFormat {
    Money { currency: String },
    Integer,
}

/// A single scalar indicator shown above the tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiValue {
    /// Query id the value was computed by (e.g. "total_sales")
    pub id: String,
    pub label: String,
    /// Raw value, `None` when the filtered view has no rows to reduce
    pub value: Option<f64>,
    /// Value already formatted for display ("$1,234.56", "42")
    pub display: String,
    pub format: ValueFormat,
}

/// Full render output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesDashboardResponse {
    pub title: String,
    pub subtitle: String,
    /// Selection the response was computed for, after defaults were applied
    pub selected_regions: Vec<Region>,
    pub selected_categories: Vec<Category>,
    /// Rows in the filtered view
    pub filtered_rows: usize,
    pub total_rows: usize,
    pub kpis: Vec<KpiValue>,
    pub panels: Vec<Panel>,
}

/// Optional sidebar logo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Branding {
    Logo { mime: String, data_base64: String },
    Missing { notice: String },
}

impl Branding {
    /// `data:` URL usable as an `<img src>`
    pub fn data_url(&self) -> Option<String> {
        match self {
            Branding::Logo { mime, data_base64 } => {
                Some(format!("data:{};base64,{}", mime, data_base64))
            }
            Branding::Missing { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_uses_display_name_on_the_wire() {
        let json = serde_json::to_string(&Category::HomeGoods).unwrap();
        assert_eq!(json, "\"Home Goods\"");
        let back: Category = serde_json::from_str("\"Home Goods\"").unwrap();
        assert_eq!(back, Category::HomeGoods);
    }

    #[test]
    fn test_missing_selection_defaults_to_none() {
        let req: SalesFilterRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.regions, None);
        assert_eq!(req.categories, None);

        let req: SalesFilterRequest =
            serde_json::from_str(r#"{"regions": [], "categories": ["Books"]}"#).unwrap();
        assert_eq!(req.regions, Some(vec![]));
        assert_eq!(req.categories, Some(vec![Category::Books]));
    }

    #[test]
    fn test_derived_order_is_alphabetical() {
        let mut regions = Region::ALL.to_vec();
        regions.sort();
        let names: Vec<&str> = regions.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["Central", "East", "North", "South", "West"]);

        let mut categories = Category::ALL.to_vec();
        categories.sort();
        let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["Books", "Clothing", "Electronics", "Home Goods"]);
    }
}
