use contracts::dashboards::d400_sales_performance::{Category, Region, SalesFilterRequest};
use std::collections::HashSet;

use super::dataset::{OrderRecord, SalesDataset};

/// Rows of the dataset matching the current selection, in dataset order.
/// Borrows the rows, never copies or mutates them.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a OrderRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[&'a OrderRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Selection after defaults were applied, in the order the user sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub regions: Vec<Region>,
    pub categories: Vec<Category>,
}

impl Selection {
    /// Resolve a request against the dataset domain.
    ///
    /// A missing dimension selects every value observed in the dataset;
    /// duplicates are dropped keeping the first occurrence.
    pub fn resolve(dataset: &SalesDataset, request: &SalesFilterRequest) -> Self {
        let regions = match &request.regions {
            Some(regions) => dedup(regions),
            None => dataset.regions().to_vec(),
        };
        let categories = match &request.categories {
            Some(categories) => dedup(categories),
            None => dataset.categories().to_vec(),
        };
        Self {
            regions,
            categories,
        }
    }
}

fn dedup<T: Copy + Eq + std::hash::Hash>(values: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    values.iter().copied().filter(|v| seen.insert(*v)).collect()
}

/// Keep the rows whose region AND category are both selected.
/// An empty selection in either dimension yields an empty view.
pub fn apply<'a>(
    dataset: &'a SalesDataset,
    regions: &[Region],
    categories: &[Category],
) -> FilteredView<'a> {
    if regions.is_empty() || categories.is_empty() {
        return FilteredView { rows: Vec::new() };
    }

    let regions: HashSet<Region> = regions.iter().copied().collect();
    let categories: HashSet<Category> = categories.iter().copied().collect();

    let rows = dataset
        .records()
        .iter()
        .filter(|r| regions.contains(&r.region) && categories.contains(&r.category))
        .collect();

    FilteredView { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_sales_performance::dataset::GeneratorSettings;

    fn dataset() -> SalesDataset {
        SalesDataset::generate(GeneratorSettings::default()).unwrap()
    }

    #[test]
    fn test_full_domain_yields_full_dataset() {
        let dataset = dataset();
        let view = apply(&dataset, dataset.regions(), dataset.categories());
        assert_eq!(view.len(), dataset.len());
        for (row, record) in view.rows().iter().zip(dataset.records()) {
            assert!(std::ptr::eq(*row, record));
        }
    }

    #[test]
    fn test_single_region_and_category() {
        let dataset = dataset();
        let view = apply(&dataset, &[Region::North], &[Category::Electronics]);
        assert!(!view.is_empty());
        for row in view.rows() {
            assert_eq!(row.region, Region::North);
            assert_eq!(row.category, Category::Electronics);
        }

        let expected = dataset
            .records()
            .iter()
            .filter(|r| r.region == Region::North && r.category == Category::Electronics)
            .count();
        assert_eq!(view.len(), expected);
    }

    #[test]
    fn test_view_is_ordered_subset_and_keeps_totals() {
        let dataset = dataset();
        let view = apply(
            &dataset,
            &[Region::South, Region::Central],
            &[Category::Books, Category::Clothing, Category::HomeGoods],
        );

        let mut last_id = 0;
        for row in view.rows() {
            assert!(dataset.records().iter().any(|r| std::ptr::eq(r, *row)));
            assert!(row.order_id > last_id);
            last_id = row.order_id;
            assert_eq!(row.total_price(), row.quantity as f64 * row.unit_price);
        }
    }

    #[test]
    fn test_empty_selection_yields_empty_view() {
        let dataset = dataset();
        assert!(apply(&dataset, &[], dataset.categories()).is_empty());
        assert!(apply(&dataset, dataset.regions(), &[]).is_empty());
        assert!(apply(&dataset, &[], &[]).is_empty());
    }

    #[test]
    fn test_resolve_applies_defaults_and_dedups() {
        let dataset = dataset();

        let all = Selection::resolve(&dataset, &SalesFilterRequest::default());
        assert_eq!(all.regions, dataset.regions());
        assert_eq!(all.categories, dataset.categories());

        let request = SalesFilterRequest {
            regions: Some(vec![Region::West, Region::North, Region::West]),
            categories: Some(vec![]),
        };
        let sel = Selection::resolve(&dataset, &request);
        assert_eq!(sel.regions, vec![Region::West, Region::North]);
        assert!(sel.categories.is_empty());
    }
}
