//! Fixed catalog of group-by + reduce queries over a filtered view.
//!
//! Every query is a pure function of the view. Sums and counts over an empty
//! view are zero; means and histograms return `None` so that "no data" is
//! explicit instead of a NaN.

use chrono::NaiveDate;
use contracts::dashboards::d400_sales_performance::{Category, HistogramBin, Region};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::filter::FilteredView;

/// How many products the top lists keep
pub const TOP_PRODUCTS: usize = 10;

/// Fixed-width bins of the unit price histogram
pub const HISTOGRAM_BINS: usize = 20;

/// Names of the queries in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryId {
    TotalSales,
    AverageOrderValue,
    TotalOrders,
    DailySales,
    DailySalesByCategory,
    SalesByRegion,
    SalesByCategoryAndRegion,
    SalesByCategory,
    CategoryShare,
    TopProductsBySales,
    TopProductsByQuantity,
    CustomerSpending,
    CustomerOrderCount,
    UnitPriceHistogram,
}

impl QueryId {
    pub const ALL: [QueryId; 14] = [
        QueryId::TotalSales,
        QueryId::AverageOrderValue,
        QueryId::TotalOrders,
        QueryId::DailySales,
        QueryId::DailySalesByCategory,
        QueryId::SalesByRegion,
        QueryId::SalesByCategoryAndRegion,
        QueryId::SalesByCategory,
        QueryId::CategoryShare,
        QueryId::TopProductsBySales,
        QueryId::TopProductsByQuantity,
        QueryId::CustomerSpending,
        QueryId::CustomerOrderCount,
        QueryId::UnitPriceHistogram,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QueryId::TotalSales => "total_sales",
            QueryId::AverageOrderValue => "average_order_value",
            QueryId::TotalOrders => "total_orders",
            QueryId::DailySales => "daily_sales",
            QueryId::DailySalesByCategory => "daily_sales_by_category",
            QueryId::SalesByRegion => "sales_by_region",
            QueryId::SalesByCategoryAndRegion => "sales_by_category_and_region",
            QueryId::SalesByCategory => "sales_by_category",
            QueryId::CategoryShare => "category_share",
            QueryId::TopProductsBySales => "top_products_by_sales",
            QueryId::TopProductsByQuantity => "top_products_by_quantity",
            QueryId::CustomerSpending => "customer_spending",
            QueryId::CustomerOrderCount => "customer_order_count",
            QueryId::UnitPriceHistogram => "unit_price_histogram",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDailySeries {
    pub category: Category,
    /// Only dates with at least one order of this category, ascending
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub sales: f64,
    /// Fraction of the total over present categories
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub product: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuantity {
    pub product: String,
    pub quantity: u64,
}

/// One row per customer present in the view
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerStat {
    pub customer_id: u32,
    pub total_spending: f64,
    pub order_count: u64,
}

/// Output of one full catalog run. Built per render and dropped after it.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesAggregates {
    pub total_sales: f64,
    pub average_order_value: Option<f64>,
    pub total_orders: u64,
    pub daily_sales: Vec<(NaiveDate, f64)>,
    pub daily_sales_by_category: Vec<CategoryDailySeries>,
    pub sales_by_region: Vec<(Region, f64)>,
    pub sales_by_category_and_region: Vec<(Category, Region, f64)>,
    pub sales_by_category: Vec<(Category, f64)>,
    pub category_share: Option<Vec<CategoryShare>>,
    pub top_products_by_sales: Vec<ProductSales>,
    pub top_products_by_quantity: Vec<ProductQuantity>,
    pub customers: Vec<CustomerStat>,
    pub unit_price_histogram: Option<Vec<HistogramBin>>,
}

/// Run every query of the catalog against the view
pub fn run_catalog(view: &FilteredView<'_>) -> SalesAggregates {
    let sales_by_category = sales_by_category(view);
    let category_share = category_share(&sales_by_category);

    let aggregates = SalesAggregates {
        total_sales: total_sales(view),
        average_order_value: average_order_value(view),
        total_orders: total_orders(view),
        daily_sales: daily_sales(view),
        daily_sales_by_category: daily_sales_by_category(view),
        sales_by_region: sales_by_region(view),
        sales_by_category_and_region: sales_by_category_and_region(view),
        sales_by_category,
        category_share,
        top_products_by_sales: top_products_by_sales(view),
        top_products_by_quantity: top_products_by_quantity(view),
        customers: customer_stats(view),
        unit_price_histogram: unit_price_histogram(view),
    };

    tracing::debug!(
        "D400 aggregation: {} queries over {} rows",
        QueryId::ALL.len(),
        view.len()
    );
    aggregates
}

pub fn total_sales(view: &FilteredView<'_>) -> f64 {
    view.rows().iter().map(|r| r.total_price()).sum()
}

pub fn average_order_value(view: &FilteredView<'_>) -> Option<f64> {
    if view.is_empty() {
        return None;
    }
    Some(total_sales(view) / view.len() as f64)
}

/// Count of distinct order ids
pub fn total_orders(view: &FilteredView<'_>) -> u64 {
    view.rows()
        .iter()
        .map(|r| r.order_id)
        .collect::<HashSet<_>>()
        .len() as u64
}

pub fn daily_sales(view: &FilteredView<'_>) -> Vec<(NaiveDate, f64)> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in view.rows() {
        *by_date.entry(row.date).or_insert(0.0) += row.total_price();
    }
    by_date.into_iter().collect()
}

pub fn daily_sales_by_category(view: &FilteredView<'_>) -> Vec<CategoryDailySeries> {
    let mut by_key: BTreeMap<(Category, NaiveDate), f64> = BTreeMap::new();
    for row in view.rows() {
        *by_key.entry((row.category, row.date)).or_insert(0.0) += row.total_price();
    }

    let mut series: Vec<CategoryDailySeries> = Vec::new();
    for ((category, date), sales) in by_key {
        if let Some(last) = series.last_mut().filter(|s| s.category == category) {
            last.points.push((date, sales));
            continue;
        }
        series.push(CategoryDailySeries {
            category,
            points: vec![(date, sales)],
        });
    }
    series
}

pub fn sales_by_region(view: &FilteredView<'_>) -> Vec<(Region, f64)> {
    let mut by_region: BTreeMap<Region, f64> = BTreeMap::new();
    for row in view.rows() {
        *by_region.entry(row.region).or_insert(0.0) += row.total_price();
    }
    by_region.into_iter().collect()
}

pub fn sales_by_category_and_region(view: &FilteredView<'_>) -> Vec<(Category, Region, f64)> {
    let mut by_key: BTreeMap<(Category, Region), f64> = BTreeMap::new();
    for row in view.rows() {
        *by_key.entry((row.category, row.region)).or_insert(0.0) += row.total_price();
    }
    by_key
        .into_iter()
        .map(|((category, region), sales)| (category, region, sales))
        .collect()
}

pub fn sales_by_category(view: &FilteredView<'_>) -> Vec<(Category, f64)> {
    let mut by_category: BTreeMap<Category, f64> = BTreeMap::new();
    for row in view.rows() {
        *by_category.entry(row.category).or_insert(0.0) += row.total_price();
    }
    by_category.into_iter().collect()
}

/// Shares of the per-category sums; `None` when there is nothing to divide
pub fn category_share(sales_by_category: &[(Category, f64)]) -> Option<Vec<CategoryShare>> {
    let total: f64 = sales_by_category.iter().map(|(_, sales)| sales).sum();
    if sales_by_category.is_empty() || total <= 0.0 {
        return None;
    }
    Some(
        sales_by_category
            .iter()
            .map(|(category, sales)| CategoryShare {
                category: *category,
                sales: *sales,
                share: sales / total,
            })
            .collect(),
    )
}

/// Group by product keeping the order in which products first appear
fn group_by_product<T, F>(view: &FilteredView<'_>, value: F) -> Vec<(String, T)>
where
    T: Copy + Default + std::ops::AddAssign,
    F: Fn(&super::dataset::OrderRecord) -> T,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, T)> = Vec::new();
    for row in view.rows() {
        let slot = *index.entry(row.product.as_str()).or_insert_with(|| {
            groups.push((row.product.clone(), T::default()));
            groups.len() - 1
        });
        groups[slot].1 += value(*row);
    }
    groups
}

/// Top products by summed total price. Stable sort, so equal sums keep
/// first-appearance order.
pub fn top_products_by_sales(view: &FilteredView<'_>) -> Vec<ProductSales> {
    let mut groups = group_by_product(view, |r| r.total_price());
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups
        .into_iter()
        .take(TOP_PRODUCTS)
        .map(|(product, sales)| ProductSales { product, sales })
        .collect()
}

/// Top products by summed quantity, ranked independently of sales
pub fn top_products_by_quantity(view: &FilteredView<'_>) -> Vec<ProductQuantity> {
    let mut groups = group_by_product(view, |r| r.quantity as u64);
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
        .into_iter()
        .take(TOP_PRODUCTS)
        .map(|(product, quantity)| ProductQuantity { product, quantity })
        .collect()
}

/// Total spending and distinct order count per customer, by customer id
pub fn customer_stats(view: &FilteredView<'_>) -> Vec<CustomerStat> {
    let mut by_customer: BTreeMap<u32, (f64, HashSet<u64>)> = BTreeMap::new();
    for row in view.rows() {
        let entry = by_customer
            .entry(row.customer_id)
            .or_insert_with(|| (0.0, HashSet::new()));
        entry.0 += row.total_price();
        entry.1.insert(row.order_id);
    }
    by_customer
        .into_iter()
        .map(|(customer_id, (total_spending, orders))| CustomerStat {
            customer_id,
            total_spending,
            order_count: orders.len() as u64,
        })
        .collect()
}

/// Unit price histogram with bins spanning the observed min/max of the view.
///
/// The last bin is closed so the maximum is counted. A single distinct price
/// collapses to one bin.
pub fn unit_price_histogram(view: &FilteredView<'_>) -> Option<Vec<HistogramBin>> {
    let prices: Vec<f64> = view.rows().iter().map(|r| r.unit_price).collect();
    if prices.is_empty() {
        return None;
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return Some(vec![HistogramBin {
            start: min,
            end: max,
            count: prices.len() as u64,
        }]);
    }

    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut counts = [0u64; HISTOGRAM_BINS];
    for price in &prices {
        let idx = (((price - min) / width).floor() as usize).min(HISTOGRAM_BINS - 1);
        counts[idx] += 1;
    }

    Some(
        counts
            .iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + width * i as f64,
                end: if i == HISTOGRAM_BINS - 1 {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: *count,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_sales_performance::dataset::tests::record;
    use crate::dashboards::d400_sales_performance::dataset::{GeneratorSettings, SalesDataset};
    use crate::dashboards::d400_sales_performance::filter::apply;

    fn generated() -> SalesDataset {
        SalesDataset::generate(GeneratorSettings::default()).unwrap()
    }

    fn small() -> SalesDataset {
        SalesDataset::from_records(vec![
            record(1, "2023-01-02", Region::North, Category::Books, "Product_3", 2, 10.0, 100),
            record(2, "2023-01-01", Region::South, Category::Books, "Product_1", 1, 50.0, 101),
            record(3, "2023-01-01", Region::North, Category::Clothing, "Product_2", 5, 4.0, 100),
            record(4, "2023-01-02", Region::West, Category::Clothing, "Product_1", 1, 30.0, 102),
            record(5, "2023-01-03", Region::North, Category::Books, "Product_2", 9, 1.0, 100),
        ])
        .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn test_catalog_has_fourteen_distinct_queries() {
        let names: HashSet<&str> = QueryId::ALL.iter().map(|q| q.name()).collect();
        assert_eq!(names.len(), 14);
    }

    #[test]
    fn test_catalog_run_logs_once() {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Buffer {
            fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(bytes);
                Ok(bytes.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let ds = small();
        let view = apply(&ds, ds.regions(), ds.categories());
        tracing::subscriber::with_default(subscriber, || run_catalog(&view));

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("D400 aggregation:").count(), 1);
        assert!(output.contains("14 queries over 5 rows"));
    }

    #[test]
    fn test_kpis_on_small_view() {
        let ds = small();
        let view = apply(&ds, ds.regions(), ds.categories());
        assert_eq!(total_sales(&view), 20.0 + 50.0 + 20.0 + 30.0 + 9.0);
        assert_eq!(average_order_value(&view), Some(129.0 / 5.0));
        assert_eq!(total_orders(&view), 5);
    }

    #[test]
    fn test_daily_sales_sorted_by_date() {
        let ds = small();
        let view = apply(&ds, ds.regions(), ds.categories());
        let daily = daily_sales(&view);
        let dates: Vec<String> = daily.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(dates, vec!["2023-01-01", "2023-01-02", "2023-01-03"]);
        assert_eq!(daily[0].1, 70.0);
        assert_eq!(daily[1].1, 50.0);
        assert_eq!(daily[2].1, 9.0);
    }

    #[test]
    fn test_daily_sales_by_category_has_no_zero_fill() {
        let ds = small();
        let view = apply(&ds, ds.regions(), ds.categories());
        let series = daily_sales_by_category(&view);
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].category, Category::Books);
        assert_eq!(series[0].points.len(), 3);

        // Clothing has orders on 01-01 and 01-02 only
        assert_eq!(series[1].category, Category::Clothing);
        let dates: Vec<String> = series[1].points.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(dates, vec!["2023-01-01", "2023-01-02"]);
    }

    #[test]
    fn test_region_bars_omit_absent_regions() {
        let ds = small();
        let view = apply(&ds, ds.regions(), ds.categories());
        let regions: Vec<Region> = sales_by_region(&view).into_iter().map(|(r, _)| r).collect();
        assert_eq!(regions, vec![Region::North, Region::South, Region::West]);

        let pairs = sales_by_category_and_region(&view);
        assert_eq!(
            pairs,
            vec![
                (Category::Books, Region::North, 29.0),
                (Category::Books, Region::South, 50.0),
                (Category::Clothing, Region::North, 20.0),
                (Category::Clothing, Region::West, 30.0),
            ]
        );
    }

    #[test]
    fn test_category_sum_matches_total_sales() {
        let ds = generated();
        let selections: Vec<(Vec<Region>, Vec<Category>)> = vec![
            (ds.regions().to_vec(), ds.categories().to_vec()),
            (vec![Region::North], vec![Category::Electronics]),
            (vec![Region::East, Region::West], vec![Category::Books, Category::HomeGoods]),
            (vec![], ds.categories().to_vec()),
        ];
        for (regions, categories) in selections {
            let view = apply(&ds, &regions, &categories);
            let by_category: f64 = sales_by_category(&view).iter().map(|(_, s)| s).sum();
            assert!(close(by_category, total_sales(&view)));

            if let Some(shares) = category_share(&sales_by_category(&view)) {
                let total_share: f64 = shares.iter().map(|s| s.share).sum();
                assert!(close(total_share, 1.0));
            }
        }
    }

    #[test]
    fn test_top_products_tie_break_keeps_first_appearance() {
        let ds = SalesDataset::from_records(vec![
            record(1, "2023-01-01", Region::North, Category::Books, "Product_9", 1, 10.0, 100),
            record(2, "2023-01-01", Region::North, Category::Books, "Product_4", 2, 5.0, 100),
            record(3, "2023-01-01", Region::North, Category::Books, "Product_7", 1, 30.0, 100),
        ])
        .unwrap();
        let view = apply(&ds, ds.regions(), ds.categories());

        let by_sales: Vec<String> = top_products_by_sales(&view).into_iter().map(|p| p.product).collect();
        assert_eq!(by_sales, vec!["Product_7", "Product_9", "Product_4"]);

        let by_quantity: Vec<String> =
            top_products_by_quantity(&view).into_iter().map(|p| p.product).collect();
        assert_eq!(by_quantity, vec!["Product_4", "Product_9", "Product_7"]);
    }

    #[test]
    fn test_top_lists_are_ranked_independently() {
        let ds = generated();
        let view = apply(&ds, ds.regions(), ds.categories());
        let by_sales = top_products_by_sales(&view);
        let by_quantity = top_products_by_quantity(&view);
        assert_eq!(by_sales.len(), TOP_PRODUCTS);
        assert_eq!(by_quantity.len(), TOP_PRODUCTS);

        for pair in by_sales.windows(2) {
            assert!(pair[0].sales >= pair[1].sales);
        }
        for pair in by_quantity.windows(2) {
            assert!(pair[0].quantity >= pair[1].quantity);
        }

        // Each list is the true top 10 of its own measure
        let all_sales = group_by_product(&view, |r| r.total_price());
        let tenth = by_sales[TOP_PRODUCTS - 1].sales;
        assert!(all_sales
            .iter()
            .filter(|(p, _)| !by_sales.iter().any(|s| &s.product == p))
            .all(|(_, s)| *s <= tenth));

        let all_quantity = group_by_product(&view, |r| r.quantity as u64);
        let tenth = by_quantity[TOP_PRODUCTS - 1].quantity;
        assert!(all_quantity
            .iter()
            .filter(|(p, _)| !by_quantity.iter().any(|q| &q.product == p))
            .all(|(_, q)| *q <= tenth));
    }

    #[test]
    fn test_customer_stats() {
        let ds = small();
        let view = apply(&ds, ds.regions(), ds.categories());
        let customers = customer_stats(&view);
        assert_eq!(
            customers,
            vec![
                CustomerStat { customer_id: 100, total_spending: 49.0, order_count: 3 },
                CustomerStat { customer_id: 101, total_spending: 50.0, order_count: 1 },
                CustomerStat { customer_id: 102, total_spending: 30.0, order_count: 1 },
            ]
        );
    }

    #[test]
    fn test_histogram_spans_observed_range() {
        let ds = generated();
        let view = apply(&ds, &[Region::East], &[Category::Clothing]);
        let bins = unit_price_histogram(&view).unwrap();
        assert_eq!(bins.len(), HISTOGRAM_BINS);

        let min = view.rows().iter().map(|r| r.unit_price).fold(f64::INFINITY, f64::min);
        let max = view.rows().iter().map(|r| r.unit_price).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(bins[0].start, min);
        assert_eq!(bins[HISTOGRAM_BINS - 1].end, max);

        let counted: u64 = bins.iter().map(|b| b.count).sum();
        assert_eq!(counted, view.len() as u64);

        let width = bins[0].end - bins[0].start;
        for bin in &bins[..HISTOGRAM_BINS - 1] {
            assert!(close(bin.end - bin.start, width));
        }
    }

    #[test]
    fn test_histogram_single_price() {
        let ds = SalesDataset::from_records(vec![
            record(1, "2023-01-01", Region::North, Category::Books, "Product_1", 1, 25.0, 100),
            record(2, "2023-01-02", Region::North, Category::Books, "Product_1", 3, 25.0, 100),
        ])
        .unwrap();
        let view = apply(&ds, ds.regions(), ds.categories());
        let bins = unit_price_histogram(&view).unwrap();
        assert_eq!(bins, vec![HistogramBin { start: 25.0, end: 25.0, count: 2 }]);
    }

    #[test]
    fn test_empty_view_reports_no_data() {
        let ds = generated();
        let view = apply(&ds, &[], ds.categories());
        let result = run_catalog(&view);

        assert_eq!(result.total_sales, 0.0);
        assert_eq!(result.average_order_value, None);
        assert_eq!(result.total_orders, 0);
        assert!(result.daily_sales.is_empty());
        assert!(result.daily_sales_by_category.is_empty());
        assert!(result.sales_by_region.is_empty());
        assert!(result.sales_by_category_and_region.is_empty());
        assert!(result.sales_by_category.is_empty());
        assert_eq!(result.category_share, None);
        assert!(result.top_products_by_sales.is_empty());
        assert!(result.top_products_by_quantity.is_empty());
        assert!(result.customers.is_empty());
        assert_eq!(result.unit_price_histogram, None);
    }

    #[test]
    fn test_north_electronics_total_matches_rows() {
        let ds = generated();
        let view = apply(&ds, &[Region::North], &[Category::Electronics]);
        let expected: f64 = ds
            .records()
            .iter()
            .filter(|r| r.region == Region::North && r.category == Category::Electronics)
            .map(|r| r.total_price())
            .sum();
        assert_eq!(run_catalog(&view).total_sales, expected);
    }

    #[test]
    fn test_full_selection_matches_unfiltered_kpis() {
        let ds = generated();
        let view = apply(&ds, ds.regions(), ds.categories());
        let result = run_catalog(&view);

        let total: f64 = ds.records().iter().map(|r| r.total_price()).sum();
        assert_eq!(result.total_sales, total);
        assert_eq!(result.average_order_value, Some(total / ds.len() as f64));
        assert_eq!(result.total_orders, ds.len() as u64);
    }

    #[test]
    fn test_rerun_is_bit_identical() {
        let ds = generated();
        let regions = [Region::South, Region::North];
        let categories = [Category::Books, Category::Electronics];
        let first = run_catalog(&apply(&ds, &regions, &categories));
        let second = run_catalog(&apply(&ds, &regions, &categories));
        assert_eq!(first, second);
        assert_eq!(first.total_sales.to_bits(), second.total_sales.to_bits());
    }
}
