//! Maps catalog output to KPI values and chart specifications.
//! Nothing here reduces rows; every number comes from [`SalesAggregates`].

use contracts::dashboards::d400_sales_performance::{
    ChartData, ChartKind, ChartPoint, ChartSpec, KpiValue, Orientation, Panel, PanelId,
    PanelSlot, PieSlice, ScatterPoint, Series, ValueFormat,
};

use super::aggregation::{QueryId, SalesAggregates};
use crate::shared::format::{format_count, format_currency};

const CURRENCY: &str = "USD";
const SALES_LABEL: &str = "TotalPrice";
const DONUT_HOLE: f64 = 0.3;
const CATEGORY_NOTICE: &str = "More category-specific charts can be added here.";

pub fn build_kpis(aggregates: &SalesAggregates) -> Vec<KpiValue> {
    let money = || ValueFormat::Money {
        currency: CURRENCY.to_string(),
    };

    vec![
        KpiValue {
            id: QueryId::TotalSales.name().to_string(),
            label: "Total Sales".to_string(),
            value: Some(aggregates.total_sales),
            display: format_currency(aggregates.total_sales),
            format: money(),
        },
        KpiValue {
            id: QueryId::AverageOrderValue.name().to_string(),
            label: "Average Order Value".to_string(),
            value: aggregates.average_order_value,
            display: format_currency(aggregates.average_order_value.unwrap_or(0.0)),
            format: money(),
        },
        KpiValue {
            id: QueryId::TotalOrders.name().to_string(),
            label: "Total Orders".to_string(),
            value: Some(aggregates.total_orders as f64),
            display: format_count(aggregates.total_orders),
            format: ValueFormat::Integer,
        },
    ]
}

/// The five tabs with their fixed chart slots
pub fn build_panels(aggregates: &SalesAggregates) -> Vec<Panel> {
    PanelId::ALL
        .iter()
        .map(|id| {
            let (heading, slots) = match id {
                PanelId::TimeSeries => (
                    "Sales Trends Over Time",
                    vec![daily_sales_chart(aggregates), category_trend_chart(aggregates)],
                ),
                PanelId::RegionalAnalysis => (
                    "Regional Sales Analysis",
                    vec![region_chart(aggregates), category_region_chart(aggregates)],
                ),
                PanelId::CategoryAnalysis => (
                    "Category Sales Analysis",
                    vec![
                        category_share_chart(aggregates),
                        PanelSlot::Notice {
                            text: CATEGORY_NOTICE.to_string(),
                        },
                    ],
                ),
                PanelId::ProductAnalysis => (
                    "Product Performance Analysis",
                    vec![
                        top_sales_chart(aggregates),
                        top_quantity_chart(aggregates),
                    ],
                ),
                PanelId::CustomerInsights => (
                    "Customer Insights",
                    vec![customer_chart(aggregates), price_histogram_chart(aggregates)],
                ),
            };
            Panel {
                id: *id,
                label: id.label().to_string(),
                heading: heading.to_string(),
                slots,
            }
        })
        .collect()
}

fn chart(
    query: QueryId,
    kind: ChartKind,
    title: &str,
    x_label: &str,
    y_label: &str,
    data: ChartData,
) -> PanelSlot {
    PanelSlot::Chart(ChartSpec {
        query: query.name().to_string(),
        kind,
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        data,
    })
}

/// Series data, or `NoData` when no series has points
fn series_data(orientation: Orientation, series: Vec<Series>) -> ChartData {
    if series.iter().all(|s| s.points.is_empty()) {
        return ChartData::NoData;
    }
    ChartData::Series {
        orientation,
        series,
    }
}

fn single_series(points: Vec<ChartPoint>) -> Vec<Series> {
    vec![Series { name: None, points }]
}

fn daily_sales_chart(a: &SalesAggregates) -> PanelSlot {
    let points = a
        .daily_sales
        .iter()
        .map(|(date, sales)| ChartPoint {
            x: date.to_string(),
            y: *sales,
        })
        .collect();
    chart(
        QueryId::DailySales,
        ChartKind::Line,
        "Daily Sales Trend",
        "Sales Date",
        SALES_LABEL,
        series_data(Orientation::Vertical, single_series(points)),
    )
}

fn category_trend_chart(a: &SalesAggregates) -> PanelSlot {
    let series = a
        .daily_sales_by_category
        .iter()
        .map(|s| Series {
            name: Some(s.category.to_string()),
            points: s
                .points
                .iter()
                .map(|(date, sales)| ChartPoint {
                    x: date.to_string(),
                    y: *sales,
                })
                .collect(),
        })
        .collect();
    chart(
        QueryId::DailySalesByCategory,
        ChartKind::Line,
        "Sales Trend Over Time by Category",
        "Sales Date",
        SALES_LABEL,
        series_data(Orientation::Vertical, series),
    )
}

fn region_chart(a: &SalesAggregates) -> PanelSlot {
    let points = a
        .sales_by_region
        .iter()
        .map(|(region, sales)| ChartPoint {
            x: region.to_string(),
            y: *sales,
        })
        .collect();
    chart(
        QueryId::SalesByRegion,
        ChartKind::Bar,
        "Total Sales by Region",
        "Region",
        SALES_LABEL,
        series_data(Orientation::Vertical, single_series(points)),
    )
}

/// x = category, one coloured series per region
fn category_region_chart(a: &SalesAggregates) -> PanelSlot {
    let mut series: Vec<Series> = Vec::new();
    let mut regions: Vec<_> = a.sales_by_category_and_region.iter().map(|(_, r, _)| *r).collect();
    regions.sort();
    regions.dedup();

    for region in regions {
        let points = a
            .sales_by_category_and_region
            .iter()
            .filter(|(_, r, _)| *r == region)
            .map(|(category, _, sales)| ChartPoint {
                x: category.to_string(),
                y: *sales,
            })
            .collect();
        series.push(Series {
            name: Some(region.to_string()),
            points,
        });
    }

    chart(
        QueryId::SalesByCategoryAndRegion,
        ChartKind::GroupedBar,
        "Sales by Category and Region (Grouped)",
        "Category",
        SALES_LABEL,
        series_data(Orientation::Vertical, series),
    )
}

fn category_share_chart(a: &SalesAggregates) -> PanelSlot {
    let data = match &a.category_share {
        Some(shares) => ChartData::Pie {
            hole: DONUT_HOLE,
            slices: shares
                .iter()
                .map(|s| PieSlice {
                    label: s.category.to_string(),
                    value: s.sales,
                    share: s.share,
                })
                .collect(),
        },
        None => ChartData::NoData,
    };
    chart(
        QueryId::CategoryShare,
        ChartKind::Pie,
        "Sales Share by Category",
        "Category",
        SALES_LABEL,
        data,
    )
}

fn top_sales_chart(a: &SalesAggregates) -> PanelSlot {
    let points = a
        .top_products_by_sales
        .iter()
        .map(|p| ChartPoint {
            x: p.product.clone(),
            y: p.sales,
        })
        .collect();
    chart(
        QueryId::TopProductsBySales,
        ChartKind::Bar,
        "Top 10 Products by Total Sales",
        "Product",
        SALES_LABEL,
        series_data(Orientation::Vertical, single_series(points)),
    )
}

/// Horizontal bars: the category axis is vertical, values run along x
fn top_quantity_chart(a: &SalesAggregates) -> PanelSlot {
    let points = a
        .top_products_by_quantity
        .iter()
        .map(|p| ChartPoint {
            x: p.product.clone(),
            y: p.quantity as f64,
        })
        .collect();
    chart(
        QueryId::TopProductsByQuantity,
        ChartKind::Bar,
        "Top 10 Products by Quantity Sold",
        "Quantity",
        "Product",
        series_data(Orientation::Horizontal, single_series(points)),
    )
}

fn customer_chart(a: &SalesAggregates) -> PanelSlot {
    let data = if a.customers.is_empty() {
        ChartData::NoData
    } else {
        ChartData::Scatter {
            points: a
                .customers
                .iter()
                .map(|c| ScatterPoint {
                    label: format!("Customer {}", c.customer_id),
                    x: c.order_count as f64,
                    y: c.total_spending,
                })
                .collect(),
        }
    };
    chart(
        QueryId::CustomerSpending,
        ChartKind::Scatter,
        "Customer Spending vs. Order Frequency",
        "Number of Orders",
        "Total Amount Spent",
        data,
    )
}

fn price_histogram_chart(a: &SalesAggregates) -> PanelSlot {
    let data = match &a.unit_price_histogram {
        Some(bins) => ChartData::Histogram { bins: bins.clone() },
        None => ChartData::NoData,
    };
    chart(
        QueryId::UnitPriceHistogram,
        ChartKind::Histogram,
        "Distribution of Unit Prices",
        "UnitPrice",
        "count",
        data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_sales_performance::aggregation::run_catalog;
    use crate::dashboards::d400_sales_performance::dataset::{GeneratorSettings, SalesDataset};
    use crate::dashboards::d400_sales_performance::filter::apply;
    use contracts::dashboards::d400_sales_performance::{Category, Region};

    fn charts(panels: &[Panel]) -> Vec<&ChartSpec> {
        panels
            .iter()
            .flat_map(|p| p.slots.iter())
            .filter_map(|slot| match slot {
                PanelSlot::Chart(spec) => Some(spec),
                PanelSlot::Notice { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_panel_layout_is_fixed() {
        let ds = SalesDataset::generate(GeneratorSettings::default()).unwrap();
        let aggregates = run_catalog(&apply(&ds, ds.regions(), ds.categories()));
        let panels = build_panels(&aggregates);

        let labels: Vec<&str> = panels.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Time Series",
                "Regional Analysis",
                "Category Analysis",
                "Product Analysis",
                "Customer Insights"
            ]
        );
        for panel in &panels {
            assert!((1..=2).contains(&panel.slots.len()));
        }
        let slot_count: usize = panels.iter().map(|p| p.slots.len()).sum();
        assert_eq!(slot_count, 10);

        let all = charts(&panels);
        assert_eq!(all.len(), 9);
        assert!(all.iter().all(|c| c.has_data()));
    }

    #[test]
    fn test_kpi_formatting() {
        let ds = SalesDataset::generate(GeneratorSettings::default()).unwrap();
        let aggregates = run_catalog(&apply(&ds, ds.regions(), ds.categories()));
        let kpis = build_kpis(&aggregates);

        assert_eq!(kpis[0].label, "Total Sales");
        assert_eq!(kpis[0].display, format_currency(aggregates.total_sales));
        assert!(kpis[0].display.starts_with('$'));
        assert!(kpis[0].display.contains(','));
        assert_eq!(kpis[2].display, "1000");
        assert_eq!(kpis[2].format, ValueFormat::Integer);
    }

    #[test]
    fn test_empty_view_renders_blank_charts() {
        let ds = SalesDataset::generate(GeneratorSettings::default()).unwrap();
        let aggregates = run_catalog(&apply(&ds, &[Region::North], &[]));

        let kpis = build_kpis(&aggregates);
        assert_eq!(kpis[0].display, "$0.00");
        assert_eq!(kpis[1].display, "$0.00");
        assert_eq!(kpis[1].value, None);
        assert_eq!(kpis[2].display, "0");

        let panels = build_panels(&aggregates);
        let all = charts(&panels);
        assert_eq!(all.len(), 9);
        assert!(all.iter().all(|c| c.data == ChartData::NoData));
    }

    #[test]
    fn test_grouped_bar_series_per_region() {
        let ds = SalesDataset::generate(GeneratorSettings::default()).unwrap();
        let aggregates = run_catalog(&apply(
            &ds,
            &[Region::West, Region::East],
            &[Category::Books],
        ));
        let panels = build_panels(&aggregates);
        let grouped = charts(&panels)
            .into_iter()
            .find(|c| c.kind == ChartKind::GroupedBar)
            .unwrap();

        match &grouped.data {
            ChartData::Series { series, .. } => {
                let names: Vec<Option<String>> = series.iter().map(|s| s.name.clone()).collect();
                assert_eq!(names, vec![Some("East".to_string()), Some("West".to_string())]);
                for s in series {
                    assert_eq!(s.points.len(), 1);
                    assert_eq!(s.points[0].x, "Books");
                }
            }
            other => panic!("unexpected chart data: {:?}", other),
        }
    }
}
