use serde::{Deserialize, Serialize};

/// Tab identifiers, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    TimeSeries,
    RegionalAnalysis,
    CategoryAnalysis,
    ProductAnalysis,
    CustomerInsights,
}

impl PanelId {
    pub const ALL: [PanelId; 5] = [
        PanelId::TimeSeries,
        PanelId::RegionalAnalysis,
        PanelId::CategoryAnalysis,
        PanelId::ProductAnalysis,
        PanelId::CustomerInsights,
    ];

    /// Tab caption
    pub fn label(&self) -> &'static str {
        match self {
            PanelId::TimeSeries => "Time Series",
            PanelId::RegionalAnalysis => "Regional Analysis",
            PanelId::CategoryAnalysis => "Category Analysis",
            PanelId::ProductAnalysis => "Product Analysis",
            PanelId::CustomerInsights => "Customer Insights",
        }
    }
}

/// One tab of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: PanelId,
    pub label: String,
    /// Heading shown at the top of the tab
    pub heading: String,
    pub slots: Vec<PanelSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slot", rename_all = "snake_case")]
pub enum PanelSlot {
    Chart(ChartSpec),
    Notice { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    GroupedBar,
    Pie,
    Scatter,
    Histogram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Renderable chart description. Contains only already-reduced data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Aggregation query the data came from
    pub query: String,
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

impl ChartSpec {
    pub fn has_data(&self) -> bool {
        !matches!(self.data, ChartData::NoData)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    /// Line and bar charts. Each series is drawn as one line or one bar colour.
    Series {
        orientation: Orientation,
        series: Vec<Series>,
    },
    Pie {
        /// Inner radius as a fraction of the outer radius (0 for a full pie)
        hole: f64,
        slices: Vec<PieSlice>,
    },
    Scatter { points: Vec<ScatterPoint> },
    Histogram { bins: Vec<HistogramBin> },
    /// Empty filtered view; rendered as a blank chart
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Legend entry; `None` for single-series charts
    pub name: Option<String>,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Category label or ISO date
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Fraction of the pie in 0..=1
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// Half-open bin `[start, end)`; the last bin also includes `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}
