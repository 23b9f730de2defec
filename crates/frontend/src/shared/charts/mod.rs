//! SVG rendering of [`ChartSpec`] values received from the backend.
//!
//! The backend ships fully reduced data, so everything here is layout:
//! scales, axes, legends and one drawing routine per [`ChartData`] variant.

pub mod scale;

use chrono::{Duration, NaiveDate};
use contracts::dashboards::d400_sales_performance::{
    ChartData, ChartKind, ChartSpec, HistogramBin, Orientation, PieSlice, ScatterPoint, Series,
};
use leptos::prelude::*;

use scale::{arc_path, compact, nice_max, px, ticks, BandScale, LinearScale};

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 320.0;
const Y_TICKS: usize = 5;
const X_LABELS: usize = 6;

const PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Plot area inside the SVG viewBox
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Frame {
    fn standard() -> Self {
        Self {
            left: 60.0,
            right: WIDTH - 20.0,
            top: 20.0,
            bottom: HEIGHT - 50.0,
        }
    }

    /// Extra room on the left for category labels of horizontal bars
    fn wide_left() -> Self {
        Self {
            left: 90.0,
            ..Self::standard()
        }
    }

    fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    fn center_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// Distinct x values over all series, in first-appearance order
fn categories(series: &[Series]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for s in series {
        for point in &s.points {
            if !seen.contains(&point.x) {
                seen.push(point.x.clone());
            }
        }
    }
    seen
}

fn max_y(series: &[Series]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.y))
        .fold(0.0, f64::max)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Earliest and latest ISO date over all series
fn date_range(series: &[Series]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = series
        .iter()
        .flat_map(|s| s.points.iter())
        .filter_map(|p| parse_date(&p.x));
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// Days since `origin`: the x coordinate of a dated point
fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

fn time_scale(start: NaiveDate, end: NaiveDate, frame: Frame) -> LinearScale {
    LinearScale::new((0.0, day_offset(start, end)), (frame.left, frame.right))
}

/// Up to `count` evenly spaced calendar dates from `start` to `end`
fn date_ticks(start: NaiveDate, end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let span = (end - start).num_days();
    if span <= 0 || count < 2 {
        return vec![start];
    }
    let steps = (count - 1) as i64;
    let mut dates: Vec<NaiveDate> = (0..=steps)
        .map(|i| start + Duration::days(span * i / steps))
        .collect();
    dates.dedup();
    dates
}

#[component]
pub fn ChartView(spec: ChartSpec) -> impl IntoView {
    let ChartSpec {
        kind,
        title,
        x_label,
        y_label,
        data,
        ..
    } = spec;

    let body = match data {
        ChartData::Series { series, .. } if kind == ChartKind::Line => line_chart(series),
        ChartData::Series {
            orientation,
            series,
        } => bar_chart(series, orientation),
        ChartData::Pie { hole, slices } => pie_chart(slices, hole),
        ChartData::Scatter { points } => scatter_chart(points),
        ChartData::Histogram { bins } => histogram_chart(bins),
        ChartData::NoData => empty_chart(),
    };

    let frame = Frame::standard();

    view! {
        <div class="chart-card">
            <div class="chart-card__title">{title}</div>
            <svg
                class="chart-card__svg"
                viewBox=format!("0 0 {} {}", WIDTH, HEIGHT)
                preserveAspectRatio="xMidYMid meet"
            >
                {body}
                <text
                    class="chart-axis-label"
                    x=px(frame.center_x())
                    y=px(HEIGHT - 8.0)
                    text-anchor="middle"
                >
                    {x_label}
                </text>
                <text
                    class="chart-axis-label"
                    x="0"
                    y="0"
                    text-anchor="middle"
                    transform=format!("translate(14 {}) rotate(-90)", px(frame.center_y()))
                >
                    {y_label}
                </text>
            </svg>
        </div>
    }
}

/// Horizontal grid lines and labels for a vertical value axis
fn value_axis_vertical(frame: Frame, max: f64) -> AnyView {
    let scale = LinearScale::new((0.0, max), (frame.bottom, frame.top));
    ticks(max, Y_TICKS)
        .into_iter()
        .map(|tick| {
            let y = scale.map(tick);
            view! {
                <line
                    class="chart-grid"
                    x1=px(frame.left)
                    x2=px(frame.right)
                    y1=px(y)
                    y2=px(y)
                />
                <text class="chart-tick" x=px(frame.left - 6.0) y=px(y + 4.0) text-anchor="end">
                    {compact(tick)}
                </text>
            }
        })
        .collect_view()
        .into_any()
}

/// Vertical grid lines and labels for a horizontal value axis
fn value_axis_horizontal(frame: Frame, max: f64) -> AnyView {
    let scale = LinearScale::new((0.0, max), (frame.left, frame.right));
    ticks(max, Y_TICKS)
        .into_iter()
        .map(|tick| {
            let x = scale.map(tick);
            view! {
                <line
                    class="chart-grid"
                    x1=px(x)
                    x2=px(x)
                    y1=px(frame.top)
                    y2=px(frame.bottom)
                />
                <text class="chart-tick" x=px(x) y=px(frame.bottom + 16.0) text-anchor="middle">
                    {compact(tick)}
                </text>
            }
        })
        .collect_view()
        .into_any()
}

fn legend(names: Vec<String>, frame: Frame) -> AnyView {
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let y = frame.top + 4.0 + i as f64 * 16.0;
            view! {
                <rect x=px(frame.right - 110.0) y=px(y) width="10" height="10" fill=color(i) />
                <text class="chart-legend" x=px(frame.right - 96.0) y=px(y + 9.0)>
                    {name}
                </text>
            }
        })
        .collect_view()
        .into_any()
}

fn series_names(series: &[Series]) -> Vec<String> {
    series.iter().filter_map(|s| s.name.clone()).collect()
}

fn line_chart(series: Vec<Series>) -> AnyView {
    let frame = Frame::standard();
    let Some((start, end)) = date_range(&series) else {
        return empty_chart();
    };

    let max = nice_max(max_y(&series));
    let x_scale = time_scale(start, end, frame);
    let y_scale = LinearScale::new((0.0, max), (frame.bottom, frame.top));

    let lines = series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let points = s
                .points
                .iter()
                .filter_map(|p| {
                    let date = parse_date(&p.x)?;
                    Some(format!(
                        "{},{}",
                        px(x_scale.map(day_offset(start, date))),
                        px(y_scale.map(p.y))
                    ))
                })
                .collect::<Vec<_>>()
                .join(" ");
            view! {
                <polyline points=points fill="none" stroke=color(i) stroke-width="1.5" />
            }
        })
        .collect_view();

    let x_labels = date_ticks(start, end, X_LABELS)
        .into_iter()
        .map(|date| {
            view! {
                <text
                    class="chart-tick"
                    x=px(x_scale.map(day_offset(start, date)))
                    y=px(frame.bottom + 16.0)
                    text-anchor="middle"
                >
                    {date.format("%Y-%m-%d").to_string()}
                </text>
            }
        })
        .collect_view();

    let names = series_names(&series);

    view! {
        {value_axis_vertical(frame, max)}
        {lines}
        {x_labels}
        {legend(names, frame)}
    }
    .into_any()
}

/// Single-series and grouped bars in either orientation
fn bar_chart(series: Vec<Series>, orientation: Orientation) -> AnyView {
    let horizontal = orientation == Orientation::Horizontal;
    let frame = if horizontal {
        Frame::wide_left()
    } else {
        Frame::standard()
    };
    let labels = categories(&series);
    let max = nice_max(max_y(&series));

    let band_range = if horizontal {
        (frame.top, frame.bottom)
    } else {
        (frame.left, frame.right)
    };
    let bands = BandScale::new(labels.len(), band_range, 0.2);
    let groups = BandScale::new(series.len(), (0.0, bands.bandwidth()), 0.0);
    let value_scale = if horizontal {
        LinearScale::new((0.0, max), (frame.left, frame.right))
    } else {
        LinearScale::new((0.0, max), (frame.bottom, frame.top))
    };

    let bars = series
        .iter()
        .enumerate()
        .flat_map(|(si, s)| {
            let labels = &labels;
            s.points.iter().filter_map(move |p| {
                let band = labels.iter().position(|l| l == &p.x)?;
                let offset = bands.position(band) + groups.position(si);
                let value = value_scale.map(p.y);
                let (x, y, width, height) = if horizontal {
                    (frame.left, offset, value - frame.left, groups.bandwidth())
                } else {
                    (offset, value, groups.bandwidth(), frame.bottom - value)
                };
                Some(view! {
                    <rect
                        x=px(x)
                        y=px(y)
                        width=px(width.max(0.0))
                        height=px(height.max(0.0))
                        fill=color(si)
                    />
                })
            })
        })
        .collect_view();

    let category_labels = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            if horizontal {
                view! {
                    <text
                        class="chart-tick"
                        x=px(frame.left - 6.0)
                        y=px(bands.center(i) + 4.0)
                        text-anchor="end"
                    >
                        {label.clone()}
                    </text>
                }
                .into_any()
            } else {
                view! {
                    <text
                        class="chart-tick"
                        x=px(bands.center(i))
                        y=px(frame.bottom + 16.0)
                        text-anchor="middle"
                    >
                        {label.clone()}
                    </text>
                }
                .into_any()
            }
        })
        .collect_view();

    let axis = if horizontal {
        value_axis_horizontal(frame, max)
    } else {
        value_axis_vertical(frame, max)
    };
    let names = series_names(&series);

    view! {
        {axis}
        {bars}
        {category_labels}
        {legend(names, frame)}
    }
    .into_any()
}

fn pie_chart(slices: Vec<PieSlice>, hole: f64) -> AnyView {
    let frame = Frame::standard();
    let cx = frame.center_x() - 80.0;
    let cy = frame.center_y();
    let radius = (frame.bottom - frame.top) / 2.0;
    let inner = radius * hole.clamp(0.0, 0.95);

    let mut angle = 0.0;
    let shapes = slices
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            let start = angle;
            angle += slice.share * std::f64::consts::TAU;
            if slice.share >= 0.9999 {
                // A full turn cannot be drawn as a single arc
                let mid = (radius + inner) / 2.0;
                return view! {
                    <circle
                        cx=px(cx)
                        cy=px(cy)
                        r=px(mid)
                        fill="none"
                        stroke=color(i)
                        stroke-width=px(radius - inner)
                    />
                }
                .into_any();
            }
            view! {
                <path
                    d=arc_path(cx, cy, radius, inner, start, angle)
                    fill=color(i)
                    stroke="#ffffff"
                    stroke-width="1"
                />
            }
            .into_any()
        })
        .collect_view();

    let legend = slices
        .into_iter()
        .enumerate()
        .map(|(i, slice)| {
            let y = frame.top + 20.0 + i as f64 * 20.0;
            let text = format!("{} ({:.1}%)", slice.label, slice.share * 100.0);
            view! {
                <rect x=px(cx + radius + 40.0) y=px(y) width="12" height="12" fill=color(i) />
                <text class="chart-legend" x=px(cx + radius + 58.0) y=px(y + 10.0)>
                    {text}
                </text>
            }
        })
        .collect_view();

    view! {
        {shapes}
        {legend}
    }
    .into_any()
}

fn scatter_chart(points: Vec<ScatterPoint>) -> AnyView {
    let frame = Frame::standard();
    let max_x = nice_max(points.iter().map(|p| p.x).fold(0.0, f64::max));
    let max_y = nice_max(points.iter().map(|p| p.y).fold(0.0, f64::max));
    let x_scale = LinearScale::new((0.0, max_x), (frame.left, frame.right));
    let y_scale = LinearScale::new((0.0, max_y), (frame.bottom, frame.top));

    let x_ticks = ticks(max_x, Y_TICKS)
        .into_iter()
        .map(|tick| {
            view! {
                <text
                    class="chart-tick"
                    x=px(x_scale.map(tick))
                    y=px(frame.bottom + 16.0)
                    text-anchor="middle"
                >
                    {compact(tick)}
                </text>
            }
        })
        .collect_view();

    let dots = points
        .into_iter()
        .map(|p| {
            view! {
                <circle
                    class="chart-dot"
                    cx=px(x_scale.map(p.x))
                    cy=px(y_scale.map(p.y))
                    r="4"
                    fill=color(0)
                    fill-opacity="0.7"
                    data-label=p.label
                />
            }
        })
        .collect_view();

    view! {
        {value_axis_vertical(frame, max_y)}
        {x_ticks}
        {dots}
    }
    .into_any()
}

fn histogram_chart(bins: Vec<HistogramBin>) -> AnyView {
    let frame = Frame::standard();
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return empty_chart();
    };
    let (low, high) = (first.start, last.end);
    let max = nice_max(bins.iter().map(|b| b.count as f64).fold(0.0, f64::max));
    let x_scale = LinearScale::new((low, high), (frame.left, frame.right));
    let y_scale = LinearScale::new((0.0, max), (frame.bottom, frame.top));
    let degenerate = high <= low;

    let bars = bins
        .iter()
        .map(|bin| {
            let (x0, x1) = if degenerate {
                (frame.left, frame.right)
            } else {
                (x_scale.map(bin.start), x_scale.map(bin.end))
            };
            let y = y_scale.map(bin.count as f64);
            view! {
                <rect
                    x=px(x0)
                    y=px(y)
                    width=px((x1 - x0 - 1.0).max(0.0))
                    height=px(frame.bottom - y)
                    fill=color(0)
                />
            }
        })
        .collect_view();

    let edges: Vec<f64> = if degenerate {
        vec![low]
    } else {
        (0..=Y_TICKS)
            .map(|i| low + (high - low) * i as f64 / Y_TICKS as f64)
            .collect()
    };
    let x_ticks = edges
        .into_iter()
        .map(|edge| {
            let x = if degenerate {
                frame.center_x()
            } else {
                x_scale.map(edge)
            };
            view! {
                <text class="chart-tick" x=px(x) y=px(frame.bottom + 16.0) text-anchor="middle">
                    {compact(edge)}
                </text>
            }
        })
        .collect_view();

    view! {
        {value_axis_vertical(frame, max)}
        {bars}
        {x_ticks}
    }
    .into_any()
}

/// Axes only, with a centred notice
fn empty_chart() -> AnyView {
    let frame = Frame::standard();
    view! {
        <line class="chart-axis" x1=px(frame.left) x2=px(frame.left) y1=px(frame.top) y2=px(frame.bottom) />
        <line class="chart-axis" x1=px(frame.left) x2=px(frame.right) y1=px(frame.bottom) y2=px(frame.bottom) />
        <text class="chart-empty" x=px(frame.center_x()) y=px(frame.center_y()) text-anchor="middle">
            "No data"
        </text>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d400_sales_performance::ChartPoint;

    fn series(name: Option<&str>, points: &[(&str, f64)]) -> Series {
        Series {
            name: name.map(str::to_string),
            points: points
                .iter()
                .map(|(x, y)| ChartPoint {
                    x: x.to_string(),
                    y: *y,
                })
                .collect(),
        }
    }

    #[test]
    fn test_categories_keep_first_appearance() {
        let data = vec![
            series(Some("Books"), &[("East", 1.0), ("North", 2.0)]),
            series(Some("Clothing"), &[("Central", 3.0), ("North", 4.0)]),
        ];
        assert_eq!(categories(&data), vec!["East", "North", "Central"]);
        assert_eq!(max_y(&data), 4.0);
    }

    #[test]
    fn test_dates_are_placed_on_a_calendar_axis() {
        let data = vec![series(
            None,
            &[("2023-01-01", 1.0), ("2023-01-02", 2.0), ("2023-12-31", 3.0)],
        )];
        let (start, end) = date_range(&data).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        let frame = Frame::standard();
        let scale = time_scale(start, end, frame);
        let xs: Vec<f64> = data[0]
            .points
            .iter()
            .map(|p| scale.map(day_offset(start, parse_date(&p.x).unwrap())))
            .collect();

        assert_eq!(xs[0], frame.left);
        assert_eq!(xs[2], frame.right);
        // One day apart vs 363 days apart
        assert!(xs[1] - xs[0] < 2.0);
        assert!(xs[2] - xs[1] > 500.0);
    }

    #[test]
    fn test_date_ticks() {
        let day = |d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
        assert_eq!(
            date_ticks(day(1), day(7), 4),
            vec![day(1), day(3), day(5), day(7)]
        );
        assert_eq!(date_ticks(day(1), day(2), 6), vec![day(1), day(2)]);
        assert_eq!(date_ticks(day(5), day(5), 6), vec![day(5)]);
    }
}
