//! Geometry helpers for the SVG charts

/// Maps a numeric domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            // Degenerate domain: put everything in the middle
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Splits a pixel range into equal bands, one per category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    start: f64,
    step: f64,
    padding: f64,
}

impl BandScale {
    /// `padding` is the fraction of each step left empty (0..1)
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> Self {
        let step = if count == 0 {
            0.0
        } else {
            (range.1 - range.0) / count as f64
        };
        Self {
            start: range.0,
            step,
            padding,
        }
    }

    /// Start of the band at `index`
    pub fn position(&self, index: usize) -> f64 {
        self.start + self.step * index as f64 + self.step * self.padding / 2.0
    }

    pub fn bandwidth(&self) -> f64 {
        self.step * (1.0 - self.padding)
    }

    /// Centre of the band at `index`
    pub fn center(&self, index: usize) -> f64 {
        self.position(index) + self.bandwidth() / 2.0
    }
}

/// Rounds up to 1, 2, 2.5 or 5 times a power of ten
pub fn nice_max(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powi(value.log10().floor() as i32);
    let normalized = value / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// `count + 1` evenly spaced ticks from 0 to `max`
pub fn ticks(max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return vec![0.0];
    }
    (0..=count).map(|i| max * i as f64 / count as f64).collect()
}

/// Short axis label: 1500 -> "1.5k", 2000000 -> "2M"
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1_000_000.0 {
        (value / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        (value / 1_000.0, "k")
    } else {
        (value, "")
    };
    let text = format!("{:.1}", scaled);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, suffix)
}

/// Formats an SVG coordinate
pub fn px(value: f64) -> String {
    format!("{:.2}", value)
}

/// SVG path for a pie or donut slice between two angles (radians, 0 = 12 o'clock)
pub fn arc_path(cx: f64, cy: f64, radius: f64, inner: f64, start: f64, end: f64) -> String {
    let point = |r: f64, angle: f64| (cx + r * angle.sin(), cy - r * angle.cos());
    let large_arc = if end - start > std::f64::consts::PI { 1 } else { 0 };

    let (ox0, oy0) = point(radius, start);
    let (ox1, oy1) = point(radius, end);

    if inner <= 0.0 {
        return format!(
            "M {} {} L {} {} A {} {} 0 {} 1 {} {} Z",
            px(cx),
            px(cy),
            px(ox0),
            px(oy0),
            px(radius),
            px(radius),
            large_arc,
            px(ox1),
            px(oy1)
        );
    }

    let (ix1, iy1) = point(inner, end);
    let (ix0, iy0) = point(inner, start);
    format!(
        "M {} {} A {} {} 0 {} 1 {} {} L {} {} A {} {} 0 {} 0 {} {} Z",
        px(ox0),
        px(oy0),
        px(radius),
        px(radius),
        large_arc,
        px(ox1),
        px(oy1),
        px(ix1),
        px(iy1),
        px(inner),
        px(inner),
        large_arc,
        px(ix0),
        px(iy0)
    )
}
