use crate::data::model::YearExtent;
use crate::layout::PanelLayout;

/// Vertical domain of the chart in diff units (years of life expectancy).
pub const DIFF_DOMAIN: (f64, f64) = (-50.0, 50.0);

// ---------------------------------------------------------------------------
// LinearScale – affine map between a data domain and a pixel range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    /// Clamp `map` output to the range and `invert` output to the domain.
    pub clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale {
            domain,
            range,
            clamp: false,
        }
    }

    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    fn t(value: f64, from: (f64, f64)) -> Option<f64> {
        let span = from.1 - from.0;
        if span == 0.0 {
            None
        } else {
            Some((value - from.0) / span)
        }
    }

    /// Domain value → pixel. A zero-width domain maps to the range midpoint.
    pub fn map(&self, value: f64) -> f64 {
        let t = Self::t(value, self.domain).unwrap_or(0.5);
        let t = if self.clamp { t.clamp(0.0, 1.0) } else { t };
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Pixel → domain value. A zero-width range inverts to the domain start.
    pub fn invert(&self, px: f64) -> f64 {
        let t = Self::t(px, self.range).unwrap_or(0.0);
        let t = if self.clamp { t.clamp(0.0, 1.0) } else { t };
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }

    /// Roughly `count` evenly spaced round values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }
        let step = nice_step((hi - lo) / count as f64);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Round a raw step to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let err = raw / magnitude;
    let factor = if err >= 50f64.sqrt() {
        10.0
    } else if err >= 10f64.sqrt() {
        5.0
    } else if err >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

// ---------------------------------------------------------------------------
// PlotGeometry – pixel bounds derived once from a panel layout
// ---------------------------------------------------------------------------

/// Shared by the chart and the slider instead of a common base type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotGeometry {
    pub layout: PanelLayout,
    pub plot_width: f64,
    pub plot_height: f64,
    pub chart_width: f64,
    pub chart_height: f64,
}

impl PlotGeometry {
    pub fn new(layout: &PanelLayout) -> Self {
        let plot_width = layout.width - layout.margin.right;
        let plot_height = layout.height - layout.margin.bottom;
        PlotGeometry {
            layout: *layout,
            plot_width,
            plot_height,
            chart_width: plot_width - layout.padding.right,
            chart_height: plot_height - layout.padding.bottom,
        }
    }

    /// Offset of the plot group inside the panel.
    pub fn origin(&self) -> (f64, f64) {
        (self.layout.margin.left, self.layout.margin.top)
    }

    /// Horizontal pixel extent of the data area, left to right.
    pub fn x_range(&self) -> (f64, f64) {
        let m = &self.layout.margin;
        let p = &self.layout.padding;
        (m.left + p.left, self.plot_width - (m.right + p.right))
    }

    /// Vertical pixel extent, bottom to top.
    pub fn y_range(&self) -> (f64, f64) {
        (
            self.chart_height,
            self.layout.margin.top + self.layout.padding.top,
        )
    }
}

// ---------------------------------------------------------------------------
// ScaleMapper – year → x, diff → y
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMapper {
    pub geometry: PlotGeometry,
    pub x: LinearScale,
    pub y: LinearScale,
}

impl ScaleMapper {
    pub fn new(geometry: PlotGeometry, years: YearExtent) -> Self {
        ScaleMapper {
            geometry,
            x: LinearScale::new((years.min as f64, years.max as f64), geometry.x_range()),
            y: LinearScale::new(DIFF_DOMAIN, geometry.y_range()),
        }
    }

    pub fn year_to_x(&self, year: f64) -> f64 {
        self.x.map(year)
    }

    pub fn diff_to_y(&self, diff: f64) -> f64 {
        self.y.map(diff)
    }

    pub fn x_to_year(&self, px: f64) -> f64 {
        self.x.invert(px)
    }
}
