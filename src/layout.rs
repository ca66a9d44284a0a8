use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Visual configuration
// ---------------------------------------------------------------------------

/// Per-side spacing in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Insets { top, right, bottom, left }
    }

    fn is_valid(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Size and spacing of one drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Insets,
    #[serde(default)]
    pub padding: Insets,
}

/// Layout of the whole window: the line chart and the slider strip below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub chart: PanelLayout,
    pub slider: PanelLayout,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            chart: PanelLayout {
                width: 960.0,
                height: 500.0,
                margin: Insets::default(),
                padding: Insets::new(10.0, 30.0, 30.0, 30.0),
            },
            slider: PanelLayout {
                width: 960.0,
                height: 50.0,
                margin: Insets::default(),
                padding: Insets::new(0.0, 30.0, 5.0, 30.0),
            },
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("{panel}: width and height must be positive, got {width}x{height}")]
    BadSize {
        panel: &'static str,
        width: f64,
        height: f64,
    },
    #[error("{panel}: margins and padding must be non-negative")]
    NegativeSpacing { panel: &'static str },
    #[error("{panel}: margins and padding leave no room to draw")]
    NoPlotArea { panel: &'static str },
}

impl PanelLayout {
    fn validate(&self, panel: &'static str) -> Result<(), LayoutError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(LayoutError::BadSize {
                panel,
                width: self.width,
                height: self.height,
            });
        }
        if !self.margin.is_valid() || !self.padding.is_valid() {
            return Err(LayoutError::NegativeSpacing { panel });
        }
        let g = crate::scale::PlotGeometry::new(self);
        if g.x_range().1 <= g.x_range().0 || g.y_range().0 <= g.y_range().1 {
            return Err(LayoutError::NoPlotArea { panel });
        }
        Ok(())
    }
}

impl Layout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.chart.validate("chart")?;
        self.slider.validate("slider")
    }

    /// Parse a layout override. Missing panels fall back to the defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let layout: Layout = serde_json::from_str(text).context("parsing layout JSON")?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading layout file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }
}
