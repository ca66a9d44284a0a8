//! Rendering: a retained scene driven by the data layer, painted by egui and
//! exportable as SVG.
//!
//! ```text
//!   Rebaselined ──▶ Renderer (ChartScene) ──▶ ui::chart (egui painter)
//!                                         └─▶ svg::write_svg
//! ```

pub mod curve;
pub mod scene;
pub mod svg;

use palette::Srgb;

use crate::data::baseline::Rebaselined;

/// What the app needs from a chart surface.
///
/// Implementations must keep one path element per country for the whole
/// session: `update_paths` changes geometry, never identity.
pub trait Renderer {
    /// Build axes, gridlines, one path per country, the reference line and
    /// the slider handle.
    fn initial_draw(&mut self, data: &Rebaselined);
    /// Replace path geometry after a recompute.
    fn update_paths(&mut self, data: &Rebaselined);
    /// Move the floating y axis to `year`.
    fn move_reference_line(&mut self, year: f64);
    /// Move the slider handle and its label to `year`.
    fn move_handle(&mut self, year: f64);
}

/// Stroke of a country path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub color: Srgb<u8>,
    pub opacity: f32,
    pub width: f32,
}

impl PathStyle {
    /// Default look: every country faint steel blue.
    pub const FAINT: PathStyle = PathStyle {
        color: Srgb::new(70, 130, 180),
        opacity: 0.2,
        width: 1.5,
    };

    pub fn highlighted(color: Srgb<u8>) -> Self {
        PathStyle {
            color,
            opacity: 1.0,
            width: 2.5,
        }
    }
}

pub const GRID_COLOR: Srgb<u8> = Srgb::new(0xED, 0xED, 0xED);
pub const ZERO_LINE_COLOR: Srgb<u8> = Srgb::new(0xBA, 0xBA, 0xBA);
pub const TEXT_COLOR: Srgb<u8> = Srgb::new(0x33, 0x33, 0x33);
