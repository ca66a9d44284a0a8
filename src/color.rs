use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};

use crate::render::PathStyle;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Highlights: selected country → colour
// ---------------------------------------------------------------------------

/// Countries picked in the side panel, each with its own colour. Every other
/// country keeps [`PathStyle::FAINT`].
#[derive(Debug, Clone, Default)]
pub struct Highlights {
    selected: BTreeSet<String>,
    mapping: BTreeMap<String, Srgb<u8>>,
}

impl Highlights {
    pub fn contains(&self, country: &str) -> bool {
        self.selected.contains(country)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Add or remove `country`. Colours are reassigned so they stay evenly
    /// spread over however many countries are selected.
    pub fn toggle(&mut self, country: &str) {
        if !self.selected.remove(country) {
            self.selected.insert(country.to_string());
        }
        self.rebuild();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.mapping.clear();
    }

    fn rebuild(&mut self) {
        let palette = generate_palette(self.selected.len());
        self.mapping = self.selected.iter().cloned().zip(palette).collect();
    }

    pub fn color_for(&self, country: &str) -> Option<Srgb<u8>> {
        self.mapping.get(country).copied()
    }

    pub fn style_for(&self, country: &str) -> PathStyle {
        self.color_for(country)
            .map(PathStyle::highlighted)
            .unwrap_or(PathStyle::FAINT)
    }

    /// Legend entries (country → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Srgb<u8>)> {
        self.mapping
            .iter()
            .map(|(c, rgb)| (c.clone(), *rgb))
            .collect()
    }
}
