use std::fmt::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use palette::Srgb;

use super::scene::{ChartScene, HANDLE_RADIUS};
use super::{GRID_COLOR, PathStyle, TEXT_COLOR, ZERO_LINE_COLOR};

fn rgb(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Write the scene as a standalone SVG document: chart on top, slider strip
/// underneath. Each visible country becomes one `<path>` carrying its
/// country name in `data-country`.
pub fn write_svg<W, F>(out: &mut W, scene: &ChartScene, style_for: F) -> fmt::Result
where
    W: Write,
    F: Fn(&str) -> PathStyle,
{
    let chart = &scene.mapper().geometry;
    let slider = scene.slider_geometry();
    let width = chart.layout.width.max(slider.layout.width);
    let height = chart.layout.height + slider.layout.height;
    let text = rgb(TEXT_COLOR);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" font-family="PT Mono, monospace">"#
    )?;

    let (ox, oy) = chart.origin();
    writeln!(out, r#"<g class="plot" transform="translate({ox}, {oy})">"#)?;
    for g in scene.gridlines() {
        let (color, w) = if g.emphasised {
            (ZERO_LINE_COLOR, 2)
        } else {
            (GRID_COLOR, 1)
        };
        writeln!(
            out,
            r#"<line x1="{}" x2="{}" y1="{y}" y2="{y}" stroke="{}" stroke-width="{w}"/>"#,
            g.x1,
            g.x2,
            rgb(color),
            y = g.y,
        )?;
    }

    // Hidden paths are omitted.
    let mut visible: Vec<_> = scene.paths().filter(|p| p.visible).collect();
    // Highlighted paths last so they are drawn on top.
    visible.sort_by(|a, b| {
        style_for(&a.country)
            .opacity
            .total_cmp(&style_for(&b.country).opacity)
    });
    for path in visible {
        let style = style_for(&path.country);
        let mut d = String::new();
        if let Some(first) = path.vertices.first() {
            write!(d, "M{},{}", first.0, first.1)?;
        }
        for c in path.curve() {
            write!(
                d,
                "C{},{},{},{},{},{}",
                c.c1.0, c.c1.1, c.c2.0, c.c2.1, c.to.0, c.to.1
            )?;
        }
        writeln!(
            out,
            r#"<path data-country="{}" d="{d}" fill="none" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
            escape(&path.country),
            rgb(style.color),
            style.width,
            style.opacity,
        )?;
    }

    let ref_x = scene.reference_x();
    let (bottom, top) = chart.y_range();
    writeln!(
        out,
        r#"<g class="y-axis" transform="translate({ref_x}, 0)"><line y1="{top}" y2="{bottom}" stroke="{}" opacity="0.5"/>"#,
        rgb(ZERO_LINE_COLOR)
    )?;
    for t in scene.diff_ticks() {
        writeln!(
            out,
            r#"<text y="{}" text-anchor="middle" dominant-baseline="middle" font-size="14" font-weight="200" fill="{text}">{}</text>"#,
            t.pos,
            escape(&t.label)
        )?;
    }
    writeln!(out, "</g>")?;

    for t in scene.year_ticks() {
        writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12" fill="{text}">{}</text>"#,
            t.pos,
            bottom + 18.0,
            escape(&t.label)
        )?;
    }
    writeln!(out, "</g>")?;

    let s = scene.slider();
    let (sx, sy) = slider.origin();
    writeln!(
        out,
        r#"<g class="slider" transform="translate({}, {})">"#,
        sx,
        chart.layout.height + sy
    )?;
    writeln!(
        out,
        r##"<line class="track" x1="{}" x2="{}" y1="{y}" y2="{y}" stroke="#dcdcdc" stroke-width="8" stroke-linecap="round"/>"##,
        s.track.0,
        s.track.1,
        y = s.track_y
    )?;
    writeln!(
        out,
        r##"<circle class="handle" cx="{}" cy="{}" r="{HANDLE_RADIUS}" fill="#ffffff" stroke="#7f7f7f"/>"##,
        s.handle_x, s.track_y
    )?;
    writeln!(
        out,
        r#"<text class="label" x="{}" y="{}" text-anchor="middle" font-size="16" fill="{text}">{}</text>"#,
        s.handle_x,
        s.label_y,
        escape(&s.label)
    )?;
    writeln!(out, "</g>")?;
    writeln!(out, "</svg>")
}

/// Export the current scene to `path`.
pub fn export_svg<F>(path: &Path, scene: &ChartScene, style_for: F) -> Result<()>
where
    F: Fn(&str) -> PathStyle,
{
    let mut doc = String::new();
    write_svg(&mut doc, scene, style_for).context("formatting SVG")?;
    std::fs::write(path, doc).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported chart to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::baseline::recompute;
    use crate::data::model::{Dataset, Observation};
    use crate::layout::Layout;
    use crate::render::Renderer;
    use crate::scale::{PlotGeometry, ScaleMapper};

    fn scene() -> ChartScene {
        let rows = [
            ("A&B", 1960, 50.0),
            ("A&B", 1970, 55.0),
            ("C", 1960, 40.0),
            ("C", 1970, 42.0),
            ("D", 1970, 61.0),
        ];
        let ds = Dataset::from_observations(
            rows.iter()
                .map(|&(c, y, le)| Observation {
                    country: c.to_string(),
                    year: y,
                    life_expectancy: le,
                })
                .collect(),
        )
        .unwrap();
        let layout = Layout::default();
        let mapper = ScaleMapper::new(PlotGeometry::new(&layout.chart), ds.year_extent());
        let mut scene = ChartScene::new(mapper, PlotGeometry::new(&layout.slider));
        scene.initial_draw(&recompute(&ds, 1960));
        scene
    }

    #[test]
    fn one_path_per_visible_country() {
        let mut doc = String::new();
        write_svg(&mut doc, &scene(), |_| PathStyle::FAINT).unwrap();

        assert!(doc.starts_with("<svg"));
        assert!(doc.trim_end().ends_with("</svg>"));
        assert_eq!(doc.matches("<path ").count(), 2);
        assert!(doc.contains(r#"data-country="A&amp;B""#));
        assert!(!doc.contains(r#"data-country="D""#));
        assert_eq!(doc.matches(r##"stroke="#bababa" stroke-width="2""##).count(), 1);
        assert!(doc.contains(">1960</text>"));
    }

    #[test]
    fn highlighted_paths_are_drawn_last() {
        let mut doc = String::new();
        write_svg(&mut doc, &scene(), |c| {
            if c == "A&B" {
                PathStyle::highlighted(Srgb::new(255, 0, 0))
            } else {
                PathStyle::FAINT
            }
        })
        .unwrap();
        let highlighted = doc.find(r#"data-country="A&amp;B""#).unwrap();
        let faint = doc.find(r#"data-country="C""#).unwrap();
        assert!(faint < highlighted);
        assert!(doc.contains(r##"stroke="#ff0000""##));
    }
}
