use std::collections::{BTreeMap, BTreeSet};

use crate::data::baseline::{DerivedSeries, Rebaselined};
use crate::scale::{LinearScale, PlotGeometry, ScaleMapper};

use super::Renderer;
use super::curve::{Cubic, Point, cardinal};

/// Spacing between gridlines in diff units.
pub const GRID_STEP: f64 = 10.0;
pub const HANDLE_RADIUS: f64 = 9.0;
/// Slider track height as a fraction of the slider's chart height.
const TRACK_POSITION: f64 = 0.8;
const LABEL_OFFSET: f64 = 20.0;

/// Stable handle to a country path, assigned once at first draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub id: PathId,
    pub country: String,
    /// Vertices in chart pixel space, one per derived point.
    pub vertices: Vec<Point>,
    /// False while the country has no value in the baseline year.
    pub visible: bool,
}

impl PathElement {
    pub fn curve(&self) -> Vec<Cubic> {
        cardinal(&self.vertices, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub value: f64,
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
    /// The zero line is drawn darker and thicker.
    pub emphasised: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Position along the axis in pixels.
    pub pos: f64,
    pub label: String,
}

/// Track, handle and label of the slider strip, in slider pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderScene {
    pub track: (f64, f64),
    pub track_y: f64,
    pub handle_x: f64,
    pub label: String,
    pub label_y: f64,
}

// ---------------------------------------------------------------------------
// ChartScene – retained drawing state for the chart and slider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ChartScene {
    mapper: ScaleMapper,
    slider_geometry: PlotGeometry,
    slider_scale: LinearScale,
    paths: BTreeMap<String, PathElement>,
    next_id: u32,
    gridlines: Vec<GridLine>,
    year_ticks: Vec<Tick>,
    diff_ticks: Vec<Tick>,
    reference_x: f64,
    slider: SliderScene,
}

impl ChartScene {
    pub fn new(mapper: ScaleMapper, slider_geometry: PlotGeometry) -> Self {
        let slider_scale = LinearScale::new(mapper.x.domain, slider_geometry.x_range())
            .with_clamp(true);
        let track_y = slider_geometry.chart_height * TRACK_POSITION;
        let start = mapper.x.domain.0;
        ChartScene {
            mapper,
            slider_geometry,
            slider_scale,
            paths: BTreeMap::new(),
            next_id: 0,
            gridlines: Vec::new(),
            year_ticks: Vec::new(),
            diff_ticks: Vec::new(),
            reference_x: mapper.year_to_x(start),
            slider: SliderScene {
                track: slider_geometry.x_range(),
                track_y,
                handle_x: slider_scale.map(start),
                label: format_year(start),
                label_y: track_y - LABEL_OFFSET,
            },
        }
    }

    pub fn mapper(&self) -> &ScaleMapper {
        &self.mapper
    }

    pub fn slider_geometry(&self) -> &PlotGeometry {
        &self.slider_geometry
    }

    /// Paths in country order.
    pub fn paths(&self) -> impl Iterator<Item = &PathElement> {
        self.paths.values()
    }

    pub fn path(&self, country: &str) -> Option<&PathElement> {
        self.paths.get(country)
    }

    pub fn gridlines(&self) -> &[GridLine] {
        &self.gridlines
    }

    /// Year labels along the bottom of the chart.
    pub fn year_ticks(&self) -> &[Tick] {
        &self.year_ticks
    }

    /// Labels of the floating axis. The zero label is left out because the
    /// zero gridline already marks it.
    pub fn diff_ticks(&self) -> &[Tick] {
        &self.diff_ticks
    }

    pub fn reference_x(&self) -> f64 {
        self.reference_x
    }

    pub fn slider(&self) -> &SliderScene {
        &self.slider
    }

    fn vertices(&self, series: &DerivedSeries) -> Vec<Point> {
        series
            .points
            .iter()
            .map(|p| {
                (
                    self.mapper.year_to_x(p.year as f64),
                    self.mapper.diff_to_y(p.diff),
                )
            })
            .collect()
    }

    fn path_entry(&mut self, country: &str) -> &mut PathElement {
        let next_id = &mut self.next_id;
        self.paths
            .entry(country.to_string())
            .or_insert_with(|| {
                let id = PathId(*next_id);
                *next_id += 1;
                PathElement {
                    id,
                    country: country.to_string(),
                    vertices: Vec::new(),
                    visible: false,
                }
            })
    }
}

fn format_year(year: f64) -> String {
    format!("{}", year.round() as i64)
}

fn format_diff(diff: f64) -> String {
    if diff > 0.0 {
        format!("+{diff}")
    } else {
        format!("{diff}")
    }
}

impl Renderer for ChartScene {
    fn initial_draw(&mut self, data: &Rebaselined) {
        let (x1, _) = self.mapper.geometry.x_range();
        let x2 = self.mapper.geometry.chart_width;

        self.gridlines = self
            .mapper
            .y
            .ticks(((self.mapper.y.domain.1 - self.mapper.y.domain.0) / GRID_STEP) as usize)
            .into_iter()
            .rev()
            .map(|value| GridLine {
                value,
                y: self.mapper.diff_to_y(value),
                x1,
                x2,
                emphasised: value == 0.0,
            })
            .collect();

        self.year_ticks = self
            .mapper
            .x
            .ticks(10)
            .into_iter()
            .map(|year| Tick {
                pos: self.mapper.year_to_x(year),
                label: format_year(year),
            })
            .collect();

        self.diff_ticks = self
            .mapper
            .y
            .ticks(10)
            .into_iter()
            .filter(|v| *v != 0.0)
            .map(|v| Tick {
                pos: self.mapper.diff_to_y(v),
                label: format_diff(v),
            })
            .collect();

        let countries: BTreeSet<&str> = data
            .series
            .iter()
            .map(|s| s.country.as_str())
            .chain(data.skipped.iter().map(String::as_str))
            .collect();
        for country in countries {
            self.path_entry(country);
        }
        self.update_paths(data);
        self.move_reference_line(data.baseline_year as f64);
        self.move_handle(data.baseline_year as f64);
    }

    fn update_paths(&mut self, data: &Rebaselined) {
        for path in self.paths.values_mut() {
            path.visible = false;
        }
        for series in &data.series {
            let vertices = self.vertices(series);
            let path = self.path_entry(&series.country);
            path.vertices = vertices;
            path.visible = true;
        }
    }

    fn move_reference_line(&mut self, year: f64) {
        self.reference_x = self.mapper.year_to_x(year);
    }

    fn move_handle(&mut self, year: f64) {
        self.slider.handle_x = self.slider_scale.map(year);
        self.slider.label = format_year(year);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::baseline::recompute;
    use crate::data::model::{Dataset, Observation};
    use crate::layout::Layout;

    fn dataset() -> Dataset {
        let rows = [
            ("A", 1960, 50.0),
            ("A", 1970, 55.0),
            ("A", 1980, 60.0),
            ("B", 1970, 42.0),
            ("B", 1980, 44.0),
        ];
        Dataset::from_observations(
            rows.iter()
                .map(|&(c, y, le)| Observation {
                    country: c.to_string(),
                    year: y,
                    life_expectancy: le,
                })
                .collect(),
        )
        .unwrap()
    }

    fn scene(ds: &Dataset) -> ChartScene {
        let layout = Layout::default();
        let mapper = ScaleMapper::new(PlotGeometry::new(&layout.chart), ds.year_extent());
        ChartScene::new(mapper, PlotGeometry::new(&layout.slider))
    }

    fn ids(scene: &ChartScene) -> Vec<(String, PathId)> {
        scene.paths().map(|p| (p.country.clone(), p.id)).collect()
    }

    #[test]
    fn initial_draw_builds_everything() {
        let ds = dataset();
        let mut s = scene(&ds);
        s.initial_draw(&recompute(&ds, 1960));

        assert_eq!(s.gridlines().len(), 11);
        assert_eq!(s.gridlines()[0].value, 50.0);
        let zero: Vec<f64> = s.gridlines().iter().filter(|g| g.emphasised).map(|g| g.value).collect();
        assert_eq!(zero, [0.0]);
        assert_eq!(s.diff_ticks().len(), 10);
        assert!(s.diff_ticks().iter().all(|t| t.label != "0"));
        assert_eq!(s.diff_ticks()[0].label, "-50");

        assert_eq!(s.paths().count(), 2);
        assert!(s.path("A").unwrap().visible);
        assert!(!s.path("B").unwrap().visible);
        assert_eq!(s.reference_x(), s.mapper().year_to_x(1960.0));
        assert_eq!(s.slider().label, "1960");
    }

    #[test]
    fn updates_keep_path_identity() {
        let ds = dataset();
        let mut s = scene(&ds);
        s.initial_draw(&recompute(&ds, 1960));
        let before = ids(&s);

        s.update_paths(&recompute(&ds, 1970));
        assert_eq!(ids(&s), before);
        assert!(s.path("B").unwrap().visible);

        s.update_paths(&recompute(&ds, 1960));
        assert_eq!(ids(&s), before);
        assert!(!s.path("B").unwrap().visible);
    }

    #[test]
    fn vertices_follow_the_scales() {
        let ds = dataset();
        let mut s = scene(&ds);
        s.initial_draw(&recompute(&ds, 1970));
        let a = s.path("A").unwrap();
        let m = s.mapper();
        assert_eq!(a.vertices.len(), 3);
        assert_eq!(a.vertices[1], (m.year_to_x(1970.0), m.diff_to_y(0.0)));
        assert_eq!(a.vertices[0].1, m.diff_to_y(-5.0));
        assert_eq!(a.curve().len(), 2);
    }

    #[test]
    fn handle_and_reference_line_move() {
        let ds = dataset();
        let mut s = scene(&ds);
        s.initial_draw(&recompute(&ds, 1960));
        s.move_reference_line(1975.0);
        s.move_handle(1974.6);
        assert_eq!(s.reference_x(), s.mapper().year_to_x(1975.0));
        assert_eq!(s.slider().label, "1975");
        assert!(s.slider().handle_x > s.slider().track.0);
        assert!(s.slider().handle_x < s.slider().track.1);
    }
}
