use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use crate::color::Highlights;
use crate::data::baseline::{Rebaselined, recompute};
use crate::data::loader::{Loaded, load_file};
use crate::data::model::Dataset;
use crate::data::normalize::NormalizeReport;
use crate::layout::Layout;
use crate::render::Renderer;
use crate::render::scene::ChartScene;
use crate::scale::{PlotGeometry, ScaleMapper};
use crate::slider::{BaselineYearChanged, SliderControl};

// ---------------------------------------------------------------------------
// Chart session – everything that exists once a dataset is loaded
// ---------------------------------------------------------------------------

pub struct ChartSession {
    pub dataset: Dataset,
    pub report: NormalizeReport,
    pub slider: SliderControl,
    events: Receiver<BaselineYearChanged>,
    baseline_year: i32,
    rebaselined: Rebaselined,
    pub scene: ChartScene,
    /// Countries already reported as missing a baseline value.
    warned: BTreeSet<String>,
}

impl ChartSession {
    /// Build scales, the slider and the first frame. The baseline starts at
    /// `initial_year` clamped to the data, or the earliest year.
    pub fn new(loaded: Loaded, layout: &Layout, initial_year: Option<i32>) -> Self {
        let Loaded { dataset, report } = loaded;
        let extent = dataset.year_extent();
        let baseline_year = initial_year.map_or(extent.min, |y| extent.clamp(y));

        let chart_geometry = PlotGeometry::new(&layout.chart);
        let slider_geometry = PlotGeometry::new(&layout.slider);

        let mut slider = SliderControl::new(&slider_geometry, extent, baseline_year);
        let events = slider.subscribe();

        let rebaselined = recompute(&dataset, baseline_year);
        let mut scene = ChartScene::new(ScaleMapper::new(chart_geometry, extent), slider_geometry);
        scene.initial_draw(&rebaselined);

        let mut session = ChartSession {
            dataset,
            report,
            slider,
            events,
            baseline_year,
            rebaselined,
            scene,
            warned: BTreeSet::new(),
        };
        session.warn_skipped();
        session
    }

    pub fn baseline_year(&self) -> i32 {
        self.baseline_year
    }

    pub fn rebaselined(&self) -> &Rebaselined {
        &self.rebaselined
    }

    /// Pointer pressed at `px` in slider plot space.
    pub fn drag_start(&mut self, px: f64) {
        self.slider.pointer_down(px);
        self.follow_handle();
    }

    /// Pointer moved to `px` in slider plot space.
    pub fn drag_to(&mut self, px: f64) {
        self.slider.pointer_move(px);
        self.follow_handle();
    }

    fn follow_handle(&mut self) {
        let position = self.slider.scale().invert(self.slider.handle_x());
        self.scene.move_handle(position);
        self.process_events();
    }

    pub fn drag_end(&mut self) {
        self.slider.pointer_up();
        self.scene.move_handle(self.slider.year() as f64);
    }

    /// Step the baseline by `delta` years from the side buttons.
    pub fn step(&mut self, delta: i32) {
        self.slider.set_year(self.baseline_year.saturating_add(delta));
        self.scene.move_handle(self.slider.year() as f64);
        self.process_events();
    }

    /// Apply every pending year change: recompute, then update paths and the
    /// reference line. Returns how many recomputes ran.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(BaselineYearChanged { year }) = self.events.try_recv() {
            self.baseline_year = year;
            self.rebaselined = recompute(&self.dataset, year);
            self.scene.update_paths(&self.rebaselined);
            self.scene.move_reference_line(year as f64);
            self.warn_skipped();
            applied += 1;
        }
        applied
    }

    fn warn_skipped(&mut self) {
        for country in &self.rebaselined.skipped {
            if self.warned.insert(country.clone()) {
                log::warn!(
                    "{country} has no value for {}, hidden until the baseline moves",
                    self.rebaselined.baseline_year
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub layout: Layout,

    /// Loaded chart (None until a file loads successfully).
    pub session: Option<ChartSession>,

    /// Country name filter typed in the side panel.
    pub country_query: String,

    pub highlights: Highlights,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// True when `status_message` reports a failure.
    pub status_is_error: bool,

    pub source: Option<PathBuf>,

    initial_year: Option<i32>,
}

impl AppState {
    pub fn new(layout: Layout, initial_year: Option<i32>) -> Self {
        Self {
            layout,
            session: None,
            country_query: String::new(),
            highlights: Highlights::default(),
            status_message: None,
            status_is_error: false,
            source: None,
            initial_year,
        }
    }

    /// Ingest a newly loaded dataset and draw the first frame.
    pub fn set_dataset(&mut self, loaded: Loaded) {
        self.status_message = if loaded.report.is_clean() {
            None
        } else {
            Some(format!(
                "{} rows dropped (see log)",
                loaded.report.dropped.len()
            ))
        };
        self.status_is_error = false;
        self.highlights.clear();
        self.session = Some(ChartSession::new(loaded, &self.layout, self.initial_year));
    }

    /// Load `path`, replacing the current chart on success. On failure the
    /// previous chart (if any) stays and the error is shown.
    pub fn load(&mut self, path: &Path) {
        match load_file(path) {
            Ok(loaded) => {
                self.set_dataset(loaded);
                self.source = Some(path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
                self.status_is_error = true;
            }
        }
    }
}
