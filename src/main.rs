use std::path::PathBuf;

use baseline_chart::app::BaselineChartApp;
use baseline_chart::layout::Layout;
use baseline_chart::state::AppState;
use clap::Parser;
use eframe::egui;

/// Life expectancy per country, relative to a baseline year you drag.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Data file: .csv, .json or .parquet with country, year and
    /// life-expectancy columns.
    #[arg(default_value = "data/life-expectancy.csv")]
    data: PathBuf,

    /// JSON file overriding the chart and slider layout.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Initial baseline year (defaults to the earliest year in the data).
    #[arg(long)]
    baseline: Option<i32>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let mut layout_error = None;
    let layout = match &cli.layout {
        Some(path) => Layout::from_file(path).unwrap_or_else(|e| {
            log::error!("Using default layout: {e:#}");
            layout_error = Some(format!("Error: {e:#}"));
            Layout::default()
        }),
        None => Layout::default(),
    };

    let mut state = AppState::new(layout, cli.baseline);
    state.load(&cli.data);
    if state.status_message.is_none() {
        if let Some(msg) = layout_error {
            state.status_message = Some(msg);
            state.status_is_error = true;
        }
    }

    let width = layout.chart.width.max(layout.slider.width) as f32 + 300.0;
    let height = (layout.chart.height + layout.slider.height) as f32 + 80.0;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Life Expectancy – Baseline Chart",
        options,
        Box::new(|_cc| Ok(Box::new(BaselineChartApp::new(state)))),
    )
}
