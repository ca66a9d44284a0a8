use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::matching_countries;
use crate::render::svg::export_svg;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – baseline stepping and country highlights
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Baseline");
    ui.separator();

    let Some(session) = state.session.as_mut() else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("◀").clicked() {
            session.step(-1);
        }
        ui.label(RichText::new(session.baseline_year().to_string()).strong().monospace());
        if ui.button("▶").clicked() {
            session.step(1);
        }
    });
    let skipped = session.rebaselined().skipped.len();
    if skipped > 0 {
        ui.label(
            RichText::new(format!("{skipped} countries have no value this year"))
                .small()
                .weak(),
        );
    }
    ui.add_space(8.0);

    ui.heading("Countries");
    ui.separator();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Filter");
        ui.text_edit_singleline(&mut state.country_query);
    });
    if !state.highlights.is_empty() {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (country, c) in state.highlights.legend_entries() {
                ui.label(RichText::new(format!("● {country}")).color(Color32::from_rgb(
                    c.red, c.green, c.blue,
                )));
            }
        });
        if ui.small_button("Clear highlights").clicked() {
            state.highlights.clear();
        }
    }

    let visible = matching_countries(&session.dataset, &state.country_query);
    let series = session.dataset.series();
    let rebaselined = session.rebaselined();
    let highlights = &mut state.highlights;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder().clip(true))
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|_ui: &mut Ui| {});
            header.col(|ui: &mut Ui| {
                ui.strong("Country");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Base");
            });
            header.col(|ui: &mut Ui| {
                ui.strong("Latest Δ");
            });
        })
        .body(|body| {
            body.rows(18.0, visible.len(), |mut row| {
                let s = &series[visible[row.index()]];
                let derived = rebaselined.get(&s.country);

                row.col(|ui: &mut Ui| {
                    let mut checked = highlights.contains(&s.country);
                    if ui.checkbox(&mut checked, "").changed() {
                        highlights.toggle(&s.country);
                    }
                });
                row.col(|ui: &mut Ui| {
                    let mut text = RichText::new(&s.country);
                    if let Some(c) = highlights.color_for(&s.country) {
                        text = text.color(Color32::from_rgb(c.red, c.green, c.blue));
                    }
                    ui.label(text);
                });
                row.col(|ui: &mut Ui| match derived {
                    Some(d) => {
                        ui.monospace(format!("{:.1}", d.baseline));
                    }
                    None => {
                        ui.weak("–");
                    }
                });
                row.col(|ui: &mut Ui| {
                    if let Some(diff) = derived.and_then(|d| d.last_diff()) {
                        ui.monospace(format!("{diff:+.1}"));
                    }
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.session.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export SVG…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = state.source.as_deref().and_then(|p| p.file_name()) {
            ui.label(RichText::new(name.to_string_lossy()).strong());
        }

        if let Some(session) = &state.session {
            let extent = session.dataset.year_extent();
            ui.label(format!(
                "{} countries, {}–{}, baseline {}",
                session.dataset.country_count(),
                extent.min,
                extent.max,
                session.baseline_year()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if state.status_is_error {
                Color32::RED
            } else {
                Color32::from_rgb(200, 140, 0)
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open life expectancy data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

fn export_dialog(state: &mut AppState) {
    let Some(session) = &state.session else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export chart")
        .add_filter("SVG", &["svg"])
        .set_file_name(format!("life-expectancy-{}.svg", session.baseline_year()))
        .save_file();

    if let Some(path) = file {
        let highlights = &state.highlights;
        if let Err(e) = export_svg(&path, &session.scene, |c| highlights.style_for(c)) {
            log::error!("Failed to export SVG: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
            state.status_is_error = true;
        }
    }
}
