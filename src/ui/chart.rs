use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui, Vec2,
};
use palette::Srgb;

use crate::color::Highlights;
use crate::render::curve::{Point, flatten};
use crate::render::scene::{ChartScene, HANDLE_RADIUS};
use crate::render::{GRID_COLOR, TEXT_COLOR, ZERO_LINE_COLOR};
use crate::scale::PlotGeometry;
use crate::state::{AppState, ChartSession};

/// Samples per curve segment when flattening paths for the painter.
const CURVE_STEPS: usize = 8;

fn color(c: Srgb<u8>, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(c.red, c.green, c.blue, alpha)
}

/// Maps scene coordinates of one panel to screen coordinates.
struct Frame {
    offset: Vec2,
}

impl Frame {
    fn new(rect: Rect, geometry: &PlotGeometry) -> Self {
        let (ox, oy) = geometry.origin();
        Frame {
            offset: rect.min.to_vec2() + Vec2::new(ox as f32, oy as f32),
        }
    }

    fn pos(&self, (x, y): Point) -> Pos2 {
        Pos2::new(x as f32, y as f32) + self.offset
    }

    /// Screen x back to scene x.
    fn scene_x(&self, screen: Pos2) -> f64 {
        (screen.x - self.offset.x) as f64
    }
}

// ---------------------------------------------------------------------------
// Central panel: chart above, slider below
// ---------------------------------------------------------------------------

pub fn chart_view(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = state.session.as_mut() else {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) if state.status_is_error => {
                ui.label(RichText::new(msg).color(Color32::RED).heading());
            }
            _ => {
                ui.heading("Open a life expectancy file  (File → Open…)");
            }
        });
        return;
    };

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            paint_chart(ui, &session.scene, &state.highlights);
            slider_strip(ui, session);
        });
}

fn paint_chart(ui: &mut Ui, scene: &ChartScene, highlights: &Highlights) {
    let geometry = &scene.mapper().geometry;
    let size = Vec2::new(geometry.layout.width as f32, geometry.layout.height as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let frame = Frame::new(response.rect, geometry);
    let text = color(TEXT_COLOR, 1.0);

    painter.rect_filled(response.rect, 0.0, Color32::WHITE);

    for g in scene.gridlines() {
        let stroke = if g.emphasised {
            Stroke::new(2.0, color(ZERO_LINE_COLOR, 1.0))
        } else {
            Stroke::new(1.0, color(GRID_COLOR, 1.0))
        };
        painter.line_segment([frame.pos((g.x1, g.y)), frame.pos((g.x2, g.y))], stroke);
    }

    // Faint paths first so highlighted ones end up on top.
    let (highlighted, faint): (Vec<_>, Vec<_>) = scene
        .paths()
        .filter(|p| p.visible)
        .partition(|p| highlights.contains(&p.country));
    for path in faint.into_iter().chain(highlighted) {
        let style = highlights.style_for(&path.country);
        let points: Vec<Pos2> = flatten(&path.curve(), CURVE_STEPS)
            .into_iter()
            .map(|p| frame.pos(p))
            .collect();
        painter.add(Shape::line(
            points,
            Stroke::new(style.width, color(style.color, style.opacity)),
        ));
    }

    let (bottom, top) = geometry.y_range();
    let ref_x = scene.reference_x();
    painter.line_segment(
        [frame.pos((ref_x, top)), frame.pos((ref_x, bottom))],
        Stroke::new(1.0, color(ZERO_LINE_COLOR, 0.5)),
    );
    for t in scene.diff_ticks() {
        painter.text(
            frame.pos((ref_x, t.pos)),
            Align2::CENTER_CENTER,
            &t.label,
            FontId::monospace(14.0),
            text,
        );
    }

    for t in scene.year_ticks() {
        painter.text(
            frame.pos((t.pos, bottom + 6.0)),
            Align2::CENTER_TOP,
            &t.label,
            FontId::monospace(12.0),
            text,
        );
    }
}

fn slider_strip(ui: &mut Ui, session: &mut ChartSession) {
    let geometry = *session.scene.slider_geometry();
    let size = Vec2::new(geometry.layout.width as f32, geometry.layout.height as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
    let frame = Frame::new(response.rect, &geometry);

    if let Some(pos) = response.interact_pointer_pos() {
        if response.drag_started() {
            session.drag_start(frame.scene_x(pos));
        } else if response.dragged() {
            session.drag_to(frame.scene_x(pos));
        }
    }
    if response.drag_stopped() {
        session.drag_end();
    }

    let s = session.scene.slider();
    let track = Stroke::new(8.0, Color32::from_gray(220));
    painter.line_segment(
        [frame.pos((s.track.0, s.track_y)), frame.pos((s.track.1, s.track_y))],
        track,
    );
    let handle = frame.pos((s.handle_x, s.track_y));
    painter.circle(
        handle,
        HANDLE_RADIUS as f32,
        Color32::WHITE,
        Stroke::new(1.0, Color32::from_gray(127)),
    );
    painter.text(
        frame.pos((s.handle_x, s.label_y)),
        Align2::CENTER_CENTER,
        &s.label,
        FontId::monospace(16.0),
        color(TEXT_COLOR, 1.0),
    );

    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
    }
}
