//! Viewport overlay drawing (drop hint, selection label, empty-room hint)

use egui::Painter;
use glam::{Vec2, Vec3};
use roomplan_lib::state::PlannerState;

use super::camera::{ndc_to_screen, ArcBallCamera};
use crate::i18n::t;

/// Outline the viewport while an acceptable palette item hovers over it
pub fn draw_drop_hint(painter: &Painter, rect: egui::Rect) {
    painter.rect_stroke(
        rect.shrink(2.0),
        4.0,
        egui::Stroke::new(2.0, egui::Color32::from_rgb(90, 170, 255)),
        egui::StrokeKind::Inside,
    );
}

/// Label the selected item just above its footprint
pub fn draw_selection_label(
    painter: &Painter,
    rect: egui::Rect,
    camera: &ArcBallCamera,
    state: &PlannerState,
) {
    let Some(record) = state.selection.selected().and_then(|id| state.store.get(id)) else {
        return;
    };
    let aspect = rect.width() / rect.height().max(1.0);
    let anchor = Vec3::new(record.position.x, 0.0, record.position.y);
    let Some(ndc) = camera.project(anchor, aspect) else {
        return;
    };
    let screen = ndc_to_screen(
        ndc,
        Vec2::new(rect.min.x, rect.min.y),
        Vec2::new(rect.width(), rect.height()),
    );
    let pos = egui::pos2(screen.x, screen.y + 14.0);
    if !rect.contains(pos) {
        return;
    }

    let c = state.settings.viewport.selection_color;
    painter.text(
        pos,
        egui::Align2::CENTER_TOP,
        format!(
            "{} #{}  {}°",
            crate::i18n::kind_name(record.kind),
            record.id,
            record.rotation_degrees
        ),
        egui::FontId::proportional(12.0),
        egui::Color32::from_rgb(c[0], c[1], c[2]),
    );
}

/// Navigation hint shown while the room is empty
pub fn draw_empty_hint(painter: &Painter, rect: egui::Rect) {
    painter.text(
        egui::pos2(rect.center().x, rect.bottom() - 20.0),
        egui::Align2::CENTER_BOTTOM,
        t("status.nav_hint"),
        egui::FontId::proportional(11.0),
        egui::Color32::from_rgb(100, 100, 110),
    );
}
