use egui::Ui;
use roomplan_lib::interaction::DragController;
use roomplan_lib::state::PlannerState;
use roomplan_lib::sync::VisualNodePool;

use crate::i18n::{kind_name, t};

pub fn show(ui: &mut Ui, state: &PlannerState, drag: &DragController, pool: &VisualNodePool) {
    ui.horizontal(|ui| {
        ui.weak(format!("{}: {}", t("status.items"), state.store.count()));

        ui.separator();

        match state.selection.selected().and_then(|id| state.store.get(id)) {
            Some(record) => {
                let verb = if drag.is_dragging() {
                    t("status.dragging")
                } else {
                    t("status.selected")
                };
                ui.label(format!(
                    "{verb}: {} #{} ({:.2}, {:.2}) {}°",
                    kind_name(record.kind),
                    record.id,
                    record.position.x,
                    record.position.y,
                    record.rotation_degrees
                ));
            }
            None => {
                ui.weak(t("status.ready"));
            }
        }

        let pending = pool.pending_count();
        if pending > 0 {
            ui.separator();
            ui.colored_label(
                egui::Color32::from_rgb(255, 200, 100),
                format!("{}: {pending}", t("status.loading")),
            );
        }

        let failed = pool.failed_count();
        if failed > 0 {
            ui.separator();
            ui.colored_label(
                egui::Color32::from_rgb(230, 90, 90),
                format!("{}: {failed}", t("status.failed")),
            );
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(concat!("roomplan v", env!("CARGO_PKG_VERSION")));
        });
    });
}
