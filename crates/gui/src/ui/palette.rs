//! Furniture palette: one drag source per kind

use egui::Ui;
use shared::FurnitureKind;

use crate::i18n::{kind_name, t};

/// Palette entries carry the kind name as a `String` drag payload
pub fn show(ui: &mut Ui) {
    ui.heading(t("palette.title"));
    ui.weak(t("palette.hint"));
    ui.separator();

    for kind in FurnitureKind::ALL {
        let id = egui::Id::new(("palette", kind.name()));
        ui.dnd_drag_source(id, kind.name().to_string(), |ui| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.add(
                    egui::Label::new(format!("{}  {}", kind.icon(), kind_name(kind)))
                        .selectable(false),
                );
            });
        });
        ui.add_space(4.0);
    }
}
