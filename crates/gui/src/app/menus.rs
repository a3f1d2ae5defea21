//! Application menu bar

use eframe::egui;
use roomplan_lib::interaction::DragController;
use roomplan_lib::state::PlannerState;
use roomplan_lib::sync::SceneSynchronizer;

use crate::i18n::{lang, set_lang, t, Lang};
use crate::ui::toolbar;
use crate::viewport::ViewportPanel;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &PlannerState) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.quit")).clicked() {
            state.settings.save();
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            ui.close_menu();
        }
    });
}

/// Show the edit menu
pub fn edit_menu(ui: &mut egui::Ui, state: &mut PlannerState, drag: &mut DragController) {
    ui.menu_button(t("menu.edit"), |ui| {
        if ui
            .add_enabled(state.store.can_undo(), egui::Button::new(t("menu.undo")))
            .clicked()
        {
            toolbar::action_undo(state, drag);
            ui.close_menu();
        }
        if ui
            .add_enabled(state.store.can_redo(), egui::Button::new(t("menu.redo")))
            .clicked()
        {
            toolbar::action_redo(state, drag);
            ui.close_menu();
        }

        ui.separator();

        let has_selection = state.selection.has_selection();
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.rotate")))
            .clicked()
        {
            toolbar::action_rotate(state, drag);
            ui.close_menu();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.delete")))
            .clicked()
        {
            toolbar::action_delete(state, drag);
            ui.close_menu();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new(t("menu.deselect")))
            .clicked()
        {
            state.selection.clear();
            ui.close_menu();
        }

        ui.separator();

        if ui
            .add_enabled(state.store.count() > 0, egui::Button::new(t("menu.clear")))
            .clicked()
        {
            toolbar::action_clear(state, drag);
            ui.close_menu();
        }
    });
}

/// Show the view menu
pub fn view_menu(
    ui: &mut egui::Ui,
    state: &PlannerState,
    viewport: &mut ViewportPanel,
    sync: &mut SceneSynchronizer,
) {
    ui.menu_button(t("menu.view"), |ui| {
        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera(state);
            ui.close_menu();
        }
        if ui
            .add_enabled(
                sync.pool().failed_count() > 0,
                egui::Button::new(t("menu.retry_loads")),
            )
            .clicked()
        {
            let retried = sync.retry_failed();
            tracing::info!("Retrying {retried} failed model loads");
            ui.close_menu();
        }

        ui.separator();

        ui.menu_button(t("menu.language"), |ui| {
            let current = lang();
            if ui.radio(current == Lang::Ru, "Русский").clicked() {
                set_lang(Lang::Ru);
                ui.close_menu();
            }
            if ui.radio(current == Lang::En, "English").clicked() {
                set_lang(Lang::En);
                ui.close_menu();
            }
        });
    });
}
