//! Toolbar actions and UI

use egui::Ui;
use roomplan_lib::interaction::DragController;
use roomplan_lib::state::PlannerState;

use crate::i18n::t;

// ── Public actions (callable from menus and shortcuts too) ───

pub fn action_rotate(state: &mut PlannerState, drag: &DragController) {
    if let Some(rotation) = drag.rotate_selected(&state.selection, &mut state.store) {
        tracing::debug!("Rotated selection to {rotation}°");
    }
}

pub fn action_delete(state: &mut PlannerState, drag: &mut DragController) {
    drag.delete_selected(&mut state.selection, &mut state.store);
}

// Undo/redo end any drag in progress; its moves would otherwise land
// outside the history
pub fn action_undo(state: &mut PlannerState, drag: &mut DragController) {
    drag.pointer_leave();
    state.store.undo();
    state.prune_selection();
}

pub fn action_redo(state: &mut PlannerState, drag: &mut DragController) {
    drag.pointer_leave();
    state.store.redo();
    state.prune_selection();
}

pub fn action_clear(state: &mut PlannerState, drag: &mut DragController) {
    drag.pointer_leave();
    state.store.clear_all();
    state.selection.clear();
}

// ── UI ───────────────────────────────────────────────────────

pub fn show(ui: &mut Ui, state: &mut PlannerState, drag: &mut DragController) {
    ui.horizontal(|ui| {
        if ui
            .add_enabled(state.store.can_undo(), egui::Button::new(t("toolbar.undo")))
            .on_hover_text(t("toolbar.undo_tip"))
            .clicked()
        {
            action_undo(state, drag);
        }
        if ui
            .add_enabled(state.store.can_redo(), egui::Button::new(t("toolbar.redo")))
            .on_hover_text(t("toolbar.redo_tip"))
            .clicked()
        {
            action_redo(state, drag);
        }

        ui.separator();

        // Contextual controls stay visible after a drag or a plain click
        let has_selection = state.selection.has_selection();
        if ui
            .add_enabled(has_selection, egui::Button::new(t("toolbar.rotate")))
            .on_hover_text(t("toolbar.rotate_tip"))
            .clicked()
        {
            action_rotate(state, drag);
        }
        if ui
            .add_enabled(has_selection, egui::Button::new(t("toolbar.delete")))
            .clicked()
        {
            action_delete(state, drag);
        }

        ui.separator();

        if ui
            .add_enabled(state.store.count() > 0, egui::Button::new(t("toolbar.clear")))
            .clicked()
        {
            action_clear(state, drag);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!("{}: {}", t("status.items"), state.store.count()));
        });
    });
}
