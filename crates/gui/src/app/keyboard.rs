//! Keyboard shortcut handling

use eframe::egui;
use roomplan_lib::interaction::DragController;
use roomplan_lib::state::PlannerState;

use crate::ui::toolbar;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut PlannerState, drag: &mut DragController) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (undo, redo, rotate, delete, escape) = ctx.input(|i| {
        let cmd = i.modifiers.command;
        (
            cmd && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
            (cmd && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (cmd && i.key_pressed(egui::Key::Y)),
            !cmd && i.key_pressed(egui::Key::R),
            i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
            i.key_pressed(egui::Key::Escape),
        )
    });

    if undo {
        toolbar::action_undo(state, drag);
    }
    if redo {
        toolbar::action_redo(state, drag);
    }
    if rotate {
        toolbar::action_rotate(state, drag);
    }
    if delete {
        toolbar::action_delete(state, drag);
    }
    if escape {
        // Escape cancels a drag in progress before it clears the selection
        if drag.is_dragging() {
            drag.pointer_leave();
        } else {
            state.selection.clear();
        }
    }
}
