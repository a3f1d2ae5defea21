//! JSON command protocol for driving the planner headlessly.
//!
//! Pointer positions are NDC pairs `[x, y]` in the harness viewport.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use shared::{FurnitureKind, ItemId};

use crate::harness::PlannerHarness;

/// A command an external driver can execute
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlannerCommand {
    /// Add an item directly at room-plane (x, y)
    Add {
        kind: FurnitureKind,
        x: f32,
        y: f32,
    },
    Remove {
        id: ItemId,
    },
    /// Undoable move
    Move {
        id: ItemId,
        x: f32,
        y: f32,
    },
    Rotate {
        id: ItemId,
    },
    Clear,
    Select {
        id: ItemId,
    },
    ClearSelection,
    RotateSelected,
    DeleteSelected,
    Undo,
    Redo,
    /// Palette drop at a pointer position
    Drop {
        payload: String,
        pointer: [f32; 2],
    },
    PointerDown {
        pointer: [f32; 2],
    },
    PointerMove {
        pointer: [f32; 2],
    },
    PointerUp,
    PointerLeave,
    /// One non-blocking reconcile pass
    Sync,
    /// List items, selection and rendering state
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn pointer(p: [f32; 2]) -> Vec2 {
    Vec2::from(p)
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut PlannerHarness, cmd: PlannerCommand) -> CommandResponse {
    match cmd {
        PlannerCommand::Add { kind, x, y } => {
            let id = harness.add_item(kind, x, y);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        PlannerCommand::Remove { id } => {
            if harness.remove_item(id) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("No item with id {id}"))
            }
        }

        PlannerCommand::Move { id, x, y } => {
            if harness.move_item(id, x, y) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("No item with id {id}"))
            }
        }

        PlannerCommand::Rotate { id } => match harness.rotate_item(id) {
            Some(rotation) => {
                CommandResponse::ok_with_data(serde_json::json!({ "rotation_degrees": rotation }))
            }
            None => CommandResponse::err(format!("No item with id {id}")),
        },

        PlannerCommand::Clear => {
            harness.clear();
            CommandResponse::ok()
        }

        PlannerCommand::Select { id } => {
            if harness.select(id) {
                CommandResponse::ok_with_data(serde_json::json!({ "selected": id }))
            } else {
                CommandResponse::err(format!("No item with id {id}"))
            }
        }

        PlannerCommand::ClearSelection => {
            harness.clear_selection();
            CommandResponse::ok()
        }

        // Without a selection these are no-ops, not errors
        PlannerCommand::RotateSelected => {
            let rotation = harness.rotate_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "rotation_degrees": rotation }))
        }

        PlannerCommand::DeleteSelected => {
            let deleted = harness.delete_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "deleted": deleted }))
        }

        PlannerCommand::Undo => {
            let success = harness.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        PlannerCommand::Redo => {
            let success = harness.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        PlannerCommand::Drop { payload, pointer: p } => {
            let id = harness.drop_payload(&payload, pointer(p));
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        PlannerCommand::PointerDown { pointer: p } => {
            let picked = harness.pointer_down(pointer(p));
            CommandResponse::ok_with_data(serde_json::json!({ "picked": picked }))
        }

        PlannerCommand::PointerMove { pointer: p } => {
            let moved = harness.pointer_move(pointer(p));
            CommandResponse::ok_with_data(serde_json::json!({ "moved": moved }))
        }

        PlannerCommand::PointerUp => {
            harness.pointer_up();
            CommandResponse::ok()
        }

        PlannerCommand::PointerLeave => {
            harness.pointer_leave();
            CommandResponse::ok()
        }

        PlannerCommand::Sync => {
            let report = harness.reconcile();
            CommandResponse::ok_with_data(serde_json::json!({
                "loads_started": report.loads_started,
                "created": report.created,
                "moved": report.moved,
                "removed": report.removed,
                "failed": report.failed,
                "pending": harness.pending_loads(),
            }))
        }

        PlannerCommand::Inspect => {
            let items: Vec<serde_json::Value> = harness
                .items()
                .iter()
                .map(|record| {
                    serde_json::json!({
                        "id": record.id,
                        "kind": record.kind,
                        "x": record.position.x,
                        "y": record.position.y,
                        "rotation_degrees": record.rotation_degrees,
                        "rendered": harness.node_of(record.id).is_some(),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "item_count": items.len(),
                "items": items,
                "selected": harness.selected(),
                "pending_loads": harness.pending_loads(),
                "failed_loads": harness.failed_loads(),
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut PlannerHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: PlannerCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut PlannerHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<PlannerCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use tokio::runtime::Handle;

    use super::*;

    #[test]
    fn test_command_serde_undo() {
        let json = r#"{"command": "undo"}"#;
        let cmd: PlannerCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, PlannerCommand::Undo));
    }

    #[test]
    fn test_command_serde_add() {
        let json = r#"{"command": "add", "kind": "wardrobe", "x": 1.0, "y": -2.0}"#;
        let cmd: PlannerCommand = serde_json::from_str(json).unwrap();
        match cmd {
            PlannerCommand::Add { kind, x, y } => {
                assert_eq!(kind, FurnitureKind::Wardrobe);
                assert_eq!((x, y), (1.0, -2.0));
            }
            _ => panic!("Expected Add"),
        }
    }

    #[test]
    fn test_command_serde_drop() {
        let json = r#"{"command": "drop", "payload": "desk", "pointer": [0.1, -0.2]}"#;
        let cmd: PlannerCommand = serde_json::from_str(json).unwrap();
        match cmd {
            PlannerCommand::Drop { payload, pointer } => {
                assert_eq!(payload, "desk");
                assert_eq!(pointer, [0.1, -0.2]);
            }
            _ => panic!("Expected Drop"),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"command": "add", "kind": "sofa", "x": 0.0, "y": 0.0}"#;
        assert!(serde_json::from_str::<PlannerCommand>(json).is_err());
    }

    #[tokio::test]
    async fn test_execute_add_and_inspect() {
        let mut h = PlannerHarness::new(Handle::current());
        let resp = execute_json(&mut h, r#"{"command": "add", "kind": "bed", "x": 0.5, "y": 0.5}"#)
            .unwrap();
        assert!(resp.success);
        assert_eq!(h.item_count(), 1);

        let data = execute_json(&mut h, r#"{"command": "inspect"}"#)
            .unwrap()
            .data
            .unwrap();
        assert_eq!(data["item_count"], 1);
        assert_eq!(data["items"][0]["kind"], "bed");
        assert_eq!(data["items"][0]["rendered"], false);
    }

    #[tokio::test]
    async fn test_execute_unknown_id_fails() {
        let mut h = PlannerHarness::new(Handle::current());
        for json in [
            r#"{"command": "remove", "id": 9}"#,
            r#"{"command": "move", "id": 9, "x": 1.0, "y": 1.0}"#,
            r#"{"command": "rotate", "id": 9}"#,
            r#"{"command": "select", "id": 9}"#,
        ] {
            let resp = execute_json(&mut h, json).unwrap();
            assert!(!resp.success, "{json}");
            assert!(resp.error.is_some());
        }
    }

    #[tokio::test]
    async fn test_selected_commands_without_selection_are_noops() {
        let mut h = PlannerHarness::new(Handle::current());
        h.add_item(FurnitureKind::Chair, 0.0, 0.0);

        let resp = execute_json(&mut h, r#"{"command": "rotate_selected"}"#).unwrap();
        assert!(resp.success);
        assert!(resp.data.unwrap()["rotation_degrees"].is_null());

        let resp = execute_json(&mut h, r#"{"command": "delete_selected"}"#).unwrap();
        assert_eq!(resp.data.unwrap()["deleted"], false);
        assert_eq!(h.item_count(), 1);
    }

    #[tokio::test]
    async fn test_execute_batch() {
        let mut h = PlannerHarness::new(Handle::current());
        let json = r#"[
            {"command": "add", "kind": "desk", "x": 0.0, "y": 0.0},
            {"command": "select", "id": 1},
            {"command": "rotate_selected"},
            {"command": "rotate_selected"},
            {"command": "undo"}
        ]"#;
        let responses = execute_json_batch(&mut h, json).unwrap();
        assert_eq!(responses.len(), 5);
        assert!(responses.iter().all(|r| r.success));
        assert_eq!(h.item(1).unwrap().rotation_degrees, 90);
    }

    #[tokio::test]
    async fn test_execute_invalid_json() {
        let mut h = PlannerHarness::new(Handle::current());
        let result = execute_json(&mut h, "not valid json");
        assert!(result.unwrap_err().starts_with("Invalid command JSON"));
    }
}
