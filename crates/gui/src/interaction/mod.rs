//! Pointer interaction: raycasts, drag controller, palette drops

pub mod drag;
pub mod drop;
pub mod raycast;

pub use drag::{DragController, DragPhase, DragSession};
pub use drop::DropHandler;
pub use raycast::{cast_to_surface, pick_item, RaycastView};
