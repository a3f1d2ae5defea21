// Library crate: the headless planner engine, exposed for integration tests
// and the JSON command interface.
// Window-specific modules (app, ui, viewport painting) remain in the binary crate.

pub mod command;
pub mod fixtures;
pub mod harness;
pub mod interaction;
pub mod scene;
pub mod state;
pub mod sync;

/// Camera, mesh data and ray primitives shared by the engine and the painter.
/// Painting and input handling stay in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod mesh;
    pub mod picking;
}
