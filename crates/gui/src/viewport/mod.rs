//! 3D viewport panel: room rendering, pointer interaction and palette drops

mod gl_renderer;
mod overlays;
mod renderer;
pub use roomplan_lib::viewport::{camera, mesh};

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use egui::Ui;
use glam::Vec2;
use roomplan_lib::interaction::{DragController, DropHandler, RaycastView};
use roomplan_lib::scene::{NodeId, SceneGraph};
use roomplan_lib::state::settings::rgb_to_f32;
use roomplan_lib::state::PlannerState;

use camera::{screen_to_ndc, ArcBallCamera};
use gl_renderer::{DrawItem, GlRenderer};
use mesh::MeshData;

/// 3D viewport panel
pub struct ViewportPanel {
    camera: ArcBallCamera,
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    /// Nodes whose meshes the GL renderer already holds
    uploaded: HashSet<NodeId>,
}

impl ViewportPanel {
    pub fn new(camera: ArcBallCamera) -> Self {
        Self {
            camera,
            gl_renderer: None,
            uploaded: HashSet::new(),
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::warn!("GL renderer unavailable, using software rendering: {e}"),
        }
    }

    /// Free GPU resources; the GL context is going away
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(r) = renderer.lock() {
                r.destroy(gl);
            }
        }
        self.uploaded.clear();
    }

    pub fn reset_camera(&mut self, state: &PlannerState) {
        self.camera = ArcBallCamera::from_settings(&state.settings.camera);
    }

    pub fn show(
        &mut self,
        ui: &mut Ui,
        state: &mut PlannerState,
        drag: &mut DragController,
        scene: &SceneGraph,
    ) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let aspect = rect.width() / rect.height().max(1.0);
        let to_ndc = |pos: egui::Pos2| {
            screen_to_ndc(
                Vec2::new(pos.x, pos.y),
                Vec2::new(rect.min.x, rect.min.y),
                Vec2::new(rect.width(), rect.height()),
            )
        };

        // ── Palette drop ─────────────────────────────
        let drop_hover = response
            .dnd_hover_payload::<String>()
            .is_some_and(|payload| DropHandler::accepts(&payload));
        if let Some(payload) = response.dnd_release_payload::<String>() {
            if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                let view = RaycastView::new(&self.camera, aspect, scene);
                if let Some(id) =
                    DropHandler::handle_drop(&payload, to_ndc(pos), &view, &mut state.store)
                {
                    tracing::info!("Placed {payload} as item {id}");
                }
            }
        }

        // ── Select and drag ──────────────────────────
        let (pressed, released, pointer_pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let view = RaycastView::new(&self.camera, aspect, scene);
        if pressed && response.contains_pointer() {
            if let Some(pos) = pointer_pos {
                drag.pointer_down(to_ndc(pos), &view, &mut state.selection);
            }
        }
        if drag.is_dragging() {
            if !response.contains_pointer() {
                drag.pointer_leave();
            } else if let Some(pos) = response.hover_pos() {
                drag.pointer_move(to_ndc(pos), &view, &mut state.store);
            }
        }
        if released {
            drag.pointer_up();
        }

        // ── Camera controls ──────────────────────────
        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            self.camera.rotate(-delta.x * 0.4, delta.y * 0.4);
        }
        if response.dragged_by(egui::PointerButton::Middle) {
            let delta = response.drag_delta();
            let scale = self.camera.distance * 0.002;
            self.camera.pan(-delta.x * scale, delta.y * scale);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll * 0.01);
            }
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        // ── Rendering ────────────────────────────────
        let selected = state.selection.selected();
        if self.gl_renderer.is_some() {
            self.render_gl(ui, rect, scene, state, selected);
        } else {
            renderer::paint_viewport(
                ui,
                rect,
                &self.camera,
                scene,
                selected,
                &state.settings.viewport,
            );
        }

        // ── Overlays ─────────────────────────────────
        let painter = ui.painter_at(rect);
        if drop_hover {
            overlays::draw_drop_hint(&painter, rect);
        }
        overlays::draw_selection_label(&painter, rect, &self.camera, state);
        if state.store.count() == 0 {
            overlays::draw_empty_hint(&painter, rect);
        }
    }

    fn render_gl(
        &mut self,
        ui: &mut Ui,
        rect: egui::Rect,
        scene: &SceneGraph,
        state: &PlannerState,
        selected: Option<shared::ItemId>,
    ) {
        let Some(gl_renderer) = &self.gl_renderer else {
            return;
        };

        let mut added: Vec<(NodeId, MeshData)> = Vec::new();
        let mut live = HashSet::new();
        let mut draws = Vec::new();
        for (node, mesh, world) in scene.drawables() {
            live.insert(node);
            if self.uploaded.insert(node) {
                added.push((node, mesh.clone()));
            }
            draws.push(DrawItem {
                node,
                world,
                highlighted: selected.is_some() && scene.owning_item(node) == selected,
            });
        }
        self.uploaded.retain(|id| live.contains(id));

        let renderer = gl_renderer.clone();
        let camera = self.camera.clone();
        let bg_color = state.settings.viewport.background_color;
        let selection_color = rgb_to_f32(state.settings.viewport.selection_color);

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let gl = painter.gl();

                let clip = info.clip_rect_in_pixels();
                let params = gl_renderer::RenderParams {
                    viewport: [
                        clip.left_px as f32,
                        clip.from_bottom_px as f32,
                        clip.width_px as f32,
                        clip.height_px as f32,
                    ],
                    bg_color,
                    selection_color,
                };

                if let Ok(mut r) = renderer.lock() {
                    r.sync_meshes(gl, &added, &live);
                    r.paint(gl, &camera, &params, &draws);
                }
            })),
        };

        ui.painter().add(callback);
    }
}
