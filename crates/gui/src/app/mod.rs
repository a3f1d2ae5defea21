//! Main application module

mod keyboard;
mod menus;
mod styles;

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use roomplan_lib::interaction::DragController;
use roomplan_lib::scene::{build_room, SceneGraph};
use roomplan_lib::state::PlannerState;
use roomplan_lib::sync::{FileModelLoader, ModelLoader, ProceduralModelLoader, SceneSynchronizer};
use roomplan_lib::viewport::camera::ArcBallCamera;
use tokio::runtime::Handle;

use crate::ui::{palette, status_bar, toolbar};
use crate::viewport::ViewportPanel;

/// Poll interval while models are still loading in the background
const LOAD_POLL: Duration = Duration::from_millis(50);

/// Main application
pub struct PlannerApp {
    state: PlannerState,
    drag: DragController,
    scene: SceneGraph,
    sync: SceneSynchronizer,
    viewport: ViewportPanel,
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: Handle) -> Self {
        let state = PlannerState::load();

        styles::configure_styles(&cc.egui_ctx, &state.settings.viewport);

        let mut scene = SceneGraph::new();
        build_room(&mut scene, &state.settings.room, &state.settings.viewport);

        let loader: Arc<dyn ModelLoader> = match &state.settings.assets.model_dir {
            Some(dir) => {
                tracing::info!("Loading furniture models from {}", dir.display());
                Arc::new(FileModelLoader::new(dir.clone()))
            }
            None => Arc::new(ProceduralModelLoader),
        };
        let mut sync = SceneSynchronizer::new(loader, runtime);
        sync.subscribe_to(&state.store);

        let mut viewport = ViewportPanel::new(ArcBallCamera::from_settings(&state.settings.camera));

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        Self {
            state,
            drag: DragController::new(),
            scene,
            sync,
            viewport,
        }
    }

    /// Bring the scene in line with the store; keep repainting while loads are in flight
    fn sync_scene(&mut self, ctx: &egui::Context) {
        if let Some(report) = self.sync.sync_if_changed(&self.state.store, &mut self.scene) {
            if !report.is_noop() {
                tracing::trace!(?report, "scene synchronized");
                ctx.request_repaint();
            }
        }
        if self.sync.pending_loads() > 0 {
            ctx.request_repaint_after(LOAD_POLL);
        }
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_scene(ctx);

        keyboard::handle_keyboard(ctx, &mut self.state, &mut self.drag);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &self.state);
                menus::edit_menu(ui, &mut self.state, &mut self.drag);
                menus::view_menu(ui, &self.state, &mut self.viewport, &mut self.sync);
            });
        });

        // ── Toolbar ───────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.state, &mut self.drag);
            });

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state, &self.drag, self.sync.pool());
            });

        // ── Left panel: furniture palette ────────────────────
        egui::SidePanel::left("palette")
            .default_width(180.0)
            .width_range(140.0..=320.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)))
            .show(ctx, |ui| {
                palette::show(ui);
            });

        // ── Central panel: 3D room ───────────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport
                    .show(ui, &mut self.state, &mut self.drag, &self.scene);
            });

        self.state.prune_selection();
        self.sync_scene(ctx);
    }

    fn on_exit(&mut self, gl: Option<&eframe::glow::Context>) {
        self.state.settings.save();
        self.sync.teardown(&mut self.scene);
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
    }
}
