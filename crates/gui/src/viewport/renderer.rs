//! Software rendering for the viewport
//!
//! Used when no GL context is available: flat-shaded triangles projected on
//! the CPU, sorted back to front and handed to egui as one mesh.

use egui::epaint::{Mesh, Vertex, WHITE_UV};
use egui::{Color32, Pos2, Rect, Shape, Ui};
use glam::{Vec2, Vec3};
use roomplan_lib::scene::SceneGraph;
use roomplan_lib::state::settings::{rgb_to_f32, ViewportSettings};
use shared::ItemId;

use super::camera::{ndc_to_screen, ArcBallCamera};

struct ScreenTriangle {
    points: [Pos2; 3],
    depth: f32,
    color: Color32,
}

/// Paint the scene with egui's painter
pub fn paint_viewport(
    ui: &Ui,
    rect: Rect,
    camera: &ArcBallCamera,
    scene: &SceneGraph,
    selected: Option<ItemId>,
    colors: &ViewportSettings,
) {
    let painter = ui.painter_at(rect);

    // Background
    let bg = colors.background_color;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(bg[0], bg[1], bg[2]));

    let aspect = rect.width() / rect.height().max(1.0);
    let vp = camera.view_projection(aspect);
    let eye = camera.eye_position();
    let light_dir = Vec3::new(0.3, 0.8, 0.5).normalize();
    let tint = Vec3::from(rgb_to_f32(colors.selection_color));
    let rect_min = Vec2::new(rect.min.x, rect.min.y);
    let size = Vec2::new(rect.width(), rect.height());

    let mut triangles = Vec::new();
    for (node, mesh, world) in scene.drawables() {
        let highlighted = selected.is_some() && scene.owning_item(node) == selected;

        for tri in mesh.triangles() {
            let tri = tri.transformed(&world);
            // Back-face culling
            if tri.normal.dot(eye - tri.a) <= 0.0 {
                continue;
            }

            let mut points = [Pos2::ZERO; 3];
            let mut depth = 0.0;
            let mut visible = true;
            for (slot, corner) in points.iter_mut().zip([tri.a, tri.b, tri.c]) {
                let clip = vp * corner.extend(1.0);
                if clip.w <= 0.0 {
                    visible = false;
                    break;
                }
                let ndc = clip.truncate() / clip.w;
                let screen = ndc_to_screen(Vec2::new(ndc.x, ndc.y), rect_min, size);
                *slot = Pos2::new(screen.x, screen.y);
                depth += clip.w;
            }
            if !visible {
                continue;
            }

            let mut base = Vec3::from(tri.color);
            if highlighted {
                base = base.lerp(tint, 0.45);
            }
            let light = 0.3 + tri.normal.dot(light_dir).max(0.0) * 0.7;
            let c = (base * light).clamp(Vec3::ZERO, Vec3::ONE) * 255.0;

            triangles.push(ScreenTriangle {
                points,
                depth,
                color: Color32::from_rgb(c.x as u8, c.y as u8, c.z as u8),
            });
        }
    }

    // Painter's algorithm: far triangles first
    triangles.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    let mut mesh = Mesh::default();
    for tri in &triangles {
        let base = mesh.vertices.len() as u32;
        for pos in tri.points {
            mesh.vertices.push(Vertex {
                pos,
                uv: WHITE_UV,
                color: tri.color,
            });
        }
        mesh.add_triangle(base, base + 1, base + 2);
    }
    painter.add(Shape::mesh(mesh));
}
