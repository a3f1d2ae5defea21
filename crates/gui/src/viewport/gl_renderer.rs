use std::collections::{HashMap, HashSet};

use glam::Mat4;
use glow::HasContext;
use roomplan_lib::scene::NodeId;

use super::camera::ArcBallCamera;
use super::mesh::{MeshData, VERTEX_STRIDE};

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Background color RGB
    pub bg_color: [u8; 3],
    /// Tint mixed into highlighted nodes
    pub selection_color: [f32; 3],
}

/// One node to draw this frame
#[derive(Clone, Copy)]
pub struct DrawItem {
    pub node: NodeId,
    pub world: Mat4,
    pub highlighted: bool,
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    /// Node meshes; node meshes never change after insertion, only their transforms
    meshes: HashMap<NodeId, GpuMesh>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        Ok(Self {
            mesh_program,
            meshes: HashMap::new(),
        })
    }

    /// Upload meshes of new nodes and free those of nodes that left the scene
    pub fn sync_meshes(
        &mut self,
        gl: &glow::Context,
        added: &[(NodeId, MeshData)],
        live: &HashSet<NodeId>,
    ) {
        let stale: Vec<NodeId> = self
            .meshes
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(mesh) = self.meshes.remove(&id) {
                delete_mesh(gl, &mesh);
            }
        }

        for (id, data) in added {
            match upload_mesh(gl, data) {
                Ok(mesh) => {
                    if let Some(old) = self.meshes.insert(*id, mesh) {
                        delete_mesh(gl, &old);
                    }
                }
                Err(e) => tracing::warn!("Failed to upload mesh for {id:?}: {e}"),
            }
        }
    }

    /// Render the scene
    pub fn paint(
        &self,
        gl: &glow::Context,
        camera: &ArcBallCamera,
        params: &RenderParams,
        draws: &[DrawItem],
    ) {
        let aspect = params.viewport[2] / params.viewport[3].max(1.0);
        let vp = camera.view_projection(aspect);

        unsafe {
            gl.viewport(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.scissor(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            // Clear viewport area with configured background color
            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);

            gl.use_program(Some(self.mesh_program));
            set_uniform_mat4(gl, self.mesh_program, "u_view_proj", &vp);
            set_uniform_vec3(gl, self.mesh_program, "u_eye", &camera.eye_position());

            // Light direction in world space
            let light_dir = glam::Vec3::new(0.3, 0.8, 0.5).normalize();
            set_uniform_vec3(gl, self.mesh_program, "u_light_dir", &light_dir);
            set_uniform_vec3(
                gl,
                self.mesh_program,
                "u_tint",
                &glam::Vec3::from(params.selection_color),
            );

            for item in draws {
                let Some(mesh) = self.meshes.get(&item.node) else {
                    continue;
                };
                set_uniform_mat4(gl, self.mesh_program, "u_model", &item.world);
                set_uniform_f32(
                    gl,
                    self.mesh_program,
                    "u_tint_amount",
                    if item.highlighted { 0.45 } else { 0.0 },
                );
                draw_mesh(gl, mesh);
            }

            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
        }
        for mesh in self.meshes.values() {
            delete_mesh(gl, mesh);
        }
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = (VERTEX_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;

        let vert = gl.create_shader(glow::VERTEX_SHADER)?;
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            tracing::error!("Vertex shader error: {log}");
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER)?;
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            tracing::error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if !linked {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(format!("program link error: {log}"));
        }
        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_view_proj;
uniform mat4 u_model;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;
out vec3 v_world;

void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world = world.xyz;
    gl_Position = u_view_proj * world;
    // Node transforms are rigid, so the upper 3x3 is enough for normals
    v_normal = mat3(u_model) * a_normal;
    v_color = a_color;
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;
uniform vec3 u_eye;
uniform vec3 u_tint;
uniform float u_tint_amount;

in vec3 v_normal;
in vec3 v_color;
in vec3 v_world;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    // Cull by normal, matching the software path and picking
    if (dot(n, u_eye - v_world) <= 0.0) {
        discard;
    }
    float diffuse = max(dot(n, u_light_dir), 0.0);
    float ambient = 0.3;
    float light = ambient + diffuse * 0.7;
    vec3 base = mix(v_color, u_tint, u_tint_amount);
    frag_color = vec4(base * light, 1.0);
}
"#;
