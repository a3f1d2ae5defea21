use glam::{Mat4, Vec3};

/// Floats per vertex: position(3) + normal(3) + color(3)
pub const VERTEX_STRIDE: usize = 9;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

/// One triangle resolved to positions, in the mesh's local space
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub normal: Vec3,
    pub color: [f32; 3],
}

impl Triangle {
    /// Same triangle moved through an affine transform
    pub fn transformed(&self, m: &Mat4) -> Triangle {
        Triangle {
            a: m.transform_point3(self.a),
            b: m.transform_point3(self.b),
            c: m.transform_point3(self.c),
            normal: m.transform_vector3(self.normal).normalize_or_zero(),
            color: self.color,
        }
    }
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * VERTEX_STRIDE;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    fn normal(&self, index: usize) -> Vec3 {
        let base = index * VERTEX_STRIDE + 3;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    fn color(&self, index: usize) -> [f32; 3] {
        let base = index * VERTEX_STRIDE + 6;
        [
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        ]
    }

    /// Iterate triangles; flat shading, so the first vertex carries normal and color
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            Triangle {
                a: self.position(i0),
                b: self.position(i1),
                c: self.position(i2),
                normal: self.normal(i0),
                color: self.color(i0),
            }
        })
    }

    fn push_quad(&mut self, quad: [Vec3; 4], normal: Vec3, color: [f32; 3]) {
        let base = self.vertex_count() as u32;
        for v in quad {
            self.vertices.extend_from_slice(&[
                v.x, v.y, v.z, normal.x, normal.y, normal.z, color[0], color[1], color[2],
            ]);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Axis-aligned box centered on the origin
pub fn cube(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    let faces: [([Vec3; 4], Vec3); 6] = [
        // Front (+Z)
        ([Vec3::new(-hw, -hh, hd), Vec3::new(hw, -hh, hd), Vec3::new(hw, hh, hd), Vec3::new(-hw, hh, hd)], Vec3::Z),
        // Back (-Z)
        ([Vec3::new(hw, -hh, -hd), Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, hh, -hd), Vec3::new(hw, hh, -hd)], Vec3::NEG_Z),
        // Right (+X)
        ([Vec3::new(hw, -hh, hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, hh, -hd), Vec3::new(hw, hh, hd)], Vec3::X),
        // Left (-X)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(-hw, -hh, hd), Vec3::new(-hw, hh, hd), Vec3::new(-hw, hh, -hd)], Vec3::NEG_X),
        // Top (+Y)
        ([Vec3::new(-hw, hh, hd), Vec3::new(hw, hh, hd), Vec3::new(hw, hh, -hd), Vec3::new(-hw, hh, -hd)], Vec3::Y),
        // Bottom (-Y)
        ([Vec3::new(-hw, -hh, -hd), Vec3::new(hw, -hh, -hd), Vec3::new(hw, -hh, hd), Vec3::new(-hw, -hh, hd)], Vec3::NEG_Y),
    ];

    let mut mesh = MeshData {
        vertices: Vec::with_capacity(24 * VERTEX_STRIDE),
        indices: Vec::with_capacity(36),
    };
    for (quad, normal) in faces {
        mesh.push_quad(quad, normal, color);
    }
    mesh
}

/// Horizontal rectangle at y = 0 facing up, centered on the origin
pub fn floor_quad(width: f32, depth: f32, color: [f32; 3]) -> MeshData {
    let hw = width * 0.5;
    let hd = depth * 0.5;
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            Vec3::new(-hw, 0.0, hd),
            Vec3::new(hw, 0.0, hd),
            Vec3::new(hw, 0.0, -hd),
            Vec3::new(-hw, 0.0, -hd),
        ],
        Vec3::Y,
        color,
    );
    mesh
}

/// Vertical rectangle from `start` to `end` on the floor, `height` tall.
/// Seen from above, the face normal points to the right of start→end.
pub fn wall_quad(start: Vec3, end: Vec3, height: f32, color: [f32; 3]) -> MeshData {
    let up = Vec3::Y * height;
    let normal = (end - start).cross(Vec3::Y).normalize_or_zero();
    let mut mesh = MeshData::default();
    mesh.push_quad([start, end, end + up, start + up], normal, color);
    mesh
}
