use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Interleaved vertex exactly as the pipeline's input layout declares it:
/// position at byte 0, normal at 12, texture coordinate at 24, stride 32.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Immutable triangle mesh, uploaded once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// The crate: a unit-radius cube with per-face normals and texture
    /// coordinates, 24 vertices and 36 indices.
    pub fn crate_cube() -> Self {
        let mut mesh = Self {
            vertices: Vec::with_capacity(24),
            indices: Vec::with_capacity(36),
        };
        // front, right, back, left, top, bottom
        mesh.push_face(
            [0.0, 0.0, -1.0],
            [
                [-1.0, 1.0, -1.0],
                [1.0, 1.0, -1.0],
                [-1.0, -1.0, -1.0],
                [1.0, -1.0, -1.0],
            ],
            1.0,
        );
        mesh.push_face(
            [1.0, 0.0, 0.0],
            [
                [1.0, 1.0, -1.0],
                [1.0, 1.0, 1.0],
                [1.0, -1.0, -1.0],
                [1.0, -1.0, 1.0],
            ],
            1.0,
        );
        mesh.push_face(
            [0.0, 0.0, 1.0],
            [
                [1.0, 1.0, 1.0],
                [-1.0, 1.0, 1.0],
                [1.0, -1.0, 1.0],
                [-1.0, -1.0, 1.0],
            ],
            1.0,
        );
        mesh.push_face(
            [-1.0, 0.0, 0.0],
            [
                [-1.0, 1.0, 1.0],
                [-1.0, 1.0, -1.0],
                [-1.0, -1.0, 1.0],
                [-1.0, -1.0, -1.0],
            ],
            1.0,
        );
        mesh.push_face(
            [0.0, 1.0, 0.0],
            [
                [-1.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
                [-1.0, 1.0, -1.0],
                [1.0, 1.0, -1.0],
            ],
            1.0,
        );
        mesh.push_face(
            [0.0, -1.0, 0.0],
            [
                [-1.0, -1.0, 1.0],
                [1.0, -1.0, 1.0],
                [-1.0, -1.0, -1.0],
                [1.0, -1.0, -1.0],
            ],
            1.0,
        );
        mesh
    }

    /// The ground: a single quad at y = -2 whose texture repeats ten times
    /// across each axis, 4 vertices and 6 indices.
    pub fn ground_plane() -> Self {
        let mut mesh = Self {
            vertices: Vec::with_capacity(4),
            indices: Vec::with_capacity(6),
        };
        mesh.push_face(
            [0.0, 1.0, 0.0],
            [
                [-2.0, -2.0, -2.0],
                [2.0, -2.0, -2.0],
                [-2.0, -2.0, 2.0],
                [2.0, -2.0, 2.0],
            ],
            10.0,
        );
        mesh
    }

    /// Appends a quad as four vertices and two triangles.  Corners are
    /// given top-left, top-right, bottom-left, bottom-right.
    fn push_face(&mut self, normal: [f32; 3], corners: [[f32; 3]; 4], uv_scale: f32) {
        let base = self.vertices.len() as u16;
        const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        for (position, uv) in corners.into_iter().zip(CORNER_UVS) {
            self.vertices.push(Vertex {
                position,
                normal,
                uv: [uv[0] * uv_scale, uv[1] * uv_scale],
            });
        }
        self.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base + 2,
            base + 1,
            base + 3,
        ]);
    }
}

/// Names the two meshes of the fixed scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshId {
    Crate,
    Ground,
}

impl MeshId {
    pub fn index(self) -> usize {
        match self {
            Self::Crate => 0,
            Self::Ground => 1,
        }
    }
}

/// One entry of the per-frame draw list: which mesh, and where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshId,
    pub world: Mat4,
}

/// Light and material colors uploaded with every frame's constant block.
///
/// These are fixed for the session; the defaults reproduce the scene's
/// authored look (single light from straight above, gray diffuse, mild
/// specular, and a specular eye pinned at the camera's home position).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub light_dir: Vec3,
    pub diffuse_material: Vec4,
    pub diffuse_light: Vec4,
    pub ambient_material: Vec4,
    pub ambient_light: Vec4,
    pub specular_material: Vec4,
    pub specular_light: Vec4,
    pub specular_power: f32,
    pub specular_eye: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            light_dir: Vec3::new(0.0, 1.0, 0.0),
            diffuse_material: Vec4::new(0.4, 0.4, 0.4, 1.0),
            diffuse_light: Vec4::new(1.0, 1.0, 1.0, 1.0),
            ambient_material: Vec4::new(0.6, 0.6, 0.6, 1.0),
            ambient_light: Vec4::new(0.2, 0.2, 0.2, 1.0),
            specular_material: Vec4::new(0.9, 0.9, 0.9, 1.0),
            specular_light: Vec4::new(0.4, 0.4, 0.4, 1.0),
            specular_power: 5.0,
            specular_eye: Vec3::new(0.0, 0.0, -6.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_pipeline_schema() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        let vertex = Vertex {
            position: [0.0; 3],
            normal: [0.0; 3],
            uv: [0.0; 2],
        };
        let base = &vertex as *const Vertex as usize;
        assert_eq!(&vertex.position as *const _ as usize - base, 0);
        assert_eq!(&vertex.normal as *const _ as usize - base, 12);
        assert_eq!(&vertex.uv as *const _ as usize - base, 24);
    }

    #[test]
    fn cube_has_expected_counts() {
        let cube = MeshData::crate_cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
    }

    #[test]
    fn plane_has_expected_counts() {
        let plane = MeshData::ground_plane();
        assert_eq!(plane.vertices.len(), 4);
        assert_eq!(plane.indices.len(), 6);
    }

    #[test]
    fn indices_stay_in_range() {
        for mesh in [MeshData::crate_cube(), MeshData::ground_plane()] {
            let count = mesh.vertices.len() as u16;
            assert!(mesh.indices.iter().all(|&index| index < count));
        }
    }

    #[test]
    fn cube_normals_are_unit_axes() {
        let cube = MeshData::crate_cube();
        for vertex in &cube.vertices {
            let length: f32 = vertex.normal.iter().map(|c| c * c).sum();
            assert_eq!(length, 1.0);
        }
    }

    #[test]
    fn ground_texture_repeats() {
        let plane = MeshData::ground_plane();
        let max_uv = plane
            .vertices
            .iter()
            .flat_map(|v| v.uv)
            .fold(0.0f32, f32::max);
        assert_eq!(max_uv, 10.0);
    }
}
