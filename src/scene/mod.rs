//! Scene description: analytic objects plus an optional triangle mesh.
//!
//! The object list is uploaded to a GPU storage buffer every frame so
//! live edits take effect immediately; the mesh is uploaded once at
//! pass construction.

pub mod obj_mesh;

pub use obj_mesh::TriangleMesh;

/// Analytic object kinds understood by the pathtrace shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Sphere; size is the radius.
    Sphere,
    /// Axis-aligned box; size is the half-extent per axis.
    Box,
}

impl ObjectKind {
    fn as_f32(self) -> f32 {
        match self {
            Self::Sphere => 0.0,
            Self::Box => 1.0,
        }
    }
}

/// One analytic object as the shader sees it — must match the WGSL
/// `SceneObject` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneObject {
    /// World-space center (w unused).
    pub position: [f32; 4],
    /// x = kind, y = material index, z = size, w unused.
    pub params: [f32; 4],
}

impl SceneObject {
    /// Build an object from its components.
    #[must_use]
    pub fn new(position: [f32; 3], kind: ObjectKind, material: u32, size: f32) -> Self {
        Self {
            position: [position[0], position[1], position[2], 0.0],
            params: [kind.as_f32(), material as f32, size, 0.0],
        }
    }

    /// Sphere at `position` with the given radius.
    #[must_use]
    pub fn sphere(position: [f32; 3], material: u32, radius: f32) -> Self {
        Self::new(position, ObjectKind::Sphere, material, radius)
    }

    /// Axis-aligned box at `position` with the given half-extent.
    #[must_use]
    pub fn cube(position: [f32; 3], material: u32, half_extent: f32) -> Self {
        Self::new(position, ObjectKind::Box, material, half_extent)
    }
}

/// One vertex of the triangle mesh as uploaded to the GPU — must match
/// the WGSL `MeshVertex` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// World-space position (w unused).
    pub position: [f32; 4],
    /// Texture coordinate in xy (zw unused).
    pub uv: [f32; 4],
    /// Vertex normal (w unused).
    pub normal: [f32; 4],
}

/// Everything the path tracer renders.
pub struct Scene {
    /// Analytic spheres and boxes, re-uploaded every frame.
    pub objects: Vec<SceneObject>,
    /// Optional triangle mesh, uploaded once.
    pub mesh: TriangleMesh,
}

impl Scene {
    /// The default box scene: an open white room with a ceiling light,
    /// a mirror sphere, and a handful of glossy test objects.
    #[must_use]
    pub fn cornell_box() -> Self {
        let objects = vec![
            SceneObject::cube([0.0, -0.7, 0.0], 0, 1.2),
            SceneObject::cube([-2.4, 1.2, 0.0], 1, 1.2),
            SceneObject::cube([2.4, 1.2, 0.0], 8, 1.2),
            SceneObject::cube([0.0, 1.2, 2.4], 1, 1.2),
            SceneObject::cube([0.0, 3.6, 0.0], 1, 1.2),
            SceneObject::sphere([0.8, 0.9, 0.5], 2, 0.3),
            SceneObject::sphere([0.0, 1.7, -0.5], 6, 0.1),
            SceneObject::sphere([-0.15, 0.56, -0.5], 9, 0.05),
            SceneObject::sphere([-0.3, 0.7, -0.3], 3, 0.15),
            SceneObject::sphere([0.6, 0.65, -0.5], 4, 0.15),
            SceneObject::cube([0.4, 0.525, -0.7], 7, 0.025),
        ];
        Self {
            objects,
            mesh: TriangleMesh::default(),
        }
    }

    /// Replace the triangle mesh.
    pub fn set_mesh(&mut self, mesh: TriangleMesh) {
        self.mesh = mesh;
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::cornell_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_struct_sizes() {
        assert_eq!(size_of::<SceneObject>(), 32);
        assert_eq!(size_of::<MeshVertex>(), 48);
    }

    #[test]
    fn object_packing() {
        let obj = SceneObject::sphere([1.0, 2.0, 3.0], 6, 0.1);
        assert_eq!(obj.position, [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(obj.params[0], 0.0);
        assert_eq!(obj.params[1], 6.0);
        assert_eq!(obj.params[2], 0.1);

        let cube = SceneObject::cube([0.0, 0.0, 0.0], 1, 1.2);
        assert_eq!(cube.params[0], 1.0);
    }

    #[test]
    fn default_scene_is_populated() {
        let scene = Scene::cornell_box();
        assert_eq!(scene.objects.len(), 11);
        assert!(scene.mesh.is_empty());
    }
}
