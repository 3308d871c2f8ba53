//! 3D mesh representation and loading.
//!
//! Provides the [`Mesh`] struct for storing vertices and faces, along with
//! OBJ file loading support via the `tobj` crate.

use std::fmt;

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

pub(crate) const N_CUBE_VERTICES: usize = 8;
pub(crate) const N_CUBE_FACES: usize = 12;

/// A single mesh vertex: position plus the attributes the pipeline
/// transforms through the interpolation coefficient matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub texel: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub const fn new(position: Vec3, texel: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            texel,
            normal,
        }
    }
}

/// Represents a triangle face defined by three vertex indices, 0-based
/// into the mesh's vertex array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Tobj(tobj::LoadError),
    NoModels,
    NoVertices,
    InvalidFaces,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Tobj(e) => write!(f, "failed to load OBJ: {}", e),
            LoadError::NoModels => write!(f, "OBJ file contains no models"),
            LoadError::NoVertices => write!(f, "mesh has no vertices"),
            LoadError::InvalidFaces => write!(f, "face indices not divisible by 3"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Tobj(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Tobj(e)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    rotation: Vec3,
    scale: Vec3,
    translation: Vec3,
}

impl Mesh {
    pub(crate) fn new(
        vertices: Vec<Vertex>,
        faces: Vec<Face>,
        rotation: Vec3,
        scale: Vec3,
        translation: Vec3,
    ) -> Self {
        Self {
            vertices,
            faces,
            rotation,
            scale,
            translation,
        }
    }

    /// The compiled-in unit cube, used as the default mesh so the demo
    /// renders something without requiring an external OBJ asset.
    pub(crate) fn cube() -> Self {
        Self::new(
            CUBE_VERTICES.to_vec(),
            CUBE_FACES.to_vec(),
            Vec3::ZERO,
            Vec3::ONE,
            Vec3::ZERO,
        )
    }

    pub(crate) fn from_obj(file_path: &str) -> Result<Self, LoadError> {
        let (models, _materials) = tobj::load_obj(file_path, &tobj::GPU_LOAD_OPTIONS)?;

        // For now we only support a single model.
        let model = models.into_iter().next().ok_or(LoadError::NoModels)?;
        let mesh = model.mesh;

        if mesh.positions.is_empty() {
            return Err(LoadError::NoVertices);
        }

        if mesh.indices.len() % 3 != 0 {
            return Err(LoadError::InvalidFaces);
        }

        let vertex_count = mesh.positions.len() / 3;
        let has_normals = mesh.normals.len() == vertex_count * 3;
        let has_texcoords = mesh.texcoords.len() == vertex_count * 2;

        let vertices: Vec<Vertex> = (0..vertex_count)
            .map(|i| {
                let position = Vec3::new(
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                );
                let normal = if has_normals {
                    Vec3::new(
                        mesh.normals[3 * i],
                        mesh.normals[3 * i + 1],
                        mesh.normals[3 * i + 2],
                    )
                } else {
                    Vec3::ZERO
                };
                let texel = if has_texcoords {
                    Vec2::new(mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1])
                } else {
                    Vec2::ZERO
                };
                Vertex::new(position, texel, normal)
            })
            .collect();

        let faces: Vec<Face> = mesh
            .indices
            .chunks_exact(3)
            .map(|c| Face::new(c[0], c[1], c[2]))
            .collect();

        Ok(Self::new(vertices, faces, Vec3::ZERO, Vec3::ONE, Vec3::ZERO))
    }

    /// Get the rotation vector
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Get a mutable reference to the rotation vector
    pub fn rotation_mut(&mut self) -> &mut Vec3 {
        &mut self.rotation
    }

    /// Get the scale vector
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Get a mutable reference to the scale vector
    pub fn scale_mut(&mut self) -> &mut Vec3 {
        &mut self.scale
    }

    /// Get the translation vector
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Get a mutable reference to the translation vector
    pub fn translation_mut(&mut self) -> &mut Vec3 {
        &mut self.translation
    }

    /// Get a reference to the vertices
    pub(crate) fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get a reference to the faces
    pub(crate) fn faces(&self) -> &[Face] {
        &self.faces
    }
}

pub(crate) const CUBE_VERTICES: [Vertex; N_CUBE_VERTICES] = [
    Vertex::new(Vec3::new(-1.0, -1.0, -1.0), Vec2::ZERO, Vec3::ZERO),
    Vertex::new(Vec3::new(-1.0, 1.0, -1.0), Vec2::ZERO, Vec3::ZERO),
    Vertex::new(Vec3::new(1.0, 1.0, -1.0), Vec2::ZERO, Vec3::ZERO),
    Vertex::new(Vec3::new(1.0, -1.0, -1.0), Vec2::ZERO, Vec3::ZERO),
    Vertex::new(Vec3::new(1.0, 1.0, 1.0), Vec2::ZERO, Vec3::ZERO),
    Vertex::new(Vec3::new(1.0, -1.0, 1.0), Vec2::ZERO, Vec3::ZERO),
    Vertex::new(Vec3::new(-1.0, 1.0, 1.0), Vec2::ZERO, Vec3::ZERO),
    Vertex::new(Vec3::new(-1.0, -1.0, 1.0), Vec2::ZERO, Vec3::ZERO),
];

pub(crate) const CUBE_FACES: [Face; N_CUBE_FACES] = [
    // Front face
    Face { a: 0, b: 1, c: 2 },
    Face { a: 0, b: 2, c: 3 },
    // Right face
    Face { a: 3, b: 2, c: 4 },
    Face { a: 3, b: 4, c: 5 },
    // Back face
    Face { a: 5, b: 4, c: 6 },
    Face { a: 5, b: 6, c: 7 },
    // Left face
    Face { a: 7, b: 6, c: 1 },
    Face { a: 7, b: 1, c: 0 },
    // Top face
    Face { a: 1, b: 6, c: 4 },
    Face { a: 1, b: 4, c: 2 },
    // Bottom face
    Face { a: 5, b: 7, c: 0 },
    Face { a: 5, b: 0, c: 3 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_faces_index_within_vertex_bounds() {
        for face in &CUBE_FACES {
            assert!((face.a as usize) < N_CUBE_VERTICES);
            assert!((face.b as usize) < N_CUBE_VERTICES);
            assert!((face.c as usize) < N_CUBE_VERTICES);
        }
    }
}
