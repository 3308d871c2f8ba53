//! Triangle batch: the flat, parallel-sequence data model the core consumes
//! and produces.
//!
//! A batch is SoA (structure-of-arrays): positions and every attribute
//! channel are stored in their own `Vec`, all the same length, indexed in
//! groups of three per triangle. This matches the "ordered sequence of
//! triangles" data model and keeps the pipeline driver's ping-pong rewrite
//! (§4.3/§9) a matter of swapping whole vectors rather than shifting
//! elements in place.

use crate::prelude::{Vec2, Vec3, Vec4};

/// Which attribute channels participate in preparation and rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeFlags(u8);

impl AttributeFlags {
    pub const NONE: Self = Self(0);
    pub const TEXCOORD0: Self = Self(1 << 0);
    pub const TEXCOORD1: Self = Self(1 << 1);
    pub const LIGHTING: Self = Self(1 << 2);
    pub const COLOR: Self = Self(1 << 3);

    #[inline]
    pub fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for AttributeFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A flat, parallel-sequence batch of triangles.
///
/// `positions[3k..3k+3]` are the three vertices of triangle `k`; every other
/// sequence is indexed the same way. Before the pipeline driver runs,
/// `positions` holds `(x, y, z, w)` in whatever space the caller's
/// modelview-projection matrix expects as input (typically view space with
/// `w = 1`). After the driver runs, `positions` holds the coefficient-form
/// representation described in §3: `x, y` screen-space, `z` as `z * w`, `w`
/// as `1/w_clip`.
#[derive(Debug, Clone, Default)]
pub struct TriangleBatch {
    pub positions: Vec<Vec4>,
    pub texcoords0: Vec<Vec2>,
    pub texcoords1: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<Vec4>,
}

impl TriangleBatch {
    pub fn with_capacity(triangles: usize) -> Self {
        let n = triangles * 3;
        Self {
            positions: Vec::with_capacity(n),
            texcoords0: Vec::with_capacity(n),
            texcoords1: Vec::with_capacity(n),
            normals: Vec::with_capacity(n),
            colors: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Push one triangle's worth of vertex attributes.
    #[allow(clippy::too_many_arguments)]
    pub fn push(
        &mut self,
        positions: [Vec4; 3],
        texcoords0: [Vec2; 3],
        texcoords1: [Vec2; 3],
        normals: [Vec3; 3],
        colors: [Vec4; 3],
    ) {
        self.positions.extend_from_slice(&positions);
        self.texcoords0.extend_from_slice(&texcoords0);
        self.texcoords1.extend_from_slice(&texcoords1);
        self.normals.extend_from_slice(&normals);
        self.colors.extend_from_slice(&colors);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.texcoords0.clear();
        self.texcoords1.clear();
        self.normals.clear();
        self.colors.clear();
    }

    /// View of one triangle's three positions.
    pub(crate) fn triangle_positions(&self, k: usize) -> [Vec4; 3] {
        [self.positions[3 * k], self.positions[3 * k + 1], self.positions[3 * k + 2]]
    }

    pub(crate) fn triangle_texcoords0(&self, k: usize) -> [Vec2; 3] {
        [self.texcoords0[3 * k], self.texcoords0[3 * k + 1], self.texcoords0[3 * k + 2]]
    }

    pub(crate) fn triangle_texcoords1(&self, k: usize) -> [Vec2; 3] {
        [self.texcoords1[3 * k], self.texcoords1[3 * k + 1], self.texcoords1[3 * k + 2]]
    }

    pub(crate) fn triangle_normals(&self, k: usize) -> [Vec3; 3] {
        [self.normals[3 * k], self.normals[3 * k + 1], self.normals[3 * k + 2]]
    }

    pub(crate) fn triangle_colors(&self, k: usize) -> [Vec4; 3] {
        [self.colors[3 * k], self.colors[3 * k + 1], self.colors[3 * k + 2]]
    }
}
