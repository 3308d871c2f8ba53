//! Coefficient matrix setup and attribute preparation (§4.1, §4.2).
//!
//! The coefficient matrix maps a per-vertex scalar triple to the plane
//! coefficients `(A, B, C)` satisfying `s/w = A*x + B*y + C` over the
//! triangle, for any attribute `s`. Setup runs on clip-space vertices
//! (before the perspective divide): the source matrix's rows are each
//! vertex's `(x, y, w)` straight out of the modelview-projection multiply.
//! This is what makes the "all-ones trick" in [`prepare_reciprocal_w`]
//! meaningful — the matrix's third column genuinely is clip `w`, not its
//! reciprocal, so transforming `(1,1,1)` through it recovers the `1/w`
//! plane rather than restating an identity.

use crate::prelude::{Mat3, Vec2, Vec3, Vec4};

/// Smallest acceptable `|det(S)|`. Smaller triangles are degenerate or
/// subpixel and are rejected to avoid blowing up the inverse.
pub const MIN_DETERMINANT: f32 = 1.0 / 80.0;

/// Build the interpolation coefficient matrix for one triangle.
///
/// Returns `None` if the triangle is degenerate/subpixel (`|det| <
/// 1/80`) or back-facing (`det < 0`); both are silently dropped per §4.1.
pub fn setup(v0: Vec4, v1: Vec4, v2: Vec4) -> Option<Mat3> {
    let s = Mat3::from_rows(
        Vec3::new(v0.x, v0.y, v0.w),
        Vec3::new(v1.x, v1.y, v1.w),
        Vec3::new(v2.x, v2.y, v2.w),
    );
    let det = s.determinant();
    if det.abs() < MIN_DETERMINANT || det < 0.0 {
        return None;
    }
    Some(s.inverse_with_det(det))
}

/// Transform one scalar attribute channel's per-vertex triple into plane
/// coefficients `(A, B, C)`.
#[inline]
pub fn transform_scalars(m: Mat3, triple: [f32; 3]) -> [f32; 3] {
    let r = m * Vec3::new(triple[0], triple[1], triple[2]);
    [r.x, r.y, r.z]
}

/// The "all-ones trick": overwrite every vertex's `w` with `1.0`, then
/// transform through `M`. The result is the plane equation for `1/w`.
#[inline]
pub fn prepare_reciprocal_w(m: Mat3) -> [f32; 3] {
    transform_scalars(m, [1.0, 1.0, 1.0])
}

/// Transform a per-vertex `Vec2` attribute (e.g. a texture-coordinate set)
/// one component at a time.
pub fn transform_vec2(m: Mat3, triple: [Vec2; 3]) -> [Vec2; 3] {
    let xs = transform_scalars(m, [triple[0].x, triple[1].x, triple[2].x]);
    let ys = transform_scalars(m, [triple[0].y, triple[1].y, triple[2].y]);
    [
        Vec2::new(xs[0], ys[0]),
        Vec2::new(xs[1], ys[1]),
        Vec2::new(xs[2], ys[2]),
    ]
}

/// Transform a per-vertex `Vec3` attribute (normals).
pub fn transform_vec3(m: Mat3, triple: [Vec3; 3]) -> [Vec3; 3] {
    let xs = transform_scalars(m, [triple[0].x, triple[1].x, triple[2].x]);
    let ys = transform_scalars(m, [triple[0].y, triple[1].y, triple[2].y]);
    let zs = transform_scalars(m, [triple[0].z, triple[1].z, triple[2].z]);
    [
        Vec3::new(xs[0], ys[0], zs[0]),
        Vec3::new(xs[1], ys[1], zs[1]),
        Vec3::new(xs[2], ys[2], zs[2]),
    ]
}

/// Transform a per-vertex `Vec4` attribute (vertex colors).
pub fn transform_vec4(m: Mat3, triple: [Vec4; 3]) -> [Vec4; 3] {
    let xs = transform_scalars(m, [triple[0].x, triple[1].x, triple[2].x]);
    let ys = transform_scalars(m, [triple[0].y, triple[1].y, triple[2].y]);
    let zs = transform_scalars(m, [triple[0].z, triple[1].z, triple[2].z]);
    let ws = transform_scalars(m, [triple[0].w, triple[1].w, triple[2].w]);
    [
        Vec4::new(xs[0], ys[0], zs[0], ws[0]),
        Vec4::new(xs[1], ys[1], zs[1], ws[1]),
        Vec4::new(xs[2], ys[2], zs[2], ws[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_back_facing_triangle() {
        // Clockwise in this matrix's sense after the MVP multiply -> negative det.
        let v0 = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let v1 = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let v2 = Vec4::new(0.0, 1.0, 0.0, 1.0);
        assert!(setup(v0, v1, v2).is_none());
    }

    #[test]
    fn accepts_front_facing_triangle() {
        let v0 = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let v1 = Vec4::new(0.0, 1.0, 0.0, 1.0);
        let v2 = Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(setup(v0, v1, v2).is_some());
    }

    #[test]
    fn rejects_degenerate_collinear_triangle() {
        let v0 = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let v1 = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let v2 = Vec4::new(2.0, 0.0, 0.0, 1.0);
        assert!(setup(v0, v1, v2).is_none());
    }
}
