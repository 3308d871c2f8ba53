//! Triangle pipeline driver (§4.3): the per-triangle front end that turns a
//! batch of clip-space-bound vertices into the coefficient-form batch the
//! block rasterizer consumes.
//!
//! Per §9's design note, this produces a fresh output batch rather than
//! rewriting the input in place and erasing a prefix — a two-buffer
//! (ping-pong) handoff instead of the source's append-then-erase pattern.

use crate::batch::{AttributeFlags, TriangleBatch};
use crate::coeff;
use crate::prelude::{Mat4, Vec4};

/// Project a clip-space vertex to screen space and set `w` to `1/w_clip`.
///
/// `z` is left as the normalized NDC depth (`z_clip / w_clip`); the caller's
/// projection matrix defines what range that lands in — the core does not
/// reinterpret it beyond the affine-interpolation step that follows.
fn project(v: Vec4, width: u32, height: u32) -> Vec4 {
    let inv_w = 1.0 / v.w;
    let screen_x = (v.x * inv_w + 1.0) * 0.5 * width as f32;
    let screen_y = (v.y * inv_w + 1.0) * 0.5 * height as f32;
    let z_normalized = v.z * inv_w;
    Vec4::new(screen_x, screen_y, z_normalized, inv_w)
}

/// Run the pipeline driver over `input`, writing accepted, coefficient-form
/// triangles into a freshly allocated output batch.
pub fn run(
    input: &TriangleBatch,
    mvp: &Mat4,
    flags: AttributeFlags,
    target_width: u32,
    target_height: u32,
) -> TriangleBatch {
    let mut output = TriangleBatch::with_capacity(input.triangle_count());

    for k in 0..input.triangle_count() {
        let [p0, p1, p2] = input.triangle_positions(k);
        let clip = [*mvp * p0, *mvp * p1, *mvp * p2];

        let Some(m) = coeff::setup(clip[0], clip[1], clip[2]) else {
            continue;
        };

        let mut projected = [
            project(clip[0], target_width, target_height),
            project(clip[1], target_width, target_height),
            project(clip[2], target_width, target_height),
        ];

        // Step 2: multiply z by w so it interpolates affinely in screen space.
        for v in &mut projected {
            v.z *= v.w;
        }

        let z = coeff::transform_scalars(m, [projected[0].z, projected[1].z, projected[2].z]);
        let w = coeff::prepare_reciprocal_w(m);

        let positions = [
            Vec4::new(projected[0].x, projected[0].y, z[0], w[0]),
            Vec4::new(projected[1].x, projected[1].y, z[1], w[1]),
            Vec4::new(projected[2].x, projected[2].y, z[2], w[2]),
        ];

        let texcoords0 = if flags.contains(AttributeFlags::TEXCOORD0) {
            coeff::transform_vec2(m, input.triangle_texcoords0(k))
        } else {
            input.triangle_texcoords0(k)
        };
        let texcoords1 = if flags.contains(AttributeFlags::TEXCOORD1) {
            coeff::transform_vec2(m, input.triangle_texcoords1(k))
        } else {
            input.triangle_texcoords1(k)
        };
        let normals = if flags.contains(AttributeFlags::LIGHTING) {
            coeff::transform_vec3(m, input.triangle_normals(k))
        } else {
            input.triangle_normals(k)
        };
        let colors = if flags.contains(AttributeFlags::COLOR) {
            coeff::transform_vec4(m, input.triangle_colors(k))
        } else {
            input.triangle_colors(k)
        };

        output.push(positions, texcoords0, texcoords1, normals, colors);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{Vec2, Vec3};

    fn front_facing_triangle(batch: &mut TriangleBatch, offset: f32) {
        batch.push(
            [
                Vec4::new(offset, 0.0, 0.5, 1.0),
                Vec4::new(offset + 1.0, 0.0, 0.5, 1.0),
                Vec4::new(offset, 1.0, 0.5, 1.0),
            ],
            [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
            [Vec2::ZERO; 3],
            [Vec3::ZERO; 3],
            [Vec4::ONE; 3],
        );
    }

    #[test]
    fn project_matches_screen_space_formula() {
        // v.x/w = v.y/w = 0 -> dead center of the target.
        let center = project(Vec4::new(0.0, 0.0, 0.5, 1.0), 64, 48);
        assert_eq!(center.x, 32.0);
        assert_eq!(center.y, 24.0);

        // v.y/w = 1 -> (1+1)*0.5*H = H, per the spec's literal §4.3 formula
        // (no y-flip): increasing NDC y maps to increasing screen y.
        let bottom = project(Vec4::new(0.0, 1.0, 0.5, 1.0), 64, 48);
        assert_eq!(bottom.y, 48.0);

        let top = project(Vec4::new(0.0, -1.0, 0.5, 1.0), 64, 48);
        assert_eq!(top.y, 0.0);
    }

    #[test]
    fn drops_back_facing_and_keeps_front_facing() {
        let mut input = TriangleBatch::with_capacity(2);
        front_facing_triangle(&mut input, 0.0);
        // Winding-reversed copy of the same triangle.
        input.push(
            [
                Vec4::new(0.0, 0.0, 0.5, 1.0),
                Vec4::new(0.0, 1.0, 0.5, 1.0),
                Vec4::new(1.0, 0.0, 0.5, 1.0),
            ],
            [Vec2::ZERO; 3],
            [Vec2::ZERO; 3],
            [Vec3::ZERO; 3],
            [Vec4::ONE; 3],
        );

        let out = run(&input, &Mat4::identity(), AttributeFlags::TEXCOORD0, 64, 64);
        assert_eq!(out.triangle_count(), 1);
    }
}
