//! Block rasterizer (§4.4): the hot path that walks a coefficient-form
//! triangle batch through tile-level trivial accept/reject and per-pixel
//! depth test, perspective-correct texture sampling, and color writes.

pub mod edge;
pub mod fixedpoint;
mod tile;

use crate::batch::{AttributeFlags, TriangleBatch};
use crate::buffers::{ColorBuffer, DepthBuffer};
use crate::texture::Texture;

/// Rasterize every triangle in `batch` into `color`/`depth`, sampling
/// `texture` at each covered pixel.
///
/// Only the textured path is implemented. Per the source's own `flags`
/// dispatch (empty bodies across attribute combinations), lighting, a
/// second texture-coordinate set, and per-vertex color are prepared
/// upstream in [`crate::pipeline`] but have no consumer here yet; a
/// triangle batch without `TEXCOORD0` enabled is not rasterized.
pub fn render(
    batch: &TriangleBatch,
    flags: AttributeFlags,
    texture: &Texture,
    color: &mut ColorBuffer,
    depth: &mut DepthBuffer,
) {
    if !flags.contains(AttributeFlags::TEXCOORD0) {
        return;
    }
    for k in 0..batch.triangle_count() {
        tile::rasterize_triangle(
            batch.triangle_positions(k),
            batch.triangle_texcoords0(k),
            texture,
            color,
            depth,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{Vec2, Vec3, Vec4};

    fn solid_texture() -> Texture {
        Texture::from_texels(1, 1, vec![0xFFFFFFFF])
    }

    /// Scenario A (§8): an axis-aligned right triangle with a 1x1 white
    /// texture, depth 0.5, written with the top-left fill convention.
    #[test]
    fn scenario_a_axis_aligned_triangle_writes_expected_pixel_count() {
        let mut batch = TriangleBatch::with_capacity(1);
        // Coefficient-form: x,y screen-space; z = z-plane triple; w = w-plane triple.
        // A constant-depth, constant-1/w triangle: A=B=0, C=value for every plane.
        batch.push(
            [
                Vec4::new(10.0, 10.0, 0.0, 0.0),
                Vec4::new(26.0, 10.0, 0.0, 0.0),
                Vec4::new(10.0, 26.0, 0.5, 1.0),
            ],
            [
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 0.0),
            ],
            [Vec2::ZERO; 3],
            [Vec3::ZERO; 3],
            [Vec4::ONE; 3],
        );

        let texture = solid_texture();
        let mut color = ColorBuffer::new(64, 64);
        let mut depth = DepthBuffer::new(64, 64);
        render(&batch, AttributeFlags::TEXCOORD0, &texture, &mut color, &mut depth);

        let mut written = 0;
        for y in 0..64u32 {
            for x in 0..64u32 {
                if depth.get(x, y) != DepthBuffer::FAR {
                    written += 1;
                    assert_eq!(color.get(x, y), 0xFFFFFFFF);
                }
            }
        }
        assert_eq!(written, 136);
    }

    /// Scenario D (§8): collinear vertices never reach the rasterizer
    /// because `coeff::setup` rejects them upstream; here we verify the
    /// rasterizer itself writes nothing when simply never invoked for a
    /// triangle outside the viewport (scenario 8).
    #[test]
    fn triangle_entirely_outside_viewport_writes_nothing() {
        let mut batch = TriangleBatch::with_capacity(1);
        batch.push(
            [
                Vec4::new(1000.0, 1000.0, 0.0, 0.0),
                Vec4::new(1016.0, 1000.0, 0.0, 0.0),
                Vec4::new(1000.0, 1016.0, 0.5, 1.0),
            ],
            [Vec2::ZERO; 3],
            [Vec2::ZERO; 3],
            [Vec3::ZERO; 3],
            [Vec4::ONE; 3],
        );

        let texture = solid_texture();
        let mut color = ColorBuffer::new(64, 64);
        let mut depth = DepthBuffer::new(64, 64);
        render(&batch, AttributeFlags::TEXCOORD0, &texture, &mut color, &mut depth);

        for y in 0..64u32 {
            for x in 0..64u32 {
                assert_eq!(depth.get(x, y), DepthBuffer::FAR);
            }
        }
    }
}
