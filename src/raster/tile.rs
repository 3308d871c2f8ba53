//! Tile-based triangle rasterization (§4.4): bounding box, tile iteration,
//! frustum classification, coverage masks, and the fully-covered /
//! partially-covered inner loops.

use crate::buffers::{ColorBuffer, DepthBuffer};
use crate::fixed;
use crate::prelude::{Vec2, Vec4};
use crate::raster::edge::HalfEdge;
use crate::raster::fixedpoint::{
    to_fp, CP, CP_NP_SHIFT, CP_SCALE, NP_SCALE, TILE_SHIFT, TILE_SIZE, ZP, ZP_NP_SHIFT, ZP_SCALE,
};
use crate::texture::Texture;

/// `bw` accumulators carry an extra `TILE_SHIFT` of base from both the
/// vertical and horizontal interpolation steps (§4.4 step 3).
const BW_ACCUM_SHIFT: u32 = (TILE_SHIFT * 2) as u32;

/// Reciprocal of a tile-corner `1/w` plane value, guarded against zero
/// per §4.5: a zero evaluation leaves that corner's `w` at zero rather
/// than dividing.
#[inline]
fn corner_reciprocal(bwi: i32) -> i32 {
    if bwi == 0 {
        0
    } else {
        ((1i64 << (2 * CP)) / bwi as i64) as i32
    }
}

#[inline]
fn eval_plane_64(a: i32, b: i32, x: i32, y: i32, shift: u32, c: i32) -> i32 {
    ((((a as i64) * x as i64) >> shift) + (((b as i64) * y as i64) >> shift)) as i32 + c
}

#[inline]
fn eval_depth(az: i32, bz: i32, cz: i32, interp_zx: i32, interp_zy: i32) -> u16 {
    let v = ((((az as i64) * interp_zx as i64) + ((bz as i64) * interp_zy as i64)) >> ZP) as i32 + cz;
    v as u16
}

#[inline]
fn eval_uv_row_const(b: i32, interp_y: i32, c: i32) -> i32 {
    (((b as i64) * interp_y as i64) >> CP) as i32 + c
}

#[inline]
fn eval_uv(a: i32, interp_x: i32, row_const: i32) -> i32 {
    (((a as i64) * interp_x as i64) >> CP) as i32 + row_const
}

#[inline]
fn sample_texel(uw: i32, vw: i32, w: i32, texture: &Texture) -> u32 {
    let u = ((uw as i64 * w as i64 * texture.width() as i64) >> (2 * CP)) as i32;
    let v = ((vw as i64 * w as i64 * texture.height() as i64) >> (2 * CP)) as i32;
    let u = u.clamp(0, texture.width() as i32 - 1) as u32;
    let v = v.clamp(0, texture.height() as i32 - 1) as u32;
    texture.texel_at(u, v)
}

/// Coefficient planes for one attribute channel, already converted to their
/// fixed-point base; `a, b, c` correspond to vertices 0, 1, 2 respectively.
#[derive(Clone, Copy)]
struct Plane {
    a: i32,
    b: i32,
    c: i32,
}

impl Plane {
    fn from_zp(triple: (f32, f32, f32)) -> Self {
        Self {
            a: (triple.0 * ZP_SCALE) as i32,
            b: (triple.1 * ZP_SCALE) as i32,
            c: (triple.2 * ZP_SCALE) as i32,
        }
    }

    fn from_cp(triple: (f32, f32, f32)) -> Self {
        Self {
            a: (triple.0 * CP_SCALE) as i32,
            b: (triple.1 * CP_SCALE) as i32,
            c: (triple.2 * CP_SCALE) as i32,
        }
    }
}

/// Rasterize a single coefficient-form triangle.
///
/// `positions[i] = (screen_x, screen_y, z_plane_i, w_plane_i)` and
/// `texcoords0[i] = (u_plane_i, v_plane_i)`, where `z_plane`/`w_plane`/
/// `u_plane`/`v_plane` are the i-th component of that attribute's
/// `(A, B, C)` coefficient triple (§4.1/§4.2).
pub(crate) fn rasterize_triangle(
    positions: [Vec4; 3],
    texcoords0: [Vec2; 3],
    texture: &Texture,
    color: &mut ColorBuffer,
    depth: &mut DepthBuffer,
) {
    let width = color.width() as i32;
    let height = color.height() as i32;

    let xf = [to_fp(positions[0].x), to_fp(positions[1].x), to_fp(positions[2].x)];
    let yf = [to_fp(positions[0].y), to_fp(positions[1].y), to_fp(positions[2].y)];

    // Edges built in (v0, v2, v1) order: this is the winding the coverage
    // masks below read as positive-inside for triangles `coeff::setup`
    // accepted (see the HalfEdge test of the same name).
    let ea = HalfEdge::new(xf[0], yf[0], xf[2], yf[2]);
    let eb = HalfEdge::new(xf[2], yf[2], xf[1], yf[1]);
    let ec = HalfEdge::new(xf[1], yf[1], xf[0], yf[0]);

    let minx = fixed::ceil_fp4(*xf.iter().min().unwrap());
    let maxx = fixed::ceil_fp4(*xf.iter().max().unwrap());
    let miny = fixed::ceil_fp4(*yf.iter().min().unwrap());
    let maxy = fixed::ceil_fp4(*yf.iter().max().unwrap());

    let minx = minx & !(TILE_SIZE - 1);
    let miny = miny & !(TILE_SIZE - 1);

    let z_plane = Plane::from_zp((positions[0].z, positions[1].z, positions[2].z));
    let w_plane = Plane::from_cp((positions[0].w, positions[1].w, positions[2].w));
    let u_plane = Plane::from_cp((texcoords0[0].x, texcoords0[1].x, texcoords0[2].x));
    let v_plane = Plane::from_cp((texcoords0[0].y, texcoords0[1].y, texcoords0[2].y));

    let ndc_x_step = ((2.0 / width as f32) * NP_SCALE as f32) as i32;
    let ndc_y_step = ((2.0 / height as f32) * NP_SCALE as f32) as i32;

    let mut y = miny;
    while y < maxy {
        let mut x = minx;
        while x < maxx {
            let x0 = x;
            let x1 = x + TILE_SIZE - 1;
            let y0 = y;
            let y1 = y + TILE_SIZE - 1;

            let px0min = (x0 > 0) as i32;
            let px0max = (x0 < width) as i32;
            let px1min = (x1 > 0) as i32;
            let px1max = (x1 < width) as i32;
            let py0min = (y0 > 0) as i32;
            let py0max = (y0 < height) as i32;
            let py1min = (y1 > 0) as i32;
            let py1max = (y1 < height) as i32;

            let pflags_x = (px0min << 3) | (px1min << 2) | (px0max << 1) | px1max;
            let pflags_y = (py0min << 3) | (py1min << 2) | (py0max << 1) | py1max;

            let needs_scissor;
            if pflags_x == 0xF && pflags_y == 0xF {
                needs_scissor = false;
            } else if pflags_x == 0x3 || pflags_x == 0xC || pflags_y == 0x3 || pflags_y == 0xC {
                x += TILE_SIZE;
                continue;
            } else {
                needs_scissor = true;
            }

            let x0s = x0 << 4;
            let x1s = x1 << 4;
            let y0s = y0 << 4;
            let y1s = y1 << 4;

            let a = coverage_mask(&ea, x0s, x1s, y0s, y1s);
            let b = coverage_mask(&eb, x0s, x1s, y0s, y1s);
            let c = coverage_mask(&ec, x0s, x1s, y0s, y1s);

            if a == 0 || b == 0 || c == 0 {
                x += TILE_SIZE;
                continue;
            }

            let ndc_x0 = x * ndc_x_step;
            let ndc_y0 = y * ndc_y_step;
            let ndc_x1 = (x + TILE_SIZE - 1) * ndc_x_step;
            let ndc_y1 = (y + TILE_SIZE - 1) * ndc_y_step;

            let bwx0 = (ndc_x0 - NP_SCALE) >> CP_NP_SHIFT;
            let bwx1 = (ndc_x1 - NP_SCALE) >> CP_NP_SHIFT;
            let bwy0 = (ndc_y0 - NP_SCALE) >> CP_NP_SHIFT;
            let bwy1 = (ndc_y1 - NP_SCALE) >> CP_NP_SHIFT;

            let bwi0 = eval_plane_64(w_plane.a, w_plane.b, bwx0, bwy0, CP, w_plane.c);
            let bwi1 = eval_plane_64(w_plane.a, w_plane.b, bwx0, bwy1, CP, w_plane.c);
            let bwi2 = eval_plane_64(w_plane.a, w_plane.b, bwx1, bwy0, CP, w_plane.c);
            let bwi3 = eval_plane_64(w_plane.a, w_plane.b, bwx1, bwy1, CP, w_plane.c);

            let bw0 = corner_reciprocal(bwi0);
            let bw1 = corner_reciprocal(bwi1);
            let bw2 = corner_reciprocal(bwi2);
            let bw3 = corner_reciprocal(bwi3);

            let bw_slope_y0 = bw1 - bw0;
            let bw_slope_y1 = bw3 - bw2;

            let tile = TileCtx {
                x,
                y,
                width,
                height,
                needs_scissor,
                ndc_x0,
                ndc_y0,
                ndc_x_step,
                ndc_y_step,
                bw0,
                bw2,
                bw_slope_y0,
                bw_slope_y1,
                z_plane,
                u_plane,
                v_plane,
                texture,
            };

            if a == 0xF && b == 0xF && c == 0xF {
                rasterize_fully_covered(&tile, color, depth);
            } else {
                let cy = [
                    ea.eval(x0s, y0s),
                    eb.eval(x0s, y0s),
                    ec.eval(x0s, y0s),
                ];
                rasterize_partial(&tile, [ea, eb, ec], cy, color, depth);
            }

            x += TILE_SIZE;
        }
        y += TILE_SIZE;
    }
}

/// Evaluate a half-edge at the four corners of a tile and collapse each
/// corner's sign into one bit, bit order (x0,y0),(x1,y0),(x0,y1),(x1,y1).
#[inline]
fn coverage_mask(edge: &HalfEdge, x0: i32, x1: i32, y0: i32, y1: i32) -> u8 {
    let a00 = edge.eval(x0, y0) > 0;
    let a10 = edge.eval(x1, y0) > 0;
    let a01 = edge.eval(x0, y1) > 0;
    let a11 = edge.eval(x1, y1) > 0;
    (a00 as u8) | ((a10 as u8) << 1) | ((a01 as u8) << 2) | ((a11 as u8) << 3)
}

struct TileCtx<'a> {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    needs_scissor: bool,
    ndc_x0: i32,
    ndc_y0: i32,
    ndc_x_step: i32,
    ndc_y_step: i32,
    bw0: i32,
    bw2: i32,
    bw_slope_y0: i32,
    bw_slope_y1: i32,
    z_plane: Plane,
    u_plane: Plane,
    v_plane: Plane,
    texture: &'a Texture,
}

/// Write one shaded, depth-tested pixel.
#[inline]
#[allow(clippy::too_many_arguments)]
fn shade_pixel(
    tile: &TileCtx,
    ix: i32,
    iy: i32,
    interp_x: i32,
    interp_zx: i32,
    interp_zy: i32,
    uw_const: i32,
    vw_const: i32,
    w: i32,
    color: &mut ColorBuffer,
    depth: &mut DepthBuffer,
) {
    let z = eval_depth(tile.z_plane.a, tile.z_plane.b, tile.z_plane.c, interp_zx, interp_zy);
    let (ix, iy) = (ix as u32, iy as u32);
    if z < depth.get(ix, iy) {
        depth.set(ix, iy, z);
        let uw = eval_uv(tile.u_plane.a, interp_x, uw_const);
        let vw = eval_uv(tile.v_plane.a, interp_x, vw_const);
        let texel = sample_texel(uw, vw, w, tile.texture);
        color.set(ix, iy, texel);
    }
}

fn rasterize_fully_covered(tile: &TileCtx, color: &mut ColorBuffer, depth: &mut DepthBuffer) {
    let mut ndc_iy = tile.ndc_y0;
    let mut bw_accum_y0 = tile.bw0 << 4;
    let mut bw_accum_y1 = tile.bw2 << 4;

    let mut iy = tile.y;
    while iy < tile.y + TILE_SIZE {
        if tile.needs_scissor {
            if iy < 0 {
                let skip = -iy;
                iy += skip;
                ndc_iy += tile.ndc_y_step * skip;
                bw_accum_y0 += tile.bw_slope_y0 * skip;
                bw_accum_y1 += tile.bw_slope_y1 * skip;
                continue;
            } else if iy >= tile.height {
                break;
            }
        }

        let interp_y = (ndc_iy - NP_SCALE) >> CP_NP_SHIFT;
        let interp_zy = (ndc_iy - NP_SCALE) >> ZP_NP_SHIFT;
        let uw_const = eval_uv_row_const(tile.u_plane.b, interp_y, tile.u_plane.c);
        let vw_const = eval_uv_row_const(tile.v_plane.b, interp_y, tile.v_plane.c);

        let bw_slope_x0 = bw_accum_y1 - bw_accum_y0;
        let mut bw_accum_x0 = bw_accum_y0 << 4;
        let mut ndc_ix = tile.ndc_x0;

        let mut ix = tile.x;
        while ix < tile.x + TILE_SIZE {
            if tile.needs_scissor {
                if ix < 0 {
                    let skip = -ix;
                    ix += skip;
                    ndc_ix += tile.ndc_x_step * skip;
                    bw_accum_x0 += bw_slope_x0 * skip;
                    continue;
                } else if ix >= tile.width {
                    break;
                }
            }

            let interp_x = (ndc_ix - NP_SCALE) >> CP_NP_SHIFT;
            let interp_zx = (ndc_ix - NP_SCALE) >> ZP_NP_SHIFT;
            let w = bw_accum_x0 >> BW_ACCUM_SHIFT;

            shade_pixel(tile, ix, iy, interp_x, interp_zx, interp_zy, uw_const, vw_const, w, color, depth);

            ndc_ix += tile.ndc_x_step;
            bw_accum_x0 += bw_slope_x0;
            ix += 1;
        }

        ndc_iy += tile.ndc_y_step;
        bw_accum_y0 += tile.bw_slope_y0;
        bw_accum_y1 += tile.bw_slope_y1;
        iy += 1;
    }
}

fn rasterize_partial(
    tile: &TileCtx,
    edges: [HalfEdge; 3],
    cy0: [i32; 3],
    color: &mut ColorBuffer,
    depth: &mut DepthBuffer,
) {
    let mut cy = cy0;
    let mut ndc_iy = tile.ndc_y0;
    let mut bw_accum_y0 = tile.bw0 << 4;
    let mut bw_accum_y1 = tile.bw2 << 4;

    let mut iy = tile.y;
    while iy < tile.y + TILE_SIZE {
        if tile.needs_scissor {
            if iy < 0 {
                let skip = -iy;
                iy += skip;
                ndc_iy += tile.ndc_y_step * skip;
                bw_accum_y0 += tile.bw_slope_y0 * skip;
                bw_accum_y1 += tile.bw_slope_y1 * skip;
                cy[0] += edges[0].fdx * skip;
                cy[1] += edges[1].fdx * skip;
                cy[2] += edges[2].fdx * skip;
                continue;
            } else if iy >= tile.height {
                break;
            }
        }

        let mut cx = cy;
        let interp_y = (ndc_iy - NP_SCALE) >> CP_NP_SHIFT;
        let interp_zy = (ndc_iy - NP_SCALE) >> ZP_NP_SHIFT;
        let uw_const = eval_uv_row_const(tile.u_plane.b, interp_y, tile.u_plane.c);
        let vw_const = eval_uv_row_const(tile.v_plane.b, interp_y, tile.v_plane.c);

        let bw_slope_x0 = bw_accum_y1 - bw_accum_y0;
        let mut bw_accum_x0 = bw_accum_y0 << 4;
        let mut ndc_ix = tile.ndc_x0;

        let mut ix = tile.x;
        while ix < tile.x + TILE_SIZE {
            if tile.needs_scissor {
                if ix < 0 {
                    let skip = -ix;
                    ix += skip;
                    ndc_ix += tile.ndc_x_step * skip;
                    bw_accum_x0 += bw_slope_x0 * skip;
                    cx[0] -= edges[0].fdy * skip;
                    cx[1] -= edges[1].fdy * skip;
                    cx[2] -= edges[2].fdy * skip;
                    continue;
                } else if ix >= tile.width {
                    break;
                }
            }

            if cx[0] > 0 && cx[1] > 0 && cx[2] > 0 {
                let interp_x = (ndc_ix - NP_SCALE) >> CP_NP_SHIFT;
                let interp_zx = (ndc_ix - NP_SCALE) >> ZP_NP_SHIFT;
                let w = bw_accum_x0 >> BW_ACCUM_SHIFT;
                shade_pixel(tile, ix, iy, interp_x, interp_zx, interp_zy, uw_const, vw_const, w, color, depth);
            }

            ndc_ix += tile.ndc_x_step;
            bw_accum_x0 += bw_slope_x0;
            cx[0] -= edges[0].fdy;
            cx[1] -= edges[1].fdy;
            cx[2] -= edges[2].fdy;
            ix += 1;
        }

        ndc_iy += tile.ndc_y_step;
        bw_accum_y0 += tile.bw_slope_y0;
        bw_accum_y1 += tile.bw_slope_y1;
        cy[0] += edges[0].fdx;
        cy[1] += edges[1].fdx;
        cy[2] += edges[2].fdx;
        iy += 1;
    }
}
