use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use raxel::bench::{pipeline, raster, AttributeFlags, ColorBuffer, DepthBuffer, Texture, TriangleBatch};
use raxel::prelude::{Mat4, Vec2, Vec3, Vec4};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn solid_texture() -> Texture {
    Texture::from_texels(1, 1, vec![0xFFFFFFFF])
}

/// A view-space triangle facing the camera, `size` pixels wide once projected
/// through an identity modelview-projection matrix onto an 800x600 target.
fn view_space_triangle(size: f32) -> TriangleBatch {
    let mut batch = TriangleBatch::with_capacity(1);
    batch.push(
        [
            Vec4::new(0.0, 0.0, 2.0, 1.0),
            Vec4::new(size, 0.0, 2.0, 1.0),
            Vec4::new(0.0, size, 2.0, 1.0),
        ],
        [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        [Vec2::ZERO; 3],
        [Vec3::ZERO; 3],
        [Vec4::ONE; 3],
    );
    batch
}

fn identity_projection() -> Mat4 {
    Mat4::identity()
}

fn benchmark_pipeline_driver(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_driver");
    let mvp = identity_projection();

    for (name, size) in [("small", 0.1), ("medium", 0.4), ("large", 1.5)] {
        let input = view_space_triangle(size);
        group.bench_with_input(BenchmarkId::new("run", name), &input, |b, input| {
            b.iter(|| {
                black_box(pipeline::run(
                    input,
                    &mvp,
                    AttributeFlags::TEXCOORD0,
                    BUFFER_WIDTH,
                    BUFFER_HEIGHT,
                ))
            });
        });
    }

    group.finish();
}

/// A screen-space, coefficient-form triangle of roughly `size` pixels per
/// side, built directly (bypassing setup) for isolating the block
/// rasterizer's own cost from the pipeline driver's.
fn coefficient_triangle(size: f32) -> TriangleBatch {
    let mut batch = TriangleBatch::with_capacity(1);
    batch.push(
        [
            Vec4::new(10.0, 10.0, 0.0, 0.0),
            Vec4::new(10.0 + size, 10.0, 0.0, 0.0),
            Vec4::new(10.0, 10.0 + size, 0.5, 1.0),
        ],
        [Vec2::ZERO; 3],
        [Vec2::ZERO; 3],
        [Vec3::ZERO; 3],
        [Vec4::ONE; 3],
    );
    batch
}

fn benchmark_block_rasterizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_rasterizer");
    let texture = solid_texture();

    for (name, size) in [("small", 20.0), ("medium", 100.0), ("large", 400.0)] {
        let batch = coefficient_triangle(size);
        group.bench_with_input(BenchmarkId::new("render", name), &batch, |b, batch| {
            let mut color = ColorBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            let mut depth = DepthBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| {
                color.clear(0xFF000000);
                depth.clear();
                raster::render(
                    black_box(batch),
                    AttributeFlags::TEXCOORD0,
                    &texture,
                    &mut color,
                    &mut depth,
                );
            });
        });
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let texture = solid_texture();

    let mut batch = TriangleBatch::with_capacity(20 * 20);
    for row in 0..20 {
        for col in 0..20 {
            let x = col as f32 * 40.0;
            let y = row as f32 * 30.0;
            batch.push(
                [
                    Vec4::new(x, y, 0.0, 0.0),
                    Vec4::new(x + 35.0, y, 0.0, 0.0),
                    Vec4::new(x, y + 25.0, 0.5, 1.0),
                ],
                [Vec2::ZERO; 3],
                [Vec2::ZERO; 3],
                [Vec3::ZERO; 3],
                [Vec4::ONE; 3],
            );
        }
    }

    c.bench_function("block_rasterizer_400_triangles", |b| {
        let mut color = ColorBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        let mut depth = DepthBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        b.iter(|| {
            color.clear(0xFF000000);
            depth.clear();
            raster::render(
                black_box(&batch),
                AttributeFlags::TEXCOORD0,
                &texture,
                &mut color,
                &mut depth,
            );
        });
    });
}

criterion_group!(
    benches,
    benchmark_pipeline_driver,
    benchmark_block_rasterizer,
    benchmark_many_triangles
);
criterion_main!(benches);
