//! Benchmarks for easel-render instance generation and GPU round trips.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use easel_core::{pt, Color, Rect};
use easel_render::convert;
use easel_render::{CameraUniform, Drawable, GpuContext, Image};
use image::RgbaImage;

fn bench_sprite_instance(c: &mut Criterion) {
    c.bench_function("convert::sprite", |b| {
        b.iter(|| {
            black_box(convert::sprite(
                black_box(pt(100, 200)),
                black_box(Rect::new(16, 16, 48, 48)),
                black_box(256),
                black_box(256),
            ));
        });
    });
}

fn bench_camera(c: &mut Criterion) {
    c.bench_function("CameraUniform::target", |b| {
        b.iter(|| black_box(CameraUniform::target(black_box(1920), black_box(1080))));
    });
}

fn bench_gpu_draw(c: &mut Criterion) {
    let Ok(ctx) = pollster::block_on(GpuContext::new_headless()) else {
        eprintln!("no GPU adapter, skipping GPU benchmarks");
        return;
    };
    let ctx = Arc::new(ctx);
    let src = Image::read(&ctx, &RgbaImage::from_pixel(64, 64, image::Rgba([9, 9, 9, 255])))
        .expect("image");
    let mut target = Drawable::new(&ctx, 512, 512).expect("drawable");

    c.bench_function("drawable_draw_64", |b| {
        b.iter(|| target.draw(pt(10, 10), &src).expect("draw"));
    });

    let mut group = c.benchmark_group("readback");
    for &size in &[64u32, 256, 512] {
        let mut d = Drawable::new(&ctx, size, size).expect("drawable");
        d.fill(Color::BLUE);
        group.bench_with_input(BenchmarkId::from_parameter(size), &d, |b, d| {
            b.iter(|| black_box(d.to_image().expect("readback")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sprite_instance, bench_camera, bench_gpu_draw);
criterion_main!(benches);
