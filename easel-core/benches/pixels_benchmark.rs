//! Benchmarks for CPU pixel repacking ahead of texture uploads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use easel_core::{packed_rgba, repack, Rect, RgbaView};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, RgbaImage};

fn make_image(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255])
    })
}

fn bench_packed_borrow(c: &mut Criterion) {
    let img = make_image(1024);
    c.bench_function("packed_rgba/borrowed_1024", |b| {
        b.iter(|| black_box(packed_rgba(black_box(&img)).data.len()));
    });
}

fn bench_repack_sub_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("repack_sub_view");
    let img = make_image(1024);
    for &size in &[64, 256, 512] {
        let view = RgbaView::of(&img).sub_view(Rect::new(100, 100, 100 + size, 100 + size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &view, |b, view| {
            b.iter(|| black_box(repack(black_box(view))));
        });
    }
    group.finish();
}

fn bench_repack_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("repack_fallback");
    let rgb = DynamicImage::ImageRgb8(RgbImage::from_fn(512, 512, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 7])
    }));
    group.bench_function("rgb_512", |b| {
        b.iter(|| black_box(repack(black_box(&rgb))));
    });

    let img = make_image(512);
    let sub = img.view(10, 10, 256, 256);
    group.bench_function("sub_image_256", |b| {
        b.iter(|| black_box(repack(black_box(&sub))));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_packed_borrow,
    bench_repack_sub_view,
    bench_repack_fallback
);
criterion_main!(benches);
