//! End-to-end drawing through the public API: text sources, cross-thread
//! use of a shared context, and file round trips.

use std::sync::Arc;

use easel_core::{pt, Color, Rect};
use easel_render::{Drawable, GpuContext, Image, RenderError};
use easel_text::{system_font_path, Font, Text, TextOptions};
use image::RgbaImage;

fn gpu() -> Option<Arc<GpuContext>> {
    pollster::block_on(GpuContext::new_headless()).ok().map(Arc::new)
}

#[test]
fn test_text_source_inks_target() {
    let Some(ctx) = gpu() else { return };
    let Some(font) = system_font_path().and_then(|p| Font::load(p).ok()) else {
        return;
    };
    let text = Text::new(
        &font,
        TextOptions {
            text: "Hello".into(),
            size: 24,
            color: Color::RED,
            ..Default::default()
        },
    );

    let mut d = Drawable::new(&ctx, 200, 60).unwrap();
    d.fill(Color::WHITE);
    d.draw(pt(10, 10), &text).unwrap();

    let out = d.to_image().unwrap();
    let reddish = out
        .pixels()
        .filter(|p| p.0[0] > 200 && p.0[1] < 100 && p.0[2] < 100)
        .count();
    assert!(reddish > 0, "text left no red pixels");
    // Nothing lands above the anchor point.
    assert!((0..200).all(|x| out.get_pixel(x, 5).0 == [255, 255, 255, 255]));
    // Transient text textures are released after the draw.
    assert_eq!(ctx.live_textures(), 1);
}

#[test]
fn test_empty_text_draw_is_noop() {
    let Some(ctx) = gpu() else { return };
    let Some(font) = system_font_path().and_then(|p| Font::load(p).ok()) else {
        return;
    };
    let text = Text::new(&font, TextOptions::default());
    let mut d = Drawable::new(&ctx, 8, 8).unwrap();
    d.draw(pt(0, 0), &text).unwrap();
    assert!(d.to_image().unwrap().pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn test_draw_equals_draw_rect_for_drawable_source() {
    let Some(ctx) = gpu() else { return };
    let src_pixels = RgbaImage::from_fn(5, 3, |x, y| {
        image::Rgba([x as u8 * 50, y as u8 * 80, 30, 255])
    });
    let src = Drawable::read(&ctx, &src_pixels).unwrap();

    let mut a = Drawable::new(&ctx, 10, 10).unwrap();
    let mut b = Drawable::new(&ctx, 10, 10).unwrap();
    a.draw(pt(2, 4), &src).unwrap();
    b.draw_rect(pt(2, 4), &src, src.bounds()).unwrap();
    assert_eq!(a.to_image().unwrap(), b.to_image().unwrap());
}

#[test]
fn test_draw_equals_draw_rect_for_text_source() {
    let Some(ctx) = gpu() else { return };
    let Some(font) = system_font_path().and_then(|p| Font::load(p).ok()) else {
        return;
    };
    let text = Text::new(
        &font,
        TextOptions {
            text: "Same".into(),
            size: 20,
            color: Color::BLUE,
            ..Default::default()
        },
    );

    let mut a = Drawable::new(&ctx, 120, 40).unwrap();
    let mut b = Drawable::new(&ctx, 120, 40).unwrap();
    a.draw(pt(3, 3), &text).unwrap();
    b.draw_rect(pt(3, 3), &text, text.bounds()).unwrap();
    let (a, b) = (a.to_image().unwrap(), b.to_image().unwrap());
    assert!(a.pixels().any(|p| p.0[3] > 0));
    assert_eq!(a, b);
}

#[test]
fn test_textures_from_other_threads() {
    let Some(ctx) = gpu() else { return };
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let ctx = Arc::clone(&ctx);
            std::thread::spawn(move || -> Result<RgbaImage, RenderError> {
                let mut d = Drawable::new(&ctx, 4, 4)?;
                d.fill(Color::rgb(i * 60, 0, 0));
                d.to_image()
            })
        })
        .collect();

    for (i, h) in handles.into_iter().enumerate() {
        let img = h.join().unwrap().unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [i as u8 * 60, 0, 0, 255]);
    }
    assert_eq!(ctx.live_textures(), 0);
}

#[test]
fn test_composite_round_trips_png_and_bmp() {
    let Some(ctx) = gpu() else { return };
    let dir = tempfile::tempdir().unwrap();

    let tile = RgbaImage::from_pixel(2, 2, image::Rgba([0, 255, 0, 255]));
    let tile = Image::read(&ctx, &tile).unwrap();
    let mut canvas = Drawable::new(&ctx, 6, 6).unwrap();
    canvas.fill(Color::WHITE);
    for y in (0..6).step_by(2) {
        for x in (0..6).step_by(2) {
            if (x + y) % 4 == 0 {
                canvas.draw(pt(x, y), &tile).unwrap();
            }
        }
    }

    for name in ["canvas.png", "canvas.bmp"] {
        let path = dir.path().join(name);
        canvas.write_file(&path).unwrap();
        let back = Drawable::load(&ctx, &path).unwrap();
        assert_eq!(back.bounds(), Rect::new(0, 0, 6, 6));
        assert_eq!(back.to_image().unwrap(), canvas.to_image().unwrap(), "{name}");
    }
}
