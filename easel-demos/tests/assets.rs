//! The bundled assets decode and the off-screen composite works on them.

use easel_core::{pt, Rect};
use easel_demos::data_path;
use easel_render::{Drawable, GpuContext, Image};

#[test]
fn test_bundled_images_decode() {
    for (name, size) in [("bg.png", (640, 480)), ("bg2.png", (640, 480)), ("fg.png", (320, 320))] {
        let img = image::open(data_path(name)).unwrap();
        assert_eq!((img.width(), img.height()), size, "{name}");
    }
}

#[test]
fn test_off_screen_composite() {
    let Ok(ctx) = GpuContext::shared() else { return };
    let mut bg = Drawable::load(&ctx, data_path("bg.png")).unwrap();
    let fg = Image::load(&ctx, data_path("fg.png")).unwrap();
    let before = bg.to_image().unwrap();

    bg.draw_rect(pt(10, 10), &fg, Rect::new(90, 90, 225, 225)).unwrap();
    let after = bg.to_image().unwrap();

    // Outside the 135x135 destination nothing changes.
    assert_eq!(after.get_pixel(5, 5), before.get_pixel(5, 5));
    assert_eq!(after.get_pixel(200, 200), before.get_pixel(200, 200));
    // The disc centre of the foreground is opaque.
    let fg_px = fg.to_image().unwrap();
    assert_eq!(after.get_pixel(10 + 70, 10 + 70), fg_px.get_pixel(160, 160));
}
