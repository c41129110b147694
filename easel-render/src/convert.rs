//! Conversions between easel value types and `wgpu` inputs.

use easel_core::{Color, Point, Rect};

use crate::vertex::SpriteInstance;

/// `wgpu` clear color from an 8-bit color.
pub fn wgpu_color(c: Color) -> wgpu::Color {
    let [r, g, b, a] = c.to_f32();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

pub fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// Normalized texture coordinates of `r` inside a `width × height` source.
pub fn uv_rect(r: Rect, width: u32, height: u32) -> ([f32; 2], [f32; 2]) {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    (
        [r.min.x as f32 / w, r.min.y as f32 / h],
        [r.max.x as f32 / w, r.max.y as f32 / h],
    )
}

/// Sprite copying `src_rect` of a `width × height` source to `dst`.
pub fn sprite(dst: Point, src_rect: Rect, width: u32, height: u32) -> SpriteInstance {
    let (uv_min, uv_max) = uv_rect(src_rect, width, height);
    SpriteInstance::new(
        dst.x as f32,
        dst.y as f32,
        src_rect.dx() as f32,
        src_rect.dy() as f32,
    )
    .with_uv(uv_min, uv_max)
}
