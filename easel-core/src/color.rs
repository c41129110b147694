//! 8-bit RGBA color.
//!
//! Channels are straight (not premultiplied) alpha, which is what the
//! `image` crate stores and what the GPU alpha-blend state expects.

use image::Rgba;

/// A color with four 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as `[r, g, b, a]`.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channels normalized to `[0.0, 1.0]`.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Inverse of [`Color::to_f32`]. Out of range channels are clamped.
    pub fn from_f32(c: [f32; 4]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgba(q(c[0]), q(c[1]), q(c[2]), q(c[3]))
    }
}

impl From<[u8; 4]> for Color {
    fn from(c: [u8; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        Self::from(p.0)
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba(c.to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_is_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).a, 255);
        assert_eq!(Color::WHITE.to_array(), [255, 255, 255, 255]);
    }

    #[test]
    fn test_f32_round_trip_is_exact() {
        for v in [0u8, 1, 17, 128, 254, 255] {
            let c = Color::rgba(v, 255 - v, v / 2, v);
            assert_eq!(Color::from_f32(c.to_f32()), c);
        }
    }

    #[test]
    fn test_from_f32_clamps() {
        assert_eq!(Color::from_f32([-1.0, 2.0, 0.5, 1.0]), Color::rgba(0, 255, 128, 255));
    }

    #[test]
    fn test_image_rgba_conversion() {
        let c = Color::rgba(10, 20, 30, 40);
        let p: Rgba<u8> = c.into();
        assert_eq!(p, Rgba([10, 20, 30, 40]));
        assert_eq!(Color::from(p), c);
    }
}
