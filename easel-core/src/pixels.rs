//! CPU pixel sources and the RGBA repacking fallback.
//!
//! Textures are uploaded from tightly packed RGBA8 rows. Sources that
//! already have that layout are uploaded in place; anything else (a
//! cropped view whose rows are padded by the parent stride, or a non-RGBA
//! format) is first copied into a compact [`RgbaImage`] by [`repack`].

use std::borrow::Cow;
use std::time::Instant;

use image::{DynamicImage, GenericImageView, RgbaImage, SubImage};
use thiserror::Error;

use crate::color::Color;
use crate::geom::{Point, Rect};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PixelError {
    #[error("pixel slice holds {len} bytes, {needed} needed for {width}x{height} with stride {stride}")]
    Truncated {
        len: usize,
        needed: usize,
        width: u32,
        height: u32,
        stride: usize,
    },
    #[error("stride {stride} is shorter than a {width} pixel row")]
    Stride { stride: usize, width: u32 },
}

/// Raw RGBA8 rows of a pixel source. `pix[0]` is the top-left pixel of
/// the source bounds and consecutive rows start `stride` bytes apart.
#[derive(Clone, Copy, Debug)]
pub struct RgbaLayout<'a> {
    pub pix: &'a [u8],
    pub stride: usize,
}

/// Anything that can describe its pixels to the texture loader.
pub trait PixelSource {
    /// Bounds of the source. `min` need not be the origin.
    fn bounds(&self) -> Rect;

    /// Color at absolute coordinates `(x, y)`. Points outside
    /// [`PixelSource::bounds`] are transparent.
    fn color_at(&self, x: i32, y: i32) -> Color;

    /// Direct access to the RGBA8 rows, if the source stores them.
    fn rgba_layout(&self) -> Option<RgbaLayout<'_>> {
        None
    }

    /// Name used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Tightly packed RGBA8 pixels, borrowed from the source when possible.
#[derive(Clone, Debug)]
pub struct PackedRgba<'a> {
    pub width: u32,
    pub height: u32,
    pub data: Cow<'a, [u8]>,
}

impl PackedRgba<'_> {
    /// Whether the pixels had to be copied out of the source.
    pub fn is_repacked(&self) -> bool {
        matches!(self.data, Cow::Owned(_))
    }
}

/// Returns the pixels of `src` as tightly packed RGBA8 rows.
///
/// A source whose stride equals `4 * width` is borrowed as is; every other
/// source goes through [`repack`].
pub fn packed_rgba<S: PixelSource + ?Sized>(src: &S) -> PackedRgba<'_> {
    let (width, height) = src.bounds().size();
    let row = width as usize * 4;
    if let Some(layout) = src.rgba_layout() {
        let len = row * height as usize;
        if layout.stride == row && layout.pix.len() >= len {
            return PackedRgba {
                width,
                height,
                data: Cow::Borrowed(&layout.pix[..len]),
            };
        }
    }
    let dst = repack(src);
    PackedRgba {
        width,
        height,
        data: Cow::Owned(dst.into_raw()),
    }
}

/// Copies `src` into a new, compact RGBA image whose origin is (0, 0).
///
/// Uses row copies when the source exposes RGBA rows and per-pixel color
/// queries otherwise. Both paths are lossless.
pub fn repack<S: PixelSource + ?Sized>(src: &S) -> RgbaImage {
    let start = Instant::now();
    let bounds = src.bounds();
    let (width, height) = bounds.size();
    let mut dst = RgbaImage::new(width, height);

    let row = width as usize * 4;
    let rows = src
        .rgba_layout()
        .filter(|layout| layout_covers(layout, row, height as usize));
    match rows {
        Some(layout) => {
            for (y, out) in dst.chunks_exact_mut(row.max(1)).enumerate() {
                let off = y * layout.stride;
                out.copy_from_slice(&layout.pix[off..off + row]);
            }
        }
        None => {
            for (x, y, px) in dst.enumerate_pixels_mut() {
                *px = src
                    .color_at(bounds.min.x + x as i32, bounds.min.y + y as i32)
                    .into();
            }
        }
    }

    log::debug!(
        "repack: fallback conversion of {} ({}x{}) finished in {:?}",
        src.type_name(),
        width,
        height,
        start.elapsed()
    );
    dst
}

/// Whether `layout` holds `height` rows of `row` bytes at its stride.
fn layout_covers(layout: &RgbaLayout<'_>, row: usize, height: usize) -> bool {
    if height == 0 || row == 0 {
        return true;
    }
    layout.stride >= row
        && (height - 1)
            .checked_mul(layout.stride)
            .and_then(|n| n.checked_add(row))
            .is_some_and(|needed| layout.pix.len() >= needed)
}

// ── Views ───────────────────────────────────────────────────────────

/// A borrowed RGBA8 view with an explicit stride, e.g. a crop of a
/// larger image.
#[derive(Clone, Copy, Debug)]
pub struct RgbaView<'a> {
    pix: &'a [u8],
    stride: usize,
    rect: Rect,
}

impl<'a> RgbaView<'a> {
    /// Wrap raw rows. `pix[0]` is the pixel at `rect.min`.
    pub fn new(pix: &'a [u8], stride: usize, rect: Rect) -> Result<Self, PixelError> {
        let (width, height) = rect.size();
        let row = width as usize * 4;
        if stride < row {
            return Err(PixelError::Stride { stride, width });
        }
        let needed = if height == 0 {
            0
        } else {
            (height as usize - 1) * stride + row
        };
        if pix.len() < needed {
            return Err(PixelError::Truncated {
                len: pix.len(),
                needed,
                width,
                height,
                stride,
            });
        }
        Ok(Self { pix, stride, rect })
    }

    /// A view covering the whole of `img`.
    pub fn of(img: &'a RgbaImage) -> Self {
        Self {
            pix: img.as_raw().as_slice(),
            stride: img.width() as usize * 4,
            rect: Rect::new(0, 0, img.width() as i32, img.height() as i32),
        }
    }

    /// The part of this view inside `r`, keeping absolute coordinates.
    pub fn sub_view(&self, r: Rect) -> RgbaView<'a> {
        let rect = r.intersect(&self.rect);
        if rect.is_empty() {
            return RgbaView {
                pix: &[],
                stride: self.stride,
                rect: Rect::ZERO,
            };
        }
        let off = self.offset(rect.min);
        RgbaView {
            pix: &self.pix[off..],
            stride: self.stride,
            rect,
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    fn offset(&self, p: Point) -> usize {
        (p.y - self.rect.min.y) as usize * self.stride + (p.x - self.rect.min.x) as usize * 4
    }
}

impl PixelSource for RgbaView<'_> {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn color_at(&self, x: i32, y: i32) -> Color {
        if !self.rect.contains(Point::new(x, y)) {
            return Color::TRANSPARENT;
        }
        let i = self.offset(Point::new(x, y));
        Color::rgba(self.pix[i], self.pix[i + 1], self.pix[i + 2], self.pix[i + 3])
    }

    fn rgba_layout(&self) -> Option<RgbaLayout<'_>> {
        Some(RgbaLayout {
            pix: self.pix,
            stride: self.stride,
        })
    }
}

// ── `image` crate sources ───────────────────────────────────────────

impl PixelSource for RgbaImage {
    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    fn color_at(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 {
            return Color::TRANSPARENT;
        }
        self.get_pixel_checked(x as u32, y as u32)
            .map(|p| Color::from(*p))
            .unwrap_or(Color::TRANSPARENT)
    }

    fn rgba_layout(&self) -> Option<RgbaLayout<'_>> {
        Some(RgbaLayout {
            pix: self.as_raw().as_slice(),
            stride: self.width() as usize * 4,
        })
    }
}

impl PixelSource for DynamicImage {
    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    fn color_at(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return Color::TRANSPARENT;
        }
        Color::from(self.get_pixel(x as u32, y as u32))
    }

    fn rgba_layout(&self) -> Option<RgbaLayout<'_>> {
        self.as_rgba8().and_then(|img| img.rgba_layout())
    }
}

impl PixelSource for SubImage<&RgbaImage> {
    fn bounds(&self) -> Rect {
        let (w, h) = self.dimensions();
        Rect::new(0, 0, w as i32, h as i32)
    }

    fn color_at(&self, x: i32, y: i32) -> Color {
        let (w, h) = self.dimensions();
        if x < 0 || y < 0 || x as u32 >= w || y as u32 >= h {
            return Color::TRANSPARENT;
        }
        Color::from(self.get_pixel(x as u32, y as u32))
    }
}

// ===================================================================
// Tests
// ===================================================================
