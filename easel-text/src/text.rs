//! Styled text that can be measured and rasterized.
//!
//! Layout is redone against the font metrics on every query, so measured
//! bounds always reflect the current string, size and style.

use bitflags::bitflags;
use cosmic_text::{Attrs, Buffer, Color as CColor, Family, Metrics, Shaping, Weight};
use image::{Rgba, RgbaImage};

use easel_core::{Color, Rect};

use crate::font::{Font, FontCore};

/// Line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.2;

/// Horizontal shift per pixel of height for synthesized italics.
const ITALIC_SKEW: f32 = 0.2;

/// Font size per pixel of synthesized bold smear.
const BOLD_DIVISOR: u32 = 24;

bitflags! {
    /// Combinable text attributes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TextStyle: u8 {
        const REGULAR    = 0;
        const BOLD       = 1 << 0;
        const ITALIC     = 1 << 1;
        const UNDERLINED = 1 << 2;
    }
}

/// Initial settings for a [`Text`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextOptions {
    pub text: String,
    /// Character size in pixels.
    pub size: u32,
    pub style: TextStyle,
    pub color: Color,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            size: 12,
            style: TextStyle::REGULAR,
            color: Color::BLACK,
        }
    }
}

impl TextOptions {
    /// Default options with the given string.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// A string drawn with a [`Font`].
#[derive(Clone, Debug)]
pub struct Text {
    font: Font,
    text: String,
    size: u32,
    style: TextStyle,
    color: Color,
}

impl Text {
    pub fn new(font: &Font, opts: TextOptions) -> Self {
        Self {
            font: font.clone(),
            text: opts.text,
            size: opts.size.max(1),
            style: opts.style,
            color: opts.color,
        }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Set the character size in pixels. Zero is raised to one.
    pub fn set_size(&mut self, size: u32) {
        self.size = size.max(1);
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Width of the laid out text in pixels.
    pub fn width(&self) -> u32 {
        self.measure().0
    }

    /// Height of the laid out text in pixels.
    pub fn height(&self) -> u32 {
        self.measure().1
    }

    /// Bounds of the text, anchored at the origin.
    pub fn bounds(&self) -> Rect {
        let (w, h) = self.measure();
        Rect::new(0, 0, w as i32, h as i32)
    }

    /// Width and height of the laid out text.
    pub fn measure(&self) -> (u32, u32) {
        let mut core = self.font.lock();
        let synth = self.synthesis(&core);
        let buffer = self.layout(&mut core);
        let line_height = buffer.metrics().line_height;
        let (mut w, mut h) = (0.0f32, 0.0f32);
        for run in buffer.layout_runs() {
            w = w.max(run.line_w);
            h = h.max(run.line_top + line_height);
        }
        let w = w.ceil() as u32;
        let w = if w > 0 { w + synth.extra_width() } else { 0 };
        (w, h.ceil() as u32)
    }

    /// Render the text into a straight-alpha RGBA image of
    /// [`Text::measure`] size.
    pub fn rasterize(&self) -> RgbaImage {
        let (width, height) = self.measure();
        let mut img = RgbaImage::new(width, height);
        if width == 0 || height == 0 {
            return img;
        }

        let mut core = self.font.lock();
        let synth = self.synthesis(&core);
        let buffer = self.layout(&mut core);
        let FontCore { system, cache, .. } = &mut *core;

        let c = self.color;
        buffer.draw(system, cache, CColor::rgba(c.r, c.g, c.b, c.a), |x, y, w, h, color| {
            if color.a() == 0 {
                return;
            }
            let px = Rgba([color.r(), color.g(), color.b(), color.a()]);
            for dy in 0..h as i32 {
                for dx in 0..w as i32 {
                    synth.plot(&mut img, x + dx, y + dy, px);
                }
            }
        });

        if self.style.contains(TextStyle::UNDERLINED) {
            let thickness = (self.size / 14).max(1) as i32;
            let px = Rgba(c.to_array());
            for run in buffer.layout_runs() {
                let top = (run.line_y + self.size as f32 * 0.1).round() as i32;
                let right = run.line_w.ceil() as i32 + synth.extra_width() as i32;
                for y in top..top + thickness {
                    for x in 0..right {
                        blend_max(&mut img, x, y, px);
                    }
                }
            }
        }
        img
    }

    fn line_height(&self) -> f32 {
        (self.size as f32 * LINE_SPACING).ceil()
    }

    /// Styles requested but missing from the font file.
    fn synthesis(&self, core: &FontCore) -> Synthesis {
        let embolden = if self.style.contains(TextStyle::BOLD) && !core.bold {
            (self.size / BOLD_DIVISOR).max(1)
        } else {
            0
        };
        let skew = if self.style.contains(TextStyle::ITALIC) && core.italic.is_none() {
            ITALIC_SKEW
        } else {
            0.0
        };
        Synthesis {
            embolden,
            skew,
            line_height: self.line_height(),
        }
    }

    fn layout(&self, core: &mut FontCore) -> Buffer {
        let metrics = Metrics::new(self.size as f32, self.line_height());
        let FontCore {
            system,
            family,
            bold,
            italic,
            ..
        } = core;

        // Only faces present in the file may be requested; shaping has
        // nothing to fall back to.
        let mut attrs = Attrs::new().family(Family::Name(family.as_str()));
        if self.style.contains(TextStyle::BOLD) && *bold {
            attrs = attrs.weight(Weight::BOLD);
        }
        if let (true, Some(style)) = (self.style.contains(TextStyle::ITALIC), *italic) {
            attrs = attrs.style(style);
        }

        let mut buffer = Buffer::new(system, metrics);
        buffer.set_size(system, None, None);
        buffer.set_text(system, &self.text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(system, false);
        buffer
    }
}

/// Faux bold and italic for fonts without those faces.
#[derive(Clone, Copy, Debug)]
struct Synthesis {
    /// Pixels each glyph pixel is smeared to the right.
    embolden: u32,
    /// Rightward shift per pixel above the line bottom.
    skew: f32,
    line_height: f32,
}

impl Synthesis {
    /// Width added to every non-empty line.
    fn extra_width(&self) -> u32 {
        self.embolden + (self.line_height * self.skew).ceil() as u32
    }

    fn plot(&self, img: &mut RgbaImage, x: i32, y: i32, px: Rgba<u8>) {
        let shift = if self.skew > 0.0 {
            let bottom = ((y as f32 / self.line_height).floor() + 1.0) * self.line_height;
            ((bottom - y as f32 - 0.5) * self.skew).round() as i32
        } else {
            0
        };
        for dx in 0..=self.embolden as i32 {
            blend_max(img, x + shift + dx, y, px);
        }
    }
}

/// Keep the more opaque of the existing and incoming pixel. Glyph bitmaps
/// of neighbouring characters may overlap; this avoids darkened seams.
fn blend_max(img: &mut RgbaImage, x: i32, y: i32, px: Rgba<u8>) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    if px.0[3] > dst.0[3] {
        *dst = px;
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::system_font_path;

    fn system_font() -> Option<Font> {
        match system_font_path() {
            Some(path) => Font::load(path).ok(),
            None => {
                eprintln!("no system font found, skipping");
                None
            }
        }
    }

    #[test]
    fn test_options_default() {
        let opts = TextOptions::default();
        assert_eq!(opts.size, 12);
        assert_eq!(opts.style, TextStyle::REGULAR);
        assert_eq!(opts.color, Color::BLACK);
        assert!(opts.text.is_empty());
    }

    #[test]
    fn test_style_bits_combine() {
        let s = TextStyle::BOLD | TextStyle::UNDERLINED;
        assert!(s.contains(TextStyle::BOLD));
        assert!(!s.contains(TextStyle::ITALIC));
        assert!(s.contains(TextStyle::UNDERLINED));
        assert!(TextStyle::REGULAR.is_empty());
    }

    #[test]
    fn test_setters() {
        let Some(font) = system_font() else { return };
        let mut text = Text::new(&font, TextOptions::with_text("hi"));
        text.set_size(0);
        assert_eq!(text.size(), 1);
        text.set_size(30);
        text.set_style(TextStyle::ITALIC);
        text.set_color(Color::RED);
        text.set_text("hello");
        assert_eq!(text.size(), 30);
        assert_eq!(text.style(), TextStyle::ITALIC);
        assert_eq!(text.color(), Color::RED);
        assert_eq!(text.text(), "hello");
    }

    #[test]
    fn test_measure_tracks_content() {
        let Some(font) = system_font() else { return };
        let mut text = Text::new(&font, TextOptions::with_text("a"));
        let short = text.width();
        text.set_text("a much longer line of text");
        let long = text.width();
        assert!(long > short, "{long} should exceed {short}");

        let small = text.height();
        text.set_size(48);
        assert!(text.height() > small);
    }

    #[test]
    fn test_empty_text_has_no_width() {
        let Some(font) = system_font() else { return };
        let text = Text::new(&font, TextOptions::default());
        assert_eq!(text.width(), 0);
        assert!(text.bounds().is_empty());
        let img = text.rasterize();
        assert_eq!(img.width(), 0);
    }

    #[test]
    fn test_rasterize_covers_glyphs() {
        let Some(font) = system_font() else { return };
        let text = Text::new(
            &font,
            TextOptions {
                text: "Hello".into(),
                size: 32,
                color: Color::BLUE,
                ..Default::default()
            },
        );
        let img = text.rasterize();
        assert_eq!((img.width(), img.height()), text.measure());
        let inked: Vec<_> = img.pixels().filter(|p| p.0[3] > 0).collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|p| p.0[..3] == [0, 0, 255]));
    }

    #[test]
    fn test_underline_adds_ink() {
        let Some(font) = system_font() else { return };
        let mut text = Text::new(
            &font,
            TextOptions {
                text: "under".into(),
                size: 28,
                ..Default::default()
            },
        );
        let count = |img: &RgbaImage| img.pixels().filter(|p| p.0[3] > 0).count();
        let plain = count(&text.rasterize());
        text.set_style(TextStyle::UNDERLINED);
        assert!(count(&text.rasterize()) > plain);
    }

    fn ink(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0[3] > 0).count()
    }

    fn styled(font: &Font, style: TextStyle) -> Text {
        Text::new(
            font,
            TextOptions {
                text: "Hello".into(),
                size: 32,
                style,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_italic_lays_out_and_slants() {
        let Some(font) = system_font() else { return };
        let regular = styled(&font, TextStyle::REGULAR);
        for style in [TextStyle::ITALIC, TextStyle::BOLD | TextStyle::ITALIC] {
            let text = styled(&font, style);
            let (w, h) = text.measure();
            assert!(w > 0 && h > 0, "{style:?} measured {w}x{h}");
            let img = text.rasterize();
            assert_eq!(img.dimensions(), (w, h));
            assert!(ink(&img) > 0);
            assert_ne!(img, regular.rasterize());
        }
        if !font.has_italic() {
            assert!(styled(&font, TextStyle::ITALIC).width() > regular.width());
        }
    }

    #[test]
    fn test_bold_adds_ink() {
        let Some(font) = system_font() else { return };
        let regular = styled(&font, TextStyle::REGULAR);
        let bold = styled(&font, TextStyle::BOLD);
        assert!(bold.width() > regular.width());
        assert!(ink(&bold.rasterize()) > ink(&regular.rasterize()));
    }

    #[test]
    fn test_synthesis_only_for_missing_faces() {
        let upright = Synthesis {
            embolden: 0,
            skew: 0.0,
            line_height: 20.0,
        };
        assert_eq!(upright.extra_width(), 0);

        let faux = Synthesis {
            embolden: 2,
            skew: ITALIC_SKEW,
            line_height: 20.0,
        };
        assert_eq!(faux.extra_width(), 6);

        // Pixels near the top of a line lean right, the bottom row stays put.
        let mut img = RgbaImage::new(16, 20);
        let px = Rgba([0, 0, 0, 255]);
        faux.plot(&mut img, 0, 0, px);
        faux.plot(&mut img, 0, 19, px);
        assert_eq!(img.get_pixel(4, 0).0[3], 255);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!((0..3).map(|x| img.get_pixel(x, 19).0[3]).collect::<Vec<_>>(), [255; 3]);
    }

    #[test]
    fn test_text_keeps_font_alive() {
        let Some(font) = system_font() else { return };
        let text = Text::new(&font, TextOptions::with_text("kept"));
        drop(font);
        assert!(text.width() > 0);
        assert_eq!(text.font().handle_count(), 1);
    }
}
