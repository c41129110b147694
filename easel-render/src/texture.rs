//! GPU textures: read-only [`Image`]s and render-target [`Drawable`]s.
//!
//! Both own a texture, a view and a sprite binding on a shared
//! [`GpuContext`]. Only a `Drawable` can be drawn onto; every kind of
//! [`Source`] can be drawn from.
//!
//! ```text
//! file ──► image::open ──┐
//!                        ├──► packed_rgba ──► write_texture ──► Image / Drawable
//! PixelSource ───────────┘      (repack)
//!
//! Drawable ──► copy_texture_to_buffer ──► map_async ──► RgbaImage ──► file
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;
use wgpu::{
    BufferDescriptor, BufferUsages, CommandEncoderDescriptor, ErrorFilter, LoadOp, MapMode,
    Origin3d, TexelCopyBufferInfo, TexelCopyBufferLayout, TexelCopyTextureInfo, Texture,
    TextureAspect, TextureDescriptor, TextureDimension, TextureUsages, TextureView,
    TextureViewDescriptor, COPY_BYTES_PER_ROW_ALIGNMENT,
};

use easel_core::{packed_rgba, Color, PixelSource, Point, Rect};
use easel_text::Text;

use crate::context::{GpuContext, TEXTURE_FORMAT};
use crate::convert;
use crate::pipelines::sprite::{self, SpriteBinding, SpritePipeline, SpriteTarget};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write image {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid texture size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("failed to create {kind} of {width}x{height}: {reason}")]
    Create {
        kind: &'static str,
        width: u32,
        height: u32,
        reason: String,
    },
    #[error("texture readback failed: {0}")]
    Readback(String),
}

// ── Shared texture state ────────────────────────────────────────────

/// A texture with its view and sprite binding. Counted in
/// [`GpuContext::live_textures`] for as long as it exists.
struct GpuTexture {
    ctx: Arc<GpuContext>,
    texture: Texture,
    view: TextureView,
    binding: SpriteBinding,
    width: u32,
    height: u32,
}

impl GpuTexture {
    fn new(
        ctx: &Arc<GpuContext>,
        kind: &'static str,
        width: u32,
        height: u32,
        usage: TextureUsages,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || width.max(height) > ctx.max_texture_size() {
            return Err(RenderError::InvalidSize { width, height });
        }

        let device = &ctx.device;
        device.push_error_scope(ErrorFilter::OutOfMemory);
        device.push_error_scope(ErrorFilter::Validation);

        let texture = device.create_texture(&TextureDescriptor {
            label: Some(kind),
            size: convert::extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());
        let binding = SpriteBinding::new(device, ctx.sprites(), &view);

        let validation = pollster::block_on(device.pop_error_scope());
        let oom = pollster::block_on(device.pop_error_scope());
        if let Some(err) = validation.or(oom) {
            return Err(RenderError::Create {
                kind,
                width,
                height,
                reason: err.to_string(),
            });
        }

        ctx.texture_created();
        log::trace!("{} created: {}x{}", kind, width, height);
        Ok(Self {
            ctx: Arc::clone(ctx),
            texture,
            view,
            binding,
            width,
            height,
        })
    }

    /// Texture of the size of `src`, filled with its pixels.
    fn from_pixels<S: PixelSource + ?Sized>(
        ctx: &Arc<GpuContext>,
        kind: &'static str,
        usage: TextureUsages,
        src: &S,
    ) -> Result<Self, RenderError> {
        let packed = packed_rgba(src);
        let tex = Self::new(ctx, kind, packed.width, packed.height, usage)?;
        tex.upload(&packed.data);
        Ok(tex)
    }

    /// Replace the whole texture with tightly packed RGBA rows.
    fn upload(&self, data: &[u8]) {
        self.ctx.queue.write_texture(
            TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            data,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            convert::extent(self.width, self.height),
        );
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Copy the texture back into CPU memory.
    fn read_back(&self) -> Result<RgbaImage, RenderError> {
        let device = &self.ctx.device;
        let row = self.width * 4;
        let padded = row.div_ceil(COPY_BYTES_PER_ROW_ALIGNMENT) * COPY_BYTES_PER_ROW_ALIGNMENT;

        let buffer = device.create_buffer(&BufferDescriptor {
            label: Some("readback"),
            size: padded as u64 * self.height as u64,
            usage: BufferUsages::COPY_DST | BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            TexelCopyBufferInfo {
                buffer: &buffer,
                layout: TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            convert::extent(self.width, self.height),
        );
        self.ctx.queue.submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| RenderError::Readback("map callback was dropped".into()))?
            .map_err(|e| RenderError::Readback(e.to_string()))?;

        let mut pixels = Vec::with_capacity(row as usize * self.height as usize);
        {
            let mapped = slice.get_mapped_range();
            for line in mapped.chunks_exact(padded as usize) {
                pixels.extend_from_slice(&line[..row as usize]);
            }
        }
        buffer.unmap();

        RgbaImage::from_raw(self.width, self.height, pixels)
            .ok_or_else(|| RenderError::Readback("mapped buffer has the wrong size".into()))
    }

    fn write_file(&self, path: &Path) -> Result<(), RenderError> {
        self.read_back()?
            .save(path)
            .map_err(|source| RenderError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Drop for GpuTexture {
    fn drop(&mut self) {
        self.ctx.texture_dropped();
    }
}

fn decode(path: &Path) -> Result<image::DynamicImage, RenderError> {
    image::open(path).map_err(|source| RenderError::Load {
        path: path.to_path_buf(),
        source,
    })
}

// ── Image ───────────────────────────────────────────────────────────

/// A read-only texture, loaded once and used only as a draw source.
pub struct Image {
    tex: GpuTexture,
}

impl Image {
    const KIND: &'static str = "image";
    const USAGE: TextureUsages = TextureUsages::TEXTURE_BINDING
        .union(TextureUsages::COPY_DST)
        .union(TextureUsages::COPY_SRC);

    /// Load an image file. The format is sniffed from the contents.
    pub fn load(ctx: &Arc<GpuContext>, path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let img = decode(path.as_ref())?;
        Self::read(ctx, &img)
    }

    /// Upload an in-memory pixel source.
    pub fn read<S: PixelSource + ?Sized>(ctx: &Arc<GpuContext>, src: &S) -> Result<Self, RenderError> {
        let tex = GpuTexture::from_pixels(ctx, Self::KIND, Self::USAGE, src)?;
        Ok(Self { tex })
    }

    pub fn width(&self) -> u32 {
        self.tex.width
    }

    pub fn height(&self) -> u32 {
        self.tex.height
    }

    pub fn bounds(&self) -> Rect {
        self.tex.bounds()
    }

    /// Read the pixels back from the GPU.
    pub fn to_image(&self) -> Result<RgbaImage, RenderError> {
        self.tex.read_back()
    }

    /// Save the pixels; the format follows the file extension.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.tex.write_file(path.as_ref())
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.tex.width)
            .field("height", &self.tex.height)
            .finish()
    }
}

// ── Drawable ────────────────────────────────────────────────────────

/// A texture that can be drawn onto.
pub struct Drawable {
    tex: GpuTexture,
}

impl Drawable {
    const KIND: &'static str = "drawable";
    const USAGE: TextureUsages = TextureUsages::RENDER_ATTACHMENT
        .union(TextureUsages::TEXTURE_BINDING)
        .union(TextureUsages::COPY_SRC)
        .union(TextureUsages::COPY_DST);

    /// A transparent drawable of the given size.
    pub fn new(ctx: &Arc<GpuContext>, width: u32, height: u32) -> Result<Self, RenderError> {
        let tex = GpuTexture::new(ctx, Self::KIND, width, height, Self::USAGE)?;
        Ok(Self { tex })
    }

    /// A drawable holding the contents of an image file.
    pub fn load(ctx: &Arc<GpuContext>, path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let img = decode(path.as_ref())?;
        Self::read(ctx, &img)
    }

    /// A drawable holding the pixels of `src`.
    pub fn read<S: PixelSource + ?Sized>(ctx: &Arc<GpuContext>, src: &S) -> Result<Self, RenderError> {
        let tex = GpuTexture::from_pixels(ctx, Self::KIND, Self::USAGE, src)?;
        Ok(Self { tex })
    }

    pub fn context(&self) -> &Arc<GpuContext> {
        &self.tex.ctx
    }

    pub fn width(&self) -> u32 {
        self.tex.width
    }

    pub fn height(&self) -> u32 {
        self.tex.height
    }

    pub fn bounds(&self) -> Rect {
        self.tex.bounds()
    }

    /// Replace every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        sprite::clear(&self.tex.ctx, &self.tex.view, convert::wgpu_color(color));
    }

    /// Draw all of `src` with its top-left corner at `dp`.
    pub fn draw<'a>(&mut self, dp: Point, src: impl Into<Source<'a>>) -> Result<(), RenderError> {
        let src = src.into();
        let bounds = src.bounds();
        self.draw_rect(dp, src, bounds)
    }

    /// Draw the `sr` part of `src` with its top-left corner at `dp`.
    ///
    /// `sr` is clipped to the source bounds; nothing is drawn when the
    /// clipped rectangle is empty.
    pub fn draw_rect<'a>(
        &mut self,
        dp: Point,
        src: impl Into<Source<'a>>,
        sr: Rect,
    ) -> Result<(), RenderError> {
        let pipeline = self.tex.ctx.texture_pipeline();
        self.draw_with(pipeline, dp, src.into(), sr)
    }

    fn draw_with(
        &self,
        pipeline: &SpritePipeline,
        dp: Point,
        src: Source<'_>,
        sr: Rect,
    ) -> Result<(), RenderError> {
        let sr = sr.intersect(&src.bounds());
        if sr.is_empty() {
            return Ok(());
        }
        let target = SpriteTarget {
            view: &self.tex.view,
            width: self.tex.width,
            height: self.tex.height,
        };
        let ctx = &self.tex.ctx;
        let blit = |tex: &GpuTexture| {
            let inst = convert::sprite(dp, sr, tex.width, tex.height);
            pipeline.draw(ctx, target, &tex.binding, inst, LoadOp::Load);
        };

        match src {
            Source::Image(img) => blit(&img.tex),
            Source::Drawable(d) => blit(&d.tex),
            Source::Text(text) => {
                let pixels = text.rasterize();
                let tex =
                    GpuTexture::from_pixels(ctx, "text", Image::USAGE, &pixels)?;
                blit(&tex);
            }
        }
        Ok(())
    }

    /// Draw the whole drawable onto an external target such as a window
    /// surface, clearing the target to `clear` first.
    pub fn present(
        &self,
        pipeline: &SpritePipeline,
        target: SpriteTarget<'_>,
        clear: Color,
    ) {
        let inst = convert::sprite(Point::ZERO, self.bounds(), self.tex.width, self.tex.height);
        pipeline.draw(
            &self.tex.ctx,
            target,
            &self.tex.binding,
            inst,
            LoadOp::Clear(convert::wgpu_color(clear)),
        );
    }

    /// Read the pixels back from the GPU.
    pub fn to_image(&self) -> Result<RgbaImage, RenderError> {
        self.tex.read_back()
    }

    /// Save the pixels; the format follows the file extension.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.tex.write_file(path.as_ref())
    }
}

impl fmt::Debug for Drawable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drawable")
            .field("width", &self.tex.width)
            .field("height", &self.tex.height)
            .finish()
    }
}

// ── Draw sources ────────────────────────────────────────────────────

/// Anything that can be drawn onto a [`Drawable`].
#[derive(Clone, Copy)]
pub enum Source<'a> {
    Image(&'a Image),
    Drawable(&'a Drawable),
    Text(&'a Text),
}

impl Source<'_> {
    /// Bounds of the source, anchored at the origin.
    pub fn bounds(&self) -> Rect {
        match self {
            Source::Image(img) => img.bounds(),
            Source::Drawable(d) => d.bounds(),
            Source::Text(text) => text.bounds(),
        }
    }
}

impl<'a> From<&'a Image> for Source<'a> {
    fn from(img: &'a Image) -> Self {
        Source::Image(img)
    }
}

impl<'a> From<&'a Drawable> for Source<'a> {
    fn from(d: &'a Drawable) -> Self {
        Source::Drawable(d)
    }
}

impl<'a> From<&'a Text> for Source<'a> {
    fn from(text: &'a Text) -> Self {
        Source::Text(text)
    }
}

// ===================================================================
// Tests
// ===================================================================
