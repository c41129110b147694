//! On-screen windows.
//!
//! A [`Window`] draws into an offscreen back buffer (a [`Drawable`]) and
//! copies it to the window surface on [`Window::display`]. Events are
//! collected by the thread's platform event loop and translated per window.

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use bitflags::bitflags;
use thiserror::Error;
use wgpu::{PresentMode, Surface, SurfaceConfiguration, SurfaceError, TextureUsages};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::window::{Fullscreen, Window as WinitWindow, WindowAttributes, WindowButtons};

use easel_core::{Color, Event, Point, Rect};
use easel_render::{
    Drawable, GpuContext, GpuError, RenderError, Source, SpritePipeline, SpriteTarget,
};

use crate::platform::Platform;
use crate::translate::EventTranslator;

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("event loop unavailable: {0}")]
    EventLoop(String),
    #[error("failed to create window: {0}")]
    Os(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("invalid window size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("window is closed")]
    Closed,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("cursor error: {0}")]
    Cursor(String),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

bitflags! {
    /// Window decorations and mode.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WindowStyle: u8 {
        const NONE       = 0;
        const TITLEBAR   = 1 << 0;
        const RESIZE     = 1 << 1;
        const CLOSE      = 1 << 2;
        const FULLSCREEN = 1 << 3;
        const DEFAULT    = Self::TITLEBAR.bits() | Self::RESIZE.bits() | Self::CLOSE.bits();
    }
}

impl Default for WindowStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings for [`Window::open`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    /// Client area width in physical pixels.
    pub width: u32,
    /// Client area height in physical pixels.
    pub height: u32,
    pub title: String,
    pub style: WindowStyle,
    /// Wait for vertical sync when presenting.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: String::from("easel"),
            style: WindowStyle::DEFAULT,
            vsync: true,
        }
    }
}

impl WindowConfig {
    /// Default settings with the given client size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_style(mut self, style: WindowStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub(crate) fn attributes(&self) -> WindowAttributes {
        let mut buttons = WindowButtons::all();
        if !self.style.contains(WindowStyle::CLOSE) {
            buttons.remove(WindowButtons::CLOSE);
        }
        if !self.style.contains(WindowStyle::RESIZE) {
            buttons.remove(WindowButtons::MAXIMIZE);
        }
        let fullscreen = self
            .style
            .contains(WindowStyle::FULLSCREEN)
            .then_some(Fullscreen::Borderless(None));

        WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width, self.height))
            .with_resizable(self.style.contains(WindowStyle::RESIZE))
            .with_decorations(self.style.contains(WindowStyle::TITLEBAR))
            .with_enabled_buttons(buttons)
            .with_fullscreen(fullscreen)
    }

    fn present_mode(&self) -> PresentMode {
        if self.vsync {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        }
    }
}

/// An open window. Every call on a closed window fails with
/// [`WindowError::Closed`].
pub struct Window {
    inner: Option<Inner>,
}

struct Inner {
    // Dropped before `window`.
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    window: Arc<WinitWindow>,
    platform: Rc<Platform>,
    pipeline: SpritePipeline,
    back: Drawable,
    translator: EventTranslator,
    pending: VecDeque<Event>,
    active: bool,
}

impl Window {
    /// Open a window on the calling thread.
    pub fn open(ctx: &Arc<GpuContext>, config: WindowConfig) -> Result<Self, WindowError> {
        if config.width == 0 || config.height == 0 {
            return Err(WindowError::InvalidSize {
                width: config.width,
                height: config.height,
            });
        }

        let platform = Platform::current()?;
        let window = Arc::new(platform.create_window(config.attributes())?);
        let id = window.id();
        let inner = Inner::attach(ctx, &config, Rc::clone(&platform), window);
        let inner = platform.forget_on_err(id, inner)?;
        Ok(Self { inner: Some(inner) })
    }

    /// Open a window on the process-wide GPU context.
    pub fn open_shared(config: WindowConfig) -> Result<Self, WindowError> {
        let ctx = GpuContext::shared()?;
        Self::open(&ctx, config)
    }

    fn inner(&self) -> Result<&Inner, WindowError> {
        self.inner.as_ref().ok_or(WindowError::Closed)
    }

    fn inner_mut(&mut self) -> Result<&mut Inner, WindowError> {
        self.inner.as_mut().ok_or(WindowError::Closed)
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Close the window and release its surface and back buffer.
    pub fn close(&mut self) -> Result<(), WindowError> {
        let inner = self.inner.take().ok_or(WindowError::Closed)?;
        log::info!("Window closed: {:?}", inner.window.id());
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), WindowError> {
        self.inner()?.window.set_title(title);
        Ok(())
    }

    /// Width of the drawing area.
    pub fn width(&self) -> Result<u32, WindowError> {
        Ok(self.inner()?.back.width())
    }

    /// Height of the drawing area.
    pub fn height(&self) -> Result<u32, WindowError> {
        Ok(self.inner()?.back.height())
    }

    pub fn bounds(&self) -> Result<Rect, WindowError> {
        Ok(self.inner()?.back.bounds())
    }

    /// Fill the drawing area with `color`.
    pub fn clear(&mut self, color: Color) -> Result<(), WindowError> {
        self.inner_mut()?.back.fill(color);
        Ok(())
    }

    /// Draw all of `src` with its top-left corner at `dp`.
    pub fn draw<'a>(&mut self, dp: Point, src: impl Into<Source<'a>>) -> Result<(), WindowError> {
        self.inner_mut()?.back.draw(dp, src)?;
        Ok(())
    }

    /// Draw the `sr` part of `src` with its top-left corner at `dp`.
    pub fn draw_rect<'a>(
        &mut self,
        dp: Point,
        src: impl Into<Source<'a>>,
        sr: Rect,
    ) -> Result<(), WindowError> {
        self.inner_mut()?.back.draw_rect(dp, src, sr)?;
        Ok(())
    }

    /// Show everything drawn since the last call.
    ///
    /// Does nothing while the window is inactive. A lost or outdated
    /// surface is reconfigured and the frame skipped.
    pub fn display(&mut self) -> Result<(), WindowError> {
        let inner = self.inner_mut()?;
        if !inner.active {
            return Ok(());
        }
        let ctx = Arc::clone(inner.back.context());

        let frame = match inner.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(e @ (SurfaceError::Lost | SurfaceError::Outdated)) => {
                log::warn!("Surface {}; reconfiguring and skipping frame", e);
                inner.surface.configure(&ctx.device, &inner.surface_config);
                return Ok(());
            }
            Err(SurfaceError::OutOfMemory) => {
                return Err(WindowError::Surface("out of memory".into()));
            }
            Err(e) => {
                log::warn!("Surface {}; skipping frame", e);
                return Ok(());
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        inner.back.present(
            &inner.pipeline,
            SpriteTarget {
                view: &view,
                width: inner.surface_config.width,
                height: inner.surface_config.height,
            },
            Color::BLACK,
        );
        inner.window.pre_present_notify();
        frame.present();
        Ok(())
    }

    /// Next pending event, or `None` once the queue is drained.
    ///
    /// Never blocks: the platform is asked for new events at most once
    /// per call.
    pub fn poll_event(&mut self) -> Result<Option<Event>, WindowError> {
        let inner = self.inner_mut()?;
        let id = inner.window.id();
        let mut pumped = false;
        loop {
            if let Some(event) = inner.pending.pop_front() {
                return Ok(Some(event));
            }
            if let Some(raw) = inner.platform.pop(id) {
                // Queued first so a failed resize still reports the event.
                if let Some((width, height)) =
                    enqueue(&mut inner.translator, &mut inner.pending, raw)
                {
                    inner.resize(width, height)?;
                }
                continue;
            }
            if pumped {
                return Ok(None);
            }
            inner.platform.pump();
            pumped = true;
        }
    }

    /// Last cursor position seen inside the window.
    pub fn cursor_position(&self) -> Result<Point, WindowError> {
        Ok(self.inner()?.translator.cursor().unwrap_or(Point::ZERO))
    }

    pub fn set_cursor_position(&mut self, pos: Point) -> Result<(), WindowError> {
        let inner = self.inner_mut()?;
        inner
            .window
            .set_cursor_position(PhysicalPosition::new(pos.x, pos.y))
            .map_err(|e| WindowError::Cursor(e.to_string()))?;
        inner.translator.set_cursor(pos);
        Ok(())
    }

    pub fn show_cursor(&mut self, visible: bool) -> Result<(), WindowError> {
        self.inner()?.window.set_cursor_visible(visible);
        Ok(())
    }

    /// Suspend (`false`) or resume (`true`) presentation. Drawing still
    /// reaches the back buffer while inactive.
    pub fn set_active(&mut self, active: bool) -> Result<(), WindowError> {
        self.inner_mut()?.active = active;
        Ok(())
    }

    pub fn is_active(&self) -> Result<bool, WindowError> {
        Ok(self.inner()?.active)
    }

    /// The back buffer contents.
    pub fn to_image(&self) -> Result<image::RgbaImage, WindowError> {
        Ok(self.inner()?.back.to_image()?)
    }
}

impl Inner {
    /// Surface, pipeline and back buffer for a freshly created window.
    fn attach(
        ctx: &Arc<GpuContext>,
        config: &WindowConfig,
        platform: Rc<Platform>,
        window: Arc<WinitWindow>,
    ) -> Result<Self, WindowError> {
        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (config.width, config.height)
        } else {
            (size.width, size.height)
        };

        let surface = ctx.instance.create_surface(Arc::clone(&window))?;
        let caps = surface.get_capabilities(&ctx.adapter);
        // Textures are linear RGBA; a linear surface shows them unchanged.
        let format = caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| {
                WindowError::Surface("the GPU adapter cannot present to this window".into())
            })?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: config.present_mode(),
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&ctx.device, &surface_config);

        let pipeline = SpritePipeline::new(&ctx.device, ctx.sprites(), format);
        let mut back = Drawable::new(ctx, width, height)?;
        back.fill(Color::BLACK);

        log::info!(
            "Window opened: \"{}\" {}x{} ({:?}, {:?})",
            config.title,
            width,
            height,
            format,
            surface_config.present_mode
        );

        Ok(Self {
            surface,
            surface_config,
            window,
            platform,
            pipeline,
            back,
            translator: EventTranslator::new(),
            pending: VecDeque::new(),
            active: true,
        })
    }

    /// Follow a size change of the client area, keeping what was drawn.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), WindowError> {
        if width == 0 || height == 0 {
            // Minimized.
            return Ok(());
        }
        if (width, height) == (self.back.width(), self.back.height()) {
            return Ok(());
        }
        let ctx = Arc::clone(self.back.context());
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&ctx.device, &self.surface_config);

        let mut back = Drawable::new(&ctx, width, height)?;
        back.fill(Color::BLACK);
        back.draw(Point::ZERO, &self.back)?;
        self.back = back;
        log::debug!("Window {:?} resized to {}x{}", self.window.id(), width, height);
        Ok(())
    }
}

/// Translate `raw` onto `pending`. Returns the new client size when `raw`
/// is a resize.
fn enqueue(
    translator: &mut EventTranslator,
    pending: &mut VecDeque<Event>,
    raw: WindowEvent,
) -> Option<(u32, u32)> {
    let resized = match &raw {
        WindowEvent::Resized(size) => Some((size.width, size.height)),
        _ => None,
    };
    pending.extend(translator.translate(raw));
    resized
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.platform.forget(self.window.id());
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = WindowConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.style, WindowStyle::DEFAULT);
        assert!(config.vsync);
        assert_eq!(config.present_mode(), PresentMode::AutoVsync);
    }

    #[test]
    fn test_config_builder() {
        let config = WindowConfig::new(320, 240)
            .with_title("tiny")
            .with_style(WindowStyle::TITLEBAR | WindowStyle::CLOSE)
            .with_vsync(false);
        assert_eq!(config.title, "tiny");
        assert!(!config.style.contains(WindowStyle::RESIZE));
        assert_eq!(config.present_mode(), PresentMode::AutoNoVsync);
    }

    #[test]
    fn test_default_style_bits() {
        let style = WindowStyle::DEFAULT;
        assert!(style.contains(WindowStyle::TITLEBAR));
        assert!(style.contains(WindowStyle::RESIZE));
        assert!(style.contains(WindowStyle::CLOSE));
        assert!(!style.contains(WindowStyle::FULLSCREEN));
    }

    #[test]
    fn test_zero_size_is_rejected_before_touching_the_platform() {
        let Ok(ctx) = pollster::block_on(GpuContext::new_headless()) else {
            return;
        };
        let ctx = Arc::new(ctx);
        let err = Window::open(&ctx, WindowConfig::new(0, 10)).err();
        assert!(matches!(
            err,
            Some(WindowError::InvalidSize {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn test_resize_is_queued_before_the_back_buffer_follows() {
        let mut translator = EventTranslator::new();
        let mut pending = VecDeque::new();
        let size = enqueue(
            &mut translator,
            &mut pending,
            WindowEvent::Resized(PhysicalSize::new(300, 200)),
        );
        assert_eq!(size, Some((300, 200)));
        assert_eq!(
            pending.pop_front(),
            Some(Event::Resize {
                width: 300,
                height: 200
            })
        );

        let size = enqueue(&mut translator, &mut pending, WindowEvent::CloseRequested);
        assert_eq!(size, None);
        assert_eq!(pending.pop_front(), Some(Event::Close));
    }

    #[test]
    fn test_closed_window_fails_fast() {
        let mut w = Window { inner: None };
        assert!(!w.is_open());
        assert!(matches!(w.width(), Err(WindowError::Closed)));
        assert!(matches!(w.poll_event(), Err(WindowError::Closed)));
        assert!(matches!(w.clear(Color::RED), Err(WindowError::Closed)));
        assert!(matches!(w.display(), Err(WindowError::Closed)));
        assert!(matches!(w.set_title("x"), Err(WindowError::Closed)));
        assert!(matches!(w.close(), Err(WindowError::Closed)));
    }
}
