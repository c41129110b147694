//! GPU context: owns the `wgpu` instance, device and queue.
//!
//! One context serves every texture, image and window of a program and is
//! shared through an `Arc`. Windows create their surfaces from the same
//! instance so that textures drawn offscreen can be presented directly.
//!
//! Two ways to get one:
//!
//! 1. **Explicit** (`GpuContext::new_headless` / `GpuContext::with_config`)
//!    for tests, benchmarks and programs that manage their own context.
//!
//! 2. **Shared** (`GpuContext::shared`), a lazily created process-wide
//!    context used by the demos.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use wgpu::{
    Adapter, Device, DeviceDescriptor, Instance, InstanceDescriptor, PowerPreference, Queue,
    RequestAdapterOptions, TextureFormat,
};

use crate::pipelines::sprite::{SpritePipeline, SpriteResources};

/// Format of every texture and image.
pub const TEXTURE_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Adapter selection.
#[derive(Clone, Debug)]
pub struct GpuConfig {
    pub power_preference: PowerPreference,
    /// Accept only a software adapter.
    pub force_fallback_adapter: bool,
    pub label: &'static str,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            power_preference: PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            label: "easel",
        }
    }
}

/// Core GPU state shared by all textures and windows.
pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
    sprites: SpriteResources,
    texture_pipeline: SpritePipeline,
    live_textures: AtomicUsize,
}

static SHARED: Mutex<Option<Arc<GpuContext>>> = Mutex::new(None);

impl GpuContext {
    /// Create a context with the default [`GpuConfig`].
    pub async fn new_headless() -> Result<Self, GpuError> {
        Self::with_config(GpuConfig::default()).await
    }

    pub async fn with_config(config: GpuConfig) -> Result<Self, GpuError> {
        let instance = Instance::new(&InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: None,
                force_fallback_adapter: config.force_fallback_adapter,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!(
            "GPU adapter: {} ({:?}, {:?})",
            info.name,
            info.device_type,
            info.backend
        );

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some(config.label),
                    ..Default::default()
                },
                None,
            )
            .await?;

        let sprites = SpriteResources::new(&device);
        let texture_pipeline = SpritePipeline::new(&device, &sprites, TEXTURE_FORMAT);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            sprites,
            texture_pipeline,
            live_textures: AtomicUsize::new(0),
        })
    }

    /// The process-wide context, created on first use.
    ///
    /// A failed creation is not cached; the next call tries again.
    pub fn shared() -> Result<Arc<Self>, GpuError> {
        let mut slot = SHARED.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ctx) = slot.as_ref() {
            return Ok(Arc::clone(ctx));
        }
        let ctx = Arc::new(pollster::block_on(Self::new_headless())?);
        *slot = Some(Arc::clone(&ctx));
        Ok(ctx)
    }

    /// Number of textures and images currently alive on this context.
    pub fn live_textures(&self) -> usize {
        self.live_textures.load(Ordering::Acquire)
    }

    /// Largest width or height a texture may have.
    pub fn max_texture_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    pub fn sprites(&self) -> &SpriteResources {
        &self.sprites
    }

    /// Pipeline drawing into [`TEXTURE_FORMAT`] targets.
    pub(crate) fn texture_pipeline(&self) -> &SpritePipeline {
        &self.texture_pipeline
    }

    pub(crate) fn texture_created(&self) {
        self.live_textures.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn texture_dropped(&self) {
        self.live_textures.fetch_sub(1, Ordering::AcqRel);
    }
}

// ===================================================================
// Tests
// ===================================================================
