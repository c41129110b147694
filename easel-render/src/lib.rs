//! # easel-render
//!
//! GPU textures for easel, built on `wgpu`.
//!
//! ## Architecture
//!
//! ```text
//!  GpuContext (Arc, shared)
//!       │
//!       ├──► Image::load / Image::read         ◀─── read-only draw source
//!       │
//!       ├──► Drawable::new / load / read       ◀─── render target
//!       │        │
//!       │        ▼
//!       │    draw(point, Source) ──► SpritePipeline::draw (one quad)
//!       │        │
//!       │        ▼
//!       │    to_image / write_file             ◀─── GPU readback
//!       │
//!       └──► window surfaces (easel-window)
//! ```
//!
//! ## Crate modules
//!
//! - [`context`] — GPU instance/device/queue initialisation
//! - [`vertex`] — vertex, instance, and camera data types
//! - [`pipelines`] — the sprite render pipeline
//! - [`convert`] — easel geometry/color → wgpu values
//! - [`texture`] — `Image`, `Drawable`, `Source`

pub mod context;
pub mod convert;
pub mod pipelines;
pub mod texture;
pub mod vertex;

// Re-exports for convenience
pub use context::{GpuConfig, GpuContext, GpuError, TEXTURE_FORMAT};
pub use pipelines::{SpritePipeline, SpriteTarget};
pub use texture::{Drawable, Image, RenderError, Source};
pub use vertex::{CameraUniform, QuadVertex, SpriteInstance};
