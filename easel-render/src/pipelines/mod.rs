//! wgpu render pipelines.

pub mod sprite;

pub use sprite::{SpriteBinding, SpritePipeline, SpriteResources, SpriteTarget};
