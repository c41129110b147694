//! # easel-text
//!
//! Fonts and styled text for easel, built on `cosmic-text`.
//!
//! ```text
//! Font::load(path) ──► Font (own FontSystem + SwashCache, shared)
//!     │
//!     ▼
//! Text::new(&font, TextOptions) ──► measure() / rasterize() ──► RgbaImage
//! ```
//!
//! - **`font`** — Font file loading, the shared shaping state.
//! - **`text`** — Size, style, color and string of a drawable text.

pub mod font;
pub mod text;

pub use font::{system_font_path, Font, TextError};
pub use text::{Text, TextOptions, TextStyle};
