//! Shared value types for the easel crates.
//!
//! Nothing here touches the GPU or the windowing system: geometry and
//! colors, CPU pixel sources with the RGBA repacking fallback, and the
//! platform-independent [`Event`] model.

pub mod color;
pub mod event;
pub mod geom;
pub mod pixels;

pub use color::Color;
pub use event::{Button, Event, Key, Modifiers};
pub use geom::{pt, Point, Rect};
pub use pixels::{packed_rgba, repack, PackedRgba, PixelError, PixelSource, RgbaLayout, RgbaView};
