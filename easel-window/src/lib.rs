//! # easel-window
//!
//! Native windows for easel, built on `winit` and presented with `wgpu`.
//!
//! ```text
//! Window::open ──► Platform (thread-local winit event loop)
//!     │                 │ pump_app_events
//!     │                 ▼
//!     │           per-window queue ──► EventTranslator ──► poll_event()
//!     ▼
//! back buffer (Drawable) ──► display() ──► surface
//! ```
//!
//! - **`window`** — `Window`, `WindowConfig`, `WindowStyle`, `WindowError`.
//! - **`platform`** — the thread-local event loop and event queues.
//! - **`translate`** — `winit` events → `easel_core::Event`.
//! - **`keyboard`**, **`mouse`** — key, modifier and button tables.

pub mod keyboard;
pub mod mouse;
mod platform;
pub mod translate;
pub mod window;

pub use translate::EventTranslator;
pub use window::{Window, WindowConfig, WindowError, WindowStyle};
