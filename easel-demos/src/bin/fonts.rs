//! Renders TTF text and a live FPS counter, capped at 60 frames per second.

use std::error::Error;
use std::path::PathBuf;

use easel_core::{pt, Color, Event};
use easel_demos::{data_path, FpsCounter, FrameLimiter};
use easel_render::{GpuContext, Image};
use easel_text::{system_font_path, Font, Text, TextOptions};
use easel_window::{Window, WindowConfig};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("fonts: {e}");
        std::process::exit(1);
    }
}

/// A font from the data directory, or a system font when it is missing.
fn font_path(name: &str) -> PathBuf {
    let path = data_path(name);
    if path.is_file() {
        return path;
    }
    match system_font_path() {
        Some(fallback) => {
            log::warn!("{} not found, using {}", path.display(), fallback.display());
            fallback
        }
        None => path,
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let gpu = GpuContext::shared()?;
    let mut win = Window::open(&gpu, WindowConfig::new(640, 480).with_title("fonts"))?;

    let bg = Image::load(&gpu, data_path("bg2.png"))?;

    let text_font = Font::load(font_path("Exocet.ttf"))?;
    let text = Text::new(
        &text_font,
        TextOptions {
            text: "TTF fonts".into(),
            size: 32,
            color: Color::WHITE,
            ..Default::default()
        },
    );

    let fps_font = Font::load(font_path("DejaVuSansMono.ttf"))?;
    let mut fps_text = Text::new(
        &fps_font,
        TextOptions {
            size: 14,
            color: Color::WHITE,
            ..Default::default()
        },
    );

    let mut fps = FpsCounter::new();
    let mut limiter = FrameLimiter::new(60);
    loop {
        limiter.wait();

        win.clear(Color::WHITE)?;
        win.draw(pt(0, 0), &bg)?;
        win.draw(pt(420, 12), &text)?;
        fps_text.set_text(fps.label());
        win.draw(pt(8, 4), &fps_text)?;
        win.display()?;
        fps.frame();

        while let Some(event) = win.poll_event()? {
            println!("{event:?}");
            if event == Event::Close {
                return Ok(());
            }
        }
    }
}
