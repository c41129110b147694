//! Draws an image and part of another onto a window, printing every event
//! until the window is closed.

use std::error::Error;

use easel_core::{pt, Color, Event, Rect};
use easel_demos::data_path;
use easel_render::{GpuContext, Image};
use easel_window::{Window, WindowConfig};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("tiny: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let gpu = GpuContext::shared()?;
    let mut win = Window::open(&gpu, WindowConfig::new(640, 480).with_title("tiny"))?;

    let bg = Image::load(&gpu, data_path("bg.png"))?;
    let fg = Image::load(&gpu, data_path("fg.png"))?;

    loop {
        while let Some(event) = win.poll_event()? {
            println!("{event:?}");
            if event == Event::Close {
                win.close()?;
                return Ok(());
            }
        }

        win.clear(Color::WHITE)?;
        win.draw(pt(0, 0), &bg)?;
        // The (90,90)-(225,225) part of the foreground, placed at (10,10).
        win.draw_rect(pt(10, 10), &fg, Rect::new(90, 90, 225, 225))?;
        win.display()?;
    }
}
