//! Drives two windows from one thread, each with its own event queue.

use std::error::Error;

use easel_core::{pt, Color, Event, Rect};
use easel_demos::data_path;
use easel_render::{GpuContext, Image};
use easel_window::{Window, WindowConfig};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("many: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let gpu = GpuContext::shared()?;
    let bg = Image::load(&gpu, data_path("bg.png"))?;
    let fg = Image::load(&gpu, data_path("fg.png"))?;

    let mut windows = Vec::new();
    for title in ["window one", "window two"] {
        let mut win = Window::open(&gpu, WindowConfig::new(640, 480))?;
        win.set_title(title)?;
        windows.push((title, win));
    }

    while windows.iter().any(|(_, win)| win.is_open()) {
        for (title, win) in windows.iter_mut().filter(|(_, w)| w.is_open()) {
            let mut closed = false;
            while let Some(event) = win.poll_event()? {
                println!("{title} - {event:?}");
                if event == Event::Close {
                    closed = true;
                    break;
                }
            }
            if closed {
                win.close()?;
                continue;
            }

            win.clear(Color::WHITE)?;
            win.draw(pt(0, 0), &bg)?;
            win.draw_rect(pt(10, 10), &fg, Rect::new(90, 90, 225, 225))?;
            win.display()?;
        }
    }
    Ok(())
}
