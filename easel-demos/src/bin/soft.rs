//! Combines a software-rendered border with a GPU texture and writes the
//! result to `result.png`.

use std::error::Error;

use easel_core::Point;
use easel_demos::data_path;
use easel_render::{Drawable, GpuContext, Image};
use image::{Rgba, RgbaImage};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("soft: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let gpu = GpuContext::shared()?;

    // One pixel black border, drawn on the CPU.
    let (w, h) = (640, 480);
    let black = Rgba([0, 0, 0, 255]);
    let mut border = RgbaImage::new(w, h);
    for x in 0..w {
        border.put_pixel(x, 0, black);
        border.put_pixel(x, h - 1, black);
    }
    for y in 0..h {
        border.put_pixel(0, y, black);
        border.put_pixel(w - 1, y, black);
    }

    let mut bg = Drawable::load(&gpu, data_path("bg.png"))?;
    let border = Image::read(&gpu, &border)?;
    bg.draw(Point::ZERO, &border)?;

    let out = "result.png";
    bg.write_file(out)?;
    println!("Created: {out}");
    Ok(())
}
