//! GPU rendering without a window: composites two images and writes the
//! result to `result.png`.

use std::error::Error;

use easel_core::{pt, Rect};
use easel_demos::data_path;
use easel_render::{Drawable, GpuContext, Image};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("off-screen: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let gpu = GpuContext::shared()?;
    let mut bg = Drawable::load(&gpu, data_path("bg.png"))?;
    let fg = Image::load(&gpu, data_path("fg.png"))?;

    bg.draw_rect(pt(10, 10), &fg, Rect::new(90, 90, 225, 225))?;

    let out = "result.png";
    bg.write_file(out)?;
    println!("Created: {out}");
    Ok(())
}
