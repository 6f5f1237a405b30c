extern crate mandelzoom;

use std::path::Path;

use mandelzoom::{render_sequence, RenderConfig};

fn main() {
    let config = RenderConfig::sequence();

    println!(
        "Rendering {} frames at {} x {} with {} samples per pixel",
        config.num_frames, config.xres, config.yres, config.num_samples
    );

    if let Err(e) = render_sequence(&config, Path::new("frames")) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
