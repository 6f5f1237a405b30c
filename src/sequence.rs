//! The frame driver: owns the per-run setup, walks the frame
//! indices in order, and hands each finished buffer to the PNG
//! encoder.  Frames are fully independent; the image buffer is
//! allocated once and overwritten in place between frames.

use std::fs::{self, File};
use std::path::Path;
use std::time::Instant;

use failure::Error;
use image::png::PNGEncoder;
use image::ColorType;

use config::RenderConfig;
use field::EscapeField;
use noise::DitherTable;
use render;
use sampling;

/// Encodes one finished frame as an RGBA PNG.
fn write_frame(path: &Path, pixels: &[u8], bounds: (usize, usize)) -> Result<(), Error> {
    let output = File::create(path)?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGBA(8))?;
    Ok(())
}

/// Renders the whole sequence described by `config` into
/// `output_dir`, one `frameNNNN.png` per frame.  The sample set and
/// dither table are built once up front; each frame then runs a full
/// scheduler pass and is encoded before the next frame starts.  Each
/// frame is attempted exactly once: an encoding failure ends the run.
pub fn render_sequence(config: &RenderConfig, output_dir: &Path) -> Result<(), Error> {
    config.validate()?;
    fs::create_dir_all(output_dir)?;

    let samples = sampling::sample_points(config.num_samples);
    let noise = DitherTable::build(config.noise_size);
    let field = EscapeField::new(config);
    let mut image = vec![0u8; config.buffer_len()];

    for frame in 0..config.num_frames {
        let started = Instant::now();

        render::render_frame(frame, config, &field, &samples, &noise, &mut image);

        let path = output_dir.join(format!("frame{:04}.png", frame));
        write_frame(&path, &image, (config.xres, config.yres))?;

        println!(
            "frame {:04} rendered in {:.2}s",
            frame,
            started.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
