#[macro_use]
extern crate criterion;
extern crate mandelzoom;
extern crate num;

use criterion::Criterion;
use num::Complex;

use mandelzoom::config::RenderConfig;
use mandelzoom::field::{escape_color, EscapeField};
use mandelzoom::noise::DitherTable;
use mandelzoom::render::render_frame;
use mandelzoom::sampling::sample_points;

fn bench_escape_color(c: &mut Criterion) {
    // A quick escape, the early-exit path, and an interior point
    // outside the cardioid/bulb tests that runs all 4096 iterations.
    c.bench_function("escape fast", |b| {
        b.iter(|| escape_color(Complex::new(3.0, 3.0)))
    });
    c.bench_function("escape early exit", |b| {
        b.iter(|| escape_color(Complex::new(-0.2, 0.3)))
    });
    c.bench_function("escape interior", |b| {
        b.iter(|| escape_color(Complex::new(-1.78, 0.0)))
    });
}

fn bench_dither_table(c: &mut Criterion) {
    c.bench_function("dither table 64", |b| b.iter(|| DitherTable::build(64)));
    c.bench_function("dither table 256", |b| b.iter(|| DitherTable::build(256)));
}

fn bench_frame(c: &mut Criterion) {
    let config = RenderConfig::new(32, 32, 360, 2, 32, Some(1)).unwrap();
    let field = EscapeField::new(&config);
    let samples = sample_points(config.num_samples);
    let noise = DitherTable::build(config.noise_size);
    let mut image = vec![0u8; config.buffer_len()];

    c.bench_function("frame 32x32x2", move |b| {
        b.iter(|| render_frame(0, &config, &field, &samples, &noise, &mut image))
    });
}

criterion_group!(benches, bench_escape_color, bench_dither_table, bench_frame);
criterion_main!(benches);
