// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The bucketed parallel scheduler.  A frame's pixel grid is split
//! into 8x8 buckets, enumerated row-major; a pool of worker threads
//! claims bucket indices off a shared atomic counter until the
//! indices run out.  Fetch-and-add hands every bucket to exactly one
//! worker, and the buckets partition the image, so no pixel is ever
//! produced twice.
//!
//! A worker renders its bucket into a private buffer and sends it
//! back over a channel; the thread that called `render_frame` blits
//! finished buckets into the output image as they arrive.  The bucket
//! pixels are moved, never shared, so the ownership story stays
//! simple and lock-free on the hot path: the only contended word in
//! a frame pass is the counter itself.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam;
use crossbeam::channel::{self, Sender};
use itertools::iproduct;
use num::clamp;

use config::RenderConfig;
use field::{EscapeField, Rgba};
use noise::DitherTable;
use sampling::{shaped_jitter, SamplePoint};

/// Edge length of a render bucket, in pixels.
pub const BUCKET_SIZE: usize = 8;

/// One rectangular unit of render work: the half-open pixel ranges
/// [x0, x1) x [y0, y1).  Interior buckets are 8x8; buckets on the
/// right and bottom edges are clipped to the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bucket {
    /// Leftmost pixel column, inclusive.
    pub x0: usize,
    /// Topmost pixel row, inclusive.
    pub y0: usize,
    /// Rightmost pixel column, exclusive.
    pub x1: usize,
    /// Bottommost pixel row, exclusive.
    pub y1: usize,
}

impl Bucket {
    /// Width of the bucket in pixels.
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    /// Number of pixels in the bucket.
    pub fn area(&self) -> usize {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// The bucket decomposition of one image: a rounded-up grid of
/// bucket indices, each decodable to its pixel rectangle.
#[derive(Copy, Clone, Debug)]
pub struct BucketGrid {
    xres: usize,
    yres: usize,
    x_buckets: usize,
    y_buckets: usize,
}

impl BucketGrid {
    /// Builds the grid for an image, rounding the bucket counts up so
    /// partial buckets along the edges are included.
    pub fn new(xres: usize, yres: usize) -> BucketGrid {
        BucketGrid {
            xres,
            yres,
            x_buckets: (xres + BUCKET_SIZE - 1) / BUCKET_SIZE,
            y_buckets: (yres + BUCKET_SIZE - 1) / BUCKET_SIZE,
        }
    }

    /// Total number of buckets.  Counter values at or past this mark
    /// mean there is no more work in the pass.
    pub fn len(&self) -> usize {
        self.x_buckets * self.y_buckets
    }

    /// True if the image has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes a row-major bucket index to its pixel rectangle,
    /// clipped at the image edges.
    pub fn bucket(&self, index: usize) -> Bucket {
        let bucket_y = index / self.x_buckets;
        let bucket_x = index - self.x_buckets * bucket_y;
        let x0 = bucket_x * BUCKET_SIZE;
        let y0 = bucket_y * BUCKET_SIZE;
        Bucket {
            x0,
            y0,
            x1: (x0 + BUCKET_SIZE).min(self.xres),
            y1: (y0 + BUCKET_SIZE).min(self.yres),
        }
    }
}

/// A finished bucket on its way back to the writer.
struct BucketOutput {
    bucket: Bucket,
    pixels: Vec<u8>,
}

/// Maps one averaged channel to its output byte.
fn tone_map_channel(v: f32) -> u8 {
    clamp((v.sqrt() * 256.0).round() as i32, 0, 255) as u8
}

/// Gamma-ish tone map: square root, scale to byte range, clamp.
/// Alpha is not carried through; every output pixel is opaque.
fn tone_map(color: Rgba) -> [u8; 4] {
    [
        tone_map_channel(color.0),
        tone_map_channel(color.1),
        tone_map_channel(color.2),
        255,
    ]
}

/// The worker loop: claim a bucket index, render it, send it back,
/// repeat until the counter runs off the end of the grid.
fn render_worker(
    frame: usize,
    field: &EscapeField,
    samples: &[SamplePoint],
    noise: &DitherTable,
    grid: &BucketGrid,
    counter: &AtomicUsize,
    done: Sender<BucketOutput>,
) {
    let inv_samples = 1.0 / (samples.len() as f64);

    loop {
        let index = counter.fetch_add(1, Ordering::SeqCst);
        if index >= grid.len() {
            break;
        }
        let bucket = grid.bucket(index);

        let mut pixels = Vec::with_capacity(bucket.area() * 4);
        for (y, x) in iproduct!(bucket.y0..bucket.y1, bucket.x0..bucket.x1) {
            let dither = noise.value_at(x, y);

            let mut sum = Rgba::default();
            for (s, sample) in samples.iter().enumerate() {
                let dt = shaped_jitter(s as f64 * inv_samples, dither);
                let dx = shaped_jitter(sample.0, dither);
                let dy = shaped_jitter(sample.1, dither);
                sum += field.evaluate(
                    frame as f64 + 0.5 + dt,
                    x as f64 + 0.5 + dx,
                    y as f64 + 0.5 + dy,
                );
            }

            pixels.extend_from_slice(&tone_map(sum * (inv_samples as f32)));
        }

        if done.send(BucketOutput { bucket, pixels }).is_err() {
            break;
        }
    }
}

/// Renders one frame into `image`, which must be an xres * yres RGBA
/// buffer.  Spawns the configured number of workers, lets them drain
/// the bucket grid, and blits finished buckets into place as they
/// come back.  Returns once every bucket has been rendered and
/// written; the scope join is the frame barrier.
pub fn render_frame(
    frame: usize,
    config: &RenderConfig,
    field: &EscapeField,
    samples: &[SamplePoint],
    noise: &DitherTable,
    image: &mut [u8],
) {
    assert!(image.len() == config.buffer_len());

    let grid = BucketGrid::new(config.xres, config.yres);
    let counter = AtomicUsize::new(0);
    let threads = config.thread_count();
    let (done, finished) = channel::unbounded();

    let grid = &grid;
    let counter = &counter;
    crossbeam::scope(|spawner| {
        for _ in 0..threads {
            let done = done.clone();
            spawner.spawn(move |_| {
                render_worker(frame, field, samples, noise, grid, counter, done);
            });
        }
        drop(done);

        for output in finished.iter() {
            let bucket = output.bucket;
            let row_bytes = bucket.width() * 4;
            for y in bucket.y0..bucket.y1 {
                // The one place pixel coordinates become buffer
                // offsets: row-major, y * xres + x, four bytes each.
                let src = (y - bucket.y0) * row_bytes;
                let dst = (y * config.xres + bucket.x0) * 4;
                image[dst..dst + row_bytes].copy_from_slice(&output.pixels[src..src + row_bytes]);
            }
        }
    })
    .unwrap();
}
