//! The anti-aliasing sample set and the jitter shaping that feeds it
//! into the escape-time field.  Everything in this module is a pure
//! function of its arguments: the sample set is the same on every
//! machine, every run, which is what keeps the rendered sequence
//! reproducible.

/// A 2D sample offset in the unit square, used to jitter the x and y
/// position of one anti-aliasing sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SamplePoint(pub f64, pub f64);

/// The radical inverse of `i` in the given base: reverse the base-b
/// digits of `i` around the radix point and read the result as a
/// fraction in [0, 1).  Successive indices land maximally far from
/// each other, which is what makes the sequence useful for sampling.
pub fn radical_inverse(base: usize, i: usize) -> f64 {
    let inv_base = 1.0 / (base as f64);
    let mut i = i;
    let mut f = 1.0;
    let mut r = 0.0;
    while i > 0 {
        f *= inv_base;
        r += (i % base) as f64 * f;
        i /= base;
    }
    r
}

/// Builds the shared sample set: `count` points pairing the base-2
/// and base-3 radical inverses of the sample index.  The two bases
/// are coprime, so the pairs cover the unit square with low
/// discrepancy instead of clumping the way independent draws would.
pub fn sample_points(count: usize) -> Vec<SamplePoint> {
    (0..count)
        .map(|s| SamplePoint(radical_inverse(2, s), radical_inverse(3, s)))
        .collect()
}

/// Sign with a genuine zero case.  `f64::signum` maps 0.0 to 1.0,
/// which would shift the jitter distribution off-centre.
fn sign(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Warps a uniform value in [0, 1) into a triangle distribution on
/// (-1, 1), from <https://www.shadertoy.com/view/4t2SDh>.  The
/// `max(-1)` nerfs the NaN that 0/sqrt(0) generates at v = 0.5.
pub fn tri_dist(v: f64) -> f64 {
    let orig = v * 2.0 - 1.0;
    let warped = orig / orig.abs().sqrt();
    warped.max(-1.0) - sign(orig)
}

/// Combines one axis of a sample's uniform offset with the pixel's
/// dither value and shapes the result: wraparound addition keeps the
/// sum in [0, 1), and the triangle warp turns it into a tent-shaped
/// jitter centred on zero.
pub fn shaped_jitter(uniform: f64, noise: f64) -> f64 {
    let v = uniform + noise;
    tri_dist(if v < 1.0 { v } else { v - 1.0 })
}
