// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time field: the function the whole renderer exists to
//! sample.  Given a continuous frame time and a continuous pixel
//! position it produces a color, by mapping the pixel onto the
//! complex plane at that frame's zoom level and iterating the
//! Mandelbrot recurrence until the orbit escapes or gives up.
//!
//! Coloring is by binary decomposition: escaped points pick one of
//! two base colors by the parity of their iteration count, masked by
//! the sign of the imaginary part at escape.  Points that never
//! escape are black.  The result is the familiar two-tone banding
//! that stays readable at every zoom depth of the sequence.
//!
//! The math here is unconditional.  NaN or infinite inputs are not
//! sanitized; they propagate into the output like any other float.

use num::Complex;

use config::RenderConfig;

/// Iteration cap.  A point that survives this many iterations is
/// treated as a member of the set.
pub const MAX_ITERATIONS: usize = 4096;

/// Squared escape radius.  The orbit has escaped once its squared
/// magnitude reaches this value (radius 25).
pub const ESCAPE_RADIUS_SQ: f64 = 625.0;

/// Exponent of the zoom easing curve; more negative zooms deeper.
pub const ZOOM_EXPONENT: f64 = -12.0;

/// Real part of the point of interest the sequence zooms toward.
pub const CENTRE_RE: f64 = -0.761574;
/// Imaginary part of the point of interest.
pub const CENTRE_IM: f64 = -0.0847596;

/// The two base colors of the binary decomposition, already scaled
/// to [0, 1] channels.
const BANDS: [Rgba; 2] = [
    Rgba(
        160.0 / 256.0,
        100.0 / 256.0,
        200.0 / 256.0,
        1.0 / 256.0,
    ),
    Rgba(137.0 / 256.0, 25.0 / 256.0, 100.0 / 256.0, 0.0),
];

/// A linear RGBA color.  This is all that remains of the original
/// vector library: component-wise addition and multiplication, which
/// is exactly what sample accumulation and the contrast boost need.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rgba(pub f32, pub f32, pub f32, pub f32);

impl ::std::ops::Add for Rgba {
    type Output = Rgba;
    fn add(self, rhs: Rgba) -> Rgba {
        Rgba(
            self.0 + rhs.0,
            self.1 + rhs.1,
            self.2 + rhs.2,
            self.3 + rhs.3,
        )
    }
}

impl ::std::ops::AddAssign for Rgba {
    fn add_assign(&mut self, rhs: Rgba) {
        *self = *self + rhs;
    }
}

impl ::std::ops::Mul for Rgba {
    type Output = Rgba;
    fn mul(self, rhs: Rgba) -> Rgba {
        Rgba(
            self.0 * rhs.0,
            self.1 * rhs.1,
            self.2 * rhs.2,
            self.3 * rhs.3,
        )
    }
}

impl ::std::ops::Mul<f32> for Rgba {
    type Output = Rgba;
    fn mul(self, rhs: f32) -> Rgba {
        Rgba(self.0 * rhs, self.1 * rhs, self.2 * rhs, self.3 * rhs)
    }
}

/// Linear remap of `x` from the range [a, b] to the range [c, d].
fn linear_map(a: f64, b: f64, c: f64, d: f64, x: f64) -> f64 {
    (x - a) / (b - a) * (d - c) + c
}

/// True if `z0` lies in the main cardioid or the period-2 bulb.
/// Orbits started in either region are known never to escape, so the
/// iteration loop can be skipped for them outright.  This covers a
/// large share of the interior pixels at the shallow end of the zoom.
fn never_escapes(z0: Complex<f64>) -> bool {
    let re = z0.re - 0.25;
    let im_sq = z0.im * z0.im;
    let q = re * re + im_sq;
    if q * (q + re) <= 0.25 * im_sq {
        return true;
    }
    (z0.re + 1.0) * (z0.re + 1.0) + im_sq <= 0.0625
}

/// The color of a single point of the complex plane, independent of
/// any frame or pixel mapping.  Iterates z = z*z + z0 from z0 itself
/// and applies the binary decomposition banding to the result.
pub fn escape_color(z0: Complex<f64>) -> Rgba {
    if never_escapes(z0) {
        return Rgba::default();
    }

    let mut z = z0;
    let mut iteration = 0;
    while iteration < MAX_ITERATIONS && z.norm_sqr() < ESCAPE_RADIUS_SQ {
        z = z * z + z0;
        iteration += 1;
    }

    // Non-escaping points are black; so are escaped points whose
    // final imaginary part falls in the lower half-plane.
    if iteration == MAX_ITERATIONS || z.im <= 0.0 {
        return Rgba::default();
    }

    let base = BANDS[iteration % 2];
    base * base * 3.0
}

/// The escape-time field for one configured sequence: knows the
/// frame count and resolution, and maps continuous frame/pixel
/// coordinates through the zoom onto the complex plane.
#[derive(Copy, Clone, Debug)]
pub struct EscapeField {
    num_frames: f64,
    xres: f64,
    yres: f64,
}

impl EscapeField {
    /// Builds the field for a configuration.
    pub fn new(config: &RenderConfig) -> EscapeField {
        EscapeField {
            num_frames: config.num_frames as f64,
            xres: config.xres as f64,
            yres: config.yres as f64,
        }
    }

    /// The half-extent of the complex-plane window at a frame time.
    /// The time is eased with a raised cosine so the zoom starts and
    /// ends at rest, and the eased value drives an exponential, so
    /// the apparent zoom speed is constant in the middle of the run.
    pub fn zoom_scale(&self, frame_time: f64) -> f64 {
        let time = linear_map(0.0, self.num_frames, 0.0, 2.0 * ::std::f64::consts::PI, frame_time);
        let eased = (::std::f64::consts::PI - time).cos() * 0.5 + 0.5;
        (eased * ZOOM_EXPONENT).exp()
    }

    /// Evaluates the field at a continuous frame time and continuous
    /// pixel position.  The x axis maps left-to-right onto
    /// [-scale, scale]; the y axis is inverted, so image-space down
    /// is complex-plane down, matching the original footage.
    pub fn evaluate(&self, frame_time: f64, x: f64, y: f64) -> Rgba {
        let scale = self.zoom_scale(frame_time);
        let z0 = Complex::new(
            linear_map(0.0, self.xres, -scale, scale, x) + CENTRE_RE,
            linear_map(0.0, self.yres, scale, -scale, y) + CENTRE_IM,
        );
        escape_color(z0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO: Rgba = Rgba(0.0, 0.0, 0.0, 0.0);

    #[test]
    fn origin_is_inside_the_cardioid() {
        assert_eq!(escape_color(Complex::new(0.0, 0.0)), ZERO);
    }

    #[test]
    fn bulb_centre_is_black() {
        assert_eq!(escape_color(Complex::new(-1.0, 0.0)), ZERO);
    }

    #[test]
    fn early_exit_matches_the_iteration() {
        // Points the closed-form tests accept must also survive the
        // full iteration; spot-check a few interior coordinates.
        for &(re, im) in &[(0.1, 0.1), (-0.2, 0.3), (-1.05, 0.02), (0.25, 0.0)] {
            let z0 = Complex::new(re, im);
            if !never_escapes(z0) {
                continue;
            }
            let mut z = z0;
            let mut iteration = 0;
            while iteration < MAX_ITERATIONS && z.norm_sqr() < ESCAPE_RADIUS_SQ {
                z = z * z + z0;
                iteration += 1;
            }
            assert_eq!(iteration, MAX_ITERATIONS, "({}, {}) escaped", re, im);
        }
    }

    #[test]
    fn guaranteed_escape_yields_a_band_color() {
        // |z0| > 2 escapes within a couple of iterations.  This one
        // leaves with a positive imaginary part after two, so it gets
        // the even band, squared and boosted.
        let color = escape_color(Complex::new(3.0, 3.0));
        let base = BANDS[0];
        assert_eq!(color, base * base * 3.0);
        assert!(color.0 > 0.0 && color.1 > 0.0 && color.2 > 0.0);
    }

    #[test]
    fn lower_half_plane_escapes_are_masked() {
        // The conjugate orbit escapes with the opposite sign, so its
        // binary decomposition bit is zero.
        assert_eq!(escape_color(Complex::new(3.0, -3.0)), ZERO);
    }

    #[test]
    fn zoom_starts_at_unit_scale() {
        let config = RenderConfig::new(16, 16, 360, 1, 16, None).unwrap();
        let field = EscapeField::new(&config);
        assert!((field.zoom_scale(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zoom_bottoms_out_mid_sequence() {
        let config = RenderConfig::new(16, 16, 360, 1, 16, None).unwrap();
        let field = EscapeField::new(&config);
        let deepest = field.zoom_scale(180.0);
        assert!((deepest - ZOOM_EXPONENT.exp()).abs() < 1e-12);
        assert!(deepest < field.zoom_scale(90.0));
        assert!(deepest < field.zoom_scale(270.0));
    }

    #[test]
    fn y_axis_is_inverted() {
        let config = RenderConfig::new(16, 16, 360, 1, 16, None).unwrap();
        let field = EscapeField::new(&config);
        // Top edge of frame 0 sits near im = scale + centre, which is
        // the upper half of the window; the bottom edge mirrors it.
        let scale = field.zoom_scale(0.0);
        let top = linear_map(0.0, 16.0, scale, -scale, 0.0);
        let bottom = linear_map(0.0, 16.0, scale, -scale, 16.0);
        assert!(top > 0.0 && bottom < 0.0);
    }
}
