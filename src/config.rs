//! Contains the RenderConfig struct, the immutable description of one
//! render run.  The production sequence is a fixed piece of work, so
//! its parameters live here as constants rather than as command-line
//! flags; tests build their own tiny configurations through the same
//! constructor.

use failure::Fail;
use num_cpus;

/// Horizontal resolution of the production sequence, in pixels.
pub const SEQUENCE_XRES: usize = 720;
/// Vertical resolution of the production sequence, in pixels.
pub const SEQUENCE_YRES: usize = 720;
/// Number of frames in the production sequence: twelve seconds at
/// thirty frames per second.
pub const SEQUENCE_FRAMES: usize = 30 * 12;
/// Samples taken per pixel in the production sequence.
pub const SEQUENCE_SAMPLES: usize = 6;
/// Edge length of the production dither table.
pub const SEQUENCE_NOISE_SIZE: usize = 1 << 8;

/// The ways a configuration can be unusable.  All of these are caught
/// before any buffer is allocated or any thread is spawned.
#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    /// One or both image dimensions are zero.
    #[fail(display = "image resolution must be nonzero in both dimensions")]
    EmptyResolution,
    /// The run would render no frames, or pixels with no samples.
    #[fail(display = "at least one frame and one sample per pixel are required")]
    EmptySequence,
    /// The dither table cannot be built at this size.  The Hilbert
    /// traversal that orders the table only tiles power-of-two grids.
    #[fail(display = "noise table size must be a power of two, got {}", _0)]
    NoiseSizeNotPowerOfTwo(usize),
}

/// Everything a render run needs to know, fixed before it starts.
/// Once constructed, a RenderConfig should never be mutated.
#[derive(Copy, Clone, Debug)]
pub struct RenderConfig {
    /// Output image width in pixels.
    pub xres: usize,
    /// Output image height in pixels.
    pub yres: usize,
    /// Number of frames in the sequence.  Also the denominator of the
    /// zoom easing curve, so it shapes the animation as well as
    /// bounding it.
    pub num_frames: usize,
    /// Samples taken per pixel.
    pub num_samples: usize,
    /// Edge length of the square dither table.  Must be a power of
    /// two.
    pub noise_size: usize,
    /// Worker thread override.  `None` sizes the pool to the machine.
    pub threads: Option<usize>,
}

impl RenderConfig {
    /// Constructor.  Validates the parameters and refuses to build a
    /// configuration the renderer could not execute.
    pub fn new(
        xres: usize,
        yres: usize,
        num_frames: usize,
        num_samples: usize,
        noise_size: usize,
        threads: Option<usize>,
    ) -> Result<RenderConfig, ConfigError> {
        let config = RenderConfig {
            xres,
            yres,
            num_frames,
            num_samples,
            noise_size,
            threads,
        };
        config.validate()?;
        Ok(config)
    }

    /// The production sequence: twelve seconds of zoom at 720x720,
    /// six samples per pixel, a 256x256 dither table, and as many
    /// worker threads as the machine offers.
    pub fn sequence() -> RenderConfig {
        RenderConfig {
            xres: SEQUENCE_XRES,
            yres: SEQUENCE_YRES,
            num_frames: SEQUENCE_FRAMES,
            num_samples: SEQUENCE_SAMPLES,
            noise_size: SEQUENCE_NOISE_SIZE,
            threads: None,
        }
    }

    /// Checks the invariants the renderer relies on.  Since the
    /// fields are public, callers that build the struct by hand get
    /// the same checks when the config reaches the frame driver.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.xres == 0 || self.yres == 0 {
            return Err(ConfigError::EmptyResolution);
        }
        if self.num_frames == 0 || self.num_samples == 0 {
            return Err(ConfigError::EmptySequence);
        }
        if !self.noise_size.is_power_of_two() {
            return Err(ConfigError::NoiseSizeNotPowerOfTwo(self.noise_size));
        }
        Ok(())
    }

    /// The number of worker threads a frame pass will spawn: the
    /// override if one was given, otherwise the hardware concurrency,
    /// and never less than one.
    pub fn thread_count(&self) -> usize {
        let count = match self.threads {
            Some(threads) => threads,
            None => num_cpus::get(),
        };
        if count == 0 {
            1
        } else {
            count
        }
    }

    /// The number of bytes in one frame's RGBA output buffer.
    pub fn buffer_len(&self) -> usize {
        self.xres * self.yres * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_resolution() {
        assert_eq!(
            RenderConfig::new(0, 16, 1, 1, 16, None).unwrap_err(),
            ConfigError::EmptyResolution
        );
        assert_eq!(
            RenderConfig::new(16, 0, 1, 1, 16, None).unwrap_err(),
            ConfigError::EmptyResolution
        );
    }

    #[test]
    fn rejects_empty_sequence() {
        assert_eq!(
            RenderConfig::new(16, 16, 0, 1, 16, None).unwrap_err(),
            ConfigError::EmptySequence
        );
        assert_eq!(
            RenderConfig::new(16, 16, 1, 0, 16, None).unwrap_err(),
            ConfigError::EmptySequence
        );
    }

    #[test]
    fn rejects_bad_noise_size() {
        assert_eq!(
            RenderConfig::new(16, 16, 1, 1, 100, None).unwrap_err(),
            ConfigError::NoiseSizeNotPowerOfTwo(100)
        );
        assert_eq!(
            RenderConfig::new(16, 16, 1, 1, 0, None).unwrap_err(),
            ConfigError::NoiseSizeNotPowerOfTwo(0)
        );
    }

    #[test]
    fn sequence_config_is_valid() {
        assert!(RenderConfig::sequence().validate().is_ok());
    }

    #[test]
    fn zero_thread_override_falls_back_to_one() {
        let config = RenderConfig::new(16, 16, 1, 1, 16, Some(0)).unwrap();
        assert_eq!(config.thread_count(), 1);
    }

    #[test]
    fn explicit_thread_override_is_honored() {
        let config = RenderConfig::new(16, 16, 1, 1, 16, Some(3)).unwrap();
        assert_eq!(config.thread_count(), 3);
    }
}
