//! Breakpoints and the ranges built between them

use rgbz_core::{Error, Result};

/// Channel names, in R, G, B order
const CHANNELS: [&str; 3] = ["red", "green", "blue"];

/// Highest value of an 8-bit channel
const CHANNEL_MAX: f64 = 255.0;

/// A control point mapping an RGB color to a scalar value.
///
/// Channels are kept as `f64` so ramp files may use fractional colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBreakpoint {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub z: f64,
}

impl ColorBreakpoint {
    pub const fn new(r: f64, g: f64, b: f64, z: f64) -> Self {
        Self { r, g, b, z }
    }

    /// Color as `[r, g, b]`
    pub fn rgb(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in CHANNELS.iter().zip(self.rgb()) {
            if !value.is_finite() || !(0.0..=CHANNEL_MAX).contains(&value) {
                return Err(Error::Range(format!(
                    "{} channel value {} is outside [0, 255]",
                    name, value
                )));
            }
        }
        if !self.z.is_finite() {
            return Err(Error::Range(format!("z value {} is not finite", self.z)));
        }
        Ok(())
    }
}

/// The interpolation segment between two consecutive breakpoints.
///
/// The lower breakpoint (the first of the pair in ramp order) is the base
/// color: distances used for interpolation are measured from it, and a
/// pixel equal to it maps exactly to `z_base`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRange {
    rgb_low: [f64; 3],
    rgb_high: [f64; 3],
    rgb_base: [f64; 3],
    channel_span: [f64; 3],
    z_base: f64,
    z_top: f64,
    z_span: f64,
}

impl ColorRange {
    /// Build the range between `lower` and `upper`.
    ///
    /// Fails with [`Error::Range`] if a channel lies outside [0, 255], a z
    /// value is not finite, or `lower.z > upper.z`.
    pub fn new(lower: &ColorBreakpoint, upper: &ColorBreakpoint) -> Result<Self> {
        lower.validate()?;
        upper.validate()?;
        if lower.z > upper.z {
            return Err(Error::Range(format!(
                "z values must not decrease along the ramp ({} is followed by {})",
                lower.z, upper.z
            )));
        }

        let lo = lower.rgb();
        let hi = upper.rgb();
        Ok(Self {
            rgb_low: std::array::from_fn(|c| lo[c].min(hi[c])),
            rgb_high: std::array::from_fn(|c| lo[c].max(hi[c])),
            rgb_base: lo,
            channel_span: std::array::from_fn(|c| (hi[c] - lo[c]).abs()),
            z_base: lower.z,
            z_top: upper.z,
            z_span: (upper.z - lower.z).abs(),
        })
    }

    /// Per-channel minimum of the two breakpoints
    pub fn rgb_low(&self) -> [f64; 3] {
        self.rgb_low
    }

    /// Per-channel maximum of the two breakpoints
    pub fn rgb_high(&self) -> [f64; 3] {
        self.rgb_high
    }

    /// Reference color for interpolation (the lower breakpoint)
    pub fn rgb_base(&self) -> [f64; 3] {
        self.rgb_base
    }

    /// Absolute per-channel difference between the breakpoints
    pub fn channel_span(&self) -> [f64; 3] {
        self.channel_span
    }

    /// Value at the lower breakpoint
    pub fn z_base(&self) -> f64 {
        self.z_base
    }

    /// Value at the upper breakpoint
    pub fn z_top(&self) -> f64 {
        self.z_top
    }

    /// `z_top - z_base`
    pub fn z_span(&self) -> f64 {
        self.z_span
    }

    /// Whether all three channels fall inside the range's box (bounds inclusive)
    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        (0..3).all(|c| {
            let v = f64::from(rgb[c]);
            self.rgb_low[c] <= v && v <= self.rgb_high[c]
        })
    }

    /// Scalar value for a pixel inside this range.
    ///
    /// The channel with the largest distance from the base color drives the
    /// interpolation; ties go to the earliest channel in R, G, B order. The
    /// result is rounded half away from zero, except that a pixel sitting on
    /// the base color returns `z_base` unchanged.
    pub fn interpolate(&self, rgb: [u8; 3]) -> Result<f64> {
        let position: [f64; 3] =
            std::array::from_fn(|c| (f64::from(rgb[c]) - self.rgb_base[c]).abs());
        let band = dominant_band(&position);
        let offset = position[band];

        if offset == 0.0 {
            return Ok(self.z_base);
        }

        let span = self.channel_span[band];
        if span == 0.0 {
            return Err(Error::Range(format!(
                "{} channel has no extent in range {:?}..{:?} but pixel {:?} is {} away from its base",
                CHANNELS[band], self.rgb_low, self.rgb_high, rgb, offset
            )));
        }

        Ok((offset * (self.z_span / span) + self.z_base).round())
    }
}

/// Index of the largest component, first one wins on ties
fn dominant_band(position: &[f64; 3]) -> usize {
    let mut band = 0;
    for c in 1..3 {
        if position[c] > position[band] {
            band = c;
        }
    }
    band
}
