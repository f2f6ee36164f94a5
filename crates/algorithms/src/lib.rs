//! # RGBZ Algorithms
//!
//! Conversion of color-coded maps into scalar surfaces.
//!
//! ## Modules
//!
//! - **ramp**: Color ramp definitions and RGB-to-value interpolation
//! - **equalization**: Inversion of per-channel histogram equalization
//! - **conversion**: Whole-raster RGB-to-Z pipeline

pub(crate) mod maybe_rayon;

pub mod conversion;
pub mod equalization;
pub mod ramp;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::conversion::{rgb_to_z, HistogramMethod, RgbToZ, RgbToZParams};
    pub use crate::equalization::{
        invert_channel, invert_value, ChannelHistogram, EqualizationInverter,
    };
    pub use crate::ramp::{parse_ramp, read_ramp, ColorBreakpoint, ColorRange, RampTable};
    pub use rgbz_core::prelude::*;
}
