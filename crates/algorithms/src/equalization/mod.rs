//! Histogram-equalization inversion
//!
//! Color-coded maps are often contrast-enhanced with histogram equalization
//! before distribution, which moves every channel value away from the color
//! the ramp was defined with. Equalization maps a value `v` to roughly
//! `(L - 2) * (cdf(v) - cdf_min) / (M * N - 1)`; inverting it means solving
//! for `cdf(v)` and picking the bin whose cumulative count is nearest.
//!
//! The forward transform merges values, so the inversion is approximate:
//! it recovers a representative original value, not the exact one.

mod histogram;
mod inverter;

pub use histogram::{invert_value, ChannelHistogram, DEFAULT_LEVELS};
pub use inverter::{invert_channel, EqualizationInverter};
