//! # RGBZ Core
//!
//! Core types, traits and I/O for the RGB-to-Z raster converter.
//!
//! This crate provides:
//! - `Raster<T>`: Generic raster grid type
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `CRS`: Coordinate Reference System tag carried through conversions
//! - `Algorithm`: parameterised operations over rasters
//! - I/O for multi-band GeoTIFF input, float GeoTIFF output and XYZ points

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::CRS;
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// A raster operation driven by a parameter struct.
///
/// Every implementation reports failures through the crate [`Error`], so
/// pipelines can chain operations with `?`.
pub trait Algorithm {
    type Input;
    type Output;
    /// Tuning knobs; `Default` gives the documented defaults
    type Params: Default;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output>;

    fn execute_default(&self, input: Self::Input) -> Result<Self::Output> {
        self.execute(input, Self::Params::default())
    }
}
