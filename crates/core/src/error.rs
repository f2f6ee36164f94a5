//! Error types for RGBZ

use thiserror::Error;

/// Main error type for RGBZ operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Malformed color ramp, or a ramp that cannot be evaluated
    #[error("Color ramp error: {0}")]
    Range(String),

    /// Malformed ramp definition text
    #[error("Ramp file format error at line {line}: {reason}")]
    FileFormat { line: usize, reason: String },

    /// A channel histogram with no non-zero cumulative bin
    #[error("Degenerate histogram: {0}")]
    DegenerateHistogram(String),

    #[error("A composite image with at least {expected} bands is required, found {found}")]
    BandCount { expected: usize, found: usize },

    #[error("Raster is not georeferenced (no coordinate reference system)")]
    NotGeoreferenced,

    #[error("{0}")]
    Other(String),
}

/// Result type alias for RGBZ operations
pub type Result<T> = std::result::Result<T, Error>;
