//! I/O operations for reading and writing geospatial data

mod native;
mod points;

pub use native::{
    read_geotiff, read_geotiff_bands, read_geotiff_bands_from_buffer, read_geotiff_from_buffer,
    write_geotiff, write_geotiff_to_buffer, GeoTiffOptions,
};
pub use points::{write_points, write_points_to};
