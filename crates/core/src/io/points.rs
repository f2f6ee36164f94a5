//! Raster-to-point export
//!
//! Writes one `x,y,z` CSV record per valid cell, located at the cell center.

use crate::error::Result;
use crate::raster::{Raster, RasterElement};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the valid cells of a raster as an `x,y,z` CSV file.
///
/// Returns the number of points written. No-data cells are skipped.
pub fn write_points<T, P>(raster: &Raster<T>, path: P) -> Result<usize>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    let count = write_points_to(raster, &mut writer)?;
    writer.flush()?;
    Ok(count)
}

/// Write the valid cells of a raster as `x,y,z` CSV into any writer
pub fn write_points_to<T, W>(raster: &Raster<T>, mut writer: W) -> Result<usize>
where
    T: RasterElement,
    W: Write,
{
    writeln!(writer, "x,y,z")?;

    let mut count = 0;
    for ((row, col), &value) in raster.data().indexed_iter() {
        if raster.is_nodata(value) {
            continue;
        }
        let Some(z) = value.to_f64() else {
            continue;
        };
        let (x, y) = raster.pixel_to_geo(col, row);
        writeln!(writer, "{},{},{}", x, y, z)?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::GeoTransform;

    #[test]
    fn test_points_skip_nodata() {
        let mut raster = Raster::from_vec(vec![10.0, -9999.0, 30.0, 40.0], 2, 2).unwrap();
        raster.set_transform(GeoTransform::new(0.0, 20.0, 10.0, -10.0));
        raster.set_nodata(Some(-9999.0));

        let mut out = Vec::new();
        let count = write_points_to(&raster, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count, 3);
        assert_eq!(text, "x,y,z\n5,15,10\n5,5,30\n15,5,40\n");
    }

    #[test]
    fn test_points_file() {
        let raster = Raster::filled(3, 3, 1.0f64);
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let count = write_points(&raster, tmp.path()).unwrap();
        assert_eq!(count, 9);
        let text = std::fs::read_to_string(tmp.path()).unwrap();
        assert_eq!(text.lines().count(), 10);
    }
}
