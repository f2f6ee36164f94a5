//! Whole-channel inversion

use super::histogram::ChannelHistogram;
use crate::maybe_rayon::*;
use ndarray::{Array2, ArrayView2};
use rgbz_core::raster::Raster;
use rgbz_core::{Error, Result};
use tracing::debug;

/// Inverts histogram equalization for one channel.
///
/// The inverse only depends on the equalized value, so it is evaluated once
/// per possible 8-bit value and stored in a table shared by all pixels.
#[derive(Debug, Clone)]
pub struct EqualizationInverter {
    histogram: ChannelHistogram,
    table: [u8; 256],
}

impl EqualizationInverter {
    pub fn new(histogram: ChannelHistogram) -> Result<Self> {
        let mut table = [0u8; 256];
        for (value, slot) in table.iter_mut().enumerate() {
            let original = histogram.invert(value as f64)?;
            // Bins never exceed 256 levels
            *slot = u8::try_from(original).map_err(|_| Error::Other(format!(
                "inverted bin {} does not fit an 8-bit channel",
                original
            )))?;
        }

        debug!(
            "Equalization inverse: levels={}, cdf_min={}, table[0]={}, table[{}]={}",
            histogram.levels(),
            histogram.cdf_min(),
            table[0],
            histogram.levels() - 1,
            table[histogram.levels() - 1]
        );

        Ok(Self { histogram, table })
    }

    /// Build the histogram of `channel` and its inverse
    pub fn from_channel(channel: ArrayView2<'_, u8>, levels: usize) -> Result<Self> {
        Self::new(ChannelHistogram::build(channel, levels)?)
    }

    /// Estimated original value of an equalized one
    pub fn invert(&self, value: u8) -> u8 {
        self.table[value as usize]
    }

    /// Precomputed inverse for every 8-bit value
    pub fn table(&self) -> &[u8; 256] {
        &self.table
    }

    pub fn histogram(&self) -> &ChannelHistogram {
        &self.histogram
    }
}

/// Undo histogram equalization on a whole channel.
///
/// The histogram is taken over every cell, as the equalization was. Cells
/// equal to the channel's no-data value are passed through unchanged.
pub fn invert_channel(channel: &Raster<u8>, levels: usize) -> Result<Raster<u8>> {
    let inverter = EqualizationInverter::from_channel(channel.view(), levels)?;
    let (rows, cols) = channel.shape();

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0u8; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let val = unsafe { channel.get_unchecked(row, col) };
                *out = if channel.is_nodata(val) {
                    val
                } else {
                    inverter.invert(val)
                };
            }
            row_data
        })
        .collect();

    let mut output = channel.with_same_meta::<u8>(rows, cols);
    output.set_nodata(channel.nodata());
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgbz_core::{GeoTransform, CRS};

    /// Equalize a channel the standard way, to have something to invert
    fn equalize(values: &[u8]) -> Vec<u8> {
        let mut counts = [0u64; 256];
        for &v in values {
            counts[v as usize] += 1;
        }
        let mut cdf = [0u64; 256];
        let mut acc = 0;
        for (i, c) in counts.iter().enumerate() {
            acc += c;
            cdf[i] = acc;
        }
        let cdf_min = *cdf.iter().find(|&&c| c > 0).unwrap() as f64;
        let n = values.len() as f64;
        values
            .iter()
            .map(|&v| ((cdf[v as usize] as f64 - cdf_min) / (n - 1.0) * 254.0).round() as u8)
            .collect()
    }

    #[test]
    fn test_table_matches_scalar_inverse() {
        let channel = ndarray::array![[0u8, 0], [255, 255]];
        let inverter = EqualizationInverter::from_channel(channel.view(), 256).unwrap();
        for v in 0..=255u8 {
            assert_eq!(
                inverter.invert(v) as usize,
                inverter.histogram().invert(v as f64).unwrap()
            );
        }
        assert_eq!(inverter.invert(0), 0);
        assert_eq!(inverter.invert(254), 255);
        assert_eq!(inverter.table().len(), 256);
    }

    #[test]
    fn test_freshly_equalized_channel_is_fixed_point() {
        // Low-contrast channel clustered in 100..=115, 16 pixels per value.
        // Its equalized histogram already satisfies the equalization formula,
        // so every value maps back onto itself.
        let original: Vec<u8> = (0..256u32).map(|i| 100 + (i % 16) as u8).collect();
        let equalized = equalize(&original);

        let mut raster = Raster::from_vec(equalized.clone(), 16, 16).unwrap();
        raster.set_transform(GeoTransform::new(0.0, 16.0, 1.0, -1.0));
        raster.set_crs(Some(CRS::from_epsg(32633)));

        let restored = invert_channel(&raster, 256).unwrap();

        assert_eq!(restored.data().iter().copied().collect::<Vec<_>>(), equalized);
        assert_eq!(restored.transform(), raster.transform());
        assert_eq!(restored.crs(), raster.crs());
    }

    #[test]
    fn test_nodata_cells_pass_through() {
        let mut raster = Raster::from_vec(vec![0u8, 10, 200, 255], 2, 2).unwrap();
        raster.set_nodata(Some(0));
        let restored = invert_channel(&raster, 256).unwrap();
        assert_eq!(restored.get(0, 0).unwrap(), 0);
        assert_eq!(restored.nodata(), Some(0));
    }

    #[test]
    fn test_constant_channel_inverts_without_error() {
        let raster = Raster::filled(3, 3, 77u8);
        let restored = invert_channel(&raster, 256).unwrap();
        assert!(restored.data().iter().all(|&v| v == 77));
    }
}
