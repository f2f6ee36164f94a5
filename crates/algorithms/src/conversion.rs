//! RGB composite to scalar surface
//!
//! Runs a full conversion over raster bands: optional equalization
//! inversion per channel, then a ramp lookup per pixel.

use crate::equalization::{invert_channel, DEFAULT_LEVELS};
use crate::maybe_rayon::*;
use crate::ramp::RampTable;
use ndarray::Array2;
use rgbz_core::raster::Raster;
use rgbz_core::{Algorithm, Error, Result};
use std::borrow::Cow;
use tracing::{debug, info};

/// Number of bands a color composite must provide
const RGB_BANDS: usize = 3;

/// How the source image's histogram was treated before distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramMethod {
    /// Colors are used as stored
    #[default]
    None,
    /// Each channel was histogram-equalized and is inverted first
    Equalized,
}

/// Parameters for RGB-to-Z conversion
#[derive(Debug, Clone)]
pub struct RgbToZParams {
    /// Output value for pixels no ramp range covers, or that are no-data in the input
    pub nodata: f64,
    /// Histogram treatment of the source image
    pub histogram: HistogramMethod,
    /// Intensity levels per channel, used by equalization inversion
    pub levels: usize,
}

impl Default for RgbToZParams {
    fn default() -> Self {
        Self {
            nodata: -9999.0,
            histogram: HistogramMethod::None,
            levels: DEFAULT_LEVELS,
        }
    }
}

/// RGB-to-Z algorithm
#[derive(Debug, Clone, Default)]
pub struct RgbToZ;

impl Algorithm for RgbToZ {
    type Input = (Vec<Raster<u8>>, RampTable);
    type Output = Raster<f64>;
    type Params = RgbToZParams;

    fn name(&self) -> &'static str {
        "RgbToZ"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (bands, ramp) = input;
        debug!("{}: {:?}", self.name(), params);
        rgb_to_z(&bands, &ramp, &params)
    }
}

/// Convert the first three bands of a composite into a scalar raster.
///
/// Bands after the third (e.g. alpha) are ignored. A pixel that is no-data
/// in any of the three bands, or that no ramp range contains, gets
/// `params.nodata`. The output keeps the red band's geotransform and CRS.
///
/// Fails with [`Error::BandCount`] for fewer than three bands,
/// [`Error::SizeMismatch`] when band shapes differ, and propagates the
/// first ramp evaluation error without producing partial output.
pub fn rgb_to_z(
    bands: &[Raster<u8>],
    ramp: &RampTable,
    params: &RgbToZParams,
) -> Result<Raster<f64>> {
    if bands.len() < RGB_BANDS {
        return Err(Error::BandCount {
            expected: RGB_BANDS,
            found: bands.len(),
        });
    }
    let (red, green, blue) = (&bands[0], &bands[1], &bands[2]);
    red.ensure_same_shape(green)?;
    red.ensure_same_shape(blue)?;

    let (rows, cols) = red.shape();
    info!(
        "Converting {} x {} composite through {} ramp ranges",
        cols,
        rows,
        ramp.len()
    );
    debug!("Processing rows on {} thread(s)", workers());

    let channels: [Cow<'_, Raster<u8>>; 3] = match params.histogram {
        HistogramMethod::None => [Cow::Borrowed(red), Cow::Borrowed(green), Cow::Borrowed(blue)],
        HistogramMethod::Equalized => {
            debug!("Inverting histogram equalization with {} levels", params.levels);
            [
                Cow::Owned(invert_channel(red, params.levels)?),
                Cow::Owned(invert_channel(green, params.levels)?),
                Cow::Owned(invert_channel(blue, params.levels)?),
            ]
        }
    };
    let [r_chan, g_chan, b_chan] = &channels;

    let row_values: Vec<Vec<f64>> = (0..rows)
        .into_par_iter()
        .map(|row| -> Result<Vec<f64>> {
            let mut row_data = vec![params.nodata; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                // Masking uses the stored values, before any inversion
                let stored = unsafe {
                    [
                        red.get_unchecked(row, col),
                        green.get_unchecked(row, col),
                        blue.get_unchecked(row, col),
                    ]
                };
                if red.is_nodata(stored[0]) || green.is_nodata(stored[1]) || blue.is_nodata(stored[2]) {
                    continue;
                }

                let rgb = unsafe {
                    [
                        r_chan.get_unchecked(row, col),
                        g_chan.get_unchecked(row, col),
                        b_chan.get_unchecked(row, col),
                    ]
                };
                if let Some(z) = ramp.lookup(rgb)? {
                    *out = z;
                }
            }
            Ok(row_data)
        })
        .collect::<Result<Vec<_>>>()?;

    let data: Vec<f64> = row_values.into_iter().flatten().collect();

    let mut output = red.with_same_meta::<f64>(rows, cols);
    output.set_nodata(Some(params.nodata));
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    let valid = output.statistics().valid_count;
    info!("{} of {} cells matched the ramp", valid, output.len());

    Ok(output)
}
