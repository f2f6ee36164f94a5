//! Per-channel histogram and CDF bookkeeping

use ndarray::ArrayView2;
use rgbz_core::{Error, Result};

/// Number of intensity levels of an 8-bit channel
pub const DEFAULT_LEVELS: usize = 256;

/// Histogram of one channel with its cumulative distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelHistogram {
    counts: Vec<u64>,
    cumulative: Vec<u64>,
    cdf_min: u64,
    levels: usize,
    width: usize,
    height: usize,
}

impl ChannelHistogram {
    /// Count every value of `channel` into `levels` bins.
    ///
    /// `levels` must be in `3..=256`. Fails with
    /// [`Error::InvalidParameter`] for a value outside `[0, levels - 1]` and
    /// with [`Error::DegenerateHistogram`] when the channel has no pixels.
    pub fn build(channel: ArrayView2<'_, u8>, levels: usize) -> Result<Self> {
        check_levels(levels)?;
        let (height, width) = channel.dim();

        let mut counts = vec![0u64; levels];
        for &value in channel.iter() {
            let bin = counts.get_mut(value as usize).ok_or_else(|| Error::InvalidParameter {
                name: "channel value",
                value: value.to_string(),
                reason: format!("exceeds the {} configured levels", levels),
            })?;
            *bin += 1;
        }

        let cumulative: Vec<u64> = counts
            .iter()
            .scan(0u64, |acc, &count| {
                *acc += count;
                Some(*acc)
            })
            .collect();

        // Cumulative counts never decrease, so the first positive one is the smallest
        let cdf_min = cumulative
            .iter()
            .copied()
            .find(|&c| c > 0)
            .ok_or_else(|| {
                Error::DegenerateHistogram(format!(
                    "{}x{} channel has no counted pixels",
                    width, height
                ))
            })?;

        Ok(Self {
            counts,
            cumulative,
            cdf_min,
            levels,
            width,
            height,
        })
    }

    /// Pixel count per intensity
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Running sum of `counts`, inclusive
    pub fn cumulative(&self) -> &[u64] {
        &self.cumulative
    }

    /// Smallest non-zero cumulative count
    pub fn cdf_min(&self) -> u64 {
        self.cdf_min
    }

    /// Number of intensity bins
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Channel dimensions as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Original value estimated for an equalized one, see [`invert_value`]
    pub fn invert(&self, equalized: f64) -> Result<usize> {
        invert_value(
            equalized,
            &self.cumulative,
            self.cdf_min,
            self.width,
            self.height,
            self.levels,
        )
    }
}

fn check_levels(levels: usize) -> Result<()> {
    if !(3..=DEFAULT_LEVELS).contains(&levels) {
        return Err(Error::InvalidParameter {
            name: "levels",
            value: levels.to_string(),
            reason: "must be between 3 and 256".into(),
        });
    }
    Ok(())
}

/// Recover the original bin of an equalized value.
///
/// Solves the equalization formula for the cumulative count,
/// `cdf = equalized / (levels - 2) * (width * height - 1) + cdf_min`, and
/// returns the bin whose cumulative count is closest to it. Ties go to the
/// lowest bin.
pub fn invert_value(
    equalized: f64,
    cumulative: &[u64],
    cdf_min: u64,
    width: usize,
    height: usize,
    levels: usize,
) -> Result<usize> {
    if levels <= 2 {
        return Err(Error::InvalidParameter {
            name: "levels",
            value: levels.to_string(),
            reason: "must be greater than 2".into(),
        });
    }
    if cumulative.is_empty() {
        return Err(Error::InvalidParameter {
            name: "cumulative",
            value: "[]".into(),
            reason: "cumulative histogram is empty".into(),
        });
    }

    let numerator = equalized / (levels - 2) as f64;
    let pixel_count = width as f64 * height as f64 - 1.0;
    let target = numerator * pixel_count + cdf_min as f64;

    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (bin, &count) in cumulative.iter().enumerate() {
        let distance = (count as f64 - target).abs();
        if distance < best_distance {
            best = bin;
            best_distance = distance;
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_two_by_two_example() {
        let channel = array![[0u8, 0], [255, 255]];
        let hist = ChannelHistogram::build(channel.view(), 256).unwrap();

        assert_eq!(hist.counts()[0], 2);
        assert_eq!(hist.counts()[255], 2);
        assert_eq!(hist.counts().iter().sum::<u64>(), 4);
        assert_eq!(hist.cumulative()[0], 2);
        assert_eq!(hist.cumulative()[254], 2);
        assert_eq!(hist.cumulative()[255], 4);
        assert_eq!(hist.cdf_min(), 2);
        assert_eq!(hist.dimensions(), (2, 2));

        // target = 0 / 254 * 3 + 2 = 2, first bin with cumulative 2
        assert_eq!(invert_value(0.0, hist.cumulative(), 2, 2, 2, 256).unwrap(), 0);
        // target = 254 / 254 * 3 + 2 = 5, nearest cumulative is 4 at bin 255
        assert_eq!(hist.invert(254.0).unwrap(), 255);
    }

    #[test]
    fn test_constant_channel() {
        let channel = Array2::from_elem((4, 5), 128u8);
        let hist = ChannelHistogram::build(channel.view(), 256).unwrap();

        assert_eq!(hist.cdf_min(), 20);
        assert_eq!(hist.cumulative()[127], 0);
        assert_eq!(hist.cumulative()[128], 20);
        assert_eq!(hist.cumulative()[255], 20);
        for v in [0.0, 100.0, 255.0] {
            let original = hist.invert(v).unwrap();
            assert!(original >= 128, "value {} inverted to {}", v, original);
        }
    }

    #[test]
    fn test_single_pixel_channel() {
        let channel = array![[42u8]];
        let hist = ChannelHistogram::build(channel.view(), 256).unwrap();
        // width * height - 1 == 0 leaves the target at cdf_min
        assert_eq!(hist.invert(200.0).unwrap(), 42);
    }

    #[test]
    fn test_empty_channel_is_degenerate() {
        let channel = Array2::<u8>::zeros((0, 3));
        let result = ChannelHistogram::build(channel.view(), 256);
        assert!(matches!(result, Err(Error::DegenerateHistogram(_))));
    }

    #[test]
    fn test_value_beyond_levels_rejected() {
        let channel = array![[0u8, 17]];
        let result = ChannelHistogram::build(channel.view(), 16);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { name: "channel value", .. })
        ));
    }

    #[test]
    fn test_levels_bounds() {
        let channel = array![[0u8, 1]];
        assert!(ChannelHistogram::build(channel.view(), 2).is_err());
        assert!(ChannelHistogram::build(channel.view(), 257).is_err());
        assert!(ChannelHistogram::build(channel.view(), 3).is_ok());
        assert!(invert_value(1.0, &[1, 2], 1, 1, 2, 2).is_err());
        assert!(invert_value(1.0, &[], 1, 1, 2, 256).is_err());
    }

    #[test]
    fn test_ties_go_to_lowest_bin() {
        // A zero equalized value puts the target at cdf_min = 2, equidistant from 1 and 3
        let cumulative = [1u64, 3, 3, 255];
        assert_eq!(invert_value(0.0, &cumulative, 2, 1, 255, 256).unwrap(), 0);
    }

    #[test]
    fn test_monotonic_in_equalized_value() {
        let data: Vec<u8> = (0..64u32).map(|i| ((i * i * 7) % 256) as u8).collect();
        let channel = Array2::from_shape_vec((8, 8), data).unwrap();
        let hist = ChannelHistogram::build(channel.view(), 256).unwrap();

        let mut previous = 0;
        for v in 0..256 {
            let original = hist.invert(v as f64).unwrap();
            assert!(original >= previous, "not monotonic at {}", v);
            previous = original;
        }
    }

    #[test]
    fn test_huge_dimensions_do_not_overflow() {
        let cumulative = [1u64, 2, 3];
        assert_eq!(invert_value(0.0, &cumulative, 1, usize::MAX, usize::MAX, 256).unwrap(), 0);
        assert_eq!(invert_value(254.0, &cumulative, 1, usize::MAX, usize::MAX, 256).unwrap(), 2);
    }
}
