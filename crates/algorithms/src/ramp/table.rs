//! Ordered lookup table of color ranges

use super::range::{ColorBreakpoint, ColorRange};
use rgbz_core::{Error, Result};

/// An immutable color ramp: one [`ColorRange`] per consecutive pair of
/// breakpoints, kept in ramp order.
///
/// Ranges may overlap in RGB space. Lookups scan them in order and the
/// first range containing the pixel wins.
///
/// # Example
/// ```ignore
/// let ramp = RampTable::build(&[
///     ColorBreakpoint::new(0.0, 0.0, 0.0, 0.0),
///     ColorBreakpoint::new(255.0, 255.0, 255.0, 100.0),
/// ])?;
/// assert_eq!(ramp.lookup([255, 0, 0])?, Some(100.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RampTable {
    ranges: Vec<ColorRange>,
}

impl RampTable {
    /// Build the table from breakpoints in ramp order.
    ///
    /// Fails with [`Error::Range`] when fewer than two breakpoints are given
    /// or any derived range is invalid (see [`ColorRange::new`]).
    pub fn build(breakpoints: &[ColorBreakpoint]) -> Result<Self> {
        if breakpoints.len() < 2 {
            return Err(Error::Range(format!(
                "a ramp needs at least 2 breakpoints, got {}",
                breakpoints.len()
            )));
        }

        let ranges = breakpoints
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                ColorRange::new(&pair[0], &pair[1]).map_err(|e| match e {
                    Error::Range(reason) => {
                        Error::Range(format!("breakpoints {} and {}: {}", i + 1, i + 2, reason))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { ranges })
    }

    /// Ranges in ramp order
    pub fn ranges(&self) -> &[ColorRange] {
        &self.ranges
    }

    /// Number of ranges (one less than the number of breakpoints)
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// First range whose box contains `rgb`
    pub fn find(&self, rgb: [u8; 3]) -> Option<&ColorRange> {
        self.ranges.iter().find(|range| range.contains(rgb))
    }

    /// Scalar value for a pixel, or `None` when no range contains it.
    ///
    /// Errors only when the matched range cannot be evaluated for the pixel
    /// (see [`ColorRange::interpolate`]).
    pub fn lookup(&self, rgb: [u8; 3]) -> Result<Option<f64>> {
        self.find(rgb).map(|range| range.interpolate(rgb)).transpose()
    }

    /// Like [`lookup`](Self::lookup), substituting `nodata` for unmatched pixels
    pub fn lookup_or(&self, rgb: [u8; 3], nodata: f64) -> Result<f64> {
        Ok(self.lookup(rgb)?.unwrap_or(nodata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(r: f64, g: f64, b: f64, z: f64) -> ColorBreakpoint {
        ColorBreakpoint::new(r, g, b, z)
    }

    fn gray_ramp() -> RampTable {
        RampTable::build(&[bp(0.0, 0.0, 0.0, 0.0), bp(255.0, 255.0, 255.0, 100.0)]).unwrap()
    }

    /// Blue -> cyan -> green -> yellow -> red, 0 to 4000 m
    fn hypsometric_ramp() -> RampTable {
        RampTable::build(&[
            bp(0.0, 0.0, 255.0, 0.0),
            bp(0.0, 255.0, 255.0, 1000.0),
            bp(0.0, 255.0, 0.0, 2000.0),
            bp(255.0, 255.0, 0.0, 3000.0),
            bp(255.0, 0.0, 0.0, 4000.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_sorted_ramp() {
        let ramp = hypsometric_ramp();
        assert_eq!(ramp.len(), 4);
        assert!(!ramp.is_empty());
        assert_eq!(ramp.ranges()[2].z_base(), 2000.0);
        assert_eq!(ramp.ranges()[2].z_top(), 3000.0);
    }

    #[test]
    fn test_build_needs_two_breakpoints() {
        assert!(matches!(RampTable::build(&[]), Err(Error::Range(_))));
        assert!(matches!(
            RampTable::build(&[bp(0.0, 0.0, 0.0, 0.0)]),
            Err(Error::Range(_))
        ));
    }

    #[test]
    fn test_build_rejects_inverted_pair() {
        let result = RampTable::build(&[
            bp(0.0, 0.0, 0.0, 0.0),
            bp(10.0, 0.0, 0.0, 50.0),
            bp(20.0, 0.0, 0.0, 40.0),
        ]);
        match result {
            Err(Error::Range(msg)) => assert!(msg.contains("breakpoints 2 and 3"), "{}", msg),
            other => panic!("expected range error, got {:?}", other),
        }
    }

    #[test]
    fn test_gray_ramp_examples() {
        let ramp = gray_ramp();
        assert_eq!(ramp.lookup([255, 0, 0]).unwrap(), Some(100.0));
        assert_eq!(ramp.lookup([0, 0, 0]).unwrap(), Some(0.0));
        assert_eq!(ramp.lookup([51, 51, 51]).unwrap(), Some(20.0));
    }

    #[test]
    fn test_breakpoints_map_to_their_z() {
        let ramp = hypsometric_ramp();
        assert_eq!(ramp.lookup([0, 0, 255]).unwrap(), Some(0.0));
        // Shared breakpoints resolve to the earlier range, where they are the top corner
        assert_eq!(ramp.lookup([0, 255, 255]).unwrap(), Some(1000.0));
        assert_eq!(ramp.lookup([255, 255, 0]).unwrap(), Some(3000.0));
        assert_eq!(ramp.lookup([255, 0, 0]).unwrap(), Some(4000.0));
    }

    #[test]
    fn test_interior_values() {
        let ramp = hypsometric_ramp();
        // Halfway blue -> cyan: green = 128, 128 * 1000 / 255 = 501.96
        assert_eq!(ramp.lookup([0, 128, 255]).unwrap(), Some(502.0));
        // Halfway yellow -> red, measured from yellow
        assert_eq!(ramp.lookup([255, 128, 0]).unwrap(), Some(3498.0));
    }

    #[test]
    fn test_outside_every_box_is_none() {
        let ramp = hypsometric_ramp();
        assert_eq!(ramp.lookup([128, 128, 128]).unwrap(), None);
        assert_eq!(ramp.lookup_or([128, 128, 128], -9999.0).unwrap(), -9999.0);
        assert_eq!(ramp.lookup_or([0, 0, 255], -9999.0).unwrap(), 0.0);
    }

    #[test]
    fn test_overlap_resolves_to_first_range() {
        // Second range covers the same colors backwards with different z
        let ramp = RampTable::build(&[
            bp(0.0, 0.0, 0.0, 0.0),
            bp(100.0, 0.0, 0.0, 10.0),
            bp(0.0, 0.0, 0.0, 20.0),
        ])
        .unwrap();
        assert_eq!(ramp.lookup([50, 0, 0]).unwrap(), Some(5.0));
        assert!(std::ptr::eq(ramp.find([50, 0, 0]).unwrap(), &ramp.ranges()[0]));
    }

    #[test]
    fn test_lookup_is_order_independent() {
        let ramp = hypsometric_ramp();
        let pixels: Vec<[u8; 3]> = (0..=255u8)
            .step_by(15)
            .flat_map(|v| [[0, v, 255], [v, 255, 0], [255, v, 0], [v, v, v]])
            .collect();

        let forward: Vec<_> = pixels.iter().map(|&p| ramp.lookup(p).unwrap()).collect();
        let backward: Vec<_> = pixels.iter().rev().map(|&p| ramp.lookup(p).unwrap()).collect();
        let backward: Vec<_> = backward.into_iter().rev().collect();

        assert_eq!(forward, backward);
    }
}
