//! Cell value types

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// A value that can live in a raster cell.
///
/// Color bands are `u8` (or `u16` for 16-bit scans), reconstructed surfaces
/// are `f64`. Values cross between them through `f64`.
pub trait RasterElement:
    Copy + Debug + PartialOrd + NumCast + Zero + Send + Sync + 'static
{
    /// Whether `self` matches the raster's no-data marker
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }

    /// `None` when `value` is out of range for the cell type
    fn from_f64(value: f64) -> Option<Self> {
        NumCast::from(value)
    }
}

macro_rules! raster_element {
    (int $($t:ty),+) => {$(
        impl RasterElement for $t {
            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                nodata == Some(*self)
            }
        }
    )+};
    (float $($t:ty),+) => {$(
        impl RasterElement for $t {
            // NaN is always no-data; sentinels compare with a small tolerance
            // so values that went through f32 storage still match.
            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                self.is_nan()
                    || nodata.is_some_and(|nd| (self - nd).abs() <= nd.abs().max(1.0) * 1e-6)
            }
        }
    )+};
}

raster_element!(int u8, u16);
raster_element!(float f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_nodata() {
        assert!(0u8.is_nodata(Some(0)));
        assert!(!1u8.is_nodata(Some(0)));
        assert!(!0u8.is_nodata(None));
        assert!(65535u16.is_nodata(Some(65535)));
    }

    #[test]
    fn test_float_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!((-9999.0f64).is_nodata(Some(-9999.0)));
        assert!(!(-9998.0f64).is_nodata(Some(-9999.0)));
        // Sentinel after a trip through f32 storage
        assert!((-3.4e38f32 as f64).is_nodata(Some(-3.4e38)));
    }

    #[test]
    fn test_from_f64_range() {
        assert_eq!(u8::from_f64(255.0), Some(255));
        assert_eq!(u8::from_f64(-1.0), None);
        assert_eq!(u8::from_f64(300.0), None);
        assert_eq!(f32::from_f64(0.5), Some(0.5));
    }
}
