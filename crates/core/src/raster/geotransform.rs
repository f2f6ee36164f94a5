//! Pixel-to-map coordinate mapping

use serde::{Deserialize, Serialize};

/// North-up pixel grid placement, as carried by the GeoTIFF
/// ModelPixelScale and ModelTiepoint tags:
/// ```text
/// x = origin_x + col * pixel_width
/// y = origin_y + row * pixel_height
/// ```
/// `pixel_height` is negative when row 0 is the northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// Map X of the upper-left corner of cell (0, 0)
    pub origin_x: f64,
    /// Map Y of the upper-left corner of cell (0, 0)
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Build from ModelPixelScale `[sx, sy, sz]` and ModelTiepoint
    /// `[i, j, k, x, y, z]`. `None` when either tag is too short.
    pub fn from_tiepoint(scale: &[f64], tiepoint: &[f64]) -> Option<Self> {
        let (&[sx, sy, ..], &[i, j, _, x, y, ..]) = (scale, tiepoint) else {
            return None;
        };
        // The tiepoint may anchor any pixel; move it back to (0, 0)
        Some(Self::new(x - i * sx, y + j * sy, sx, -sy))
    }

    /// ModelPixelScale and ModelTiepoint values anchored at pixel (0, 0)
    pub fn to_tiepoint(&self) -> ([f64; 3], [f64; 6]) {
        (
            [self.pixel_width, self.pixel_height.abs(), 0.0],
            [0.0, 0.0, 0.0, self.origin_x, self.origin_y, 0.0],
        )
    }

    /// Map coordinates of a cell center
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.corner(col as f64 + 0.5, row as f64 + 0.5)
    }

    fn corner(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width,
            self.origin_y + row * self.pixel_height,
        )
    }

    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// `(min_x, min_y, max_x, max_y)` of a `width` x `height` grid
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.corner(0.0, 0.0);
        let (x1, y1) = self.corner(width as f64, height as f64);
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_to_geo_center() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);

        let (x, y) = gt.pixel_to_geo(5, 10);

        assert_relative_eq!(x, 155.0, epsilon = 1e-10);
        assert_relative_eq!(y, 95.0, epsilon = 1e-10);
    }

    #[test]
    fn test_tiepoint_roundtrip() {
        let gt = GeoTransform::new(500_000.0, 4_200_000.0, 30.0, -30.0);
        let (scale, tiepoint) = gt.to_tiepoint();
        let back = GeoTransform::from_tiepoint(&scale, &tiepoint).unwrap();
        assert_eq!(back, gt);
    }

    #[test]
    fn test_tiepoint_offset_pixel() {
        // Tiepoint anchored at pixel (2, 3) instead of the origin
        let scale = [10.0, 10.0, 0.0];
        let tiepoint = [2.0, 3.0, 0.0, 120.0, 170.0, 0.0];
        let gt = GeoTransform::from_tiepoint(&scale, &tiepoint).unwrap();
        assert_relative_eq!(gt.origin_x, 100.0, epsilon = 1e-10);
        assert_relative_eq!(gt.origin_y, 200.0, epsilon = 1e-10);
        assert_relative_eq!(gt.pixel_height, -10.0, epsilon = 1e-10);
    }

    #[test]
    fn test_tiepoint_too_short() {
        assert!(GeoTransform::from_tiepoint(&[1.0], &[0.0; 6]).is_none());
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let (min_x, min_y, max_x, max_y) = gt.bounds(100, 100);

        assert_relative_eq!(min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(min_y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(max_x, 100.0, epsilon = 1e-10);
        assert_relative_eq!(max_y, 100.0, epsilon = 1e-10);
    }
}
