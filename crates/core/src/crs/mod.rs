//! Coordinate Reference System handling
//!
//! Only the identification of a CRS is modelled: the converter never
//! reprojects, it carries the input's reference system through to its
//! outputs and refuses inputs that have none.

use serde::{Deserialize, Serialize};
use std::fmt;

/// GeoTIFF code for "user-defined" keys
const USER_DEFINED: u32 = 32767;

/// Coordinate Reference System representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CRS {
    /// EPSG code if known
    epsg: Option<u32>,
    /// Whether coordinates are geographic (lon/lat) rather than projected
    geographic: bool,
}

impl CRS {
    /// Create a CRS from an EPSG code
    ///
    /// Codes in the 4000 block are treated as geographic, everything else as
    /// projected.
    pub fn from_epsg(code: u32) -> Self {
        if code == USER_DEFINED {
            return Self::user_defined(false);
        }
        Self {
            epsg: Some(code),
            geographic: (4000..5000).contains(&code),
        }
    }

    /// A reference system declared in the file but without an EPSG code
    pub fn user_defined(geographic: bool) -> Self {
        Self {
            epsg: None,
            geographic,
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Whether this is a geographic (lon/lat) system
    pub fn is_geographic(&self) -> bool {
        self.geographic
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        match self.epsg {
            Some(code) => format!("EPSG:{}", code),
            None if self.geographic => "user-defined (geographic)".to_string(),
            None => "user-defined (projected)".to_string(),
        }
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = CRS::from_epsg(32719);
        assert_eq!(crs.epsg(), Some(32719));
        assert!(!crs.is_geographic());
        assert_eq!(crs.identifier(), "EPSG:32719");
    }

    #[test]
    fn test_crs_geographic() {
        assert!(CRS::wgs84().is_geographic());
    }

    #[test]
    fn test_crs_user_defined_code() {
        let crs = CRS::from_epsg(32767);
        assert_eq!(crs.epsg(), None);
        assert_eq!(crs.to_string(), "user-defined (projected)");
    }
}
