//! Ramp definition files
//!
//! One breakpoint per line as four whitespace-separated numbers:
//!
//! ```text
//! # R   G   B     Z
//!   0   0 255     0
//!   0 255 255  1000
//! 255   0   0  4000
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use super::range::ColorBreakpoint;
use super::table::RampTable;
use rgbz_core::{Error, Result};
use std::path::Path;
use std::str::FromStr;

/// Parse ramp text into breakpoints, in file order.
///
/// Malformed records fail with [`Error::FileFormat`] carrying the 1-based
/// line number. Value ranges are not checked here; that happens in
/// [`RampTable::build`].
pub fn parse_ramp(text: &str) -> Result<Vec<ColorBreakpoint>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| parse_record(i + 1, line))
        .collect()
}

fn parse_record(line: usize, record: &str) -> Result<ColorBreakpoint> {
    let fields: Vec<&str> = record.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(Error::FileFormat {
            line,
            reason: format!("expected 4 fields (R G B Z), found {}", fields.len()),
        });
    }

    let mut values = [0.0; 4];
    for (value, field) in values.iter_mut().zip(&fields) {
        *value = field.parse().map_err(|_| Error::FileFormat {
            line,
            reason: format!("'{}' is not a number", field),
        })?;
    }

    let [r, g, b, z] = values;
    Ok(ColorBreakpoint::new(r, g, b, z))
}

/// Read and build a ramp from a definition file
pub fn read_ramp<P: AsRef<Path>>(path: P) -> Result<RampTable> {
    let text = std::fs::read_to_string(path.as_ref())?;
    text.parse()
}

impl FromStr for RampTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RampTable::build(&parse_ramp(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers_and_floats() {
        let text = "0 0 255 0\n0 255 255 1000.5\n";
        let breakpoints = parse_ramp(text).unwrap();
        assert_eq!(
            breakpoints,
            vec![
                ColorBreakpoint::new(0.0, 0.0, 255.0, 0.0),
                ColorBreakpoint::new(0.0, 255.0, 255.0, 1000.5),
            ]
        );
    }

    #[test]
    fn test_blank_lines_and_comments_skipped() {
        let text = "# depth ramp\n\n  0 0 0 -50\n\t\n255 255 255 0  \n";
        let breakpoints = parse_ramp(text).unwrap();
        assert_eq!(breakpoints.len(), 2);
        assert_eq!(breakpoints[0].z, -50.0);
    }

    #[test]
    fn test_wrong_field_count_reports_line() {
        let text = "0 0 0 0\n\n255 255 100\n";
        match parse_ramp(text) {
            Err(Error::FileFormat { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("found 3"));
            }
            other => panic!("expected file format error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_field_reports_line() {
        let text = "0 0 0 0\n255 red 255 100\n";
        assert!(matches!(
            parse_ramp(text),
            Err(Error::FileFormat { line: 2, .. })
        ));
    }

    #[test]
    fn test_from_str_builds_table() {
        let ramp: RampTable = "0 0 0 0\n255 255 255 100\n".parse().unwrap();
        assert_eq!(ramp.lookup([255, 0, 0]).unwrap(), Some(100.0));
    }

    #[test]
    fn test_from_str_validates_values() {
        let result = "0 0 0 0\n300 0 0 100\n".parse::<RampTable>();
        assert!(matches!(result, Err(Error::Range(_))));
    }

    #[test]
    fn test_read_ramp_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "0 0 0 0\n255 255 255 100\n").unwrap();
        let ramp = read_ramp(tmp.path()).unwrap();
        assert_eq!(ramp.len(), 1);

        let missing = read_ramp(tmp.path().with_extension("missing"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
