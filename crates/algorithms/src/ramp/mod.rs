//! Color ramp interpolation
//!
//! A color ramp is an ordered list of breakpoints, each mapping an RGB color
//! to a scalar value (typically elevation or depth). Every consecutive pair
//! of breakpoints defines a [`ColorRange`]: an axis-aligned box in RGB space
//! together with the scalar interval it covers. A [`RampTable`] evaluates a
//! pixel by finding the first range whose box contains it and interpolating
//! along the channel that deviates most from the range's base color.
//!
//! Ramps are usually read from a text file with one `R G B Z` record per
//! line (see [`parse_ramp`]).

mod parse;
mod range;
mod table;

pub use parse::{parse_ramp, read_ramp};
pub use range::{ColorBreakpoint, ColorRange};
pub use table::RampTable;
