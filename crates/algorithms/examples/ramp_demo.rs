//! Ramp demo: color a synthetic hill with a hypsometric ramp and read it back
//!
//! Builds a 200x200 Gaussian hill (0 to 3000 m), colors it with a
//! blue -> green -> yellow -> brown -> white ramp, then converts the colors
//! back to elevation and reports the reconstruction error:
//!   1. red.tif, green.tif, blue.tif  - the colored map, one band each
//!   2. elevation.tif                 - the recovered surface
//!   3. elevation.csv                 - the recovered surface as points
//!
//! Run:
//!   cargo run -p rgbz-algorithms --example ramp_demo

use std::fs;
use std::path::Path;

use rgbz_algorithms::conversion::{rgb_to_z, RgbToZParams};
use rgbz_algorithms::ramp::{ColorBreakpoint, RampTable};
use rgbz_core::io::{write_geotiff, write_points, GeoTiffOptions};
use rgbz_core::{GeoTransform, Raster, RasterElement, CRS};

const ROWS: usize = 200;
const COLS: usize = 200;

const STOPS: [ColorBreakpoint; 5] = [
    ColorBreakpoint::new(0.0, 0.0, 255.0, 0.0),
    ColorBreakpoint::new(0.0, 255.0, 0.0, 750.0),
    ColorBreakpoint::new(255.0, 255.0, 0.0, 1500.0),
    ColorBreakpoint::new(255.0, 128.0, 0.0, 2250.0),
    ColorBreakpoint::new(255.0, 255.0, 255.0, 3000.0),
];

fn main() {
    let out_dir = Path::new("output/ramp_demo");
    fs::create_dir_all(out_dir).expect("Cannot create output directory");

    let ramp = RampTable::build(&STOPS).expect("invalid ramp");
    println!("Ramp: {} ranges", ramp.len());

    // --- 1. Colored map ---
    let bands = build_colored_map();
    for (band, name) in bands.iter().zip(["red.tif", "green.tif", "blue.tif"]) {
        save(out_dir, name, band);
    }

    // --- 2. Back to elevation ---
    let params = RgbToZParams::default();
    let z = rgb_to_z(&bands, &ramp, &params).expect("conversion failed");
    save(out_dir, "elevation.tif", &z);

    let mut max_error: f64 = 0.0;
    let mut unmatched = 0usize;
    for ((row, col), &value) in z.data().indexed_iter() {
        if value == params.nodata {
            unmatched += 1;
        } else {
            max_error = max_error.max((value - hill(row, col)).abs());
        }
    }
    println!("Recovered surface: max error {:.1} m, {} unmatched cells", max_error, unmatched);

    // --- 3. Points ---
    let points = out_dir.join("elevation.csv");
    let count = write_points(&z, &points).expect("point export failed");
    println!("{} points -> {}", count, points.display());
}

fn hill(row: usize, col: usize) -> f64 {
    let dy = row as f64 - ROWS as f64 / 2.0;
    let dx = col as f64 - COLS as f64 / 2.0;
    3000.0 * (-(dx * dx + dy * dy) / 2500.0).exp()
}

/// Linear color for `z` between the surrounding stops, rounded to 8 bits
fn color(z: f64) -> [u8; 3] {
    let k = STOPS
        .windows(2)
        .position(|w| z <= w[1].z)
        .unwrap_or(STOPS.len() - 2);
    let (lo, hi) = (STOPS[k], STOPS[k + 1]);
    let t = (z - lo.z) / (hi.z - lo.z);
    let (a, b) = (lo.rgb(), hi.rgb());
    std::array::from_fn(|c| (a[c] + t * (b[c] - a[c])).round() as u8)
}

fn build_colored_map() -> Vec<Raster<u8>> {
    let mut bands: Vec<Raster<u8>> = (0..3).map(|_| Raster::new(ROWS, COLS)).collect();
    for row in 0..ROWS {
        for col in 0..COLS {
            let rgb = color(hill(row, col));
            for (band, value) in bands.iter_mut().zip(rgb) {
                band.set(row, col, value).expect("in bounds");
            }
        }
    }
    for band in bands.iter_mut() {
        band.set_transform(GeoTransform::new(500_000.0, 4_100_000.0, 30.0, -30.0));
        band.set_crs(Some(CRS::from_epsg(32611)));
    }
    bands
}

fn save<T: RasterElement>(dir: &Path, name: &str, raster: &Raster<T>) {
    let path = dir.join(name);
    write_geotiff(raster, &path, Some(GeoTiffOptions::default()))
        .unwrap_or_else(|e| panic!("Cannot write {}: {}", path.display(), e));
    println!("  wrote {}", path.display());
}
