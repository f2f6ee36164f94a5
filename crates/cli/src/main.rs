//! RGBZ CLI - convert color-coded maps into elevation rasters

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use rgbz_algorithms::conversion::{rgb_to_z, HistogramMethod, RgbToZParams};
use rgbz_algorithms::equalization::DEFAULT_LEVELS;
use rgbz_algorithms::ramp::{read_ramp, RampTable};
use rgbz_core::io::{read_geotiff_bands, write_geotiff, write_points, GeoTiffOptions};
use rgbz_core::{Error, Raster};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "rgbz")]
#[command(author, version, about = "Convert color-coded maps into elevation rasters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Validate a color ramp file and list its ranges
    Ramp {
        /// Ramp definition (one "R G B Z" record per line)
        ramp: PathBuf,
    },
    /// Convert an RGB composite into a Z raster
    Convert {
        /// Input RGB composite (GeoTIFF, 3 or more bands)
        input: PathBuf,
        /// Ramp definition (one "R G B Z" record per line)
        ramp: PathBuf,
        /// Output Z raster
        output: PathBuf,
        /// Value written where no ramp range matches
        #[arg(short, long, default_value = "-9999", allow_negative_numbers = true)]
        nodata: f64,
        /// How the source image's histogram was treated
        #[arg(long, value_enum, default_value_t = HistogramArg::None)]
        histogram: HistogramArg,
        /// Intensity levels per channel for equalization inversion
        #[arg(long, default_value_t = DEFAULT_LEVELS)]
        levels: usize,
        /// Also write the valid cells as an x,y,z CSV point file
        #[arg(short, long)]
        points: Option<PathBuf>,
        /// Accept inputs without a coordinate reference system
        #[arg(long)]
        allow_unreferenced: bool,
        /// Worker threads (defaults to all cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HistogramArg {
    /// Colors are used as stored
    None,
    /// Channels were histogram-equalized
    Equalized,
}

impl From<HistogramArg> for HistogramMethod {
    fn from(arg: HistogramArg) -> Self {
        match arg {
            HistogramArg::None => HistogramMethod::None,
            HistogramArg::Equalized => HistogramMethod::Equalized,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Logging already initialized");
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn set_num_threads(threads: usize) {
    if rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .is_err()
    {
        warn!("Thread pool already initialized, ignoring --threads");
    }
}

fn read_bands(path: &Path) -> Result<Vec<Raster<u8>>> {
    let pb = spinner("Reading raster...");
    let bands: Vec<Raster<u8>> = read_geotiff_bands(path)
        .with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    if let Some(first) = bands.first() {
        info!("Input: {} x {}, {} band(s)", first.cols(), first.rows(), bands.len());
    }
    Ok(bands)
}

fn load_ramp(path: &Path) -> Result<RampTable> {
    let ramp = read_ramp(path)
        .with_context(|| format!("Failed to load color ramp {}", path.display()))?;
    info!("Color ramp: {} ranges", ramp.len());
    Ok(ramp)
}

fn write_result(raster: &Raster<f64>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::default()))
        .context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn print_ramp(ramp: &RampTable) {
    println!("{:>5}  {:>17}  {:>17}  {:>12}  {:>12}", "range", "from RGB", "to RGB", "z base", "z top");
    for (i, range) in ramp.ranges().iter().enumerate() {
        let base = range.rgb_base();
        // The far corner of the box from the base color
        let top: [f64; 3] = std::array::from_fn(|c| {
            if range.rgb_low()[c] == base[c] {
                range.rgb_high()[c]
            } else {
                range.rgb_low()[c]
            }
        });
        println!(
            "{:>5}  {:>5} {:>5} {:>5}  {:>5} {:>5} {:>5}  {:>12.3}  {:>12.3}",
            i + 1,
            base[0],
            base[1],
            base[2],
            top[0],
            top[1],
            top[2],
            range.z_base(),
            range.z_top()
        );
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let bands = read_bands(&input)?;
            let first = bands.first().context("Raster has no bands")?;
            let (rows, cols) = first.shape();
            let bounds = first.bounds();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, first.len());
            println!("Bands: {}", bands.len());
            println!("Cell size: {}", first.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            match first.crs() {
                Some(crs) => println!("CRS: {}", crs),
                None => println!("CRS: none"),
            }
            if let Some(nodata) = first.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            for (i, band) in bands.iter().enumerate() {
                let stats = band.statistics();
                println!(
                    "  Band {}: min {:?}, max {:?}, mean {:.2}, valid {}",
                    i + 1,
                    stats.min,
                    stats.max,
                    stats.mean.unwrap_or(f64::NAN),
                    stats.valid_count
                );
            }
        }

        // ── Ramp ─────────────────────────────────────────────────────
        Commands::Ramp { ramp } => {
            let table = load_ramp(&ramp)?;
            println!("Ramp: {} ({} ranges)", ramp.display(), table.len());
            print_ramp(&table);
        }

        // ── Convert ──────────────────────────────────────────────────
        Commands::Convert {
            input,
            ramp,
            output,
            nodata,
            histogram,
            levels,
            points,
            allow_unreferenced,
            threads,
        } => {
            if let Some(threads) = threads {
                set_num_threads(threads);
            }
            let table = load_ramp(&ramp)?;
            let bands = read_bands(&input)?;

            let georeferenced = bands.first().is_some_and(|band| band.is_georeferenced());
            if !georeferenced {
                if allow_unreferenced {
                    warn!("Input has no coordinate reference system; output will not either");
                } else {
                    return Err(Error::NotGeoreferenced)
                        .context("Use --allow-unreferenced to convert it anyway");
                }
            }

            let params = RgbToZParams {
                nodata,
                histogram: histogram.into(),
                levels,
            };
            debug!("Conversion parameters: {:?}", params);

            let pb = spinner("Converting colors to z...");
            let start = Instant::now();
            let result = rgb_to_z(&bands, &table, &params).context("Failed to convert RGB to Z")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();

            write_result(&result, &output)?;
            done("Z raster", &output, elapsed);

            if let Some(points) = points {
                let pb = spinner("Writing points...");
                let count = write_points(&result, &points).context("Failed to write points")?;
                pb.finish_and_clear();
                println!("{} points saved to: {}", count, points.display());
            }
        }
    }

    Ok(())
}
