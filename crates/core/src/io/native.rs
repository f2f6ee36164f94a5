//! Native GeoTIFF reading/writing
//!
//! Uses the `tiff` crate. Multi-sample (chunky) images such as RGB
//! composites are split into one raster per band. Georeferencing is read
//! from and written to the ModelPixelScale, ModelTiepoint, GeoKeyDirectory
//! and GDAL_NODATA tags.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const GT_MODEL_TYPE_KEY: u16 = 1024;
const GT_RASTER_TYPE_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_KEY: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const USER_DEFINED: u16 = 32767;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// Skip the GDAL_NODATA tag even when the raster has a no-data value
    pub omit_nodata_tag: bool,
}

/// Read every band of a GeoTIFF file.
///
/// Each band shares the file's geotransform, CRS and no-data value.
pub fn read_geotiff_bands<T, P>(path: P) -> Result<Vec<Raster<T>>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_bands(BufReader::new(file))
}

/// Read a single band of a GeoTIFF file (the first one when `band` is `None`)
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    select_band(read_geotiff_bands(path)?, band)
}

/// Read every band of a GeoTIFF held in memory
pub fn read_geotiff_bands_from_buffer<T>(data: &[u8]) -> Result<Vec<Raster<T>>>
where
    T: RasterElement,
{
    decode_bands(Cursor::new(data))
}

/// Read a single band of a GeoTIFF held in memory
pub fn read_geotiff_from_buffer<T>(data: &[u8], band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
{
    select_band(read_geotiff_bands_from_buffer(data)?, band)
}

fn select_band<T: RasterElement>(bands: Vec<Raster<T>>, band: Option<usize>) -> Result<Raster<T>> {
    let index = band.unwrap_or(0);
    let found = bands.len();
    bands
        .into_iter()
        .nth(index)
        .ok_or(Error::BandCount {
            expected: index + 1,
            found,
        })
}

/// Convert decoded samples to the cell type, failing on the first sample
/// the cell type cannot hold (e.g. 16-bit color read into `u8` bands).
fn cast_samples<T, S>(buf: &[S], format: &str) -> Result<Vec<T>>
where
    T: RasterElement,
    S: Copy + std::fmt::Display + num_traits::NumCast,
{
    buf.iter()
        .map(|&v| {
            num_traits::cast(v).ok_or_else(|| {
                Error::UnsupportedDataType(format!(
                    "{} sample {} does not fit a {} cell",
                    format,
                    v,
                    std::any::type_name::<T>()
                ))
            })
        })
        .collect()
}

/// Internal: decode all bands from any `Read + Seek` source
fn decode_bands<T, R>(reader: R) -> Result<Vec<Raster<T>>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder = Decoder::new(reader)
        .map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;
    let cells = rows * cols;
    if cells == 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let samples: Vec<T> = match result {
        DecodingResult::U8(buf) => cast_samples(&buf, "8-bit")?,
        DecodingResult::U16(buf) => cast_samples(&buf, "16-bit")?,
        DecodingResult::U32(buf) => cast_samples(&buf, "32-bit")?,
        DecodingResult::I8(buf) => cast_samples(&buf, "signed 8-bit")?,
        DecodingResult::I16(buf) => cast_samples(&buf, "signed 16-bit")?,
        DecodingResult::I32(buf) => cast_samples(&buf, "signed 32-bit")?,
        DecodingResult::F32(buf) => cast_samples(&buf, "32-bit float")?,
        DecodingResult::F64(buf) => cast_samples(&buf, "64-bit float")?,
        _ => return Err(Error::UnsupportedDataType("Unsupported TIFF pixel format".to_string())),
    };

    if samples.is_empty() || samples.len() % cells != 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }
    let band_count = samples.len() / cells;

    let transform = read_geotransform(&mut decoder);
    let crs = read_crs(&mut decoder);
    let nodata = read_nodata(&mut decoder).and_then(T::from_f64);

    (0..band_count)
        .map(|band| {
            // Chunky layout: samples of one pixel are adjacent
            let data: Vec<T> = samples
                .iter()
                .skip(band)
                .step_by(band_count)
                .copied()
                .collect();
            let mut raster = Raster::from_vec(data, rows, cols)?;
            if let Some(transform) = transform {
                raster.set_transform(transform);
            }
            raster.set_crs(crs);
            raster.set_nodata(nodata);
            Ok(raster)
        })
        .collect()
}

/// Read GeoTransform from ModelPixelScaleTag + ModelTiepointTag
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag).ok()?;
    GeoTransform::from_tiepoint(&scale, &tiepoint)
}

/// Read the CRS from the GeoKeyDirectoryTag.
///
/// Only keys stored inline (TIFFTagLocation = 0) are considered, which is
/// where GeoTIFF writers put model type and EPSG codes.
fn read_crs<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<CRS> {
    let keys = decoder.get_tag_u16_vec(Tag::GeoKeyDirectoryTag).ok()?;

    let mut model_type = None;
    let mut geographic = None;
    let mut projected = None;
    for entry in keys.get(4..)?.chunks_exact(4) {
        if entry[1] != 0 {
            continue;
        }
        match entry[0] {
            GT_MODEL_TYPE_KEY => model_type = Some(entry[3]),
            GEOGRAPHIC_TYPE_KEY => geographic = Some(entry[3]),
            PROJECTED_CS_TYPE_KEY => projected = Some(entry[3]),
            _ => {}
        }
    }

    match (projected, geographic, model_type) {
        (Some(code), _, _) => Some(CRS::from_epsg(code as u32)),
        (None, Some(USER_DEFINED), _) => Some(CRS::user_defined(true)),
        (None, Some(code), _) => Some(CRS::from_epsg(code as u32)),
        (None, None, Some(MODEL_TYPE_PROJECTED)) => Some(CRS::user_defined(false)),
        (None, None, Some(MODEL_TYPE_GEOGRAPHIC)) => Some(CRS::user_defined(true)),
        _ => None,
    }
}

/// Read the GDAL_NODATA ASCII tag
fn read_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder.get_tag_ascii_string(Tag::GdalNodata).ok()?;
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .parse()
        .ok()
}

/// Build the GeoKeyDirectoryTag for a raster
fn geo_keys(crs: Option<&CRS>) -> Vec<u16> {
    let mut entries: Vec<[u16; 4]> = Vec::new();
    if let Some(crs) = crs {
        let model_type = if crs.is_geographic() {
            MODEL_TYPE_GEOGRAPHIC
        } else {
            MODEL_TYPE_PROJECTED
        };
        entries.push([GT_MODEL_TYPE_KEY, 0, 1, model_type]);
    }
    entries.push([GT_RASTER_TYPE_KEY, 0, 1, RASTER_PIXEL_IS_AREA]);
    if let Some(crs) = crs {
        let key = if crs.is_geographic() {
            GEOGRAPHIC_TYPE_KEY
        } else {
            PROJECTED_CS_TYPE_KEY
        };
        let code = crs
            .epsg()
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(USER_DEFINED);
        entries.push([key, 0, 1, code]);
    }

    // Version 1.1.0 header followed by the sorted key entries
    let mut keys = vec![1, 1, 0, entries.len() as u16];
    keys.extend(entries.iter().flatten());
    keys
}

/// Write a Raster to a GeoTIFF file
///
/// Writes a single band as 32-bit float.
pub fn write_geotiff<T, P>(
    raster: &Raster<T>,
    path: P,
    options: Option<GeoTiffOptions>,
) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, BufWriter::new(file), &options.unwrap_or_default())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(
    raster: &Raster<T>,
    options: Option<GeoTiffOptions>,
) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), &options.unwrap_or_default())?;
    Ok(buf)
}

/// Internal: encode a Raster as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: &GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: std::io::Write + std::io::Seek,
{
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

    let (scale, tiepoint) = raster.transform().to_tiepoint();
    image
        .encoder()
        .write_tag(Tag::ModelPixelScaleTag, &scale[..])
        .map_err(|e| Error::Other(format!("Cannot write scale tag: {}", e)))?;
    image
        .encoder()
        .write_tag(Tag::ModelTiepointTag, &tiepoint[..])
        .map_err(|e| Error::Other(format!("Cannot write tiepoint tag: {}", e)))?;

    let keys = geo_keys(raster.crs());
    image
        .encoder()
        .write_tag(Tag::GeoKeyDirectoryTag, keys.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write geokey tag: {}", e)))?;

    if !options.omit_nodata_tag {
        if let Some(nodata) = raster.nodata().and_then(RasterElement::to_f64) {
            let text = nodata.to_string();
            image
                .encoder()
                .write_tag(Tag::GdalNodata, text.as_str())
                .map_err(|e| Error::Other(format!("Cannot write nodata tag: {}", e)))?;
        }
    }

    image
        .write_data(&data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}
