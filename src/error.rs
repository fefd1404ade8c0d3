//! Error types for resource loading and coordinate resolution.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A row of the intensity table that could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// Fewer than the three required columns.
    #[error("line {line}: expected `intensity,name,id`, found {found:?}")]
    MissingColumns { line: usize, found: String },

    /// First column is not an integer in 0..=255.
    #[error("line {line}: invalid intensity {value:?}")]
    InvalidIntensity { line: usize, value: String },

    /// Country name or identifier column is empty.
    #[error("line {line}: empty country name or identifier")]
    EmptyField { line: usize },
}

/// Failure to acquire the raster or the intensity table.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource file could not be read.
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// The raster could not be decoded as an image.
    #[error("failed to decode raster {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The intensity table is malformed.
    #[error("malformed intensity table {path}: {source}")]
    Table { path: PathBuf, source: TableError },

    /// Raster dimensions disagree with the projection calibration.
    #[error("raster is {actual_width}x{actual_height}, calibration expects {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Raster buffer length does not match its declared dimensions.
    #[error("raster buffer holds {len} samples, {width}x{height} needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        len: usize,
        expected: usize,
    },
}

/// Errors returned by coordinate resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Raster or table could not be acquired for this call.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// No ring up to the radius bound contained a mapped pixel.
    /// Only happens with a grid that has no mapped pixels near the point.
    #[error("no country found within {max_radius} pixels of ({x}, {y})")]
    SearchExhausted { x: i32, y: i32, max_radius: u32 },
}
