use crate::map::Calibration;

/// South tip of the South Sandwich Islands, southernmost mapped land
pub const MIN_LATITUDE: f64 = -58.55;
/// North tip of Canada, northernmost mapped land
pub const MAX_LATITUDE: f64 = 83.64;

pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// True when the coordinate lies inside the band covered by the reference raster.
/// Poles and far-southern waters are not mapped. NaN is never in band.
#[inline(always)]
pub fn in_band(lat: f64, lon: f64) -> bool {
    Calibration::REFERENCE.contains(lat, lon)
}

/// Normalize longitude from any value into [-180, 180)
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Format a coordinate as degrees with hemisphere letters, e.g. "50.0°N, 10.0°E"
pub fn format_coords(lat: f64, lon: f64) -> String {
    format!(
        "{:.2}°{}, {:.2}°{}",
        lat.abs(),
        if lat >= 0.0 { "N" } else { "S" },
        lon.abs(),
        if lon >= 0.0 { "E" } else { "W" }
    )
}
