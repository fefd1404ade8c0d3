use glam::IVec2;

use crate::geo::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};

/// Calibration of the equirectangular country raster (phi0 = 0, lambda0 = 0).
///
/// The reference map is 2400x949 pixels, with the Greenwich meridian at column
/// 939 and the Equator at row 555. The vertical scale spreads the supported
/// latitude band (not the full -90..90 range) over the image height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Raster width in pixels
    pub width: u32,
    /// Raster height in pixels
    pub height: u32,
    /// Pixel column of the prime meridian
    pub greenwich_x: i32,
    /// Pixel row of the Equator
    pub equator_y: i32,
    /// Southern edge of the mapped band in degrees
    pub min_lat: f64,
    /// Northern edge of the mapped band in degrees
    pub max_lat: f64,
}

impl Calibration {
    /// The calibration of the bundled `countries-8bitgray.png`
    pub const REFERENCE: Calibration = Calibration {
        width: 2400,
        height: 949,
        greenwich_x: 939,
        equator_y: 555,
        min_lat: MIN_LATITUDE,
        max_lat: MAX_LATITUDE,
    };

    /// True when the coordinate lies inside the latitude band this raster
    /// covers. Edges are inclusive, NaN is never inside.
    #[inline(always)]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }

    /// Project a geographic coordinate to a raster pixel.
    ///
    /// Performs no bounds checking: callers reject out-of-band coordinates first.
    /// Both axes truncate toward zero like an integer cast, which is what the
    /// reference map was calibrated against. x wraps around the antimeridian,
    /// y does not.
    #[inline]
    pub fn project(&self, lat: f64, lon: f64) -> IVec2 {
        let w = self.width as f64;
        let h = self.height as f64;

        let x = (self.greenwich_x as f64 + lon * w / 360.0) as i32;
        let x = (self.width as i32 + x).rem_euclid(self.width as i32);
        let y = (self.equator_y as f64 - lat * h / (self.max_lat - self.min_lat)) as i32;

        IVec2::new(x, y)
    }

    /// Geographic coordinate (lat, lon) of the top-left corner of a pixel.
    ///
    /// Inverse of the linear mapping in [`Calibration::project`], ignoring
    /// truncation. Longitude is normalized into [-180, 180).
    pub fn unproject(&self, pixel: IVec2) -> (f64, f64) {
        let w = self.width as f64;
        let h = self.height as f64;

        let lon = (pixel.x - self.greenwich_x) as f64 * 360.0 / w;
        let lat = (self.equator_y - pixel.y) as f64 * (self.max_lat - self.min_lat) / h;

        (lat, crate::geo::normalize_lon(lon))
    }

    /// Wrap a pixel column into [0, width)
    #[inline(always)]
    pub fn wrap_x(&self, x: i32) -> i32 {
        x.rem_euclid(self.width as i32)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::REFERENCE
    }
}
