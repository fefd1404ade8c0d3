use coords2country::geo::{normalize_lon, MAX_LATITUDE, MIN_LATITUDE};

/// Visible part of the equirectangular map, in Braille dots
#[derive(Clone)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude, kept inside the mapped band
    pub center_lat: f64,
    /// Zoom level (1 = whole world across the width)
    pub zoom: f64,
    /// Canvas width in dots
    pub width: usize,
    /// Canvas height in dots
    pub height: usize,
}

impl Viewport {
    const MIN_ZOOM: f64 = 1.0;
    const MAX_ZOOM: f64 = 64.0;

    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Whole mapped band, centred between its edges
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(0.0, (MIN_LATITUDE + MAX_LATITUDE) / 2.0, 1.0, width, height)
    }

    /// Degrees per dot; dots are close enough to square to share one scale
    #[inline(always)]
    fn degrees_per_dot(&self) -> f64 {
        360.0 / (self.zoom * self.width.max(1) as f64)
    }

    /// Pan by a dot delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.degrees_per_dot();
        self.center_lon = normalize_lon(self.center_lon + dx as f64 * scale);
        self.center_lat = (self.center_lat - dy as f64 * scale).clamp(MIN_LATITUDE, MAX_LATITUDE);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(Self::MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(Self::MIN_ZOOM);
    }

    /// Zoom in towards a dot position
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a dot position
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom keeping the coordinate under (px, py) in place
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);

        self.zoom = (self.zoom * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);

        let scale = self.degrees_per_dot();
        self.center_lon = normalize_lon(lon - (px as f64 - self.width as f64 / 2.0) * scale);
        self.center_lat =
            (lat + (py as f64 - self.height as f64 / 2.0) * scale).clamp(MIN_LATITUDE, MAX_LATITUDE);
    }

    /// Geographic coordinate (lon, lat) under a dot. Longitude is wrapped,
    /// latitude may leave the mapped band.
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.degrees_per_dot();
        let lon = self.center_lon + (px as f64 - self.width as f64 / 2.0) * scale;
        let lat = self.center_lat - (py as f64 - self.height as f64 / 2.0) * scale;
        (normalize_lon(lon), lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unproject_center() {
        let vp = Viewport::new(10.0, 50.0, 1.0, 360, 180);
        let (lon, lat) = vp.unproject(180, 90);
        assert_eq!(lon, 10.0);
        assert_eq!(lat, 50.0);
    }

    #[test]
    fn test_unproject_scale() {
        // One degree per dot at zoom 1 on a 360-dot canvas
        let vp = Viewport::new(0.0, 0.0, 1.0, 360, 180);
        let (lon, lat) = vp.unproject(190, 80);
        assert!((lon - 10.0).abs() < 1e-9);
        assert!((lat - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_wraps_and_clamps() {
        let mut vp = Viewport::new(170.0, 0.0, 1.0, 360, 180);
        vp.pan(20, 0);
        assert!((vp.center_lon + 170.0).abs() < 1e-9);

        vp.pan(0, -1000);
        assert_eq!(vp.center_lat, MAX_LATITUDE);
    }

    #[test]
    fn test_zoom_at_keeps_point() {
        let mut vp = Viewport::new(0.0, 0.0, 2.0, 360, 180);
        let before = vp.unproject(300, 40);
        vp.zoom_in_at(300, 40);
        let after = vp.unproject(300, 40);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_limits() {
        let mut vp = Viewport::world(100, 50);
        vp.zoom_out();
        assert_eq!(vp.zoom, 1.0);
        for _ in 0..20 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, 64.0);
    }
}
