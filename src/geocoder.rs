use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::config::{CachePolicy, Config};
use crate::data::{CachedProvider, CountryRecord, FileProvider, IntensityGrid, MapResources, ResourceProvider};
use crate::error::{ResolveError, ResourceError};
use crate::map::{Calibration, Resolver};

/// Which field of the country to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Answer {
    /// English name, e.g. "Germany"
    #[default]
    Name,
    /// Numeric Wikidata identifier, e.g. "183"
    NumericId,
}

impl Answer {
    pub fn select(self, record: &CountryRecord) -> &str {
        match self {
            Answer::Name => &record.name,
            Answer::NumericId => &record.id,
        }
    }
}

/// Resolves coordinates to countries.
///
/// Every call is independent. Whether the raster and table are re-read per
/// call or kept between calls is decided by the resource provider, see
/// [`CachePolicy`]. The geocoder itself holds no mutable state and can be
/// shared between threads.
pub struct Geocoder {
    provider: Box<dyn ResourceProvider>,
    calibration: Calibration,
    resolver: Resolver,
}

impl Geocoder {
    /// Geocoder reading resources from the files named in `config`
    pub fn new(config: &Config) -> Self {
        let files = FileProvider::new(config.raster_path(), config.table_path());
        let provider: Box<dyn ResourceProvider> = match config.cache {
            CachePolicy::Reload => Box::new(files),
            CachePolicy::Retain => Box::new(CachedProvider::new(files)),
        };
        Self::with_provider(provider, config)
    }

    /// Geocoder with the default settings and resources in `dir`
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(&Config::default().with_resource_dir(dir))
    }

    /// Geocoder over a custom provider; `config` supplies calibration and search settings
    pub fn with_provider(provider: impl ResourceProvider + 'static, config: &Config) -> Self {
        Self {
            provider: Box::new(provider),
            calibration: config.calibration,
            resolver: Resolver::new(config.vote, config.max_search_radius),
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Acquire resources through the provider, checking them against the calibration
    pub fn resources(&self) -> Result<Arc<MapResources>, ResourceError> {
        let resources = self.provider.acquire()?;
        let (width, height) = (resources.raster.width(), resources.raster.height());
        if (width, height) != (self.calibration.width, self.calibration.height) {
            return Err(ResourceError::DimensionMismatch {
                width: self.calibration.width,
                height: self.calibration.height,
                actual_width: width,
                actual_height: height,
            });
        }
        Ok(resources)
    }

    /// Country containing the coordinate, or `None` outside the mapped band
    pub fn resolve(&self, lat: f64, lon: f64) -> Result<Option<CountryRecord>, ResolveError> {
        if !self.calibration.contains(lat, lon) {
            debug!(lat, lon, "coordinate outside mapped band");
            return Ok(None);
        }
        let resources = self.resources()?;
        self.resolve_in(&resources, lat, lon)
    }

    /// Country name or numeric id for the coordinate, `None` outside the mapped band
    pub fn resolve_country(&self, lat: f64, lon: f64, answer: Answer) -> Result<Option<String>, ResolveError> {
        Ok(self
            .resolve(lat, lon)?
            .map(|record| answer.select(&record).to_string()))
    }

    /// English country name, e.g. "Germany" for (50.1, 10.2)
    pub fn country(&self, lat: f64, lon: f64) -> Result<Option<String>, ResolveError> {
        self.resolve_country(lat, lon, Answer::Name)
    }

    /// Numeric part of the country's Wikidata QID, e.g. "183" (Q183) for (50.1, 10.2)
    pub fn country_qid(&self, lat: f64, lon: f64) -> Result<Option<String>, ResolveError> {
        self.resolve_country(lat, lon, Answer::NumericId)
    }

    /// Resolve against resources the caller already holds
    pub fn resolve_in(
        &self,
        resources: &MapResources,
        lat: f64,
        lon: f64,
    ) -> Result<Option<CountryRecord>, ResolveError> {
        if !self.calibration.contains(lat, lon) {
            return Ok(None);
        }
        let pixel = self.calibration.project(lat, lon);
        let record = self.resolver.resolve(pixel, &resources.raster, &resources.table)?;
        Ok(Some(record.clone()))
    }

    /// Resolve a batch of (lat, lon) pairs in parallel, acquiring resources once.
    /// Results are in input order.
    pub fn resolve_many(&self, coords: &[(f64, f64)]) -> Result<Vec<Option<CountryRecord>>, ResolveError> {
        if coords.iter().all(|&(lat, lon)| !self.calibration.contains(lat, lon)) {
            return Ok(vec![None; coords.len()]);
        }
        let resources = self.resources()?;
        coords
            .par_iter()
            .map(|&(lat, lon)| self.resolve_in(&resources, lat, lon))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CountryTable, GrayRaster, StaticProvider};
    use crate::geo::{MAX_LATITUDE, MIN_LATITUDE};
    use crate::map::VotePolicy;

    const GERMANY: u8 = 183;
    const FRANCE: u8 = 142;
    const MADAGASCAR: u8 = 75;
    const NO_COUNTRY: u8 = 0;
    const BORDER: u8 = 255;

    const CAL: Calibration = Calibration::REFERENCE;

    fn table() -> CountryTable {
        CountryTable::from_records([
            (GERMANY, CountryRecord::new("Germany", "183")),
            (FRANCE, CountryRecord::new("France", "142")),
            (MADAGASCAR, CountryRecord::new("Madagascar", "1019")),
        ])
    }

    /// Reference-sized raster painted around the scenario coordinates
    fn world() -> GrayRaster {
        let mut raster = GrayRaster::filled(CAL.width, CAL.height, NO_COUNTRY);

        // Germany around (50, 10) -> (1005, 221)
        raster.fill_rect(995, 210, 1015, 232, GERMANY);

        // Europa Island: a French speck whose centre is drawn black -> (1204, 713)
        raster.fill_rect(1203, 712, 1205, 714, FRANCE);
        raster.set(1204, 713, BORDER);

        // Madagascar coast a dozen pixels from (-31, 45) -> (1239, 761)
        raster.fill_rect(1220, 700, 1251, 749, MADAGASCAR);

        raster
    }

    fn geocoder(vote: VotePolicy) -> Geocoder {
        let config = Config::default().with_vote(vote);
        Geocoder::with_provider(StaticProvider::new(world(), table()), &config)
    }

    #[test]
    fn test_country_name() {
        let geo = geocoder(VotePolicy::Majority);
        assert_eq!(geo.country(50.0, 10.0).unwrap().as_deref(), Some("Germany"));
    }

    #[test]
    fn test_country_qid() {
        let geo = geocoder(VotePolicy::Majority);
        assert_eq!(geo.country_qid(50.0, 10.0).unwrap().as_deref(), Some("183"));
        assert_eq!(
            geo.resolve_country(50.0, 10.0, Answer::NumericId).unwrap().as_deref(),
            Some("183")
        );
    }

    #[test]
    fn test_unmapped_pixel_resolves_to_neighbour() {
        for vote in [VotePolicy::Majority, VotePolicy::FirstSeen] {
            let geo = geocoder(vote);
            assert_eq!(geo.country(-23.7, 39.8).unwrap().as_deref(), Some("France"));
        }
    }

    #[test]
    fn test_open_sea_resolves_to_nearest_coast() {
        for vote in [VotePolicy::Majority, VotePolicy::FirstSeen] {
            let geo = geocoder(vote);
            assert_eq!(geo.country(-31.0, 45.0).unwrap().as_deref(), Some("Madagascar"));
        }
    }

    #[test]
    fn test_out_of_band_is_unresolved() {
        let geo = geocoder(VotePolicy::Majority);
        for (lat, lon) in [(-60.0, 0.0), (85.0, 0.0), (0.0, 181.0), (0.0, -181.0), (f64::NAN, 0.0)] {
            assert_eq!(geo.country(lat, lon).unwrap(), None, "({}, {})", lat, lon);
        }
    }

    #[test]
    fn test_out_of_band_skips_resource_acquisition() {
        let config = Config::default().with_resource_dir("/nonexistent");
        let geo = Geocoder::new(&config);
        assert_eq!(geo.country(-89.0, 0.0).unwrap(), None);
        assert!(matches!(geo.country(0.0, 0.0), Err(ResolveError::Resource(ResourceError::Io { .. }))));
    }

    #[test]
    fn test_band_follows_calibration() {
        // Whole globe mapped as one country on a small raster
        let calibration = Calibration {
            width: 36,
            height: 18,
            greenwich_x: 18,
            equator_y: 9,
            min_lat: -90.0,
            max_lat: 90.0,
        };
        let raster = GrayRaster::filled(36, 18, GERMANY);
        let config = Config::default().with_calibration(calibration);
        let geo = Geocoder::with_provider(StaticProvider::new(raster, table()), &config);

        assert_eq!(geo.country(-70.0, 0.0).unwrap().as_deref(), Some("Germany"));
        assert_eq!(geo.country(89.0, 170.0).unwrap().as_deref(), Some("Germany"));
        assert_eq!(geo.country(-90.5, 0.0).unwrap(), None);
        let many = geo.resolve_many(&[(-70.0, 0.0), (0.0, 200.0)]).unwrap();
        assert!(many[0].is_some());
        assert!(many[1].is_none());
    }

    #[test]
    fn test_band_edges_resolve() {
        let geo = geocoder(VotePolicy::Majority);
        for (lat, lon) in [(MAX_LATITUDE, 180.0), (MIN_LATITUDE, -180.0), (MAX_LATITUDE, 0.0)] {
            assert!(geo.country(lat, lon).unwrap().is_some(), "({}, {})", lat, lon);
        }
    }

    #[test]
    fn test_idempotent() {
        let geo = geocoder(VotePolicy::Majority);
        for (lat, lon) in [(50.0, 10.0), (-23.7, 39.8), (-31.0, 45.0), (12.3, -150.0)] {
            assert_eq!(geo.resolve(lat, lon).unwrap(), geo.resolve(lat, lon).unwrap());
        }
    }

    #[test]
    fn test_name_and_id_agree() {
        let geo = geocoder(VotePolicy::Majority);
        let record = geo.resolve(-31.0, 45.0).unwrap().unwrap();
        assert_eq!(geo.country(-31.0, 45.0).unwrap(), Some(record.name));
        assert_eq!(geo.country_qid(-31.0, 45.0).unwrap(), Some(record.id));
    }

    #[test]
    fn test_dimension_mismatch() {
        let config = Config::default();
        let geo = Geocoder::with_provider(StaticProvider::new(GrayRaster::filled(10, 10, GERMANY), table()), &config);
        let err = geo.country(50.0, 10.0).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Resource(ResourceError::DimensionMismatch { actual_width: 10, .. })
        ));
    }

    #[test]
    fn test_resolve_many_keeps_order() {
        let geo = geocoder(VotePolicy::Majority);
        let coords = [(50.0, 10.0), (-89.0, 0.0), (-31.0, 45.0), (-23.7, 39.8)];
        let names: Vec<Option<String>> = geo
            .resolve_many(&coords)
            .unwrap()
            .into_iter()
            .map(|r| r.map(|r| r.name))
            .collect();
        assert_eq!(
            names,
            vec![
                Some("Germany".to_string()),
                None,
                Some("Madagascar".to_string()),
                Some("France".to_string()),
            ]
        );
    }

    #[test]
    fn test_geocoder_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Geocoder>();
    }
}
