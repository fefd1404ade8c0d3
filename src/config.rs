use std::path::{Path, PathBuf};

use crate::data::{RASTER_FILE, TABLE_FILE};
use crate::map::{Calibration, VotePolicy};

/// Default directory holding the raster and intensity table
pub const DEFAULT_RESOURCE_DIR: &str = "resources";

/// How long loaded resources are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Read raster and table again for every lookup, release them afterwards
    #[default]
    Reload,
    /// Load once on first lookup and keep them for the geocoder's lifetime
    Retain,
}

/// Geocoder settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the raster and intensity table
    pub resource_dir: PathBuf,
    /// Raster file name, relative to `resource_dir` unless absolute
    pub raster_file: PathBuf,
    /// Intensity table file name, relative to `resource_dir` unless absolute
    pub table_file: PathBuf,
    pub cache: CachePolicy,
    pub vote: VotePolicy,
    /// Ring search radius bound; `None` covers the whole raster
    pub max_search_radius: Option<u32>,
    pub calibration: Calibration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from(DEFAULT_RESOURCE_DIR),
            raster_file: PathBuf::from(RASTER_FILE),
            table_file: PathBuf::from(TABLE_FILE),
            cache: CachePolicy::default(),
            vote: VotePolicy::default(),
            max_search_radius: None,
            calibration: Calibration::REFERENCE,
        }
    }
}

impl Config {
    /// Read resources from `dir`
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = dir.into();
        self
    }

    pub fn with_raster_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.raster_file = file.into();
        self
    }

    pub fn with_table_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.table_file = file.into();
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_vote(mut self, vote: VotePolicy) -> Self {
        self.vote = vote;
        self
    }

    pub fn with_max_search_radius(mut self, radius: Option<u32>) -> Self {
        self.max_search_radius = radius;
        self
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Full path of the raster
    pub fn raster_path(&self) -> PathBuf {
        resolve_path(&self.resource_dir, &self.raster_file)
    }

    /// Full path of the intensity table
    pub fn table_path(&self) -> PathBuf {
        resolve_path(&self.resource_dir, &self.table_file)
    }
}

fn resolve_path(dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        dir.join(file)
    }
}
