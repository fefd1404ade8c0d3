use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::data::raster::GrayRaster;
use crate::data::table::CountryTable;
use crate::error::ResourceError;

/// Raster and intensity table needed for one resolution
#[derive(Clone, Debug)]
pub struct MapResources {
    pub raster: GrayRaster,
    pub table: CountryTable,
}

/// Supplies the raster and table for a resolution call.
///
/// Implementations decide how long the resources live: [`FileProvider`]
/// reads them fresh on every call, [`CachedProvider`] keeps the first load.
pub trait ResourceProvider: Send + Sync {
    fn acquire(&self) -> Result<Arc<MapResources>, ResourceError>;
}

/// Loads the raster and table from disk on every call.
/// Nothing outlives the call, keeping resident memory low between lookups.
#[derive(Debug, Clone)]
pub struct FileProvider {
    raster_path: PathBuf,
    table_path: PathBuf,
}

impl FileProvider {
    pub fn new(raster_path: impl Into<PathBuf>, table_path: impl Into<PathBuf>) -> Self {
        Self {
            raster_path: raster_path.into(),
            table_path: table_path.into(),
        }
    }

    pub fn raster_path(&self) -> &Path {
        &self.raster_path
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    /// Load both resources, failing on the first problem
    pub fn load(&self) -> Result<MapResources, ResourceError> {
        let raster = GrayRaster::open(&self.raster_path)?;
        let table = load_table(&self.table_path)?;
        Ok(MapResources { raster, table })
    }
}

impl ResourceProvider for FileProvider {
    fn acquire(&self) -> Result<Arc<MapResources>, ResourceError> {
        self.load().map(Arc::new)
    }
}

/// Read and parse an intensity table file
pub fn load_table(path: &Path) -> Result<CountryTable, ResourceError> {
    let content = fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table: CountryTable = content.parse().map_err(|source| ResourceError::Table {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), entries = table.len(), "loaded intensity table");
    Ok(table)
}

/// Wraps another provider and keeps its first successful load for all later calls.
/// A failed load is not cached, the next call retries.
pub struct CachedProvider<P> {
    inner: P,
    cell: OnceLock<Arc<MapResources>>,
}

impl<P: ResourceProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cell: OnceLock::new(),
        }
    }

    /// Whether resources have been loaded yet
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<P: ResourceProvider> ResourceProvider for CachedProvider<P> {
    fn acquire(&self) -> Result<Arc<MapResources>, ResourceError> {
        if let Some(resources) = self.cell.get() {
            return Ok(Arc::clone(resources));
        }

        let loaded = self.inner.acquire()?;
        // Another thread may have won the race; either copy is equivalent
        Ok(Arc::clone(self.cell.get_or_init(|| loaded)))
    }
}

/// Serves resources that are already in memory
#[derive(Debug, Clone)]
pub struct StaticProvider {
    resources: Arc<MapResources>,
}

impl StaticProvider {
    pub fn new(raster: GrayRaster, table: CountryTable) -> Self {
        Self {
            resources: Arc::new(MapResources { raster, table }),
        }
    }
}

impl ResourceProvider for StaticProvider {
    fn acquire(&self) -> Result<Arc<MapResources>, ResourceError> {
        Ok(Arc::clone(&self.resources))
    }
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for Box<P> {
    fn acquire(&self) -> Result<Arc<MapResources>, ResourceError> {
        (**self).acquire()
    }
}
