mod provider;
mod raster;
mod samples;
mod table;

pub use provider::{load_table, CachedProvider, FileProvider, MapResources, ResourceProvider, StaticProvider};
pub use raster::{GrayRaster, IntensityGrid};
pub use samples::{load_samples, parse_samples, Sample};
pub use table::{CountryRecord, CountryTable};

/// File name of the country raster inside the resource directory
pub const RASTER_FILE: &str = "countries-8bitgray.png";
/// File name of the intensity table inside the resource directory
pub const TABLE_FILE: &str = "countries.csv";
