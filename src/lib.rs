//! Offline lookup of the country containing a latitude/longitude.
//!
//! Countries are drawn as shades of gray on an equirectangular world raster.
//! A coordinate is projected onto that raster and the shade under it is looked
//! up in an intensity table. Sea, borders and unmapped shades fall back to a
//! search of growing square rings around the pixel; the first ring containing
//! any country decides the answer by majority.
//!
//! ```no_run
//! use coords2country::Geocoder;
//!
//! let geocoder = Geocoder::from_dir("resources");
//! assert_eq!(geocoder.country(50.1, 10.2)?.as_deref(), Some("Germany"));
//! assert_eq!(geocoder.country_qid(50.1, 10.2)?.as_deref(), Some("183"));
//! # Ok::<(), coords2country::ResolveError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod geocoder;
pub mod map;

pub use config::{CachePolicy, Config};
pub use data::{CountryRecord, CountryTable, GrayRaster, IntensityGrid, MapResources, ResourceProvider};
pub use error::{ResolveError, ResourceError, TableError};
pub use geocoder::{Answer, Geocoder};
pub use map::{Calibration, Resolver, VotePolicy};
