use std::fmt;
use std::str::FromStr;

use crate::error::TableError;

/// A country as listed in the intensity table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryRecord {
    /// English name, e.g. "Germany"
    pub name: String,
    /// Numeric part of the Wikidata QID, e.g. "183" for Q183
    pub id: String,
}

impl CountryRecord {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// Wikidata entity URI, e.g. `http://www.wikidata.org/entity/Q183`
    pub fn wikidata_uri(&self) -> String {
        format!("http://www.wikidata.org/entity/Q{}", self.id)
    }
}

impl fmt::Display for CountryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Q{})", self.name, self.id)
    }
}

/// Mapping from raster intensity (0-255) to the country drawn in that shade.
/// Intensities without an entry are sea, borders or unmapped land.
#[derive(Clone)]
pub struct CountryTable {
    records: Vec<Option<CountryRecord>>,
}

impl CountryTable {
    pub fn new() -> Self {
        Self {
            records: vec![None; 256],
        }
    }

    /// Build from (intensity, record) pairs; later pairs override earlier ones
    pub fn from_records(records: impl IntoIterator<Item = (u8, CountryRecord)>) -> Self {
        let mut table = Self::new();
        for (shade, record) in records {
            table.insert(shade, record);
        }
        table
    }

    /// Set the country for an intensity, returning the previous one
    pub fn insert(&mut self, shade: u8, record: CountryRecord) -> Option<CountryRecord> {
        self.records[shade as usize].replace(record)
    }

    /// Country drawn in the given shade, if any
    #[inline(always)]
    pub fn get(&self, shade: u8) -> Option<&CountryRecord> {
        self.records[shade as usize].as_ref()
    }

    /// Number of mapped intensities
    pub fn len(&self) -> usize {
        self.records.iter().filter(|r| r.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.iter().all(|r| r.is_none())
    }

    /// Mapped (intensity, record) pairs in intensity order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &CountryRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(shade, r)| r.as_ref().map(|r| (shade as u8, r)))
    }
}

impl Default for CountryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CountryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Parses `intensity,name,id` rows. No header; blank lines are skipped and a
/// duplicated intensity keeps its last row. Any malformed row fails the whole
/// table rather than yielding a partial one.
impl FromStr for CountryTable {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut table = Self::new();

        for (idx, raw) in s.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }

            let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
            if parts.len() < 3 {
                return Err(TableError::MissingColumns {
                    line,
                    found: raw.to_string(),
                });
            }

            let shade: u8 = parts[0]
                .parse()
                .map_err(|_| TableError::InvalidIntensity {
                    line,
                    value: parts[0].to_string(),
                })?;

            if parts[1].is_empty() || parts[2].is_empty() {
                return Err(TableError::EmptyField { line });
            }

            table.insert(shade, CountryRecord::new(parts[1], parts[2]));
        }

        Ok(table)
    }
}
