use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// A known (country, latitude, longitude) triple used to check the map
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Parse a validation table.
///
/// The first line is a header. Columns are `intensity,country,latitude,longitude`;
/// rows with an empty intensity are countries not drawn on the map yet and are skipped.
pub fn parse_samples(content: &str) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();

    for (idx, line) in content.lines().enumerate().skip(1) {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 2 || parts[0].is_empty() {
            continue;
        }
        if parts.len() < 4 {
            bail!("line {}: expected 4 columns, found {:?}", idx + 1, line);
        }

        let lat = parts[2]
            .parse()
            .with_context(|| format!("line {}: invalid latitude {:?}", idx + 1, parts[2]))?;
        let lon = parts[3]
            .parse()
            .with_context(|| format!("line {}: invalid longitude {:?}", idx + 1, parts[3]))?;

        samples.push(Sample {
            country: parts[1].to_string(),
            lat,
            lon,
        });
    }

    Ok(samples)
}

/// Load a validation table from disk
pub fn load_samples(path: &Path) -> Result<Vec<Sample>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading validation table {}", path.display()))?;
    parse_samples(&content)
}
