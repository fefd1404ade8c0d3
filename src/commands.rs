use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use coords2country::data::{load_samples, Sample};
use coords2country::{Answer, CountryRecord, Geocoder};
use geojson::{Feature, GeoJson, Geometry, JsonObject, Value};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Country name or id on a single line
    #[default]
    Text,
    /// GeoJSON Point feature with the country as properties
    Geojson,
}

/// Resolve one coordinate and print the answer.
/// Returns false when the coordinate is outside the mapped band.
pub fn lookup(geocoder: &Geocoder, lat: f64, lon: f64, answer: Answer, format: OutputFormat) -> Result<bool> {
    let record = geocoder
        .resolve(lat, lon)
        .with_context(|| format!("resolving ({}, {})", lat, lon))?;

    let Some(record) = record else {
        println!("unresolved");
        return Ok(false);
    };

    match format {
        OutputFormat::Text => println!("{}", answer.select(&record)),
        OutputFormat::Geojson => println!("{}", to_geojson(lat, lon, &record)),
    }
    Ok(true)
}

/// Point feature at the coordinate carrying the country's name and ids
pub fn to_geojson(lat: f64, lon: f64, record: &CountryRecord) -> GeoJson {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), record.name.clone().into());
    properties.insert("qid".to_string(), record.id.clone().into());
    properties.insert("wikidata".to_string(), record.wikidata_uri().into());

    GeoJson::Feature(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// A validation sample that resolved to another country
#[derive(Debug, PartialEq)]
pub struct Mismatch {
    pub sample: Sample,
    pub actual: Option<String>,
}

/// Resolve every sample and collect those whose country differs
pub fn check_samples(geocoder: &Geocoder, samples: &[Sample]) -> Result<Vec<Mismatch>> {
    let coords: Vec<(f64, f64)> = samples.iter().map(|s| (s.lat, s.lon)).collect();
    let results = geocoder.resolve_many(&coords).context("resolving validation samples")?;

    Ok(samples
        .iter()
        .zip(results)
        .filter_map(|(sample, record)| {
            let actual = record.map(|r| r.name);
            (actual.as_deref() != Some(sample.country.as_str())).then(|| Mismatch {
                sample: sample.clone(),
                actual,
            })
        })
        .collect())
}

/// Check every sample of a validation table against the map.
/// Returns true when all samples match.
pub fn validate(geocoder: &Geocoder, path: &Path) -> Result<bool> {
    let samples = load_samples(path)?;
    info!(path = %path.display(), samples = samples.len(), "validating");

    let mismatches = check_samples(geocoder, &samples)?;
    for m in &mismatches {
        println!(
            "MISMATCH {} at ({}, {}): got {}",
            m.sample.country,
            m.sample.lat,
            m.sample.lon,
            m.actual.as_deref().unwrap_or("unresolved")
        );
    }
    println!("{}/{} samples match", samples.len() - mismatches.len(), samples.len());

    Ok(mismatches.is_empty())
}
