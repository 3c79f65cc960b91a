// Mapper from the TOML catalog file to domain cities
use crate::domain::city::{City, CityCatalog, CoordinateRange, PatternClass};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../config/cities.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default = "default_country")]
    default_country: String,
    #[serde(default)]
    cities: Vec<CityEntry>,
}

#[derive(Debug, Deserialize)]
struct CityEntry {
    name: String,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
    streets: Vec<String>,
    #[serde(default = "default_pattern")]
    traffic_pattern: PatternClass,
    country: Option<String>,
}

fn default_country() -> String {
    "USA".to_string()
}

fn default_pattern() -> PatternClass {
    PatternClass::Other
}

/// The catalog shipped with the generator.
pub fn builtin_catalog() -> anyhow::Result<CityCatalog> {
    parse_catalog(BUILTIN_CATALOG).context("built-in city catalog is invalid")
}

pub fn load_catalog(path: &Path) -> anyhow::Result<CityCatalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read city catalog {}", path.display()))?;
    parse_catalog(&text).with_context(|| format!("invalid city catalog {}", path.display()))
}

pub fn parse_catalog(text: &str) -> anyhow::Result<CityCatalog> {
    let file: CatalogFile = toml::from_str(text)?;
    let default_country = file.default_country;

    let cities = file
        .cities
        .into_iter()
        .map(|entry| entry_to_city(entry, &default_country))
        .collect();

    Ok(CityCatalog::new(cities)?)
}

fn entry_to_city(entry: CityEntry, default_country: &str) -> City {
    City {
        name: entry.name,
        latitude: CoordinateRange::new(entry.lat_range.0, entry.lat_range.1),
        longitude: CoordinateRange::new(entry.lon_range.0, entry.lon_range.1),
        streets: entry.streets,
        pattern: entry.traffic_pattern,
        country: entry
            .country
            .unwrap_or_else(|| default_country.to_string()),
    }
}
