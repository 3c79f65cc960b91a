// City reference data - immutable catalog built once at startup
use crate::domain::error::GeneratorError;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use std::collections::HashSet;

/// Traffic pattern class controlling how the hour-bucket bases are scaled.
///
/// Names that are not recognized map to [`PatternClass::Other`] instead of
/// failing, so a catalog with a new class still loads and just gets no scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternClass {
    Urban,
    Suburban,
    Coastal,
    #[serde(other)]
    Other,
}

/// Inclusive coordinate range along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateRange {
    pub min: f64,
    pub max: f64,
}

impl CoordinateRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[cfg(test)]
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.min - tolerance && value <= self.max + tolerance
    }
}

#[derive(Debug, Clone)]
pub struct City {
    pub name: String,
    pub latitude: CoordinateRange,
    pub longitude: CoordinateRange,
    pub streets: Vec<String>,
    pub pattern: PatternClass,
    pub country: String,
}

impl City {
    fn validate(&self) -> Result<(), GeneratorError> {
        if self.name.trim().is_empty() {
            return Err(GeneratorError::invalid_config("city name must not be empty"));
        }
        if self.streets.is_empty() {
            return Err(GeneratorError::invalid_config(format!(
                "city {} has no streets",
                self.name
            )));
        }
        for (axis, range) in [("latitude", self.latitude), ("longitude", self.longitude)] {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(GeneratorError::invalid_config(format!(
                    "city {} has an invalid {} range ({}, {})",
                    self.name, axis, range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

/// Ordered, immutable set of cities.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    cities: Vec<City>,
}

impl CityCatalog {
    pub fn new(cities: Vec<City>) -> Result<Self, GeneratorError> {
        if cities.is_empty() {
            return Err(GeneratorError::invalid_config(
                "city catalog must contain at least one city",
            ));
        }

        let mut seen = HashSet::new();
        for city in &cities {
            city.validate()?;
            if !seen.insert(city.name.as_str()) {
                return Err(GeneratorError::invalid_config(format!(
                    "duplicate city in catalog: {}",
                    city.name
                )));
            }
        }

        Ok(Self { cities })
    }

    /// City names in catalog order
    pub fn list_cities(&self) -> Vec<&str> {
        self.cities.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Result<&City, GeneratorError> {
        self.cities
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| GeneratorError::UnknownCity(name.to_string()))
    }

    /// Pick a city uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &City {
        // The constructor guarantees at least one city.
        self.cities.choose(rng).unwrap_or(&self.cities[0])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    pub(crate) fn city(name: &str, pattern: PatternClass) -> City {
        City {
            name: name.to_string(),
            latitude: CoordinateRange::new(40.6, 40.9),
            longitude: CoordinateRange::new(-74.1, -73.8),
            streets: vec!["Broadway".to_string(), "5th Avenue".to_string()],
            pattern,
            country: "USA".to_string(),
        }
    }

    #[test]
    fn test_list_cities_keeps_order() {
        let catalog = CityCatalog::new(vec![
            city("Seattle", PatternClass::Urban),
            city("Miami", PatternClass::Coastal),
            city("Chicago", PatternClass::Urban),
        ])
        .unwrap();

        assert_eq!(catalog.list_cities(), vec!["Seattle", "Miami", "Chicago"]);
        assert_eq!(catalog.list_cities().len(), 3);
    }

    #[test]
    fn test_get_unknown_city() {
        let catalog = CityCatalog::new(vec![city("Miami", PatternClass::Coastal)]).unwrap();

        assert_eq!(catalog.get("Miami").unwrap().pattern, PatternClass::Coastal);
        match catalog.get("Atlantis") {
            Err(GeneratorError::UnknownCity(name)) => assert_eq!(name, "Atlantis"),
            other => panic!("expected UnknownCity, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_invalid_catalogs() {
        assert!(CityCatalog::new(vec![]).is_err());

        let duplicate = vec![
            city("Miami", PatternClass::Coastal),
            city("Miami", PatternClass::Urban),
        ];
        assert!(CityCatalog::new(duplicate).is_err());

        let mut no_streets = city("Miami", PatternClass::Coastal);
        no_streets.streets.clear();
        assert!(CityCatalog::new(vec![no_streets]).is_err());

        let mut inverted = city("Miami", PatternClass::Coastal);
        inverted.latitude = CoordinateRange::new(25.9, 25.6);
        assert!(matches!(
            CityCatalog::new(vec![inverted]),
            Err(GeneratorError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_choose_covers_catalog() {
        let catalog = CityCatalog::new(vec![
            city("Seattle", PatternClass::Urban),
            city("Miami", PatternClass::Coastal),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let picked: HashSet<String> = (0..200)
            .map(|_| catalog.choose(&mut rng).name.clone())
            .collect();

        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_unknown_pattern_class_is_other() {
        #[derive(Deserialize)]
        struct Wrapper {
            pattern: PatternClass,
        }

        let parsed: Wrapper = toml::from_str("pattern = \"mountain\"").unwrap();
        assert_eq!(parsed.pattern, PatternClass::Other);

        let parsed: Wrapper = toml::from_str("pattern = \"suburban\"").unwrap();
        assert_eq!(parsed.pattern, PatternClass::Suburban);
    }
}
