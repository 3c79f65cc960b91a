// Traffic record - the unit of output, and the assembler that builds it
use crate::domain::city::{City, CityCatalog};
use crate::domain::error::GeneratorError;
use crate::domain::location::{Location, LocationSampler};
use crate::domain::traffic::{HourOfDay, TrafficObservation, TrafficPatternEngine};
use crate::domain::weather::{WeatherObservation, WeatherSampler};
use chrono::{Local, NaiveDateTime, Timelike};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

pub const RECORD_SOURCE: &str = "synthetic_generator";
pub const RECORD_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordMetadata {
    pub source: String,
    pub version: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficRecord {
    pub timestamp: String,
    pub location: Location,
    #[serde(rename = "traffic_data")]
    pub traffic: TrafficObservation,
    pub weather: WeatherObservation,
    pub metadata: RecordMetadata,
}

/// ISO-8601 without offset, microseconds only when non-zero.
pub fn iso_format(time: &NaiveDateTime) -> String {
    if time.nanosecond() == 0 {
        time.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        time.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Record timestamp: the naive base time with a literal `Z` appended.
///
/// No timezone conversion happens here, the suffix is purely textual.
pub fn record_timestamp(base_time: &NaiveDateTime) -> String {
    format!("{}Z", iso_format(base_time))
}

#[derive(Debug, Clone)]
pub struct RecordAssembler {
    catalog: Arc<CityCatalog>,
    location: LocationSampler,
    traffic: TrafficPatternEngine,
    weather: WeatherSampler,
}

impl RecordAssembler {
    pub fn new(
        catalog: Arc<CityCatalog>,
        location: LocationSampler,
        traffic: TrafficPatternEngine,
    ) -> Self {
        Self {
            catalog,
            location,
            traffic,
            weather: WeatherSampler,
        }
    }

    pub fn assemble<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        base_time: NaiveDateTime,
        city: &City,
    ) -> TrafficRecord {
        // chrono hours are always 0-23
        let hour = HourOfDay::new(base_time.hour()).unwrap_or(HourOfDay::MIDNIGHT);

        let location = self.location.sample(rng, city);
        let traffic = self.traffic.sample(rng, hour, city.pattern);
        let weather = self.weather.sample(rng);

        TrafficRecord {
            timestamp: record_timestamp(&base_time),
            location,
            traffic,
            weather,
            metadata: RecordMetadata {
                source: RECORD_SOURCE.to_string(),
                version: RECORD_VERSION.to_string(),
                generated_at: iso_format(&Local::now().naive_local()),
            },
        }
    }

    /// Assemble a record for a uniformly chosen city.
    pub fn assemble_random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        base_time: NaiveDateTime,
    ) -> TrafficRecord {
        let city = self.catalog.choose(rng);
        self.assemble(rng, base_time, city)
    }

    pub fn assemble_for<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        base_time: NaiveDateTime,
        city_name: &str,
    ) -> Result<TrafficRecord, GeneratorError> {
        let city = self.catalog.get(city_name)?;
        Ok(self.assemble(rng, base_time, city))
    }
}
