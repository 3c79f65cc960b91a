// Location model and sampler
use crate::domain::city::City;
use crate::domain::rounding::round_to;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

pub const COORDINATE_DIGITS: i32 = 6;
pub const DEFAULT_JITTER_DEGREES: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub street: String,
    pub city: String,
    pub country: String,
}

/// Draws a point, street and country for a city.
#[derive(Debug, Clone, Copy)]
pub struct LocationSampler {
    jitter_degrees: f64,
}

impl LocationSampler {
    /// `jitter_degrees` of 0 disables the micro-jitter pass.
    pub fn new(jitter_degrees: f64) -> Self {
        Self {
            jitter_degrees: jitter_degrees.abs(),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, city: &City) -> Location {
        let mut lat = uniform(rng, city.latitude.min, city.latitude.max);
        let mut lon = uniform(rng, city.longitude.min, city.longitude.max);

        // Applied on top of the primary draw, never instead of it
        if self.jitter_degrees > 0.0 {
            lat += uniform(rng, -self.jitter_degrees, self.jitter_degrees);
            lon += uniform(rng, -self.jitter_degrees, self.jitter_degrees);
        }

        let street = city
            .streets
            .choose(rng)
            .cloned()
            .unwrap_or_default();

        Location {
            lat: round_to(lat, COORDINATE_DIGITS),
            lon: round_to(lon, COORDINATE_DIGITS),
            street,
            city: city.name.clone(),
            country: city.country.clone(),
        }
    }
}

impl Default for LocationSampler {
    fn default() -> Self {
        Self::new(DEFAULT_JITTER_DEGREES)
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.random_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::city::PatternClass;
    use crate::domain::city::tests::city;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sample_without_jitter_stays_in_range() {
        let nyc = city("New York", PatternClass::Urban);
        let sampler = LocationSampler::new(0.0);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..1_000 {
            let location = sampler.sample(&mut rng, &nyc);
            assert!(nyc.latitude.contains(location.lat, 0.0), "lat {}", location.lat);
            assert!(nyc.longitude.contains(location.lon, 0.0), "lon {}", location.lon);
        }
    }

    #[test]
    fn test_sample_with_jitter_stays_in_tolerance() {
        let nyc = city("New York", PatternClass::Urban);
        let sampler = LocationSampler::default();
        let mut rng = StdRng::seed_from_u64(2);

        let mut outside_primary = 0;
        for _ in 0..2_000 {
            let location = sampler.sample(&mut rng, &nyc);
            assert!(nyc.latitude.contains(location.lat, 0.011));
            assert!(nyc.longitude.contains(location.lon, 0.011));
            if !nyc.latitude.contains(location.lat, 0.0) {
                outside_primary += 1;
            }
        }

        // Jitter near the edges pushes some points past the primary range
        assert!(outside_primary > 0);
    }

    #[test]
    fn test_coordinates_have_six_digits() {
        let nyc = city("New York", PatternClass::Urban);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let location = LocationSampler::default().sample(&mut rng, &nyc);
            assert_eq!(round_to(location.lat, COORDINATE_DIGITS), location.lat);
            assert_eq!(round_to(location.lon, COORDINATE_DIGITS), location.lon);
        }
    }

    #[test]
    fn test_street_and_country_come_from_city() {
        let mut tehran = city("Tehran", PatternClass::Urban);
        tehran.country = "Iran".to_string();
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..50 {
            let location = LocationSampler::default().sample(&mut rng, &tehran);
            assert!(tehran.streets.contains(&location.street));
            assert_eq!(location.city, "Tehran");
            assert_eq!(location.country, "Iran");
        }
    }
}
