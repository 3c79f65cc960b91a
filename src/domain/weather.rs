// Weather model and sampler
use crate::domain::rounding::round_to;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conditions {
    Clear,
    Cloudy,
    Rainy,
    Foggy,
    Snowy,
}

impl Conditions {
    pub const ALL: [Conditions; 5] = [
        Self::Clear,
        Self::Cloudy,
        Self::Rainy,
        Self::Foggy,
        Self::Snowy,
    ];

    /// Temperature range in degrees Celsius for this condition
    pub fn temperature_range(self) -> (f64, f64) {
        match self {
            Self::Snowy => (-5.0, 5.0),
            Self::Rainy => (5.0, 25.0),
            _ => (10.0, 30.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherObservation {
    pub temperature: f64,
    pub conditions: Conditions,
    pub humidity: u8,
    pub wind_speed: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherSampler;

impl WeatherSampler {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> WeatherObservation {
        let conditions = *Conditions::ALL.choose(rng).unwrap_or(&Conditions::Clear);
        let (min, max) = conditions.temperature_range();
        let temperature = round_to(rng.random_range(min..=max), 1);

        WeatherObservation {
            temperature,
            conditions,
            humidity: rng.random_range(30..=90),
            wind_speed: rng.random_range(0..=25),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_temperature_follows_conditions() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = HashSet::new();

        for _ in 0..5_000 {
            let weather = WeatherSampler.sample(&mut rng);
            seen.insert(weather.conditions);

            let t = weather.temperature;
            match weather.conditions {
                Conditions::Snowy => assert!((-5.0..=5.0).contains(&t), "snowy {}", t),
                Conditions::Rainy => assert!((5.0..=25.0).contains(&t), "rainy {}", t),
                _ => assert!((10.0..=30.0).contains(&t), "{:?} {}", weather.conditions, t),
            }
            assert_eq!(round_to(t, 1), t);
            assert!((30..=90).contains(&weather.humidity));
            assert!(weather.wind_speed <= 25);
        }

        assert_eq!(seen.len(), Conditions::ALL.len());
    }

    #[test]
    fn test_serialized_shape() {
        let weather = WeatherObservation {
            temperature: 12.5,
            conditions: Conditions::Foggy,
            humidity: 70,
            wind_speed: 3,
        };

        let json = serde_json::to_value(&weather).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "temperature": 12.5,
                "conditions": "foggy",
                "humidity": 70,
                "wind_speed": 3
            })
        );
    }
}
