// Traffic pattern engine - hour buckets, pattern scaling, congestion and vehicle mix
use crate::domain::city::PatternClass;
use crate::domain::error::GeneratorError;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::ops::RangeInclusive;

const VEHICLE_NOISE: RangeInclusive<i64> = -20..=20;
const SPEED_NOISE: RangeInclusive<i64> = -5..=5;

/// Hour of day, 0-23.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourOfDay(u32);

impl HourOfDay {
    pub const MIDNIGHT: HourOfDay = HourOfDay(0);

    pub fn new(hour: u32) -> Result<Self, GeneratorError> {
        if hour > 23 {
            return Err(GeneratorError::InvalidHour(hour));
        }
        Ok(Self(hour))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourBucket {
    Rush,
    Business,
    Lunch,
    Night,
}

/// Base ranges for one hour bucket.
#[derive(Debug, Clone)]
pub struct BucketProfile {
    pub vehicles: RangeInclusive<i64>,
    pub speed: RangeInclusive<i64>,
    pub congestion_probability: f64,
}

impl HourBucket {
    /// Buckets are matched by explicit membership, not by a formula.
    pub fn for_hour(hour: HourOfDay) -> Self {
        match hour.get() {
            7 | 8 | 17 | 18 => Self::Rush,
            9 | 10 | 11 | 14 | 15 | 16 => Self::Business,
            12 | 13 => Self::Lunch,
            _ => Self::Night,
        }
    }

    pub fn profile(self) -> BucketProfile {
        match self {
            Self::Rush => BucketProfile {
                vehicles: 120..=200,
                speed: 15..=25,
                congestion_probability: 0.8,
            },
            Self::Business => BucketProfile {
                vehicles: 80..=150,
                speed: 25..=35,
                congestion_probability: 0.4,
            },
            Self::Lunch => BucketProfile {
                vehicles: 100..=180,
                speed: 20..=30,
                congestion_probability: 0.6,
            },
            Self::Night => BucketProfile {
                vehicles: 20..=80,
                speed: 35..=50,
                congestion_probability: 0.1,
            },
        }
    }
}

impl PatternClass {
    /// Multipliers applied to (vehicle count, speed) bases.
    pub fn scaling(self) -> Option<(f64, f64)> {
        match self {
            Self::Urban => Some((1.2, 0.9)),
            Self::Suburban => Some((0.8, 1.1)),
            Self::Coastal | Self::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
    Severe,
}

impl CongestionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleClass {
    Car,
    Truck,
    Bus,
    Motorcycle,
}

impl VehicleClass {
    /// Allocation order. Later classes only draw from what is left.
    pub const CANONICAL_ORDER: [VehicleClass; 4] =
        [Self::Car, Self::Truck, Self::Bus, Self::Motorcycle];

    pub fn cap_range(self) -> RangeInclusive<i64> {
        match self {
            Self::Car => 60..=85,
            Self::Truck => 10..=25,
            Self::Bus => 5..=15,
            Self::Motorcycle => 2..=8,
        }
    }
}

/// Per-class vehicle counts. Field order is the wire order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VehicleTypeCounts {
    pub car: i64,
    pub truck: i64,
    pub bus: i64,
    pub motorcycle: i64,
}

impl VehicleTypeCounts {
    #[cfg(test)]
    pub fn get(&self, class: VehicleClass) -> i64 {
        match class {
            VehicleClass::Car => self.car,
            VehicleClass::Truck => self.truck,
            VehicleClass::Bus => self.bus,
            VehicleClass::Motorcycle => self.motorcycle,
        }
    }

    fn set(&mut self, class: VehicleClass, count: i64) {
        match class {
            VehicleClass::Car => self.car = count,
            VehicleClass::Truck => self.truck = count,
            VehicleClass::Bus => self.bus = count,
            VehicleClass::Motorcycle => self.motorcycle = count,
        }
    }

    #[cfg(test)]
    pub fn total(&self) -> i64 {
        self.car + self.truck + self.bus + self.motorcycle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficObservation {
    pub vehicle_count: i64,
    pub average_speed: i64,
    pub congestion_level: CongestionLevel,
    pub vehicle_types: VehicleTypeCounts,
}

/// Turns an hour and a pattern class into a traffic observation.
///
/// Noise is not clamped by default: a night-hour suburban base can end up
/// with a negative vehicle count or speed. When the count is negative every
/// vehicle class gets 0, so the per-class sum only matches non-negative counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrafficPatternEngine {
    clamp_negative: bool,
}

impl TrafficPatternEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp vehicle count and speed at zero after noise.
    pub fn with_clamping(mut self, clamp_negative: bool) -> Self {
        self.clamp_negative = clamp_negative;
        self
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        hour: HourOfDay,
        pattern: PatternClass,
    ) -> TrafficObservation {
        let profile = HourBucket::for_hour(hour).profile();

        let mut base_vehicles = rng.random_range(profile.vehicles.clone());
        let mut base_speed = rng.random_range(profile.speed.clone());

        if let Some((vehicle_factor, speed_factor)) = pattern.scaling() {
            base_vehicles = (base_vehicles as f64 * vehicle_factor) as i64;
            base_speed = (base_speed as f64 * speed_factor) as i64;
        }

        let mut vehicle_count = base_vehicles + rng.random_range(VEHICLE_NOISE);
        let mut average_speed = base_speed + rng.random_range(SPEED_NOISE);

        if self.clamp_negative {
            vehicle_count = vehicle_count.max(0);
            average_speed = average_speed.max(0);
        }

        let congestion_level =
            decide_congestion(rng, profile.congestion_probability, vehicle_count);
        let vehicle_types = allocate_vehicle_types(rng, vehicle_count);

        TrafficObservation {
            vehicle_count,
            average_speed,
            congestion_level,
            vehicle_types,
        }
    }
}

/// A single draw against `probability` picks a count-based tier, otherwise low.
pub fn decide_congestion<R: Rng + ?Sized>(
    rng: &mut R,
    probability: f64,
    vehicle_count: i64,
) -> CongestionLevel {
    let draw: f64 = rng.random();
    if draw >= probability {
        return CongestionLevel::Low;
    }

    let tier: &[CongestionLevel] = if vehicle_count > 150 {
        &[CongestionLevel::High, CongestionLevel::Severe]
    } else if vehicle_count > 100 {
        &[CongestionLevel::Medium, CongestionLevel::High]
    } else {
        &[CongestionLevel::Low, CongestionLevel::Medium]
    };

    tier.choose(rng).copied().unwrap_or(CongestionLevel::Low)
}

/// Split `vehicle_count` across vehicle classes in canonical order.
///
/// Each class draws a cap from its range, clamps it to what remains and takes a
/// uniform share of it. Whatever is left after the last class goes to cars.
pub fn allocate_vehicle_types<R: Rng + ?Sized>(
    rng: &mut R,
    vehicle_count: i64,
) -> VehicleTypeCounts {
    let mut counts = VehicleTypeCounts::default();
    let mut remaining = vehicle_count;

    for class in VehicleClass::CANONICAL_ORDER {
        if remaining <= 0 {
            break;
        }

        let cap = rng.random_range(class.cap_range()).min(remaining);
        let count = rng.random_range(0..=cap);
        counts.set(class, count);
        remaining -= count;
    }

    if remaining > 0 {
        counts.car += remaining;
    }

    counts
}
