use serde::{Deserialize, Serialize};

use crate::models::location::Location;

pub const BASE_FARE: f64 = 50.0;
pub const PER_UNIT_RATE: f64 = 10.0;

/// Flat base plus a per-distance-unit rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareSchedule {
    pub base_fare: f64,
    pub per_unit_rate: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            base_fare: BASE_FARE,
            per_unit_rate: PER_UNIT_RATE,
        }
    }
}

impl FareSchedule {
    pub fn fare_for_distance(&self, distance: f64) -> f64 {
        self.base_fare + self.per_unit_rate * distance.max(0.0)
    }

    pub fn fare_between(&self, pickup: &Location, drop: &Location) -> f64 {
        self.fare_for_distance(pickup.distance_to(drop))
    }
}
