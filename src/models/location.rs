use serde::{Deserialize, Serialize};

use crate::geo::euclidean_distance;

/// A named point on a flat coordinate plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn distance_to(&self, other: &Location) -> f64 {
        euclidean_distance(self, other)
    }
}
