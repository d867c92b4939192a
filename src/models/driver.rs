use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::Location;

pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Bike,
    Sedan,
    Suv,
    Auto,
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VehicleType::Bike => "BIKE",
            VehicleType::Sedan => "SEDAN",
            VehicleType::Suv => "SUV",
            VehicleType::Auto => "AUTO",
        };
        f.write_str(label)
    }
}

/// A driver record.
///
/// Availability and the current ride are only changed by the lifecycle
/// operations on [`crate::models::ride::Ride`]; location and rating by the
/// dispatch service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub vehicle_type: VehicleType,
    pub(crate) location: Location,
    pub(crate) available: bool,
    pub(crate) rating: f64,
    pub(crate) current_ride: Option<Uuid>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Driver {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        location: Location,
        vehicle_type: VehicleType,
        rating: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: phone.into(),
            vehicle_type,
            location,
            available: true,
            rating: clamp_rating(rating),
            current_ride: None,
            updated_at: Utc::now(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// The ride this driver is currently bound to, if any.
    pub fn current_ride(&self) -> Option<Uuid> {
        self.current_ride
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn engage(&mut self, ride_id: Uuid) {
        self.available = false;
        self.current_ride = Some(ride_id);
        self.updated_at = Utc::now();
    }

    pub(crate) fn release(&mut self) {
        self.available = true;
        self.current_ride = None;
        self.updated_at = Utc::now();
    }

    pub(crate) fn move_to(&mut self, location: Location) {
        self.location = location;
        self.updated_at = Utc::now();
    }

    pub(crate) fn rate(&mut self, rating: f64) {
        self.rating = clamp_rating(rating);
        self.updated_at = Utc::now();
    }
}

fn clamp_rating(rating: f64) -> f64 {
    rating.clamp(0.0, MAX_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> Driver {
        Driver::new(
            "Alice",
            "111-222",
            Location::new("City Center", 0.0, 0.0),
            VehicleType::Sedan,
            4.9,
        )
    }

    #[test]
    fn new_driver_is_available_without_ride() {
        let driver = driver();
        assert!(driver.is_available());
        assert!(driver.current_ride().is_none());
    }

    #[test]
    fn engage_and_release_track_current_ride() {
        let mut driver = driver();
        let ride_id = Uuid::new_v4();

        driver.engage(ride_id);
        assert!(!driver.is_available());
        assert_eq!(driver.current_ride(), Some(ride_id));

        driver.release();
        assert!(driver.is_available());
        assert!(driver.current_ride().is_none());
    }

    #[test]
    fn rating_is_clamped() {
        let mut driver = driver();
        driver.rate(7.5);
        assert_eq!(driver.rating(), MAX_RATING);
        driver.rate(-1.0);
        assert_eq!(driver.rating(), 0.0);
    }

    #[test]
    fn vehicle_type_serializes_upper_case() {
        let json = serde_json::to_string(&VehicleType::Suv).unwrap();
        assert_eq!(json, "\"SUV\"");
        assert_eq!(VehicleType::Bike.to_string(), "BIKE");
    }
}
