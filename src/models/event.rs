use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ride::{Ride, RideStatus};

/// Published after every successful lifecycle operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideEvent {
    pub ride_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub previous_status: RideStatus,
    pub status: RideStatus,
    pub fare: f64,
    pub at: DateTime<Utc>,
}

impl RideEvent {
    pub fn from_ride(ride: &Ride, previous_status: RideStatus) -> Self {
        Self {
            ride_id: ride.id(),
            driver_id: ride.driver_id(),
            previous_status,
            status: ride.status(),
            fare: ride.fare(),
            at: Utc::now(),
        }
    }
}
