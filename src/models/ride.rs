use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::driver::VehicleType;
use crate::models::location::Location;
use crate::models::rider::Rider;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    Requested,
    Confirmed,
    DriverOnTheWay,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub const ALL: [RideStatus; 6] = [
        RideStatus::Requested,
        RideStatus::Confirmed,
        RideStatus::DriverOnTheWay,
        RideStatus::InProgress,
        RideStatus::Completed,
        RideStatus::Cancelled,
    ];

    /// COMPLETED and CANCELLED are final.
    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }

    /// Statuses during which the bound driver is unavailable.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            RideStatus::Confirmed | RideStatus::DriverOnTheWay | RideStatus::InProgress
        )
    }

    /// Forward edges of the strict lifecycle.
    pub fn is_forward_step(self, next: RideStatus) -> bool {
        use RideStatus::*;

        match (self, next) {
            (Requested, Confirmed)
            | (Confirmed, DriverOnTheWay)
            | (DriverOnTheWay, InProgress)
            | (InProgress, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RideStatus::Requested => "REQUESTED",
            RideStatus::Confirmed => "CONFIRMED",
            RideStatus::DriverOnTheWay => "DRIVER_ON_THE_WAY",
            RideStatus::InProgress => "IN_PROGRESS",
            RideStatus::Completed => "COMPLETED",
            RideStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strictly `update_status` gates transitions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Only forward single steps, plus cancellation from any live status.
    #[default]
    Strict,
    /// Any status may be set while the ride is not finished.
    Permissive,
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TransitionPolicy::Strict),
            "permissive" => Ok(TransitionPolicy::Permissive),
            other => Err(format!(
                "unknown transition policy: {other}, expected strict/permissive"
            )),
        }
    }
}

/// A single ride request tracked through its lifecycle.
///
/// State only changes through the lifecycle operations in
/// [`crate::engine::lifecycle`]; everything here is read access.
#[derive(Debug, Clone, Serialize)]
pub struct Ride {
    pub(crate) id: Uuid,
    pub(crate) rider_id: Uuid,
    pub(crate) pickup: Location,
    pub(crate) drop: Location,
    pub(crate) vehicle_type: VehicleType,
    pub(crate) driver_id: Option<Uuid>,
    pub(crate) status: RideStatus,
    pub(crate) fare: f64,
    pub(crate) policy: TransitionPolicy,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) settled_at: Option<DateTime<Utc>>,
}

impl Ride {
    pub fn new(
        rider: &Rider,
        pickup: Location,
        drop: Location,
        vehicle_type: VehicleType,
        policy: TransitionPolicy,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            rider_id: rider.id,
            pickup,
            drop,
            vehicle_type,
            driver_id: None,
            status: RideStatus::Requested,
            fare: 0.0,
            policy,
            created_at: now,
            updated_at: now,
            settled_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn rider_id(&self) -> Uuid {
        self.rider_id
    }

    pub fn pickup(&self) -> &Location {
        &self.pickup
    }

    pub fn drop_location(&self) -> &Location {
        &self.drop
    }

    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    pub fn driver_id(&self) -> Option<Uuid> {
        self.driver_id
    }

    pub fn status(&self) -> RideStatus {
        self.status
    }

    /// Zero until the ride has been completed.
    pub fn fare(&self) -> f64 {
        self.fare
    }

    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_finished_statuses_are_terminal() {
        let terminal: Vec<_> = RideStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![RideStatus::Completed, RideStatus::Cancelled]);
    }

    #[test]
    fn forward_steps_follow_the_lifecycle() {
        assert!(RideStatus::Requested.is_forward_step(RideStatus::Confirmed));
        assert!(RideStatus::Confirmed.is_forward_step(RideStatus::DriverOnTheWay));
        assert!(RideStatus::DriverOnTheWay.is_forward_step(RideStatus::InProgress));
        assert!(RideStatus::InProgress.is_forward_step(RideStatus::Completed));

        assert!(!RideStatus::Requested.is_forward_step(RideStatus::Completed));
        assert!(!RideStatus::Confirmed.is_forward_step(RideStatus::InProgress));
        assert!(!RideStatus::InProgress.is_forward_step(RideStatus::Confirmed));
    }

    #[test]
    fn cancellation_is_allowed_until_terminal() {
        assert!(RideStatus::Requested.is_forward_step(RideStatus::Cancelled));
        assert!(RideStatus::InProgress.is_forward_step(RideStatus::Cancelled));
        assert!(!RideStatus::Completed.is_forward_step(RideStatus::Cancelled));
        assert!(!RideStatus::Cancelled.is_forward_step(RideStatus::Cancelled));
    }

    #[test]
    fn status_renders_upper_snake_case() {
        assert_eq!(RideStatus::DriverOnTheWay.to_string(), "DRIVER_ON_THE_WAY");
        let json = serde_json::to_string(&RideStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!(
            "Permissive".parse::<TransitionPolicy>(),
            Ok(TransitionPolicy::Permissive)
        );
        assert_eq!(" strict ".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Strict));
        assert!("lenient".parse::<TransitionPolicy>().is_err());
    }
}
