//! The sample scenario: one ride taken through its whole lifecycle, then a
//! second rider checking whether anyone is free.

use crate::engine::dispatch;
use crate::error::AppError;
use crate::models::driver::{Driver, VehicleType};
use crate::models::location::Location;
use crate::models::ride::RideStatus;
use crate::models::rider::Rider;
use crate::state::AppState;

pub fn run(state: &AppState) -> Result<Vec<String>, AppError> {
    let city_center = Location::new("City Center", 0.0, 0.0);
    let suburb = Location::new("Suburb", 5.0, 5.0);
    let remote_area = Location::new("Remote Area", 100.0, 100.0);

    let alice = dispatch::register_driver(
        state,
        Driver::new("Alice", "111-222", city_center.clone(), VehicleType::Sedan, 4.9),
    );
    dispatch::register_driver(
        state,
        Driver::new("Bob", "333-444", suburb.clone(), VehicleType::Suv, 4.7),
    );

    let charlie = dispatch::register_rider(
        state,
        Rider::new("Charlie", "555-666", city_center.clone()),
    );
    let dave = dispatch::register_rider(state, Rider::new("Dave", "777-888", remote_area));

    let ride = dispatch::create_ride(state, charlie.id, city_center, suburb, VehicleType::Sedan)?;
    dispatch::assign_driver(state, ride.id(), alice.id)?;
    dispatch::update_ride_status(state, ride.id(), RideStatus::DriverOnTheWay)?;
    dispatch::update_ride_status(state, ride.id(), RideStatus::InProgress)?;
    let ride = dispatch::complete_ride(state, ride.id())?;

    let mut lines = vec![
        format!("[Ride1] Status: {}", ride.status()),
        format!("[Ride1] Fare: {}", rupees(ride.fare())),
        format!(
            "[Simulation] Rider 2 requesting a ride in {}: Expected to fail",
            dave.location().name
        ),
    ];

    if dispatch::available_drivers(state, None).is_empty() {
        lines.push("No available drivers. Ride cannot be assigned.".to_string());
    } else {
        lines.push("Matching available driver...".to_string());
    }

    Ok(lines)
}

/// Always keeps a fractional part, e.g. `Rs.50.0`.
pub fn rupees(amount: f64) -> String {
    format!("Rs.{amount:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pricing::FareSchedule;
    use crate::models::ride::TransitionPolicy;

    fn state(policy: TransitionPolicy) -> AppState {
        AppState::new(16, policy, FareSchedule::default())
    }

    #[test]
    fn scenario_prints_status_and_fare() {
        let lines = run(&state(TransitionPolicy::Strict)).unwrap();

        assert_eq!(lines[0], "[Ride1] Status: COMPLETED");
        assert_eq!(lines[1], "[Ride1] Fare: Rs.120.71067811865476");
        assert_eq!(
            lines[2],
            "[Simulation] Rider 2 requesting a ride in Remote Area: Expected to fail"
        );
        assert_eq!(lines[3], "Matching available driver...");
    }

    #[test]
    fn scenario_runs_under_permissive_policy() {
        let lines = run(&state(TransitionPolicy::Permissive)).unwrap();
        assert_eq!(lines[0], "[Ride1] Status: COMPLETED");
    }

    #[test]
    fn scenario_releases_every_driver() {
        let state = state(TransitionPolicy::Strict);
        run(&state).unwrap();

        assert!(state.drivers.iter().all(|entry| entry.value().is_available()));
        assert_eq!(state.metrics.available_drivers.get(), 2);
    }

    #[test]
    fn rupees_keeps_fractional_part() {
        assert_eq!(rupees(50.0), "Rs.50.0");
        assert_eq!(rupees(120.5), "Rs.120.5");
    }
}
