//! The coordinating service: the only place where shared rider, driver and
//! ride records are mutated.

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, RideError};
use crate::models::driver::{Driver, VehicleType};
use crate::models::event::RideEvent;
use crate::models::location::Location;
use crate::models::ride::{Ride, RideStatus};
use crate::models::rider::Rider;
use crate::state::AppState;

pub fn register_rider(state: &AppState, rider: Rider) -> Rider {
    info!(rider_id = %rider.id, name = %rider.name, "rider registered");
    state.riders.insert(rider.id, rider.clone());
    rider
}

pub fn register_driver(state: &AppState, driver: Driver) -> Driver {
    if driver.is_available() {
        state.metrics.available_drivers.inc();
    }
    info!(
        driver_id = %driver.id,
        name = %driver.name,
        vehicle_type = %driver.vehicle_type,
        "driver registered"
    );
    state.drivers.insert(driver.id, driver.clone());
    driver
}

pub fn create_ride(
    state: &AppState,
    rider_id: Uuid,
    pickup: Location,
    dropoff: Location,
    vehicle_type: VehicleType,
) -> Result<Ride, AppError> {
    let ride = {
        let rider = state
            .riders
            .get(&rider_id)
            .ok_or_else(|| AppError::NotFound(format!("rider {} not found", rider_id)))?;
        Ride::new(&rider, pickup, dropoff, vehicle_type, state.transition_policy)
    };

    state.rides.insert(ride.id(), ride.clone());
    state
        .metrics
        .ride_transitions_total
        .with_label_values(&[RideStatus::Requested.as_str()])
        .inc();
    publish(state, &ride, RideStatus::Requested);

    info!(ride_id = %ride.id(), rider_id = %rider_id, "ride requested");
    Ok(ride)
}

pub fn assign_driver(state: &AppState, ride_id: Uuid, driver_id: Uuid) -> Result<Ride, AppError> {
    let mut ride = state
        .rides
        .get_mut(&ride_id)
        .ok_or_else(|| ride_not_found(ride_id))?;
    let mut driver = state
        .drivers
        .get_mut(&driver_id)
        .ok_or_else(|| AppError::NotFound(format!("driver {} not found", driver_id)))?;

    let previous = ride.status();
    let was_available = driver.is_available();
    ride.assign_driver(&mut driver)
        .map_err(|err| rejected(state, err))?;

    track_availability(state, was_available, driver.is_available());
    record_transition(state, &ride, previous);
    Ok(ride.clone())
}

/// Sets a new status, keeping the bound driver (if any) in step with it.
pub fn update_ride_status(
    state: &AppState,
    ride_id: Uuid,
    status: RideStatus,
) -> Result<Ride, AppError> {
    let mut ride = state
        .rides
        .get_mut(&ride_id)
        .ok_or_else(|| ride_not_found(ride_id))?;

    let previous = match ride.driver_id() {
        Some(driver_id) => {
            let mut driver = bound_driver(state, ride_id, driver_id)?;
            let was_available = driver.is_available();
            let previous = ride
                .apply_status(status, &mut driver)
                .map_err(|err| rejected(state, err))?;
            track_availability(state, was_available, driver.is_available());
            previous
        }
        None => ride
            .update_status(status)
            .map_err(|err| rejected(state, err))?,
    };

    record_transition(state, &ride, previous);
    Ok(ride.clone())
}

pub fn complete_ride(state: &AppState, ride_id: Uuid) -> Result<Ride, AppError> {
    let mut ride = state
        .rides
        .get_mut(&ride_id)
        .ok_or_else(|| ride_not_found(ride_id))?;

    let Some(driver_id) = ride.driver_id() else {
        return Err(rejected(state, RideError::NoDriverAssigned { ride_id }));
    };
    let mut driver = bound_driver(state, ride_id, driver_id)?;

    let previous = ride.status();
    let was_available = driver.is_available();
    let fare = ride
        .complete(&mut driver, &state.fares)
        .map_err(|err| rejected(state, err))?;

    track_availability(state, was_available, driver.is_available());
    state.metrics.ride_fare.observe(fare);
    record_transition(state, &ride, previous);
    Ok(ride.clone())
}

pub fn cancel_ride(state: &AppState, ride_id: Uuid) -> Result<Ride, AppError> {
    let mut ride = state
        .rides
        .get_mut(&ride_id)
        .ok_or_else(|| ride_not_found(ride_id))?;

    let previous = match ride.driver_id() {
        Some(driver_id) => {
            let mut driver = bound_driver(state, ride_id, driver_id)?;
            let was_available = driver.is_available();
            let previous = ride
                .cancel(Some(&mut *driver))
                .map_err(|err| rejected(state, err))?;
            track_availability(state, was_available, driver.is_available());
            previous
        }
        None => ride.cancel(None).map_err(|err| rejected(state, err))?,
    };

    record_transition(state, &ride, previous);
    Ok(ride.clone())
}

pub fn move_rider(state: &AppState, rider_id: Uuid, location: Location) -> Result<Rider, AppError> {
    let mut rider = state
        .riders
        .get_mut(&rider_id)
        .ok_or_else(|| AppError::NotFound(format!("rider {} not found", rider_id)))?;

    rider.move_to(location);
    Ok(rider.clone())
}

pub fn move_driver(
    state: &AppState,
    driver_id: Uuid,
    location: Location,
) -> Result<Driver, AppError> {
    let mut driver = state
        .drivers
        .get_mut(&driver_id)
        .ok_or_else(|| AppError::NotFound(format!("driver {} not found", driver_id)))?;

    driver.move_to(location);
    Ok(driver.clone())
}

pub fn rate_driver(state: &AppState, driver_id: Uuid, rating: f64) -> Result<Driver, AppError> {
    if !rating.is_finite() {
        return Err(AppError::BadRequest("rating must be a finite number".to_string()));
    }

    let mut driver = state
        .drivers
        .get_mut(&driver_id)
        .ok_or_else(|| AppError::NotFound(format!("driver {} not found", driver_id)))?;

    driver.rate(rating);
    Ok(driver.clone())
}

/// Drivers whose availability flag is set, optionally of one vehicle type.
/// This is a filter; no ranking is applied.
pub fn available_drivers(state: &AppState, vehicle_type: Option<VehicleType>) -> Vec<Driver> {
    state
        .drivers
        .iter()
        .filter(|entry| {
            let driver = entry.value();
            driver.is_available() && vehicle_type.is_none_or(|wanted| driver.vehicle_type == wanted)
        })
        .map(|entry| entry.value().clone())
        .collect()
}

fn bound_driver(
    state: &AppState,
    ride_id: Uuid,
    driver_id: Uuid,
) -> Result<dashmap::mapref::one::RefMut<'_, Uuid, Driver>, AppError> {
    state.drivers.get_mut(&driver_id).ok_or_else(|| {
        AppError::Internal(format!(
            "driver {driver_id} bound to ride {ride_id} is missing from the registry"
        ))
    })
}

fn ride_not_found(ride_id: Uuid) -> AppError {
    AppError::NotFound(format!("ride {} not found", ride_id))
}

fn rejected(state: &AppState, err: RideError) -> AppError {
    state
        .metrics
        .lifecycle_errors_total
        .with_label_values(&[err.kind()])
        .inc();
    warn!(error = %err, kind = err.kind(), "lifecycle operation rejected");
    AppError::Ride(err)
}

fn track_availability(state: &AppState, was_available: bool, is_available: bool) {
    match (was_available, is_available) {
        (true, false) => state.metrics.available_drivers.dec(),
        (false, true) => state.metrics.available_drivers.inc(),
        _ => {}
    }
}

fn record_transition(state: &AppState, ride: &Ride, previous: RideStatus) {
    state
        .metrics
        .ride_transitions_total
        .with_label_values(&[ride.status().as_str()])
        .inc();
    publish(state, ride, previous);

    info!(
        ride_id = %ride.id(),
        from = %previous,
        to = %ride.status(),
        "ride status changed"
    );
}

fn publish(state: &AppState, ride: &Ride, previous: RideStatus) {
    let _ = state
        .ride_events_tx
        .send(RideEvent::from_ride(ride, previous));
}
