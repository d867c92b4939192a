use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::dispatch;
use crate::error::AppError;
use crate::models::driver::VehicleType;
use crate::models::location::Location;
use crate::models::ride::{Ride, RideStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rides", post(create_ride).get(list_rides))
        .route("/rides/:id", get(get_ride))
        .route("/rides/:id/assign", post(assign_driver))
        .route("/rides/:id/status", patch(update_status))
        .route("/rides/:id/complete", post(complete_ride))
        .route("/rides/:id/cancel", post(cancel_ride))
}

#[derive(Deserialize)]
pub struct CreateRideRequest {
    pub rider_id: Uuid,
    pub pickup: Location,
    pub drop: Location,
    pub vehicle_type: VehicleType,
}

#[derive(Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RideStatus,
}

async fn create_ride(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRideRequest>,
) -> Result<Json<Ride>, AppError> {
    dispatch::create_ride(
        &state,
        payload.rider_id,
        payload.pickup,
        payload.drop,
        payload.vehicle_type,
    )
    .map(Json)
}

async fn list_rides(State(state): State<Arc<AppState>>) -> Json<Vec<Ride>> {
    let rides = state
        .rides
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(rides)
}

async fn get_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, AppError> {
    let ride = state
        .rides
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("ride {} not found", id)))?;

    Ok(Json(ride.value().clone()))
}

async fn assign_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignDriverRequest>,
) -> Result<Json<Ride>, AppError> {
    dispatch::assign_driver(&state, id, payload.driver_id).map(Json)
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Ride>, AppError> {
    dispatch::update_ride_status(&state, id, payload.status).map(Json)
}

async fn complete_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, AppError> {
    dispatch::complete_ride(&state, id).map(Json)
}

async fn cancel_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, AppError> {
    dispatch::cancel_ride(&state, id).map(Json)
}
