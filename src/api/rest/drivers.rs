use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::dispatch;
use crate::error::AppError;
use crate::models::driver::{Driver, VehicleType};
use crate::models::location::Location;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(create_driver).get(list_drivers))
        .route("/drivers/:id/location", patch(update_driver_location))
        .route("/drivers/:id/rating", patch(update_driver_rating))
}

#[derive(Deserialize)]
pub struct CreateDriverRequest {
    pub name: String,
    pub phone: String,
    pub location: Location,
    pub vehicle_type: VehicleType,
    pub rating: f64,
}

#[derive(Deserialize)]
pub struct ListDriversQuery {
    pub available: Option<bool>,
    pub vehicle_type: Option<VehicleType>,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: Location,
}

#[derive(Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: f64,
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    if !payload.rating.is_finite() {
        return Err(AppError::BadRequest("rating must be a finite number".to_string()));
    }

    let driver = Driver::new(
        payload.name,
        payload.phone,
        payload.location,
        payload.vehicle_type,
        payload.rating,
    );
    Ok(Json(dispatch::register_driver(&state, driver)))
}

async fn list_drivers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDriversQuery>,
) -> Json<Vec<Driver>> {
    if query.available == Some(true) {
        return Json(dispatch::available_drivers(&state, query.vehicle_type));
    }

    let drivers = state
        .drivers
        .iter()
        .filter(|entry| {
            let driver = entry.value();
            query.available.is_none_or(|wanted| driver.is_available() == wanted)
                && query
                    .vehicle_type
                    .is_none_or(|wanted| driver.vehicle_type == wanted)
        })
        .map(|entry| entry.value().clone())
        .collect();
    Json(drivers)
}

async fn update_driver_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Driver>, AppError> {
    dispatch::move_driver(&state, id, payload.location).map(Json)
}

async fn update_driver_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRatingRequest>,
) -> Result<Json<Driver>, AppError> {
    dispatch::rate_driver(&state, id, payload.rating).map(Json)
}
