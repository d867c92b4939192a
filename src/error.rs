use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::ride::RideStatus;

/// Failures of a single lifecycle operation. None of them mutate state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RideError {
    #[error("ride {ride_id} already has driver {driver_id} assigned")]
    AlreadyAssigned { ride_id: Uuid, driver_id: Uuid },

    #[error("ride {ride_id} has no driver assigned")]
    NoDriverAssigned { ride_id: Uuid },

    #[error("ride {ride_id} cannot move from {from} to {to}")]
    InvalidTransition {
        ride_id: Uuid,
        from: RideStatus,
        to: RideStatus,
    },

    #[error("driver {driver_id} is not available")]
    DriverUnavailable { driver_id: Uuid },

    #[error("driver {driver_id} is not the driver bound to ride {ride_id}")]
    DriverMismatch { ride_id: Uuid, driver_id: Uuid },

    #[error("ride {ride_id} is bound to driver {driver_id}, which must be released with it")]
    DriverRequired { ride_id: Uuid, driver_id: Uuid },

    #[error("fare for ride {ride_id} is already settled")]
    FareAlreadySettled { ride_id: Uuid },
}

impl RideError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RideError::AlreadyAssigned { .. } => "already_assigned",
            RideError::NoDriverAssigned { .. } => "no_driver_assigned",
            RideError::InvalidTransition { .. } => "invalid_transition",
            RideError::DriverUnavailable { .. } => "driver_unavailable",
            RideError::DriverMismatch { .. } => "driver_mismatch",
            RideError::DriverRequired { .. } => "driver_required",
            RideError::FareAlreadySettled { .. } => "fare_already_settled",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ride(#[from] RideError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Ride(RideError::NoDriverAssigned { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Ride(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Ride(err) => Json(json!({
                "error": err.to_string(),
                "kind": err.kind(),
            })),
            other => Json(json!({
                "error": other.to_string()
            })),
        };

        (status, body).into_response()
    }
}
