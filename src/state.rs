use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::Config;
use crate::engine::pricing::FareSchedule;
use crate::models::driver::Driver;
use crate::models::event::RideEvent;
use crate::models::ride::{Ride, TransitionPolicy};
use crate::models::rider::Rider;
use crate::observability::metrics::Metrics;

/// Registries shared by every handler.
///
/// Operations that touch both a ride and a driver lock the ride entry before
/// the driver entry.
pub struct AppState {
    pub riders: DashMap<Uuid, Rider>,
    pub drivers: DashMap<Uuid, Driver>,
    pub rides: DashMap<Uuid, Ride>,
    pub ride_events_tx: broadcast::Sender<RideEvent>,
    pub transition_policy: TransitionPolicy,
    pub fares: FareSchedule,
    pub metrics: Metrics,
}

impl AppState {
    /// # Panics
    ///
    /// Panics if `event_buffer_size` is zero; [`Config::validate`] rejects it.
    pub fn new(event_buffer_size: usize, transition_policy: TransitionPolicy, fares: FareSchedule) -> Self {
        let (ride_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            riders: DashMap::new(),
            drivers: DashMap::new(),
            rides: DashMap::new(),
            ride_events_tx,
            transition_policy,
            fares,
            metrics: Metrics::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.event_buffer_size,
            config.transition_policy,
            config.fares,
        )
    }
}
