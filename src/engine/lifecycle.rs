//! Status transitions of a single ride and their side effects on the bound
//! driver.
//!
//! Every operation validates first and mutates after, so a returned error
//! leaves both the ride and the driver untouched.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::engine::pricing::FareSchedule;
use crate::error::RideError;
use crate::models::driver::Driver;
use crate::models::ride::{Ride, RideStatus, TransitionPolicy};

impl Ride {
    /// Binds `driver` to this ride and confirms it.
    pub fn assign_driver(&mut self, driver: &mut Driver) -> Result<(), RideError> {
        if let Some(bound) = self.driver_id {
            return Err(RideError::AlreadyAssigned {
                ride_id: self.id,
                driver_id: bound,
            });
        }
        self.check_transition(RideStatus::Confirmed)?;
        if !driver.is_available() {
            return Err(RideError::DriverUnavailable {
                driver_id: driver.id,
            });
        }

        if driver.vehicle_type != self.vehicle_type {
            warn!(
                ride_id = %self.id,
                driver_id = %driver.id,
                requested = %self.vehicle_type,
                offered = %driver.vehicle_type,
                "vehicle type differs from request"
            );
        }

        driver.engage(self.id);
        self.driver_id = Some(driver.id);
        let previous = self.set_status(RideStatus::Confirmed);

        info!(
            ride_id = %self.id,
            driver_id = %driver.id,
            from = %previous,
            "driver assigned"
        );
        Ok(())
    }

    /// Sets the status without touching any driver and returns the previous
    /// one.
    ///
    /// Under [`TransitionPolicy::Strict`] CONFIRMED and COMPLETED are only
    /// reachable through [`Ride::assign_driver`] and [`Ride::complete`].
    /// With a driver bound, only moves between active statuses are accepted;
    /// anything else goes through [`Ride::apply_status`] or [`Ride::cancel`].
    pub fn update_status(&mut self, status: RideStatus) -> Result<RideStatus, RideError> {
        self.check_status_update(status)?;
        if let Some(bound) = self.driver_id {
            if !(self.status.is_active() && status.is_active()) {
                return Err(RideError::DriverRequired {
                    ride_id: self.id,
                    driver_id: bound,
                });
            }
        }
        Ok(self.set_status(status))
    }

    pub fn mark_driver_on_the_way(&mut self) -> Result<RideStatus, RideError> {
        self.update_status(RideStatus::DriverOnTheWay)
    }

    pub fn start_trip(&mut self) -> Result<RideStatus, RideError> {
        self.update_status(RideStatus::InProgress)
    }

    /// Like [`Ride::update_status`], but keeps the bound driver's
    /// availability in step with the new status.
    pub fn apply_status(
        &mut self,
        status: RideStatus,
        driver: &mut Driver,
    ) -> Result<RideStatus, RideError> {
        self.check_bound_driver(driver)?;
        self.check_status_update(status)?;

        let engaged_here = driver.current_ride() == Some(self.id);
        if status.is_active() && !engaged_here && !driver.is_available() {
            return Err(RideError::DriverUnavailable {
                driver_id: driver.id,
            });
        }

        let previous = self.set_status(status);
        if status.is_active() && !engaged_here {
            driver.engage(self.id);
        } else {
            self.release_if_idle(driver);
        }

        debug!(ride_id = %self.id, from = %previous, to = %status, "status applied");
        Ok(previous)
    }

    /// Cancels the ride. A bound driver must be passed in so it can be
    /// released together with the ride.
    pub fn cancel(&mut self, driver: Option<&mut Driver>) -> Result<RideStatus, RideError> {
        self.check_transition(RideStatus::Cancelled)?;
        match (&driver, self.driver_id) {
            (Some(driver), _) => self.check_bound_driver(driver)?,
            (None, Some(bound)) => {
                return Err(RideError::DriverRequired {
                    ride_id: self.id,
                    driver_id: bound,
                });
            }
            (None, None) => {}
        }

        let previous = self.set_status(RideStatus::Cancelled);
        if let Some(driver) = driver {
            self.release_if_idle(driver);
        }

        info!(ride_id = %self.id, from = %previous, "ride cancelled");
        Ok(previous)
    }

    /// Completes the ride, settles the fare and releases the driver.
    ///
    /// The fare is computed once; completing again fails with
    /// [`RideError::FareAlreadySettled`].
    pub fn complete(&mut self, driver: &mut Driver, fares: &FareSchedule) -> Result<f64, RideError> {
        if self.driver_id.is_none() {
            return Err(RideError::NoDriverAssigned { ride_id: self.id });
        }
        self.check_bound_driver(driver)?;
        if self.is_settled() {
            return Err(RideError::FareAlreadySettled { ride_id: self.id });
        }

        let allowed = match self.policy {
            TransitionPolicy::Strict => self.status.is_forward_step(RideStatus::Completed),
            TransitionPolicy::Permissive => self.status != RideStatus::Cancelled,
        };
        if !allowed {
            return Err(self.invalid(RideStatus::Completed));
        }

        let previous = self.set_status(RideStatus::Completed);
        self.fare = fares.fare_between(&self.pickup, &self.drop);
        self.settled_at = Some(self.updated_at);
        self.release_if_idle(driver);

        info!(
            ride_id = %self.id,
            driver_id = %driver.id,
            from = %previous,
            fare = self.fare,
            "ride completed"
        );
        Ok(self.fare)
    }

    fn check_status_update(&self, status: RideStatus) -> Result<(), RideError> {
        let needs_operation = matches!(status, RideStatus::Confirmed | RideStatus::Completed);
        if self.policy == TransitionPolicy::Strict && needs_operation {
            return Err(self.invalid(status));
        }
        self.check_transition(status)
    }

    fn check_transition(&self, to: RideStatus) -> Result<(), RideError> {
        let allowed = match self.policy {
            TransitionPolicy::Strict => self.status.is_forward_step(to),
            TransitionPolicy::Permissive => !self.status.is_terminal(),
        };

        if allowed {
            Ok(())
        } else {
            Err(self.invalid(to))
        }
    }

    fn check_bound_driver(&self, driver: &Driver) -> Result<(), RideError> {
        match self.driver_id {
            Some(bound) if bound == driver.id => Ok(()),
            _ => Err(RideError::DriverMismatch {
                ride_id: self.id,
                driver_id: driver.id,
            }),
        }
    }

    fn release_if_idle(&self, driver: &mut Driver) {
        if !self.status.is_active() && driver.current_ride() == Some(self.id) {
            driver.release();
        }
    }

    fn set_status(&mut self, status: RideStatus) -> RideStatus {
        let previous = self.status;
        self.status = status;
        self.updated_at = Utc::now();
        previous
    }

    fn invalid(&self, to: RideStatus) -> RideError {
        RideError::InvalidTransition {
            ride_id: self.id,
            from: self.status,
            to,
        }
    }
}
