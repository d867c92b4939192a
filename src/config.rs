use std::env;

use crate::engine::pricing::{FareSchedule, BASE_FARE, PER_UNIT_RATE};
use crate::error::AppError;
use crate::models::ride::TransitionPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    pub transition_policy: TransitionPolicy,
    pub fares: FareSchedule,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let config = Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            transition_policy: parse_or_default("TRANSITION_POLICY", TransitionPolicy::Strict)?,
            fares: FareSchedule {
                base_fare: parse_or_default("BASE_FARE", BASE_FARE)?,
                per_unit_rate: parse_or_default("PER_UNIT_RATE", PER_UNIT_RATE)?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but cannot run: an empty event buffer and
    /// fare rates that are negative or not finite.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.event_buffer_size == 0 {
            return Err(AppError::Internal(
                "invalid EVENT_BUFFER_SIZE: must be > 0".to_string(),
            ));
        }
        check_rate("BASE_FARE", self.fares.base_fare)?;
        check_rate("PER_UNIT_RATE", self.fares.per_unit_rate)
    }
}

fn check_rate(key: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::Internal(format!(
            "invalid {key}: must be a finite, non-negative number, got {value}"
        )))
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            http_port: 3000,
            log_level: "info".to_string(),
            event_buffer_size: 1024,
            transition_policy: TransitionPolicy::Strict,
            fares: FareSchedule::default(),
        }
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Internal(msg) => msg,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn zero_event_buffer_is_rejected() {
        let config = Config {
            event_buffer_size: 0,
            ..config()
        };

        let err = config.validate().unwrap_err();

        assert_eq!(message(err), "invalid EVENT_BUFFER_SIZE: must be > 0");
    }

    #[test]
    fn fare_rates_must_be_finite_and_non_negative() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -1.0] {
            let base = Config {
                fares: FareSchedule {
                    base_fare: bad,
                    per_unit_rate: PER_UNIT_RATE,
                },
                ..config()
            };
            assert!(message(base.validate().unwrap_err()).starts_with("invalid BASE_FARE"));

            let rate = Config {
                fares: FareSchedule {
                    base_fare: BASE_FARE,
                    per_unit_rate: bad,
                },
                ..config()
            };
            assert!(message(rate.validate().unwrap_err()).starts_with("invalid PER_UNIT_RATE"));
        }
    }

    #[test]
    fn zero_rates_are_allowed() {
        let config = Config {
            fares: FareSchedule {
                base_fare: 0.0,
                per_unit_rate: 0.0,
            },
            ..config()
        };

        assert!(config.validate().is_ok());
    }
}
