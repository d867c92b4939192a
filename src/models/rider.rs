use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::Location;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rider {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub(crate) location: Location,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Rider {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, location: Location) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: phone.into(),
            location,
            updated_at: Utc::now(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn move_to(&mut self, location: Location) {
        self.location = location;
        self.updated_at = Utc::now();
    }
}
