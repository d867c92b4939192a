pub mod driver;
pub mod event;
pub mod location;
pub mod ride;
pub mod rider;
