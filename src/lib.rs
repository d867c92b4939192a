pub mod api;
pub mod config;
pub mod demo;
pub mod engine;
pub mod error;
pub mod geo;
pub mod models;
pub mod observability;
pub mod state;
