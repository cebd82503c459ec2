pub mod api;
pub mod app;
pub mod config;
pub mod correlation;
pub mod downstream;
pub mod error;
pub mod role;
pub mod telemetry;
