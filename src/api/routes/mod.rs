pub mod health;
pub mod metrics;
pub mod relay;
pub mod sink;
