mod health_check;
mod helpers;
mod metrics;
mod not_found;
