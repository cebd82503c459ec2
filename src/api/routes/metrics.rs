use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use crate::{error::Error, telemetry::Metrics};

pub fn create_router(metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> Result<String, Error> {
    Ok(metrics.render()?)
}
