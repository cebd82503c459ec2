use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::on,
    Router,
};
use tracing::{info, instrument};

use crate::{api::types::AppState, correlation::CorrelationScope, error::Error};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let role = app_state.role;

    Router::new()
        .route(role.endpoint(), on(role.method_filter(), relay))
        .with_state(app_state)
}

/// Calls the next hop with this request's correlation id and mirrors its status.
#[instrument(name = "relay", skip_all)]
pub async fn relay(
    State(app_state): State<Arc<AppState>>,
    scope: CorrelationScope,
) -> Result<Response, Error> {
    let role = app_state.role;
    let downstream = &app_state.downstream;
    let correlation_id = scope.id_or_empty();

    info!(
        correlation_id,
        url = downstream.url(),
        "{} {} handler started, calling {}",
        role.service_name(),
        role.endpoint(),
        downstream.target()
    );

    let status = downstream.call(&scope, &app_state.metrics).await?;

    info!(
        correlation_id,
        status = status.as_u16(),
        "{} {} handler completed",
        role.service_name(),
        role.endpoint()
    );

    Ok((status, role.completion_body(correlation_id)).into_response())
}
