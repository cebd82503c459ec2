use axum::{http::Method, routing::on, Router};
use tracing::{info, instrument, warn};

use crate::{correlation::CorrelationScope, error::Error, role::Role};

pub fn create_router() -> Router {
    let role = Role::Sink;

    // Other methods land in `finish` too, so the rejection is logged with the id.
    Router::new().route(
        role.endpoint(),
        on(role.method_filter(), finish).fallback(finish),
    )
}

/// End of the chain: accepts `POST` only and makes no further call.
#[instrument(name = "finish", skip_all)]
pub async fn finish(method: Method, scope: CorrelationScope) -> Result<String, Error> {
    let role = Role::Sink;
    let correlation_id = scope.id_or_empty();

    info!(
        correlation_id,
        %method,
        "{} {} handler started",
        role.service_name(),
        role.endpoint()
    );

    if method != Method::POST {
        warn!(
            correlation_id,
            %method,
            "{} method not allowed",
            role.service_name()
        );
        return Err(Error::MethodNotAllowed {
            method,
            allowed: Method::POST,
        });
    }

    info!(
        correlation_id,
        "{} {} handler completed",
        role.service_name(),
        role.endpoint()
    );

    Ok(role.completion_body(correlation_id))
}
