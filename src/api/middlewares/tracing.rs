use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, info_span, Span};

use crate::correlation::{CorrelationId, CorrelationScope};

/// Logged in place of the id when the boundary middleware did not run.
const MISSING_CORRELATION_ID: &str = "-";

fn correlation_id_of<B>(request: &axum::http::Request<B>) -> &str {
    request
        .extensions()
        .get::<CorrelationScope>()
        .and_then(CorrelationScope::read)
        .map_or(MISSING_CORRELATION_ID, CorrelationId::as_str)
}

/// Span for `TraceLayer`, so every event of the request carries its id.
pub fn make_request_span(request: &Request) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        path = request.uri().path(),
        correlation_id = correlation_id_of(request),
    )
}

/// One structured line per inbound request.
pub async fn log_request(request: Request, next: Next) -> Response {
    info!(
        method = %request.method(),
        path = request.uri().path(),
        correlation_id = correlation_id_of(&request),
        "request received"
    );

    next.run(request).await
}
