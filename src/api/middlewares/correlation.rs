use axum::{extract::Request, middleware::Next, response::Response};

use crate::correlation::{self, CorrelationScope};

/// Trust boundary for the correlation id.
///
/// Resolves the id once per inbound request, runs the rest of the stack inside
/// a scope carrying it, and stamps it on whatever response comes back:
/// success, error, 404, 405, a missed deadline, or a caught panic.
pub async fn correlate(mut request: Request, next: Next) -> Response {
    let correlation_id = correlation::resolve_or_create(correlation::extract(request.headers()));

    let scope = CorrelationScope::root().attach(correlation_id.clone());
    request.extensions_mut().insert(scope.clone());

    let mut response = correlation::within(scope, next.run(request)).await;
    correlation::inject(response.headers_mut(), correlation_id.as_bytes());

    response
}
