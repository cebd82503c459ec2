use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;

use crate::telemetry::Metrics;

fn get_method(method: &Method) -> &'static str {
    match *method {
        Method::OPTIONS => "OPTIONS",
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::HEAD => "HEAD",
        Method::TRACE => "TRACE",
        Method::CONNECT => "CONNECT",
        Method::PATCH => "PATCH",
        _ => "OTHER",
    }
}

fn get_endpoint(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_string(), |matched_path| {
            matched_path.as_str().to_string()
        })
}

pub async fn record_metrics(
    State(metrics): State<Arc<Metrics>>,
    req: Request,
    next: Next,
) -> Response {
    let method = get_method(req.method());
    let endpoint = get_endpoint(&req);

    let pending = metrics.http_requests_pending(method, &endpoint);
    pending.inc();

    let start = Instant::now();
    let response = next.run(req).await;

    let status_code = response.status().as_u16().to_string();
    let duration_seconds = start.elapsed().as_secs_f64();

    pending.dec();
    metrics
        .http_requests_total(method, &endpoint, &status_code)
        .inc();
    metrics
        .http_requests_duration_seconds(method, &endpoint, &status_code)
        .observe(duration_seconds);

    response
}
