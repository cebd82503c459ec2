use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    classify::StatusInRangeAsFailures,
    timeout::TimeoutLayer,
    trace::{DefaultOnFailure, TraceLayer},
};
use tracing::Level;

use crate::{downstream::Downstream, role::Role, telemetry::Metrics};

pub mod middlewares;
pub mod routes;
pub mod types;

use types::AppState;

/// Builds the full router for one service.
///
/// Relaying roles require a downstream; the sink never calls anyone. Layers
/// run outermost first: correlation boundary, panic catcher, request span,
/// request deadline, request log line, then per-route metrics.
///
/// Only a missed deadline is reported by the request span. Every other
/// failure is logged once by whoever raised it.
pub fn create_router(
    role: Role,
    downstream: Option<Downstream>,
    metrics: Arc<Metrics>,
    request_timeout: Duration,
) -> Result<Router> {
    let business = match (role, downstream) {
        (Role::Sink, _) => routes::sink::create_router(),
        (role, Some(downstream)) => routes::relay::create_router(Arc::new(AppState {
            role,
            downstream,
            metrics: metrics.clone(),
        })),
        (role, None) => bail!("{} needs a downstream to relay to", role.service_name()),
    }
    .layer(from_fn_with_state(
        metrics.clone(),
        middlewares::record_metrics,
    ));

    let trace_layer = TraceLayer::new(
        StatusInRangeAsFailures::new(
            StatusCode::REQUEST_TIMEOUT.as_u16()..=StatusCode::REQUEST_TIMEOUT.as_u16(),
        )
        .into_make_classifier(),
    )
    .make_span_with(middlewares::make_request_span)
    .on_failure(DefaultOnFailure::new().level(Level::WARN));

    Ok(Router::new()
        .merge(business)
        .merge(routes::health::create_router())
        .merge(routes::metrics::create_router(metrics))
        .fallback(not_found)
        .layer(from_fn(middlewares::log_request))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(trace_layer)
        .layer(CatchPanicLayer::new())
        .layer(from_fn(middlewares::correlate)))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
