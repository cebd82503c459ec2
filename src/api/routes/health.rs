use axum::{http::StatusCode, routing::get, Router};

pub fn create_router() -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_check))
}

async fn ping() -> &'static str {
    "ok\n"
}

async fn health_check() -> StatusCode {
    StatusCode::NO_CONTENT
}
