use axum::{
    http::{header::ALLOW, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Every failure a request handler can end with.
///
/// Each variant is logged once, with the correlation id, at the point it is
/// raised; converting it into a response never logs again.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create request: {0}")]
    RequestBuild(String),
    #[error("{target} error: {source}")]
    Transport {
        target: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("method {method} not allowed")]
    MethodNotAllowed { method: Method, allowed: Method },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::RequestBuild(_) | Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Transport { .. } => StatusCode::BAD_GATEWAY,
            Error::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Error::Unknown(_) => "Internal Server Error".to_string(),
            Error::MethodNotAllowed { .. } => "Method not allowed".to_string(),
            other => other.to_string(),
        };

        let mut response = (status, Json(ErrorResponse { message })).into_response();
        if let Error::MethodNotAllowed { allowed, .. } = &self {
            if let Ok(value) = HeaderValue::from_str(allowed.as_str()) {
                response.headers_mut().insert(ALLOW, value);
            }
        }

        response
    }
}
