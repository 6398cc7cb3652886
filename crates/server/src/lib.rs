//! HTTP API for the supplier portal assistant
//!
//! Endpoints:
//! - `POST /api/ai-query` - answer a question, with the operator signal
//! - `POST /api/recommendations` - ranked articles with score breakdown
//! - `GET /health` - liveness probe
//! - `GET /metrics` - Prometheus metrics

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::init_metrics;
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Unavailable(_) => axum::http::StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
