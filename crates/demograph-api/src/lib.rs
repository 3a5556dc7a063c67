//! Axum HTTP API server.
//!
//! This crate provides:
//! - `POST /predict`: run the analysis pipeline within the request
//! - `POST /predict_later`: enqueue the batch and acknowledge immediately
//! - Health/readiness endpoints
//! - Request-id, request-logging, and CORS middleware

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
