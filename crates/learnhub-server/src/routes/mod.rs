//! Handlers, one module per resource. Every route is mounted under `/api`.

pub mod access;
pub mod auth;
pub mod courses;
pub mod health;
pub mod progress;
pub mod stats;
pub mod users;

use axum::Json;
use serde::Serialize;

use crate::error::ApiError;

/// Body for mutations that have nothing else to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Success {
    pub success: bool,
}

pub fn success() -> Json<Success> {
    Json(Success { success: true })
}

/// Router fallback for paths no route matches.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".into())
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
