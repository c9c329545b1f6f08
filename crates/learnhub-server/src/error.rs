use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use learnhub_store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error returned by a handler. Renders as `{"error": message}`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// Store failure. Only the fixed message reaches the client.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a store error. Caller mistakes keep a specific message; anything
    /// else is logged and replaced by `failure`.
    pub fn from_store(err: StoreError, failure: &'static str) -> Self {
        match err {
            StoreError::Invalid(e) => ApiError::BadRequest(e.to_string()),
            StoreError::Transition(e) => ApiError::BadRequest(e.to_string()),
            StoreError::EmailTaken(_) => ApiError::BadRequest("Email already exists".into()),
            StoreError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials".into()),
            StoreError::ResetMismatch => {
                ApiError::NotFound("User not found or phone number does not match.".into())
            }
            StoreError::UserNotFound(_) => ApiError::NotFound("User not found".into()),
            StoreError::CourseNotFound(_) => ApiError::NotFound("Course not found".into()),
            other => {
                error!(error = %other, "{failure}");
                ApiError::Internal(failure)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Attach the per-operation failure message to a store result.
pub trait OrFail<T> {
    fn or_fail(self, failure: &'static str) -> Result<T, ApiError>;
}

impl<T> OrFail<T> for Result<T, StoreError> {
    fn or_fail(self, failure: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::from_store(e, failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnhub_core::CoreError;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(StoreError::EmailTaken("a@b.c".into()), StatusCode::BAD_REQUEST, "Email already exists")]
    #[case(StoreError::InvalidCredentials, StatusCode::UNAUTHORIZED, "Invalid credentials")]
    #[case(StoreError::CourseNotFound(Uuid::nil()), StatusCode::NOT_FOUND, "Course not found")]
    #[case(
        StoreError::Invalid(CoreError::MissingField("title")),
        StatusCode::BAD_REQUEST,
        "missing required field: title"
    )]
    #[case(
        StoreError::Encode("boom".into()),
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to create course"
    )]
    fn maps_store_errors(
        #[case] err: StoreError,
        #[case] status: StatusCode,
        #[case] message: &str,
    ) {
        let api = ApiError::from_store(err, "Failed to create course");
        assert_eq!(api.status(), status);
        assert_eq!(api.to_string(), message);
    }

    #[test]
    fn method_not_allowed_status() {
        assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::MethodNotAllowed.to_string(), "Method not allowed");
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let api = ApiError::from_store(
            StoreError::Corrupt {
                entity: "user",
                id: Uuid::nil(),
                detail: "secret detail".into(),
            },
            "Failed to fetch users",
        );
        insta::assert_snapshot!(api.to_string(), @"Failed to fetch users");
    }
}
