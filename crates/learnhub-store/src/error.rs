use std::fmt::Display;

use learnhub_core::{CoreError, TransitionError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("invalid input: {0}")]
    Invalid(#[from] CoreError),
    #[error("{0}")]
    Transition(#[from] TransitionError),
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("course not found: {0}")]
    CourseNotFound(Uuid),
    #[error("email already exists: {0}")]
    EmailTaken(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user not found or phone number does not match")]
    ResetMismatch,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("encode stored value: {0}")]
    Encode(String),
    #[error("corrupt {entity} row {id}: {detail}")]
    Corrupt {
        entity: &'static str,
        id: Uuid,
        detail: String,
    },
}

impl StoreError {
    pub(crate) fn corrupt(entity: &'static str, id: Uuid, detail: impl Display) -> Self {
        StoreError::Corrupt {
            entity,
            id,
            detail: detail.to_string(),
        }
    }

    /// Unique-key violations on the email column surface as [`StoreError::EmailTaken`].
    pub(crate) fn from_user_write(err: DbErr, email: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::EmailTaken(email.to_string()),
            _ => StoreError::Db(err),
        }
    }

    /// Whether the caller sent something wrong, as opposed to a store failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            StoreError::Db(_)
                | StoreError::PasswordHash(_)
                | StoreError::Encode(_)
                | StoreError::Corrupt { .. }
        )
    }
}
