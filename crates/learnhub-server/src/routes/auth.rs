use axum::Json;
use axum::extract::State;
use learnhub_core::{Credentials, NewUser, PasswordReset, User};

use super::{Success, success};
use crate::error::{ApiError, OrFail};
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewUser>,
) -> Result<Json<User>, ApiError> {
    let user = state.store.register(new).await.or_fail("Registration failed")?;
    Ok(Json(user))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<User>, ApiError> {
    let user = state.store.login(credentials).await.or_fail("Login failed")?;
    Ok(Json(user))
}

pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(reset): ApiJson<PasswordReset>,
) -> Result<Json<Success>, ApiError> {
    state
        .store
        .reset_password(reset)
        .await
        .or_fail("Failed to reset password")?;
    Ok(success())
}
