use axum::Json;
use axum::extract::{Path, State};
use learnhub_core::{CreateUser, User, UserUpdate};

use super::{Success, success};
use crate::error::{ApiError, OrFail};
use crate::extract::{ApiJson, parse_id};
use crate::state::AppState;

const INVALID_ID: &str = "Invalid user ID";

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.store.list_users().await.or_fail("Failed to fetch users")?;
    Ok(Json(users))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let user = state.store.get_user(id).await.or_fail("Failed to fetch user")?;
    Ok(Json(user))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(create): ApiJson<CreateUser>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .store
        .create_user(create)
        .await
        .or_fail("Failed to create user")?;
    Ok(Json(user))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let user = state
        .store
        .update_user(id, update)
        .await
        .or_fail("Failed to update user")?;
    Ok(Json(user))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    state.store.delete_user(id).await.or_fail("Failed to delete user")?;
    Ok(success())
}
