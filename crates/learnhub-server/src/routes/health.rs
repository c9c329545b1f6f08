use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::error::{ApiError, OrFail};
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.ping().await.or_fail("Database unavailable")?;
    Ok(Json(json!({ "status": "ok" })))
}
