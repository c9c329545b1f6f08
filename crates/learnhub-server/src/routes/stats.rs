use axum::Json;
use axum::extract::State;
use learnhub_core::DashboardStats;

use crate::error::{ApiError, OrFail};
use crate::state::AppState;

pub async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state.store.stats().await.or_fail("Failed to fetch stats")?;
    Ok(Json(stats))
}
