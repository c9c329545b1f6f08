use axum::Json;
use axum::extract::{Path, State};
use learnhub_core::{ProgressSummary, WatchedVideos};
use uuid::Uuid;

use crate::error::{ApiError, OrFail};
use crate::extract::parse_id;
use crate::state::AppState;

const INVALID_IDS: &str = "Invalid user or course ID";

fn parse_pair(user_id: &str, course_id: &str) -> Result<(Uuid, Uuid), ApiError> {
    Ok((parse_id(user_id, INVALID_IDS)?, parse_id(course_id, INVALID_IDS)?))
}

pub async fn watched(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> Result<Json<WatchedVideos>, ApiError> {
    let (user_id, course_id) = parse_pair(&user_id, &course_id)?;
    let watched = state
        .store
        .watched(user_id, course_id)
        .await
        .or_fail("Failed to fetch progress")?;
    Ok(Json(watched))
}

pub async fn mark(
    State(state): State<AppState>,
    Path((user_id, course_id, video_id)): Path<(String, String, String)>,
) -> Result<Json<WatchedVideos>, ApiError> {
    mark_video(&state, &user_id, &course_id, &video_id).await
}

/// POST on the summary path marks a video whose id is literally `summary`.
pub async fn mark_summary(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> Result<Json<WatchedVideos>, ApiError> {
    mark_video(&state, &user_id, &course_id, "summary").await
}

async fn mark_video(
    state: &AppState,
    user_id: &str,
    course_id: &str,
    video_id: &str,
) -> Result<Json<WatchedVideos>, ApiError> {
    let (user_id, course_id) = parse_pair(user_id, course_id)?;
    let watched = state
        .store
        .mark_watched(user_id, course_id, video_id)
        .await
        .or_fail("Failed to update progress")?;
    Ok(Json(watched))
}

pub async fn summary(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> Result<Json<ProgressSummary>, ApiError> {
    let (user_id, course_id) = parse_pair(&user_id, &course_id)?;
    let summary = state
        .store
        .progress_summary(user_id, course_id)
        .await
        .or_fail("Failed to fetch progress")?;
    Ok(Json(summary))
}
