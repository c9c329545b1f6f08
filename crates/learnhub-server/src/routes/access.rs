use axum::Json;
use axum::extract::{Path, State};
use learnhub_core::{AccessRequest, AccessState, Enrollment, StudentCourse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Success, success};
use crate::error::{ApiError, OrFail};
use crate::extract::{ApiJson, ApiQuery, parse_id};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFilter {
    pub student_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBody {
    pub state: AccessState,
}

pub async fn list_enrollments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    let enrollments = state
        .store
        .list_enrollments()
        .await
        .or_fail("Failed to fetch enrollments")?;
    Ok(Json(enrollments))
}

/// Course ids the user is enrolled in.
pub async fn enrollments_for(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Uuid>>, ApiError> {
    let user_id = parse_id(&user_id, "Invalid user ID")?;
    let course_ids = state
        .store
        .enrollments_for(user_id)
        .await
        .or_fail("Failed to fetch enrollments")?;
    Ok(Json(course_ids))
}

pub async fn enroll(
    State(state): State<AppState>,
    ApiJson(pair): ApiJson<StudentCourse>,
) -> Result<Json<Success>, ApiError> {
    state.store.enroll(pair).await.or_fail("Failed to enroll")?;
    Ok(success())
}

pub async fn unenroll(
    State(state): State<AppState>,
    ApiJson(pair): ApiJson<StudentCourse>,
) -> Result<Json<Success>, ApiError> {
    state.store.unenroll(pair).await.or_fail("Failed to unenroll")?;
    Ok(success())
}

pub async fn list_requests(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<RequestFilter>,
) -> Result<Json<Vec<AccessRequest>>, ApiError> {
    let requests = state
        .store
        .list_requests(filter.student_id)
        .await
        .or_fail("Failed to fetch requests")?;
    Ok(Json(requests))
}

pub async fn create_request(
    State(state): State<AppState>,
    ApiJson(pair): ApiJson<StudentCourse>,
) -> Result<Json<Success>, ApiError> {
    state
        .store
        .create_request(pair)
        .await
        .or_fail("Failed to create request")?;
    Ok(success())
}

/// Reject or withdraw a pending request.
pub async fn delete_request(
    State(state): State<AppState>,
    ApiJson(pair): ApiJson<StudentCourse>,
) -> Result<Json<Success>, ApiError> {
    state
        .store
        .delete_request(pair)
        .await
        .or_fail("Failed to delete request")?;
    Ok(success())
}

pub async fn approve(
    State(state): State<AppState>,
    ApiJson(pair): ApiJson<StudentCourse>,
) -> Result<Json<Success>, ApiError> {
    state
        .store
        .approve_request(pair)
        .await
        .or_fail("Failed to approve request")?;
    Ok(success())
}

pub async fn access_state(
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, String)>,
) -> Result<Json<StateBody>, ApiError> {
    let pair = StudentCourse::new(
        parse_id(&student_id, "Invalid user ID")?,
        parse_id(&course_id, "Invalid course ID")?,
    );
    let access = state
        .store
        .access_state(pair)
        .await
        .or_fail("Failed to fetch access state")?;
    Ok(Json(StateBody { state: access }))
}
