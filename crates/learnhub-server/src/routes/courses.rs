use axum::Json;
use axum::extract::{Path, State};
use learnhub_core::{Course, CourseFilter, CourseUpdate, NewCourse};

use super::{Success, success};
use crate::error::{ApiError, OrFail};
use crate::extract::{ApiJson, ApiQuery, parse_id};
use crate::state::AppState;

const INVALID_ID: &str = "Invalid course ID";

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<CourseFilter>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = state
        .store
        .list_courses(&filter)
        .await
        .or_fail("Failed to fetch courses")?;
    Ok(Json(courses))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let course = state.store.get_course(id).await.or_fail("Failed to fetch course")?;
    Ok(Json(course))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewCourse>,
) -> Result<Json<Course>, ApiError> {
    let course = state
        .store
        .create_course(new)
        .await
        .or_fail("Failed to create course")?;
    Ok(Json(course))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<CourseUpdate>,
) -> Result<Json<Course>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    let course = state
        .store
        .update_course(id, update)
        .await
        .or_fail("Failed to update course")?;
    Ok(Json(course))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Success>, ApiError> {
    let id = parse_id(&id, INVALID_ID)?;
    state
        .store
        .delete_course(id)
        .await
        .or_fail("Failed to delete course")?;
    Ok(success())
}
