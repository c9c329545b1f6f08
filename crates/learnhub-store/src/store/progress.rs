use chrono::Utc;
use learnhub_core::{Course, ProgressSummary, WatchedVideos};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::courses::find_course;
use super::{Store, inserted};
use crate::entity::progress;
use crate::error::StoreError;

impl Store {
    /// Watched video ids for a user in a course, in the order they were marked.
    /// An unknown pair has an empty list.
    pub async fn watched(&self, user_id: Uuid, course_id: Uuid) -> Result<WatchedVideos, StoreError> {
        load_watched(&self.db, user_id, course_id).await
    }

    /// Add `video_id` to the watched set. Marking twice is a no-op. The id is
    /// not checked against the course.
    pub async fn mark_watched(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        video_id: &str,
    ) -> Result<WatchedVideos, StoreError> {
        let txn = self.db.begin().await?;
        let mut watched = load_watched(&txn, user_id, course_id).await?;
        if !watched.mark(video_id) {
            txn.commit().await?;
            return Ok(watched);
        }
        let added = inserted(
            progress::Entity::insert(progress::ActiveModel {
                user_id: Set(user_id),
                course_id: Set(course_id),
                video_id: Set(video_id.to_string()),
                watched_at: Set(Utc::now()),
            })
            .on_conflict(
                OnConflict::columns([
                    progress::Column::UserId,
                    progress::Column::CourseId,
                    progress::Column::VideoId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await,
        )?;
        txn.commit().await?;
        if added {
            debug!(user = %user_id, course = %course_id, video = video_id, "video watched");
        }
        Ok(watched)
    }

    pub async fn progress_summary(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<ProgressSummary, StoreError> {
        let course: Course = find_course(&self.db, course_id).await?.try_into()?;
        let watched = load_watched(&self.db, user_id, course_id).await?;
        Ok(ProgressSummary::compute(user_id, &course, &watched))
    }
}

async fn load_watched<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<WatchedVideos, StoreError> {
    let rows = progress::Entity::find()
        .filter(progress::Column::UserId.eq(user_id))
        .filter(progress::Column::CourseId.eq(course_id))
        .order_by_asc(progress::Column::WatchedAt)
        .order_by_asc(progress::Column::VideoId)
        .all(conn)
        .await?;
    Ok(WatchedVideos::new(
        rows.into_iter().map(|row| row.video_id).collect(),
    ))
}
