use chrono::Utc;
use learnhub_core::{Course, CourseFilter, CourseUpdate, NewCourse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::Store;
use crate::entity::course::modules_to_json;
use crate::entity::{access_request, course, enrollment, progress};
use crate::error::StoreError;

impl Store {
    /// Courses in creation order. The status filter runs in SQL; the text
    /// query is matched afterwards against title and description.
    pub async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, StoreError> {
        let mut query = course::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(course::Column::Status.eq(status.as_str()));
        }
        let rows = query
            .order_by_asc(course::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut courses = Vec::with_capacity(rows.len());
        for row in rows {
            let course = Course::try_from(row)?;
            if filter.matches(&course) {
                courses.push(course);
            }
        }
        Ok(courses)
    }

    pub async fn get_course(&self, id: Uuid) -> Result<Course, StoreError> {
        find_course(&self.db, id).await?.try_into()
    }

    pub async fn create_course(&self, new: NewCourse) -> Result<Course, StoreError> {
        new.validate()?;
        let now = Utc::now();
        let model = course::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            description: Set(new.description),
            thumbnail: Set(new.thumbnail),
            status: Set(new.status.as_str().to_string()),
            modules: Set(modules_to_json(&new.modules)?),
            enrolled_students: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(course = %model.id, title = %model.title, "created course");
        model.try_into()
    }

    /// Apply the supplied fields. The enrollment counter is not writable here.
    pub async fn update_course(&self, id: Uuid, update: CourseUpdate) -> Result<Course, StoreError> {
        update.validate()?;
        let mut model = find_course(&self.db, id).await?.into_active_model();

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(thumbnail) = update.thumbnail {
            model.thumbnail = Set(Some(thumbnail));
        }
        if let Some(status) = update.status {
            model.status = Set(status.as_str().to_string());
        }
        if let Some(modules) = update.modules {
            model.modules = Set(modules_to_json(&modules)?);
        }
        model.updated_at = Set(Utc::now());

        let saved = model.update(&self.db).await?;
        debug!(course = %id, "updated course");
        saved.try_into()
    }

    /// Delete a course along with its enrollments, requests and progress.
    pub async fn delete_course(&self, id: Uuid) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;
        let enrollments = enrollment::Entity::delete_many()
            .filter(enrollment::Column::CourseId.eq(id))
            .exec(&txn)
            .await?;
        access_request::Entity::delete_many()
            .filter(access_request::Column::CourseId.eq(id))
            .exec(&txn)
            .await?;
        progress::Entity::delete_many()
            .filter(progress::Column::CourseId.eq(id))
            .exec(&txn)
            .await?;
        let deleted = course::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(
            course = %id,
            existed = deleted.rows_affected > 0,
            enrollments = enrollments.rows_affected,
            "deleted course"
        );
        Ok(())
    }
}

pub(crate) async fn find_course<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<course::Model, StoreError> {
    course::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(StoreError::CourseNotFound(id))
}
