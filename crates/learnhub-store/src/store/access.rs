use chrono::Utc;
use learnhub_core::{AccessEvent, AccessRequest, AccessState, Enrollment, StudentCourse};
use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::users::activate_user;
use super::{Store, inserted};
use crate::entity::{access_request, course, enrollment};
use crate::error::StoreError;

impl Store {
    /// Enroll a student directly. Returns `false` when the pair was already
    /// enrolled, in which case nothing changes.
    pub async fn enroll(&self, pair: StudentCourse) -> Result<bool, StoreError> {
        let txn = self.db.begin().await?;
        access_state(&txn, pair).await?.apply(AccessEvent::Enroll)?;
        let added = add_enrollment(&txn, pair).await?;
        txn.commit().await?;
        if added {
            info!(%pair, "enrolled");
        } else {
            debug!(%pair, "already enrolled");
        }
        Ok(added)
    }

    /// Remove an enrollment. Returns `false` when there was none.
    pub async fn unenroll(&self, pair: StudentCourse) -> Result<bool, StoreError> {
        let txn = self.db.begin().await?;
        access_state(&txn, pair).await?.apply(AccessEvent::Unenroll)?;
        let removed = remove_enrollment(&txn, pair).await?;
        txn.commit().await?;
        if removed {
            info!(%pair, "unenrolled");
        }
        Ok(removed)
    }

    /// Course ids the student is enrolled in, oldest enrollment first.
    pub async fn enrollments_for(&self, student_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        Ok(enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_asc(enrollment::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.course_id)
            .collect())
    }

    pub async fn list_enrollments(&self) -> Result<Vec<Enrollment>, StoreError> {
        Ok(enrollment::Entity::find()
            .order_by_asc(enrollment::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Enrollment::from)
            .collect())
    }

    /// Pending requests, optionally for one student.
    pub async fn list_requests(
        &self,
        student_id: Option<Uuid>,
    ) -> Result<Vec<AccessRequest>, StoreError> {
        let mut query = access_request::Entity::find();
        if let Some(student_id) = student_id {
            query = query.filter(access_request::Column::StudentId.eq(student_id));
        }
        Ok(query
            .order_by_asc(access_request::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(AccessRequest::from)
            .collect())
    }

    /// Ask for access. Repeating a request, or requesting a course the student
    /// is already enrolled in, changes nothing.
    pub async fn create_request(&self, pair: StudentCourse) -> Result<AccessState, StoreError> {
        let txn = self.db.begin().await?;
        let current = access_state(&txn, pair).await?;
        let next = current.apply(AccessEvent::Request)?;
        if current == AccessState::None {
            let written = inserted(
                access_request::Entity::insert(access_request::ActiveModel {
                    student_id: Set(pair.student_id),
                    course_id: Set(pair.course_id),
                    id: Set(Uuid::new_v4()),
                    created_at: Set(Utc::now()),
                })
                .on_conflict(
                    OnConflict::columns([
                        access_request::Column::StudentId,
                        access_request::Column::CourseId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await,
            )?;
            if written {
                info!(%pair, "access requested");
            }
        }
        txn.commit().await?;
        Ok(next)
    }

    /// Withdraw or reject a pending request. Returns `false` when there was none.
    pub async fn delete_request(&self, pair: StudentCourse) -> Result<bool, StoreError> {
        let txn = self.db.begin().await?;
        let current = access_state(&txn, pair).await?;
        let next = current.apply(AccessEvent::Withdraw)?;
        let removed = current != next && delete_pending(&txn, pair).await?;
        txn.commit().await?;
        if removed {
            info!(%pair, "request withdrawn");
        }
        Ok(removed)
    }

    /// Turn a pending request into an enrollment.
    pub async fn approve_request(&self, pair: StudentCourse) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;
        access_state(&txn, pair)
            .await?
            .apply(AccessEvent::Approve)?;
        add_enrollment(&txn, pair).await?;
        txn.commit().await?;
        info!(%pair, "request approved");
        Ok(())
    }

    pub async fn access_state(&self, pair: StudentCourse) -> Result<AccessState, StoreError> {
        access_state(&self.db, pair).await
    }
}

pub(crate) async fn access_state<C: ConnectionTrait>(
    conn: &C,
    pair: StudentCourse,
) -> Result<AccessState, StoreError> {
    let enrolled = enrollment::Entity::find_by_id((pair.student_id, pair.course_id))
        .count(conn)
        .await?
        > 0;
    let requested = access_request::Entity::find_by_id((pair.student_id, pair.course_id))
        .count(conn)
        .await?
        > 0;
    Ok(AccessState::from_records(enrolled, requested))
}

/// Insert the enrollment, bump the course counter, clear any pending request
/// and activate the student. Only the first enrollment of a pair counts.
pub(crate) async fn add_enrollment<C: ConnectionTrait>(
    conn: &C,
    pair: StudentCourse,
) -> Result<bool, StoreError> {
    let added = inserted(
        enrollment::Entity::insert(enrollment::ActiveModel {
            student_id: Set(pair.student_id),
            course_id: Set(pair.course_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([enrollment::Column::StudentId, enrollment::Column::CourseId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await,
    )?;

    if added {
        course::Entity::update_many()
            .col_expr(
                course::Column::EnrolledStudents,
                Expr::col(course::Column::EnrolledStudents).add(1),
            )
            .filter(course::Column::Id.eq(pair.course_id))
            .exec(conn)
            .await?;
    }
    delete_pending(conn, pair).await?;
    activate_user(conn, pair.student_id).await?;
    Ok(added)
}

/// Delete the enrollment and decrement the course counter, never below zero.
pub(crate) async fn remove_enrollment<C: ConnectionTrait>(
    conn: &C,
    pair: StudentCourse,
) -> Result<bool, StoreError> {
    let deleted = enrollment::Entity::delete_by_id((pair.student_id, pair.course_id))
        .exec(conn)
        .await?;
    if deleted.rows_affected == 0 {
        return Ok(false);
    }
    course::Entity::update_many()
        .col_expr(
            course::Column::EnrolledStudents,
            Expr::col(course::Column::EnrolledStudents).sub(1),
        )
        .filter(course::Column::Id.eq(pair.course_id))
        .filter(course::Column::EnrolledStudents.gt(0))
        .exec(conn)
        .await?;
    Ok(true)
}

async fn delete_pending<C: ConnectionTrait>(
    conn: &C,
    pair: StudentCourse,
) -> Result<bool, StoreError> {
    let deleted = access_request::Entity::delete_by_id((pair.student_id, pair.course_id))
        .exec(conn)
        .await?;
    Ok(deleted.rows_affected > 0)
}
