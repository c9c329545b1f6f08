use learnhub_core::{CourseFilter, DashboardStats};
use sea_orm::{EntityTrait, PaginatorTrait};

use super::Store;
use crate::entity::{access_request, enrollment};
use crate::error::StoreError;

impl Store {
    pub async fn stats(&self) -> Result<DashboardStats, StoreError> {
        let users = self.list_users().await?;
        let courses = self.list_courses(&CourseFilter::default()).await?;
        let total_enrollments = enrollment::Entity::find().count(&self.db).await?;
        let pending_requests = access_request::Entity::find().count(&self.db).await?;
        Ok(DashboardStats::tally(
            &users,
            &courses,
            total_enrollments,
            pending_requests,
        ))
    }
}
