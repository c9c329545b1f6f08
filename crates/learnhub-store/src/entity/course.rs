use learnhub_core::{Course, CourseModule};
use sea_orm::entity::prelude::*;

use crate::error::StoreError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub thumbnail: Option<String>,
    pub status: String,
    /// Modules with their videos and materials, kept as one JSON document.
    pub modules: Json,
    /// Number of enrollment rows for this course; never negative.
    pub enrolled_students: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn modules_to_json(modules: &[CourseModule]) -> Result<Json, StoreError> {
    serde_json::to_value(modules).map_err(|e| StoreError::Encode(e.to_string()))
}

impl TryFrom<Model> for Course {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let modules: Vec<CourseModule> = if model.modules.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(model.modules)
                .map_err(|e| StoreError::corrupt("course", model.id, e))?
        };
        Ok(Course {
            id: model.id,
            status: model
                .status
                .parse()
                .map_err(|e| StoreError::corrupt("course", model.id, e))?,
            title: model.title,
            description: model.description,
            thumbnail: model.thumbnail,
            modules,
            enrolled_students: model.enrolled_students.max(0) as u32,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
