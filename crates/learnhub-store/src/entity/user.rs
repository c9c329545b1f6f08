use learnhub_core::User;
use sea_orm::entity::prelude::*;

use crate::error::StoreError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let corrupt = |e: learnhub_core::CoreError| StoreError::corrupt("user", model.id, e);
        Ok(User {
            id: model.id,
            role: model.role.parse().map_err(corrupt)?,
            status: model.status.parse().map_err(corrupt)?,
            email: model.email,
            name: model.name,
            phone: model.phone,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
