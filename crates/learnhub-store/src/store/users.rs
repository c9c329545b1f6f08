use chrono::Utc;
use learnhub_core::{
    CreateUser, Credentials, NewUser, PasswordReset, Role, StudentCourse, User, UserStatus,
    UserUpdate,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::Store;
use super::access::remove_enrollment;
use crate::entity::{access_request, enrollment, progress, user};
use crate::error::StoreError;

impl Store {
    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        find_user(&self.db, id).await?.try_into()
    }

    /// Self-registration. Accounts start inactive until the first enrollment.
    pub async fn register(&self, new: NewUser) -> Result<User, StoreError> {
        self.insert_user(new, UserStatus::Inactive).await
    }

    /// Admin-created account; status defaults to active.
    pub async fn create_user(&self, create: CreateUser) -> Result<User, StoreError> {
        let status = create.status.unwrap_or(UserStatus::Active);
        self.insert_user(create.account, status).await
    }

    async fn insert_user(&self, new: NewUser, status: UserStatus) -> Result<User, StoreError> {
        new.validate()?;
        if self.find_by_email(&new.email).await?.is_some() {
            return Err(StoreError::EmailTaken(new.email));
        }

        let password_hash = self.hasher.hash_blocking(new.password).await?;
        let now = Utc::now();
        let role = new.role.unwrap_or(Role::Student);
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new.email.clone()),
            password_hash: Set(password_hash),
            name: Set(new.name),
            phone: Set(new.phone),
            role: Set(role.as_str().to_string()),
            status: Set(status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| StoreError::from_user_write(e, &new.email))?;

        info!(user = %model.id, %role, %status, "created user");
        model.try_into()
    }

    pub async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError> {
        update.validate()?;
        let existing = find_user(&self.db, id).await?;

        if let Some(email) = &update.email {
            if let Some(other) = self.find_by_email(email).await? {
                if other.id != id {
                    return Err(StoreError::EmailTaken(email.clone()));
                }
            }
        }

        let new_hash = match update.password {
            Some(password) => Some(self.hasher.hash_blocking(password).await?),
            None => None,
        };

        let mut model = existing.into_active_model();
        if let Some(email) = update.email.clone() {
            model.email = Set(email);
        }
        if let Some(hash) = new_hash {
            model.password_hash = Set(hash);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(phone) = update.phone {
            model.phone = Set(phone);
        }
        if let Some(role) = update.role {
            model.role = Set(role.as_str().to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.as_str().to_string());
        }
        model.updated_at = Set(Utc::now());

        let email = update.email.unwrap_or_default();
        let saved = model
            .update(&self.db)
            .await
            .map_err(|e| StoreError::from_user_write(e, &email))?;
        debug!(user = %id, "updated user");
        saved.try_into()
    }

    /// Delete a user together with their requests and progress, unenrolling
    /// them from every course so the course counters stay in step.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;

        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(id))
            .all(&txn)
            .await?;
        for row in &enrollments {
            remove_enrollment(&txn, StudentCourse::new(row.student_id, row.course_id)).await?;
        }
        access_request::Entity::delete_many()
            .filter(access_request::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        progress::Entity::delete_many()
            .filter(progress::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        let deleted = user::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(
            user = %id,
            existed = deleted.rows_affected > 0,
            unenrolled = enrollments.len(),
            "deleted user"
        );
        Ok(())
    }

    /// Match email, then verify the password against the stored hash.
    pub async fn login(&self, credentials: Credentials) -> Result<User, StoreError> {
        let Some(model) = self.find_by_email(&credentials.email).await? else {
            return Err(StoreError::InvalidCredentials);
        };
        let ok = self
            .hasher
            .verify_blocking(credentials.password, model.password_hash.clone())
            .await?;
        if !ok {
            return Err(StoreError::InvalidCredentials);
        }
        model.try_into()
    }

    /// Overwrite the password of the user matching both email and phone.
    pub async fn reset_password(&self, reset: PasswordReset) -> Result<(), StoreError> {
        reset.validate()?;
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(reset.email.as_str()))
            .filter(user::Column::Phone.eq(reset.phone.as_str()))
            .one(&self.db)
            .await?
            .ok_or(StoreError::ResetMismatch)?;

        let hash = self.hasher.hash_blocking(reset.new_password).await?;
        let id = model.id;
        let mut model = model.into_active_model();
        model.password_hash = Set(hash);
        model.updated_at = Set(Utc::now());
        model.update(&self.db).await?;
        info!(user = %id, "password reset");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }
}

pub(crate) async fn find_user<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<user::Model, StoreError> {
    user::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(StoreError::UserNotFound(id))
}

/// Mark a user active. Missing users are ignored.
pub(crate) async fn activate_user<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), StoreError> {
    user::Entity::update_many()
        .col_expr(user::Column::Status, Expr::value(UserStatus::Active.as_str()))
        .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(user::Column::Id.eq(id))
        .filter(user::Column::Status.ne(UserStatus::Active.as_str()))
        .exec(conn)
        .await?;
    Ok(())
}
