//! User repository implementation with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::SoftDelete;
use crate::domain::{NewUser, ProfileChanges, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Query methods exclude soft-deleted records. The `*_with_deleted`
/// variants include them and back the uniqueness checks.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find active user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find active user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_username_with_deleted(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_cellphone_with_deleted(&self, cellphone: &str) -> AppResult<Option<User>>;

    /// Insert a new user
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Apply profile changes to an active user
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User>;

    /// Soft delete user by ID (sets deleted_at timestamp)
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_active()
            .filter(user::Column::Id.eq(id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

/// Map a unique-constraint failure to a 409 instead of a 500.
fn unique_violation(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            let entity = if detail.contains("email") {
                "Email"
            } else if detail.contains("cellphone") {
                "Cellphone"
            } else {
                "Username"
            };
            AppError::conflict(entity)
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_active()
            .filter(user::Column::Id.eq(id))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find_active()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_username_with_deleted(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_email_with_deleted(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_cellphone_with_deleted(&self, cellphone: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Cellphone.eq(cellphone))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut active = ActiveModel::new();
        active.username = Set(new_user.username);
        active.nickname = Set(new_user.nickname);
        active.gender = Set(crate::domain::Gender::default().to_string());
        active.avatar = Set(String::new());
        active.cellphone = Set(new_user.cellphone);
        active.email = Set(new_user.email);
        active.email_verified_at = Set(None);
        active.password_hash = Set(new_user.password_hash);
        active.state = Set(new_user.state.to_string());
        active.deleted_at = Set(None);

        let model = active.insert(&self.db).await.map_err(unique_violation)?;
        Ok(User::from(model))
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<User> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();

        if let Some(nickname) = changes.nickname {
            active.nickname = Set(nickname);
        }
        if let Some(gender) = changes.gender {
            active.gender = Set(gender.to_string());
        }
        if let Some(avatar) = changes.avatar {
            active.avatar = Set(avatar);
        }

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();
        active.deleted_at = Set(Some(chrono::Utc::now()));

        active.update(&self.db).await?;
        Ok(())
    }
}
