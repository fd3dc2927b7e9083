//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::base::{touch_timestamps, SoftDelete};
use crate::domain::{Gender, User, UserState};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub nickname: String,
    pub gender: String,
    pub avatar: String,
    #[sea_orm(unique)]
    pub cellphone: Option<String>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub email_verified_at: Option<DateTimeUtc>,
    pub password_hash: String,
    pub state: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Soft delete timestamp (NULL = active, set = deleted)
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        touch_timestamps(&mut self.created_at, &mut self.updated_at, insert);
        Ok(self)
    }
}

impl SoftDelete for Entity {
    fn deleted_at() -> Column {
        Column::DeletedAt
    }
}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            username: model.username,
            nickname: model.nickname,
            gender: Gender::from(model.gender.as_str()),
            avatar: model.avatar,
            cellphone: model.cellphone,
            email: model.email,
            email_verified_at: model.email_verified_at,
            password_hash: model.password_hash,
            state: UserState::from(model.state.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}
