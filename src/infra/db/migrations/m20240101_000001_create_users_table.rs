//! Migration: Create users table.

use sea_orm_migration::prelude::*;

use super::columns::{soft_delete_index, TableColumnsExt};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Nickname).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Users::Gender)
                            .string_len(10)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(ColumnDef::new(Users::Avatar).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Cellphone).string_len(20).null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().null().unique_key())
                    .col(
                        ColumnDef::new(Users::EmailVerifiedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::State)
                            .string_len(10)
                            .not_null()
                            .default("enabled"),
                    )
                    .timestamps()
                    .soft_delete()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(soft_delete_index("idx_users_deleted_at", Users::Table))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Username,
    Nickname,
    Gender,
    Avatar,
    Cellphone,
    Email,
    EmailVerifiedAt,
    PasswordHash,
    State,
}
