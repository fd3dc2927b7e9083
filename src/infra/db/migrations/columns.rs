//! Column sets shared by every table.

use sea_orm_migration::prelude::*;

#[derive(Iden)]
pub enum Base {
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

/// Adds the shared columns to a `Table::create()` statement.
pub trait TableColumnsExt {
    /// `created_at` and `updated_at`, both required.
    fn timestamps(&mut self) -> &mut Self;

    /// Nullable `deleted_at` soft-delete marker.
    fn soft_delete(&mut self) -> &mut Self;
}

impl TableColumnsExt for TableCreateStatement {
    fn timestamps(&mut self) -> &mut Self {
        self.col(
            ColumnDef::new(Base::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Base::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
    }

    fn soft_delete(&mut self) -> &mut Self {
        self.col(
            ColumnDef::new(Base::DeletedAt)
                .timestamp_with_time_zone()
                .null(),
        )
    }
}

/// Index on `deleted_at` for active-row filtering.
pub fn soft_delete_index<T>(name: &str, table: T) -> IndexCreateStatement
where
    T: IntoIden + 'static,
{
    Index::create()
        .name(name)
        .table(table)
        .col(Base::DeletedAt)
        .to_owned()
}
