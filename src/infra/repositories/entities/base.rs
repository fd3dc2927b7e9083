//! Behaviour shared by every entity: timestamps and soft delete.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, QueryFilter, Select, Set};

/// Fill `created_at` on insert and refresh `updated_at` on every save.
///
/// Called from each entity's `ActiveModelBehavior::before_save`.
pub fn touch_timestamps(
    created_at: &mut ActiveValue<DateTimeUtc>,
    updated_at: &mut ActiveValue<DateTimeUtc>,
    insert: bool,
) {
    let now = Utc::now();
    if insert && created_at.is_not_set() {
        *created_at = Set(now);
    }
    *updated_at = Set(now);
}

/// Entities carrying a nullable `deleted_at` column.
pub trait SoftDelete: EntityTrait {
    fn deleted_at() -> Self::Column;

    /// Rows that have not been soft deleted.
    fn find_active() -> Select<Self> {
        Self::find().filter(Self::deleted_at().is_null())
    }

    /// Soft-deleted rows only.
    fn find_trashed() -> Select<Self> {
        Self::find().filter(Self::deleted_at().is_not_null())
    }
}
