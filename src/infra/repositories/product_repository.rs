//! Product repository implementation with soft delete support.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use super::entities::SoftDelete;
use crate::domain::{NewProduct, Product, ProductChanges};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product repository trait. Soft-deleted products are never returned.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// One page of active products, newest first, plus the total count
    async fn list(&self, offset: u64, limit: u64) -> AppResult<(Vec<Product>, u64)>;

    async fn create(&self, new_product: NewProduct) -> AppResult<Product>;

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product>;

    /// Soft delete
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_active_model(&self, id: Uuid) -> AppResult<product::Model> {
        ProductEntity::find_active()
            .filter(product::Column::Id.eq(id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_active()
            .filter(product::Column::Id.eq(id))
            .one(&self.db)
            .await?;

        Ok(result.map(Product::from))
    }

    async fn list(&self, offset: u64, limit: u64) -> AppResult<(Vec<Product>, u64)> {
        let total = ProductEntity::find_active().count(&self.db).await?;

        let models = ProductEntity::find_active()
            .order_by_desc(product::Column::CreatedAt)
            .order_by_asc(product::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let mut active = ActiveModel::new();
        active.owner_id = Set(new_product.owner_id);
        active.name = Set(new_product.name);
        active.description = Set(new_product.description);
        active.price_cents = Set(new_product.price_cents);
        active.stock = Set(new_product.stock);
        active.deleted_at = Set(None);

        let model = active.insert(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price_cents) = changes.price_cents {
            active.price_cents = Set(price_cents);
        }
        if let Some(stock) = changes.stock {
            active.stock = Set(stock);
        }

        let model = active.update(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut active: ActiveModel = self.find_active_model(id).await?.into();
        active.deleted_at = Set(Some(chrono::Utc::now()));

        active.update(&self.db).await?;
        Ok(())
    }
}
