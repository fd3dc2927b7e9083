//! Product service - CRUD over the example product model.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewProduct, Product, ProductChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Product>>;

    async fn get(&self, id: Uuid) -> AppResult<Product>;

    async fn create(&self, new_product: NewProduct) -> AppResult<Product>;

    /// Only the owner may update
    async fn update(&self, actor_id: Uuid, id: Uuid, changes: ProductChanges) -> AppResult<Product>;

    /// Only the owner may delete
    async fn delete(&self, actor_id: Uuid, id: Uuid) -> AppResult<()>;
}

pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn owned(&self, actor_id: Uuid, id: Uuid) -> AppResult<Product> {
        let product = self.get(id).await?;
        if !product.is_owned_by(actor_id) {
            return Err(AppError::authorization("You do not own this product"));
        }
        Ok(product)
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Product>> {
        let page = params.page();
        let limit = params.limit();
        let (items, total) = self.uow.products().list(params.offset(), limit).await?;

        Ok(Paginated::new(items, page, limit, total))
    }

    async fn get(&self, id: Uuid) -> AppResult<Product> {
        self.uow.products().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let product = self.uow.products().create(new_product).await?;
        tracing::info!(product_id = %product.id, owner_id = %product.owner_id, "Product created");
        Ok(product)
    }

    async fn update(&self, actor_id: Uuid, id: Uuid, changes: ProductChanges) -> AppResult<Product> {
        let product = self.owned(actor_id, id).await?;
        if changes == ProductChanges::default() {
            return Ok(product);
        }

        self.uow.products().update(id, changes).await
    }

    async fn delete(&self, actor_id: Uuid, id: Uuid) -> AppResult<()> {
        self.owned(actor_id, id).await?;
        self.uow.products().delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::*;

    use super::*;
    use crate::infra::{MockProductRepository, MockUserRepository};
    use crate::services::test_support::{sample_product, TestUnitOfWork};

    fn manager(products: MockProductRepository) -> ProductManager<TestUnitOfWork> {
        ProductManager::new(Arc::new(TestUnitOfWork::new(
            MockUserRepository::new(),
            products,
        )))
    }

    fn params(page: u64, per_page: u64) -> PaginationParams {
        PaginationParams {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    // =========================================================================
    // Listing
    // =========================================================================

    #[tokio::test]
    async fn test_list_translates_page_to_offset() {
        let owner = Uuid::new_v4();
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .with(eq(20), eq(10))
            .returning(move |_, _| Ok((vec![sample_product(Uuid::new_v4(), owner)], 21)));

        let page = manager(products).list(params(3, 10)).await.unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.page, 3);
        assert_eq!(page.meta.per_page, 10);
        assert_eq!(page.meta.total, 21);
        assert_eq!(page.meta.total_pages, 3);
    }

    #[tokio::test]
    async fn test_list_caps_page_size() {
        let mut products = MockProductRepository::new();
        products
            .expect_list()
            .with(eq(0), eq(100))
            .returning(|_, _| Ok((vec![], 0)));

        let page = manager(products).list(params(1, 5000)).await.unwrap();
        assert_eq!(page.meta.per_page, 100);
        assert_eq!(page.meta.total_pages, 0);
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    #[tokio::test]
    async fn test_get_missing_product() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(products).get(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |id| Ok(Some(sample_product(id, owner))));
        products.expect_update().never();

        let changes = ProductChanges {
            stock: Some(10),
            ..Default::default()
        };
        let result = manager(products).update(Uuid::new_v4(), id, changes).await;

        assert!(matches!(result, Err(AppError::Authorization(ref m)) if m == "You do not own this product"));
    }

    #[tokio::test]
    async fn test_update_by_owner() {
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_product(id, owner))));
        products
            .expect_update()
            .withf(move |pid, changes| *pid == id && changes.price_cents == Some(500))
            .returning(move |id, changes| {
                let mut product = sample_product(id, owner);
                product.price_cents = changes.price_cents.unwrap_or(product.price_cents);
                Ok(product)
            });

        let changes = ProductChanges {
            price_cents: Some(500),
            ..Default::default()
        };
        let updated = manager(products).update(owner, id, changes).await.unwrap();
        assert_eq!(updated.price_cents, 500);
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_forbidden() {
        let owner = Uuid::new_v4();
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_product(id, owner))));
        products.expect_delete().never();

        let result = manager(products).delete(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_product(id, owner))));
        products
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(()));

        manager(products).delete(owner, id).await.unwrap();
    }
}
