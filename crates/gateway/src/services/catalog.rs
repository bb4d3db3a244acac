//! `PostgreSQL` catalog collaborator.

use async_trait::async_trait;
use sqlx::PgPool;

use stylish_core::{Category, Product, ProductId};

use super::{CatalogError, CatalogService};
use crate::db::ProductRepository;

/// Catalog backed by the `product` table.
///
/// Each listing query over-fetches one row past the page so the gateway can
/// detect a following page.
#[derive(Clone)]
pub struct PgCatalogService {
    pool: PgPool,
    page_size: usize,
}

impl PgCatalogService {
    #[must_use]
    pub const fn new(pool: PgPool, page_size: usize) -> Self {
        Self { pool, page_size }
    }

    /// `(limit, offset)` for a page, with the extra probe row included.
    fn window(&self, page_index: u32) -> (i64, i64) {
        let page_size = i64::try_from(self.page_size).unwrap_or(i64::MAX);
        let offset = page_size.saturating_mul(i64::from(page_index));
        (page_size.saturating_add(1), offset)
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_by_category(
        &self,
        category: Category,
        page_index: u32,
    ) -> Result<Vec<Product>, CatalogError> {
        let (limit, offset) = self.window(page_index);
        let products = ProductRepository::new(&self.pool)
            .list_by_category(category, limit, offset)
            .await?;
        Ok(products)
    }

    async fn search(&self, keyword: &str, page_index: u32) -> Result<Vec<Product>, CatalogError> {
        let (limit, offset) = self.window(page_index);
        let products = ProductRepository::new(&self.pool)
            .search(keyword, limit, offset)
            .await?;
        Ok(products)
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        ProductRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("product {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(page_size: usize) -> PgCatalogService {
        // connect_lazy never touches the network until a query runs
        let pool = PgPool::connect_lazy("postgres://localhost/stylish").unwrap_or_else(|e| {
            panic!("lazy pool should not fail: {e}");
        });
        PgCatalogService::new(pool, page_size)
    }

    #[tokio::test]
    async fn test_window_over_fetches_by_one() {
        let catalog = service(6);
        assert_eq!(catalog.window(0), (7, 0));
        assert_eq!(catalog.window(1), (7, 6));
        assert_eq!(catalog.window(3), (7, 18));
    }

    #[tokio::test]
    async fn test_window_saturates() {
        let catalog = service(usize::MAX);
        let (limit, offset) = catalog.window(u32::MAX);
        assert_eq!(limit, i64::MAX);
        assert_eq!(offset, i64::MAX);
    }
}
