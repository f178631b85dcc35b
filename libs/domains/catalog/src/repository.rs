use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateProduct, Product, UpdateProduct};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product; the store assigns the id
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product>;

    /// Count available products
    async fn count_active(&self) -> CatalogResult<u64>;

    /// List available products ordered by id, skipping `skip` and taking `take`
    async fn list_active(&self, skip: u64, take: u64) -> CatalogResult<Vec<Product>>;

    /// Find an available product by id
    async fn find_active(&self, id: i64) -> CatalogResult<Option<Product>>;

    /// Update an existing product
    async fn update(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product>;

    /// Soft-delete a product by flipping its available flag, returning the updated record
    async fn mark_unavailable(&self, id: i64) -> CatalogResult<Product>;

    /// Fetch products by id regardless of availability
    async fn find_by_ids(&self, ids: &[i64]) -> CatalogResult<Vec<Product>>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<i64, Product>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let product = Product::new(id, input);
        products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn count_active(&self) -> CatalogResult<u64> {
        let products = self.products.read().await;
        Ok(products.values().filter(|p| p.available).count() as u64)
    }

    async fn list_active(&self, skip: u64, take: u64) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products.values().filter(|p| p.available).cloned().collect();

        // Stable order by id
        result.sort_by_key(|p| p.id);

        let result: Vec<Product> = result
            .into_iter()
            .skip(skip as usize)
            .take(take as usize)
            .collect();

        Ok(result)
    }

    async fn find_active(&self, id: i64) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).filter(|p| p.available).cloned())
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        product.apply_update(input);
        let updated = product.clone();

        tracing::info!(product_id = id, "Updated product");
        Ok(updated)
    }

    async fn mark_unavailable(&self, id: i64) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        product.available = false;
        product.updated_at = chrono::Utc::now();
        let updated = product.clone();

        tracing::info!(product_id = id, "Marked product unavailable");
        Ok(updated)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = ids
            .iter()
            .filter_map(|id| products.get(id).cloned())
            .collect();

        result.sort_by_key(|p| p.id);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(name: &str, price: i64) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: String::new(),
            price,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryProductRepository::new();

        let first = repo.create(widget("first", 100)).await.unwrap();
        let second = repo.create(widget("second", 200)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.available);
    }

    #[tokio::test]
    async fn test_default_repo_starts_ids_at_one() {
        let repo = InMemoryProductRepository::default();

        let first = repo.create(widget("first", 100)).await.unwrap();
        assert_eq!(first.id, 1);
    }

    #[tokio::test]
    async fn test_find_active_skips_unavailable() {
        let repo = InMemoryProductRepository::new();

        let product = repo.create(widget("gone", 100)).await.unwrap();
        repo.mark_unavailable(product.id).await.unwrap();

        let fetched = repo.find_active(product.id).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_list_active_paginates_in_id_order() {
        let repo = InMemoryProductRepository::new();
        for i in 0..5 {
            repo.create(widget(&format!("p{}", i), 100)).await.unwrap();
        }

        let page = repo.list_active(2, 2).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_find_by_ids_includes_unavailable() {
        let repo = InMemoryProductRepository::new();

        let kept = repo.create(widget("kept", 100)).await.unwrap();
        let removed = repo.create(widget("removed", 200)).await.unwrap();
        repo.mark_unavailable(removed.id).await.unwrap();

        let found = repo.find_by_ids(&[kept.id, removed.id]).await.unwrap();
        assert_eq!(found.len(), 2);
    }
}
