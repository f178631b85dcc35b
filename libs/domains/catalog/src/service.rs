use std::collections::BTreeSet;
use std::sync::Arc;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateProduct, PageMetadata, Pagination, Product, ProductPage, UpdateProduct,
};
use crate::repository::ProductRepository;

/// Service layer for catalog business logic
#[derive(Clone)]
pub struct CatalogService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> CatalogService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// List available products for one page, with pagination metadata.
    ///
    /// A page past the end of the collection yields an empty data array,
    /// not an error; the metadata still reflects the requested page.
    pub async fn find_all(&self, pagination: Pagination) -> CatalogResult<ProductPage> {
        pagination
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let total = self.repository.count_active().await?;
        let total_pages = total.div_ceil(pagination.limit as u64);

        let data = self
            .repository
            .list_active(pagination.skip(), pagination.limit as u64)
            .await?;

        Ok(ProductPage {
            data,
            metadata: PageMetadata {
                total,
                page: pagination.page,
                limit: pagination.limit,
                total_pages,
            },
        })
    }

    /// Get an available product by id
    pub async fn find_one(&self, id: i64) -> CatalogResult<Product> {
        self.repository
            .find_active(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Update a product.
    ///
    /// The lookup happens first so a missing or soft-deleted product
    /// surfaces as NotFound before any write is attempted.
    pub async fn update_product(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.find_one(id).await?;

        self.repository.update(id, input).await
    }

    /// Soft-delete a product by marking it unavailable.
    ///
    /// Removing an already-removed product returns NotFound because the
    /// lookup only sees available products.
    pub async fn remove_product(&self, id: i64) -> CatalogResult<Product> {
        self.find_one(id).await?;

        self.repository.mark_unavailable(id).await
    }

    /// Validate that every referenced product id exists.
    ///
    /// Duplicate ids are collapsed before the lookup. The check is
    /// existence-only: soft-deleted products still validate, since the
    /// lookup deliberately skips the availability filter.
    pub async fn validate_products(&self, ids: Vec<i64>) -> CatalogResult<Vec<Product>> {
        let unique: BTreeSet<i64> = ids.into_iter().collect();
        let unique: Vec<i64> = unique.into_iter().collect();

        let products = self.repository.find_by_ids(&unique).await?;

        if products.len() != unique.len() {
            return Err(CatalogError::MissingProducts);
        }

        Ok(products)
    }
}
