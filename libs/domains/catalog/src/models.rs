use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Product entity - a single item in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Store-assigned unique identifier
    pub id: i64,
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Price in minor currency units (e.g., cents)
    pub price: i64,
    /// Whether the product is available (soft-delete flag)
    pub available: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0))]
    pub price: i64,
}

/// DTO for partially updating an existing product
///
/// The product id is never part of the payload; it comes from the URL path.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
}

/// Query parameters for paginated listings
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct Pagination {
    /// 1-based page number
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i64,
    /// Maximum number of records per page
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl Pagination {
    /// Number of records to skip for this page
    ///
    /// Saturates instead of overflowing: an absurdly large page number
    /// lands past the end of the data, which the listing already
    /// answers with an empty page.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit) as u64
    }
}

/// Pagination metadata returned alongside a page of products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageMetadata {
    /// Total number of available products
    pub total: u64,
    /// Page number this metadata describes
    pub page: i64,
    /// Page size used for the listing
    pub limit: i64,
    /// Total number of pages at this page size
    pub total_pages: u64,
}

/// A page of products with pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub metadata: PageMetadata,
}

/// DTO for validating a set of product ids
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ValidateProducts {
    pub ids: Vec<i64>,
}

impl Product {
    /// Create a new product from CreateProduct DTO (used by in-memory storage)
    pub fn new(id: i64, input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateProduct DTO
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::default();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.skip(), 0);
    }

    #[test]
    fn test_pagination_skip() {
        let pagination = Pagination { page: 3, limit: 10 };
        assert_eq!(pagination.skip(), 20);
    }

    #[test]
    fn test_pagination_skip_saturates_on_huge_page() {
        let pagination = Pagination {
            page: i64::MAX,
            limit: 10,
        };
        assert_eq!(pagination.skip(), i64::MAX as u64);
    }

    #[test]
    fn test_apply_update_only_changes_provided_fields() {
        let mut product = Product::new(
            1,
            CreateProduct {
                name: "widget".to_string(),
                description: "a widget".to_string(),
                price: 500,
            },
        );

        product.apply_update(UpdateProduct {
            price: Some(750),
            ..Default::default()
        });

        assert_eq!(product.name, "widget");
        assert_eq!(product.description, "a widget");
        assert_eq!(product.price, 750);
        assert!(product.available);
    }

    #[test]
    fn test_validation_rejects_empty_name() {
        let input = CreateProduct {
            name: String::new(),
            description: String::new(),
            price: 100,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_price() {
        let input = CreateProduct {
            name: "widget".to_string(),
            description: String::new(),
            price: -1,
        };
        assert!(input.validate().is_err());
    }
}
