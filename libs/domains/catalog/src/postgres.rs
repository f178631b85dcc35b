use async_trait::async_trait;
use database::postgres::DatabaseConnection;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::{
    entity,
    error::{CatalogError, CatalogResult},
    models::{CreateProduct, Product, UpdateProduct},
    repository::ProductRepository,
};

/// PostgreSQL implementation of ProductRepository backed by SeaORM
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let active_model: entity::ActiveModel = input.into();

        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn count_active(&self) -> CatalogResult<u64> {
        let total = entity::Entity::find()
            .filter(entity::Column::Available.eq(true))
            .count(&self.db)
            .await?;

        Ok(total)
    }

    async fn list_active(&self, skip: u64, take: u64) -> CatalogResult<Vec<Product>> {
        let models = entity::Entity::find()
            .filter(entity::Column::Available.eq(true))
            .order_by_asc(entity::Column::Id)
            .offset(skip)
            .limit(take)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn find_active(&self, id: i64) -> CatalogResult<Option<Product>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Available.eq(true))
            .one(&self.db)
            .await?;

        Ok(model.map(|m| m.into()))
    }

    async fn update(&self, id: i64, input: UpdateProduct) -> CatalogResult<Product> {
        // Only the changed columns go into the UPDATE, no prior SELECT
        let mut active_model = entity::ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        if let Some(description) = input.description {
            active_model.description = Set(description);
        }
        if let Some(price) = input.price {
            active_model.price = Set(price);
        }

        let updated = active_model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => CatalogError::NotFound(id),
            other => other.into(),
        })?;

        tracing::info!(product_id = id, "Updated product");
        Ok(updated.into())
    }

    async fn mark_unavailable(&self, id: i64) -> CatalogResult<Product> {
        let active_model = entity::ActiveModel {
            id: Set(id),
            available: Set(false),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let updated = active_model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => CatalogError::NotFound(id),
            other => other.into(),
        })?;

        tracing::info!(product_id = id, "Marked product unavailable");
        Ok(updated.into())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> CatalogResult<Vec<Product>> {
        // No availability filter here: callers need to see soft-deleted rows too
        let models = entity::Entity::find()
            .filter(entity::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn stored(id: i64, name: &str, available: bool) -> entity::Model {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        entity::Model {
            id,
            name: name.to_string(),
            description: String::new(),
            price: 100,
            available,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_update_issues_a_single_statement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored(7, "renamed", true)]])
            .into_connection();
        let repo = PgProductRepository { db };

        let input = UpdateProduct {
            name: Some("renamed".to_string()),
            ..Default::default()
        };
        let updated = repo.update(7, input).await.unwrap();
        assert_eq!(updated.name, "renamed");

        let log = repo.db.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_mark_unavailable_issues_a_single_statement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored(7, "widget", false)]])
            .into_connection();
        let repo = PgProductRepository { db };

        let removed = repo.mark_unavailable(7).await.unwrap();
        assert!(!removed.available);

        let log = repo.db.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_update_of_missing_row_maps_to_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository { db };

        let err = repo
            .update(404, UpdateProduct::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(404)));
    }
}
