//! Product catalog routes.
//!
//! The domain crate owns the handlers and service wiring; this module
//! just binds them to the shared database connection.

use axum::Router;
use domain_catalog::{CatalogService, PgProductRepository, handlers};

/// Build the products router backed by PostgreSQL.
pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let service = CatalogService::new(repository);
    handlers::router(service)
}
