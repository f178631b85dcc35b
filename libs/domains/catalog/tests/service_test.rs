//! End-to-end scenario tests for the catalog service against the
//! in-memory repository.

use domain_catalog::*;

fn create(name: &str, price: i64) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        description: String::new(),
        price,
    }
}

fn service() -> CatalogService<InMemoryProductRepository> {
    CatalogService::new(InMemoryProductRepository::new())
}

#[tokio::test]
async fn test_removed_product_disappears_from_listings() {
    let service = service();

    let kept = service.create_product(create("kept", 100)).await.unwrap();
    let removed = service
        .create_product(create("removed", 200))
        .await
        .unwrap();

    let page = service.find_all(Pagination::default()).await.unwrap();
    assert_eq!(page.metadata.total, 2);

    service.remove_product(removed.id).await.unwrap();

    let page = service.find_all(Pagination::default()).await.unwrap();
    assert_eq!(page.metadata.total, 1);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, kept.id);
}

#[tokio::test]
async fn test_removing_twice_returns_not_found() {
    let service = service();

    let product = service.create_product(create("once", 100)).await.unwrap();

    let removed = service.remove_product(product.id).await.unwrap();
    assert!(!removed.available);

    let result = service.remove_product(product.id).await;
    assert!(matches!(result, Err(CatalogError::NotFound(id)) if id == product.id));
}

#[tokio::test]
async fn test_find_one_does_not_see_removed_products() {
    let service = service();

    let product = service.create_product(create("ghost", 100)).await.unwrap();
    service.remove_product(product.id).await.unwrap();

    let result = service.find_one(product.id).await;
    assert!(matches!(result, Err(CatalogError::NotFound(_))));
}

#[tokio::test]
async fn test_update_preserves_unspecified_fields() {
    let service = service();

    let product = service
        .create_product(CreateProduct {
            name: "original".to_string(),
            description: "original description".to_string(),
            price: 100,
        })
        .await
        .unwrap();

    let updated = service
        .update_product(
            product.id,
            UpdateProduct {
                name: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.description, "original description");
    assert_eq!(updated.price, 100);
    assert_eq!(updated.id, product.id);
}

#[tokio::test]
async fn test_update_missing_product_returns_not_found() {
    let service = service();

    let result = service
        .update_product(
            12345,
            UpdateProduct {
                price: Some(1),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(CatalogError::NotFound(12345))));
}

#[tokio::test]
async fn test_validate_still_succeeds_after_soft_delete() {
    // Existence is what gets validated, not availability
    let service = service();

    let product = service.create_product(create("retired", 100)).await.unwrap();
    service.remove_product(product.id).await.unwrap();

    let products = service.validate_products(vec![product.id]).await.unwrap();
    assert_eq!(products.len(), 1);
    assert!(!products[0].available);
}

#[tokio::test]
async fn test_validate_empty_id_list_is_ok() {
    let service = service();

    let products = service.validate_products(vec![]).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_pagination_metadata_tracks_soft_deletes() {
    let service = service();

    let mut ids = Vec::new();
    for i in 0..21 {
        let product = service
            .create_product(create(&format!("p{}", i), 100))
            .await
            .unwrap();
        ids.push(product.id);
    }

    let page = service.find_all(Pagination::default()).await.unwrap();
    assert_eq!(page.metadata.total, 21);
    assert_eq!(page.metadata.total_pages, 3);

    service.remove_product(ids[0]).await.unwrap();

    let page = service.find_all(Pagination::default()).await.unwrap();
    assert_eq!(page.metadata.total, 20);
    assert_eq!(page.metadata.total_pages, 2);
}
