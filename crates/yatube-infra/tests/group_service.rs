use std::sync::Arc;

use yatube_core::services::GroupService;
use yatube_core::{DomainError, ValidationErrorKind};
use yatube_infra::InMemoryStore;

fn service() -> GroupService {
    GroupService::new(Arc::new(InMemoryStore::new().groups()))
}

#[tokio::test]
async fn create_group() {
    let service = service();
    let group = service
        .create_group("Test_group", "test-slug", "Test_description")
        .await
        .unwrap();

    assert_eq!(group.slug, "test-slug");
    assert_eq!(group.description, "Test_description");
}

#[tokio::test]
async fn duplicate_slug() {
    let service = service();
    service.create_group("One", "same", "").await.unwrap();

    let err = service.create_group("Two", "same", "").await.unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn invalid_group() {
    let err = service().create_group("", "not a slug", "").await.unwrap_err();

    let DomainError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.has_kind("title", &ValidationErrorKind::EmptyField));
    assert!(errors.has_kind("slug", &ValidationErrorKind::InvalidSlug));
}

#[tokio::test]
async fn delete_unknown_group() {
    let err = service().delete_group("missing").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Group", .. }));
}
