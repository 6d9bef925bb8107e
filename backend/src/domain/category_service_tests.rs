//! Tests for the category service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::MockCategoryRepository;
use crate::domain::{DEFAULT_CATEGORY_NAME, ErrorCode};

const OWNER: MemberId = MemberId::new(1);
const STRANGER: MemberId = MemberId::new(2);

fn default_category(member_id: MemberId) -> Category {
    Category::new(
        CategoryId::new(100),
        member_id,
        CategoryName::default_name(),
        true,
    )
}

fn named_category(id: i64, member_id: MemberId, name: &str) -> Category {
    Category::new(
        CategoryId::new(id),
        member_id,
        CategoryName::new(name).expect("valid name"),
        false,
    )
}

#[tokio::test]
async fn default_category_is_created_on_first_use() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_default().times(1).return_once(|_| Ok(None));
    repo.expect_insert()
        .withf(|category| category.is_default && category.name.as_ref() == DEFAULT_CATEGORY_NAME)
        .times(1)
        .return_once(|_| Ok(default_category(OWNER)));

    let category = ensure_default_category(&repo, OWNER)
        .await
        .expect("default created");

    assert!(category.is_default());
}

#[tokio::test]
async fn default_category_insert_race_rereads() {
    let mut repo = MockCategoryRepository::new();
    let mut calls = 0;
    repo.expect_find_default().times(2).returning(move |member_id| {
        calls += 1;
        if calls == 1 {
            Ok(None)
        } else {
            Ok(Some(default_category(member_id)))
        }
    });
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(CategoryRepositoryError::duplicate("categories_member_id_name_key")));

    let category = ensure_default_category(&repo, OWNER)
        .await
        .expect("existing default returned");

    assert_eq!(category.id(), CategoryId::new(100));
}

#[tokio::test]
async fn create_rejects_duplicate_name() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_default()
        .return_once(|member_id| Ok(Some(default_category(member_id))));
    repo.expect_exists_by_name()
        .times(1)
        .return_once(|_, _| Ok(true));
    repo.expect_insert().times(0);

    let service = CategoryService::new(Arc::new(repo));
    let error = service
        .create(OWNER, CategoryName::new("Rust").expect("valid name"))
        .await
        .expect_err("duplicate name");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn create_inserts_non_default_category() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_default()
        .return_once(|member_id| Ok(Some(default_category(member_id))));
    repo.expect_exists_by_name().return_once(|_, _| Ok(false));
    repo.expect_insert()
        .withf(|category| !category.is_default && category.name.as_ref() == "Rust")
        .times(1)
        .return_once(|_| Ok(named_category(5, OWNER, "Rust")));

    let service = CategoryService::new(Arc::new(repo));
    let created = service
        .create(OWNER, CategoryName::new("Rust").expect("valid name"))
        .await
        .expect("category created");

    assert_eq!(created.id(), CategoryId::new(5));
}

#[rstest]
#[case(None, ErrorCode::NotFound)]
#[case(Some(named_category(5, STRANGER, "Theirs")), ErrorCode::Forbidden)]
#[case(Some(default_category(OWNER)), ErrorCode::InvalidRequest)]
#[tokio::test]
async fn delete_guards(#[case] stored: Option<Category>, #[case] expected: ErrorCode) {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(stored));
    repo.expect_delete().times(0);

    let service = CategoryService::new(Arc::new(repo));
    let error = service
        .delete(OWNER, CategoryId::new(5))
        .await
        .expect_err("delete refused");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn delete_refuses_category_in_use() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(named_category(5, OWNER, "Rust"))));
    repo.expect_is_in_use().times(1).return_once(|_| Ok(true));
    repo.expect_delete().times(0);

    let service = CategoryService::new(Arc::new(repo));
    let error = service
        .delete(OWNER, CategoryId::new(5))
        .await
        .expect_err("category in use");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn delete_removes_unused_owned_category() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Ok(Some(named_category(5, OWNER, "Rust"))));
    repo.expect_is_in_use().return_once(|_| Ok(false));
    repo.expect_delete()
        .withf(|id| *id == CategoryId::new(5))
        .times(1)
        .return_once(|_| Ok(true));

    let service = CategoryService::new(Arc::new(repo));
    service
        .delete(OWNER, CategoryId::new(5))
        .await
        .expect("category deleted");
}

#[tokio::test]
async fn list_returns_categories_after_ensuring_default() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_default()
        .return_once(|member_id| Ok(Some(default_category(member_id))));
    repo.expect_list_for_member().times(1).return_once(|member_id| {
        Ok(vec![
            default_category(member_id),
            named_category(5, member_id, "Rust"),
        ])
    });

    let service = CategoryService::new(Arc::new(repo));
    let categories = service.list(OWNER).await.expect("listing succeeds");

    assert_eq!(categories.len(), 2);
    assert!(categories.iter().all(|category| category.member_id() == OWNER));
}
