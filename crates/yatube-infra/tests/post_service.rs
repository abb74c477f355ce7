//! Post listings and the create/edit form handler against the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use yatube_core::domain::{Group, Post, User};
use yatube_core::forms::PostForm;
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, GroupRepository, PostFilter, PostRepository};
use yatube_core::services::{GroupService, PostService};
use yatube_core::{DomainError, ValidationErrorKind};
use yatube_infra::InMemoryStore;

struct Fixture {
    store: Arc<InMemoryStore>,
    service: PostService,
    author: User,
    group: Group,
}

impl Fixture {
    async fn new() -> Self {
        let store = InMemoryStore::new();
        let author = store
            .users()
            .insert(User::new("author".into(), "author@example.com".into(), "hash".into()))
            .await
            .unwrap();
        let group = store
            .groups()
            .insert(Group::new("Test_group", "test-slug", "Test_description").unwrap())
            .await
            .unwrap();
        let service = PostService::new(
            Arc::new(store.posts()),
            Arc::new(store.groups()),
            Arc::new(store.users()),
        );

        Self {
            store,
            service,
            author,
            group,
        }
    }

    async fn add_user(&self, username: &str) -> User {
        self.store
            .users()
            .insert(User::new(username.into(), format!("{username}@example.com"), "hash".into()))
            .await
            .unwrap()
    }

    async fn add_group(&self, title: &str, slug: &str) -> Group {
        self.store
            .groups()
            .insert(Group::new(title, slug, "").unwrap())
            .await
            .unwrap()
    }

    /// Store `n` posts one minute apart, oldest first.
    async fn bulk_posts(&self, author: &User, group: Option<&Group>, n: i64) -> Vec<Post> {
        let start = Utc::now() - Duration::days(1);
        let mut stored = Vec::new();
        for i in 0..n {
            let mut post = Post::new(author.id, format!("Тестовый пост {i}"), group.map(|g| g.id));
            post.pub_date = start + Duration::minutes(i);
            stored.push(self.store.posts().insert(post).await.unwrap());
        }
        stored
    }

    async fn post_count(&self) -> u64 {
        self.store.posts().count(PostFilter::All).await.unwrap()
    }
}

fn form(text: &str, group: Option<&Group>) -> PostForm {
    PostForm {
        text: text.into(),
        group: group.map(|g| g.id.to_string()),
    }
}

#[tokio::test]
async fn create_post_stores_trimmed_text_for_actor() {
    let fx = Fixture::new().await;
    let actor = fx.author.actor();

    let post = fx
        .service
        .create_post(&actor, &form("  Уникальный текст для проверки форм  ", Some(&fx.group)))
        .await
        .unwrap();

    assert_eq!(post.text, "Уникальный текст для проверки форм");
    assert_eq!(post.author_id, fx.author.id);
    assert_eq!(post.group_id, Some(fx.group.id));
    assert_eq!(fx.post_count().await, 1);
}

#[tokio::test]
async fn create_post_without_group() {
    let fx = Fixture::new().await;
    let post = fx
        .service
        .create_post(&fx.author.actor(), &PostForm {
            text: "no group".into(),
            group: Some(String::new()),
        })
        .await
        .unwrap();

    assert_eq!(post.group_id, None);
}

#[tokio::test]
async fn create_post_rejects_blank_text_without_persisting() {
    let fx = Fixture::new().await;

    for text in ["", "   ", "\n\t"] {
        let err = fx
            .service
            .create_post(&fx.author.actor(), &form(text, None))
            .await
            .unwrap_err();

        match err {
            DomainError::Validation(errors) => {
                assert!(errors.has_kind("text", &ValidationErrorKind::EmptyField))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(fx.post_count().await, 0);
}

#[tokio::test]
async fn create_post_rejects_unknown_group() {
    let fx = Fixture::new().await;
    let err = fx
        .service
        .create_post(&fx.author.actor(), &PostForm {
            text: "".into(),
            group: Some(Uuid::new_v4().to_string()),
        })
        .await
        .unwrap_err();

    let DomainError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.has_kind("text", &ValidationErrorKind::EmptyField));
    assert!(errors.has_kind("group", &ValidationErrorKind::InvalidChoice));
    assert_eq!(fx.post_count().await, 0);
}

#[tokio::test]
async fn edit_post_updates_text_and_group_only() {
    let fx = Fixture::new().await;
    let other_group = fx.add_group("Other", "other").await;
    let original = fx.bulk_posts(&fx.author, Some(&fx.group), 1).await.remove(0);

    let edited = fx
        .service
        .edit_post(&fx.author.actor(), original.id, &form("Изменённый текст", Some(&other_group)))
        .await
        .unwrap();

    assert_eq!(edited.id, original.id);
    assert_eq!(edited.text, "Изменённый текст");
    assert_eq!(edited.group_id, Some(other_group.id));
    assert_eq!(edited.pub_date, original.pub_date);
    assert_eq!(edited.author_id, fx.author.id);
    assert_eq!(fx.post_count().await, 1);
}

#[tokio::test]
async fn edit_post_can_clear_group() {
    let fx = Fixture::new().await;
    let original = fx.bulk_posts(&fx.author, Some(&fx.group), 1).await.remove(0);

    let edited = fx
        .service
        .edit_post(&fx.author.actor(), original.id, &form("text", None))
        .await
        .unwrap();

    assert_eq!(edited.group_id, None);
}

#[tokio::test]
async fn edit_by_non_author_is_forbidden_and_changes_nothing() {
    let fx = Fixture::new().await;
    let intruder = fx.add_user("noname").await;
    let original = fx.bulk_posts(&fx.author, Some(&fx.group), 1).await.remove(0);

    let err = fx
        .service
        .edit_post(&intruder.actor(), original.id, &form("hijacked", None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let err = fx
        .service
        .post_for_edit(&intruder.actor(), original.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let stored = fx.store.posts().find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored, original);
}

#[tokio::test]
async fn edit_missing_post_is_not_found() {
    let fx = Fixture::new().await;
    let err = fx
        .service
        .edit_post(&fx.author.actor(), Uuid::new_v4(), &form("text", None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn invalid_edit_keeps_stored_post() {
    let fx = Fixture::new().await;
    let original = fx.bulk_posts(&fx.author, None, 1).await.remove(0);

    let err = fx
        .service
        .edit_post(&fx.author.actor(), original.id, &form("  ", None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let stored = fx.store.posts().find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.text, original.text);
}

#[tokio::test]
async fn listings_paginate_ten_per_page() {
    let fx = Fixture::new().await;
    fx.bulk_posts(&fx.author, Some(&fx.group), 13).await;

    let first = fx.service.index(None).await.unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(first.num_pages, 2);
    assert_eq!(first.object_list[0].post.text, "Тестовый пост 12");

    let second = fx.service.index(Some("2")).await.unwrap();
    assert_eq!(second.len(), 3);

    let (_, group_page) = fx.service.group_posts("test-slug", Some("2")).await.unwrap();
    assert_eq!(group_page.len(), 3);

    let (_, profile_page) = fx.service.profile("author", Some("2")).await.unwrap();
    assert_eq!(profile_page.len(), 3);
}

#[tokio::test]
async fn listings_fall_back_softly() {
    let fx = Fixture::new().await;
    fx.bulk_posts(&fx.author, None, 13).await;

    assert_eq!(fx.service.index(Some("abc")).await.unwrap().number, 1);
    assert_eq!(fx.service.index(Some("0")).await.unwrap().number, 1);

    let past_end = fx.service.index(Some("99")).await.unwrap();
    assert_eq!(past_end.number, 2);
    assert_eq!(past_end.len(), 3);
}

#[tokio::test]
async fn empty_index_has_one_empty_page() {
    let fx = Fixture::new().await;
    let page = fx.service.index(Some("3")).await.unwrap();

    assert!(page.is_empty());
    assert_eq!(page.num_pages, 1);
}

#[tokio::test]
async fn group_membership_decides_visibility() {
    let fx = Fixture::new().await;
    fx.bulk_posts(&fx.author, Some(&fx.group), 2).await;

    let new_author = fx.add_user("new_author").await;
    let new_group = fx.add_group("new_group", "new-slug").await;
    let post = fx
        .service
        .create_post(&new_author.actor(), &form("новый пост", Some(&new_group)))
        .await
        .unwrap();

    let index = fx.service.index(None).await.unwrap();
    assert_eq!(index.object_list[0].post.id, post.id);

    let (_, in_group) = fx.service.group_posts("new-slug", None).await.unwrap();
    assert_eq!(in_group.object_list[0].post.id, post.id);

    let (author, profile) = fx.service.profile("new_author", None).await.unwrap();
    assert_eq!(author.username, "new_author");
    assert_eq!(profile.object_list[0].post.id, post.id);

    let (_, other_group) = fx.service.group_posts("test-slug", None).await.unwrap();
    assert!(other_group.object_list.iter().all(|v| v.post.id != post.id));
}

#[tokio::test]
async fn unknown_group_and_user_are_not_found() {
    let fx = Fixture::new().await;

    let err = fx.service.group_posts("missing", None).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Group", .. }));

    let err = fx.service.profile("ghost", None).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "User", .. }));

    let err = fx.service.post_detail(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn profile_shows_the_single_post_with_its_relations() {
    let fx = Fixture::new().await;
    let post = fx
        .service
        .create_post(&fx.author.actor(), &form("Тестовый пост", Some(&fx.group)))
        .await
        .unwrap();

    let (_, page) = fx.service.profile("author", None).await.unwrap();

    assert_eq!(page.len(), 1);
    let view = &page.object_list[0];
    assert_eq!(view.post.id, post.id);
    assert_eq!(view.post.text, "Тестовый пост");
    assert_eq!(view.author.username, "author");
    assert_eq!(view.group.as_ref().map(|g| g.title.as_str()), Some("Test_group"));
}

#[tokio::test]
async fn deleting_group_keeps_its_posts() {
    let fx = Fixture::new().await;
    let post = fx.bulk_posts(&fx.author, Some(&fx.group), 1).await.remove(0);

    GroupService::new(Arc::new(fx.store.groups()))
        .delete_group("test-slug")
        .await
        .unwrap();

    let view = fx.service.post_detail(post.id).await.unwrap();
    assert!(view.group.is_none());
    assert_eq!(view.post.group_id, None);
    assert_eq!(fx.post_count().await, 1);
}

#[tokio::test]
async fn group_choices_sorted_by_title() {
    let fx = Fixture::new().await;
    fx.add_group("Alpha", "alpha").await;

    let titles: Vec<String> = fx
        .service
        .group_choices()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.title)
        .collect();
    assert_eq!(titles, ["Alpha", "Test_group"]);
}

/// Group lookups that still see one group after it left storage.
struct StaleGroups {
    inner: yatube_infra::memory::InMemoryGroupRepository,
    stale: Group,
}

#[async_trait::async_trait]
impl BaseRepository<Group, Uuid> for StaleGroups {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        if id == self.stale.id {
            return Ok(Some(self.stale.clone()));
        }
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, group: Group) -> Result<Group, RepoError> {
        self.inner.insert(group).await
    }

    async fn update(&self, group: Group) -> Result<Group, RepoError> {
        self.inner.update(group).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.inner.delete(id).await
    }
}

#[async_trait::async_trait]
impl GroupRepository for StaleGroups {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        self.inner.find_by_slug(slug).await
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        self.inner.find_by_ids(ids).await
    }

    async fn find_all(&self) -> Result<Vec<Group>, RepoError> {
        self.inner.find_all().await
    }
}

#[tokio::test]
async fn group_deleted_after_validation_is_a_form_error() {
    let fx = Fixture::new().await;
    let doomed = fx.add_group("Doomed", "doomed").await;
    let kept = fx.bulk_posts(&fx.author, None, 1).await.remove(0);
    fx.store.groups().delete(doomed.id).await.unwrap();

    let service = PostService::new(
        Arc::new(fx.store.posts()),
        Arc::new(StaleGroups {
            inner: fx.store.groups(),
            stale: doomed.clone(),
        }),
        Arc::new(fx.store.users()),
    );
    let actor = fx.author.actor();

    for result in [
        service.create_post(&actor, &form("Новый пост", Some(&doomed))).await,
        service
            .edit_post(&actor, kept.id, &form("Правка", Some(&doomed)))
            .await,
    ] {
        match result {
            Err(DomainError::Validation(errors)) => {
                assert!(errors.has_kind("group", &ValidationErrorKind::InvalidChoice));
            }
            other => panic!("expected a group error, got {other:?}"),
        }
    }

    assert_eq!(fx.post_count().await, 1);
    assert_eq!(
        fx.store.posts().find_by_id(kept.id).await.unwrap().unwrap().text,
        kept.text
    );
}
