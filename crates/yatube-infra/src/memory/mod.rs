//! In-memory store - used when no database is configured and in tests.
//!
//! All three repositories share one [`InMemoryStore`] so that the relational
//! rules a database would enforce hold here too: unique usernames and slugs,
//! posts referencing existing rows, and posts losing their group when the
//! group is deleted.
//! Note: Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Group, Post, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, GroupRepository, PostFilter, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    groups: HashMap<Uuid, Group>,
    posts: HashMap<Uuid, Post>,
}

/// Shared tables behind an async RwLock.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn users(self: &Arc<Self>) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: Arc::clone(self),
        }
    }

    pub fn groups(self: &Arc<Self>) -> InMemoryGroupRepository {
        InMemoryGroupRepository {
            store: Arc::clone(self),
        }
    }

    pub fn posts(self: &Arc<Self>) -> InMemoryPostRepository {
        InMemoryPostRepository {
            store: Arc::clone(self),
        }
    }
}

impl Tables {
    fn check_post_references(&self, post: &Post) -> Result<(), RepoError> {
        if !self.users.contains_key(&post.author_id) {
            return Err(RepoError::ForeignKey(format!(
                "author {} does not exist",
                post.author_id
            )));
        }
        if let Some(group_id) = post.group_id {
            if !self.groups.contains_key(&group_id) {
                return Err(RepoError::ForeignKey(format!(
                    "group {group_id} does not exist"
                )));
            }
        }
        Ok(())
    }

    /// Newest first; equal dates keep a stable order by id.
    fn filtered_posts(&self, filter: PostFilter) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.values().filter(|p| filter.matches(p)).collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then_with(|| a.id.cmp(&b.id)));
        posts
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username '{}' is taken",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        match tables.users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;
        // Posts cascade with their author.
        tables.posts.retain(|_, post| post.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }
}

/// In-memory group repository.
pub struct InMemoryGroupRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.groups.get(&id).cloned())
    }

    async fn insert(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.groups.values().any(|g| g.slug == group.slug) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' is taken",
                group.slug
            )));
        }
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn update(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.store.tables.write().await;
        match tables.groups.get_mut(&group.id) {
            Some(stored) => {
                *stored = group.clone();
                Ok(group)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.groups.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.group_id == Some(id) {
                post.group_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.groups.get(id).cloned()).collect())
    }

    async fn find_all(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_post_references(&post)?;
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!("post {} exists", post.id)));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_post_references(&post)?;
        match tables.posts.get_mut(&post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.posts.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn find_page(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .filtered_posts(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    async fn seeded() -> (Arc<InMemoryStore>, User, Group) {
        let store = InMemoryStore::new();
        let user = store
            .users()
            .insert(User::new("author".into(), "author@example.com".into(), "hash".into()))
            .await
            .unwrap();
        let group = store
            .groups()
            .insert(Group::new("Test_group", "test-slug", "Test_description").unwrap())
            .await
            .unwrap();
        (store, user, group)
    }

    #[tokio::test]
    async fn test_find_page_orders_newest_first() {
        let (store, user, _) = seeded().await;
        let posts = store.posts();
        let start = Utc::now();

        for i in 0..3 {
            let mut post = Post::new(user.id, format!("post {i}"), None);
            post.pub_date = start + Duration::seconds(i);
            posts.insert(post).await.unwrap();
        }

        let page = posts.find_page(PostFilter::All, 0, 2).await.unwrap();
        let texts: Vec<_> = page.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, ["post 2", "post 1"]);

        let rest = posts.find_page(PostFilter::All, 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].text, "post 0");
    }

    #[tokio::test]
    async fn test_filters() {
        let (store, user, group) = seeded().await;
        let posts = store.posts();
        posts.insert(Post::new(user.id, "in group".into(), Some(group.id))).await.unwrap();
        posts.insert(Post::new(user.id, "no group".into(), None)).await.unwrap();

        assert_eq!(posts.count(PostFilter::All).await.unwrap(), 2);
        assert_eq!(posts.count(PostFilter::Group(group.id)).await.unwrap(), 1);
        assert_eq!(posts.count(PostFilter::Author(user.id)).await.unwrap(), 2);
        assert_eq!(posts.count(PostFilter::Author(Uuid::new_v4())).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_references_are_rejected() {
        let (store, user, _) = seeded().await;
        let posts = store.posts();

        let orphan = Post::new(Uuid::new_v4(), "text".into(), None);
        assert!(matches!(posts.insert(orphan).await, Err(RepoError::ForeignKey(_))));

        let bad_group = Post::new(user.id, "text".into(), Some(Uuid::new_v4()));
        assert!(matches!(posts.insert(bad_group).await, Err(RepoError::ForeignKey(_))));
    }

    #[tokio::test]
    async fn test_deleting_group_clears_post_reference() {
        let (store, user, group) = seeded().await;
        let post = store
            .posts()
            .insert(Post::new(user.id, "text".into(), Some(group.id)))
            .await
            .unwrap();

        store.groups().delete(group.id).await.unwrap();

        let stored = store.posts().find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.group_id, None);
    }

    #[tokio::test]
    async fn test_unique_username_and_slug() {
        let (store, _, _) = seeded().await;

        let dup_user = User::new("author".into(), "other@example.com".into(), "hash".into());
        assert!(matches!(store.users().insert(dup_user).await, Err(RepoError::Constraint(_))));

        let dup_group = Group::new("Other", "test-slug", "").unwrap();
        assert!(matches!(store.groups().insert(dup_group).await, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let (store, user, _) = seeded().await;
        let post = Post::new(user.id, "never stored".into(), None);
        assert!(matches!(store.posts().update(post).await, Err(RepoError::NotFound)));
    }
}
