//! Post listings and the create/edit form handler.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, Author, Group, Post, PostView};
use crate::error::{DomainError, RepoError, ValidationError, ValidationErrorKind, ValidationErrors};
use crate::forms::{CleanedPostForm, PostForm};
use crate::pagination::{POSTS_PER_PAGE, Page, PageWindow};
use crate::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

/// Everything the post pages need, behind the repository ports.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
        }
    }

    /// Every post, newest first.
    pub async fn index(&self, page: Option<&str>) -> Result<Page<PostView>, DomainError> {
        self.list(PostFilter::All, page).await
    }

    /// Posts published in the group with `slug`.
    pub async fn group_posts(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<(Group, Page<PostView>), DomainError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Group", slug))?;

        let page = self.list(PostFilter::Group(group.id), page).await?;
        Ok((group, page))
    }

    /// Posts written by `username`.
    pub async fn profile(
        &self,
        username: &str,
        page: Option<&str>,
    ) -> Result<(Author, Page<PostView>), DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?;

        let page = self.list(PostFilter::Author(user.id), page).await?;
        Ok((user.author(), page))
    }

    pub async fn post_detail(&self, post_id: Uuid) -> Result<PostView, DomainError> {
        let post = self.find_post(post_id).await?;
        self.view(post).await
    }

    /// Groups offered by the form's group selector.
    pub async fn group_choices(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.find_all().await?)
    }

    /// Publish a post as `actor`.
    ///
    /// On validation failure nothing is stored and the errors are returned
    /// for redisplay.
    pub async fn create_post(&self, actor: &Actor, form: &PostForm) -> Result<Post, DomainError> {
        let cleaned = self.clean(form).await?;
        let group_id = cleaned.group_id;
        let post = Post::new(actor.id, cleaned.text, group_id);
        let post = self
            .posts
            .insert(post)
            .await
            .map_err(|e| vanished_group(e, group_id))?;

        tracing::info!(post_id = %post.id, author_id = %actor.id, "Post created");
        Ok(post)
    }

    /// Load a post for its edit page, enforcing ownership.
    pub async fn post_for_edit(&self, actor: &Actor, post_id: Uuid) -> Result<PostView, DomainError> {
        let post = self.owned_post(actor, post_id).await?;
        self.view(post).await
    }

    /// Replace text and group of a post owned by `actor`.
    ///
    /// `pub_date` and the author are never touched.
    pub async fn edit_post(
        &self,
        actor: &Actor,
        post_id: Uuid,
        form: &PostForm,
    ) -> Result<Post, DomainError> {
        let mut post = self.owned_post(actor, post_id).await?;
        let cleaned = self.clean(form).await?;

        let group_id = cleaned.group_id;
        post.text = cleaned.text;
        post.group_id = group_id;

        let post = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", post_id),
            other => vanished_group(other, group_id),
        })?;

        tracing::info!(post_id = %post.id, author_id = %actor.id, "Post updated");
        Ok(post)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    async fn owned_post(&self, actor: &Actor, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self.find_post(post_id).await?;
        if !post.is_authored_by(actor.id) {
            tracing::debug!(
                post_id = %post_id,
                actor_id = %actor.id,
                "Edit rejected: actor is not the author"
            );
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    async fn clean(&self, form: &PostForm) -> Result<CleanedPostForm, DomainError> {
        let cleaned = form.clean();
        let mut errors = cleaned.as_ref().err().cloned().unwrap_or_default();

        if let Ok(Some(group_id)) = form.group_id() {
            if self.groups.find_by_id(group_id).await?.is_none() {
                errors.push(ValidationError::new(
                    "group",
                    ValidationErrorKind::InvalidChoice,
                ));
            }
        }

        errors.into_result()?;
        Ok(cleaned?)
    }

    async fn list(
        &self,
        filter: PostFilter,
        page: Option<&str>,
    ) -> Result<Page<PostView>, DomainError> {
        let count = self.posts.count(filter).await?;
        let window = PageWindow::resolve(count, POSTS_PER_PAGE, page);
        let posts = self
            .posts
            .find_page(filter, window.offset(), window.per_page)
            .await?;

        Ok(Page::new(self.hydrate(posts).await?, window))
    }

    async fn view(&self, post: Post) -> Result<PostView, DomainError> {
        let post_id = post.id;
        self.hydrate(vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    /// Attach authors and groups with one lookup each.
    async fn hydrate(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let mut group_ids: Vec<Uuid> = posts.iter().filter_map(|p| p.group_id).collect();
        group_ids.sort_unstable();
        group_ids.dedup();

        let authors: HashMap<Uuid, Author> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.author()))
            .collect();

        let groups: HashMap<Uuid, Group> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            self.groups
                .find_by_ids(&group_ids)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect()
        };

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!("author of post {} is missing", post.id))
                })?;
                let group = post.group_id.and_then(|id| groups.get(&id).cloned());
                Ok(PostView {
                    post,
                    author,
                    group,
                })
            })
            .collect()
    }
}

/// A group deleted between validation and the write is reported on the form.
fn vanished_group(err: RepoError, group_id: Option<Uuid>) -> DomainError {
    match err {
        RepoError::ForeignKey(_) if group_id.is_some() => {
            ValidationErrors::from(ValidationError::new("group", ValidationErrorKind::InvalidChoice))
                .into()
        }
        other => other.into(),
    }
}
