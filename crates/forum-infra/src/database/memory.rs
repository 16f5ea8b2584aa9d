//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Each mutation runs entirely under one write lock, which gives the same
//! per-document atomicity the PostgreSQL statements provide.
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use forum_core::domain::{AuthorStats, Category, Comment, Post, PostChanges, User};
use forum_core::error::RepoError;
use forum_core::ports::{BaseRepository, PostRepository, UserRepository};

/// Users keyed by id, with email uniqueness enforced on insert.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("User already exists".to_string()));
        }
        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }

    async fn update_name(
        &self,
        email: &str,
        name: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError> {
        let mut store = self.store.write().await;
        let Some(user) = store.values_mut().find(|u| u.email == email) else {
            return Ok(None);
        };
        user.name = name;
        user.updated_at = at;
        Ok(Some(user.clone()))
    }
}

/// Posts keyed by id. Reads hand out clones, so callers never observe later writes.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `f` to the stored post under the write lock.
    async fn mutate<F>(&self, id: Uuid, f: F) -> Option<Post>
    where
        F: FnOnce(&mut Post) -> bool + Send,
    {
        let mut store = self.store.write().await;
        let post = store.get_mut(&id)?;
        f(post).then(|| post.clone())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!("Post {} already exists", post.id)));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, category: Option<Category>) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store
            .values()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn author_stats(&self, author: &str) -> Result<AuthorStats, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().fold(AuthorStats::default(), |mut stats, post| {
            if post.author == author {
                stats.posts += 1;
            }
            stats.comments += post.comments.iter().filter(|c| c.author == author).count() as u64;
            stats
        }))
    }

    async fn update_fields(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        Ok(self
            .mutate(id, |post| {
                post.apply(&changes);
                true
            })
            .await)
    }

    async fn toggle_like(
        &self,
        id: Uuid,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        Ok(self
            .mutate(id, |post| {
                post.toggle_like(email);
                post.updated_at = at;
                true
            })
            .await)
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<Post>, RepoError> {
        Ok(self
            .mutate(id, |post| {
                post.updated_at = comment.created_at;
                post.comments.push(comment);
                true
            })
            .await)
    }

    async fn remove_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        author: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        Ok(self
            .mutate(id, |post| {
                if post.comment(comment_id).is_none_or(|c| c.author != author) {
                    return false;
                }
                post.remove_comment(comment_id);
                post.updated_at = at;
                true
            })
            .await)
    }

    async fn edit_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        author: &str,
        text: String,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        Ok(self
            .mutate(id, |post| {
                let Some(comment) = post.comment_mut(comment_id) else {
                    return false;
                };
                if comment.author != author {
                    return false;
                }
                comment.text = text;
                comment.updated_at = Some(at);
                post.updated_at = at;
                true
            })
            .await)
    }
}
