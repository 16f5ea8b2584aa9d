use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AuthorStats, Category, Comment, Post, PostChanges, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address. Matching is case-sensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Replace the display name of the user with this email.
    async fn update_name(
        &self,
        email: &str,
        name: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, RepoError>;
}

/// Post repository. Every mutation below is a single atomic document update;
/// `Ok(None)` means the post (or the addressed comment) was not there.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, or those in one category, newest first.
    async fn list(&self, category: Option<Category>) -> Result<Vec<Post>, RepoError>;

    /// Posts written by `author` and comments written by `author` on any post.
    async fn author_stats(&self, author: &str) -> Result<AuthorStats, RepoError>;

    /// Write only the changed fields, leaving likes and comments alone.
    async fn update_fields(&self, id: Uuid, changes: PostChanges)
    -> Result<Option<Post>, RepoError>;

    /// Remove `email` from the likers if present, add it otherwise.
    async fn toggle_like(
        &self,
        id: Uuid,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError>;

    /// Append a comment to the post.
    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Option<Post>, RepoError>;

    /// Remove a comment, only if it exists and was written by `author`.
    async fn remove_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        author: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError>;

    /// Replace a comment's text, only if it exists and was written by `author`.
    async fn edit_comment(
        &self,
        id: Uuid,
        comment_id: Uuid,
        author: &str,
        text: String,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError>;
}
