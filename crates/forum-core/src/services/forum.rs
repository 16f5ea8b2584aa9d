//! Post, like and comment operations.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    AuthorStats, Category, Comment, NewPost, Post, PostPatch, validate_comment_text,
};
use crate::error::{DomainError, RepoError};
use crate::policy::{CommentAction, PostAction, authorize_comment, authorize_post};
use crate::ports::PostRepository;

/// Tunable forum rules.
#[derive(Debug, Clone)]
pub struct ForumRules {
    /// Minimum comment length in characters (never below 1).
    pub comment_min_chars: usize,
}

impl Default for ForumRules {
    fn default() -> Self {
        Self {
            comment_min_chars: 1,
        }
    }
}

/// Forum service over a post repository.
///
/// Holds no mutable state of its own; every operation goes straight to the store.
pub struct ForumService {
    posts: Arc<dyn PostRepository>,
    rules: ForumRules,
}

fn post_not_found(id: Uuid) -> DomainError {
    DomainError::not_found("Post", id)
}

fn comment_not_found(id: Uuid) -> DomainError {
    DomainError::not_found("Comment", id)
}

impl ForumService {
    pub fn new(posts: Arc<dyn PostRepository>, rules: ForumRules) -> Self {
        Self { posts, rules }
    }

    /// Posts newest first, optionally restricted to one category.
    pub async fn list_posts(&self, category: Option<Category>) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list(category).await?)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| post_not_found(id))
    }

    pub async fn get_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment, DomainError> {
        let post = self.get_post(post_id).await?;
        post.comment(comment_id)
            .cloned()
            .ok_or_else(|| comment_not_found(comment_id))
    }

    pub async fn author_stats(&self, author: &str) -> Result<AuthorStats, DomainError> {
        Ok(self.posts.author_stats(author).await?)
    }

    pub async fn create_post(&self, draft: NewPost, author: &str) -> Result<Post, DomainError> {
        let post = self.posts.insert(Post::new(draft, author)?).await?;
        tracing::info!(post_id = %post.id, category = %post.category, "Post created");
        Ok(post)
    }

    /// Apply a partial update. Only the author may do this.
    pub async fn update_post(
        &self,
        id: Uuid,
        patch: PostPatch,
        actor: &str,
    ) -> Result<Post, DomainError> {
        let post = self.get_post(id).await?;
        authorize_post(actor, &post, PostAction::Update)?;

        if patch.is_empty() {
            return Ok(post);
        }
        let changes = patch.validate()?;

        let updated = self
            .posts
            .update_fields(id, changes)
            .await?
            .ok_or_else(|| post_not_found(id))?;
        tracing::info!(post_id = %id, "Post updated");
        Ok(updated)
    }

    /// Delete a post and, with it, every embedded comment.
    pub async fn delete_post(&self, id: Uuid, actor: &str) -> Result<(), DomainError> {
        let post = self.get_post(id).await?;
        authorize_post(actor, &post, PostAction::Delete)?;

        match self.posts.delete(id).await {
            Ok(()) => {
                tracing::info!(post_id = %id, comments = post.comments.len(), "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(post_not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Like the post for `actor`, or take the like back if already given.
    pub async fn toggle_like(&self, id: Uuid, actor: &str) -> Result<Post, DomainError> {
        let post = self
            .posts
            .toggle_like(id, actor, Utc::now())
            .await?
            .ok_or_else(|| post_not_found(id))?;
        tracing::info!(
            post_id = %id,
            liked = post.is_liked_by(actor),
            likes = post.likes,
            "Like toggled"
        );
        Ok(post)
    }

    /// Append a comment and return the updated post.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author: &str,
        text: &str,
    ) -> Result<Post, DomainError> {
        let text = validate_comment_text(text, self.rules.comment_min_chars)?;
        let comment = Comment::new(post_id, author, text);
        let comment_id = comment.id;

        let post = self
            .posts
            .push_comment(post_id, comment)
            .await?
            .ok_or_else(|| post_not_found(post_id))?;
        tracing::info!(post_id = %post_id, comment_id = %comment_id, "Comment added");
        Ok(post)
    }

    /// Remove a comment. Only its own author may do this.
    pub async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        actor: &str,
    ) -> Result<Post, DomainError> {
        let comment = self.get_comment(post_id, comment_id).await?;
        authorize_comment(actor, &comment, CommentAction::Delete)?;

        let post = self
            .posts
            .remove_comment(post_id, comment_id, actor, Utc::now())
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;
        tracing::info!(post_id = %post_id, comment_id = %comment_id, "Comment removed");
        Ok(post)
    }

    /// Replace a comment's text. Only its own author may do this.
    pub async fn update_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        text: &str,
        actor: &str,
    ) -> Result<Post, DomainError> {
        let comment = self.get_comment(post_id, comment_id).await?;
        authorize_comment(actor, &comment, CommentAction::Update)?;
        let text = validate_comment_text(text, self.rules.comment_min_chars)?;

        let post = self
            .posts
            .edit_comment(post_id, comment_id, actor, text, Utc::now())
            .await?
            .ok_or_else(|| comment_not_found(comment_id))?;
        tracing::info!(post_id = %post_id, comment_id = %comment_id, "Comment edited");
        Ok(post)
    }
}
