use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;
use crate::error::DomainError;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MIN_CHARS: usize = 10;
pub const COMMENT_MIN_CHARS: usize = 1;
pub const COMMENT_MAX_CHARS: usize = 500;

/// Post entity - a forum topic owning its comments.
///
/// `likes` always equals `liked_by.len()`; the two are only ever changed
/// together through [`Post::toggle_like`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub author: String,
    pub likes: u32,
    pub liked_by: Vec<String>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment embedded in a post. Its id is only meaningful within that post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// How much one author has written across the forum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorStats {
    pub posts: u64,
    pub comments: u64,
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: Category,
}

/// Partial update of a post. `None` leaves the field untouched; a present
/// value is validated like on creation, so an empty string is rejected.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Category>,
}

/// Validated field changes handed to the repository.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Category>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post after validating the draft.
    pub fn new(draft: NewPost, author: &str) -> Result<Self, DomainError> {
        let title = validate_title(&draft.title)?;
        let content = validate_content(&draft.content)?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            content,
            category: draft.category,
            author: author.to_string(),
            likes: 0,
            liked_by: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_liked_by(&self, email: &str) -> bool {
        self.liked_by.iter().any(|e| e == email)
    }

    /// Like or unlike on behalf of `email`. Returns `true` if the post is now liked.
    pub fn toggle_like(&mut self, email: &str) -> bool {
        match self.liked_by.iter().position(|e| e == email) {
            Some(index) => {
                self.liked_by.remove(index);
                self.likes = self.likes.saturating_sub(1);
                false
            }
            None => {
                self.liked_by.push(email.to_string());
                self.likes += 1;
                true
            }
        }
    }

    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    pub fn comment_mut(&mut self, comment_id: Uuid) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }

    /// Remove a comment, returning it if it was present.
    pub fn remove_comment(&mut self, comment_id: Uuid) -> Option<Comment> {
        let index = self.comments.iter().position(|c| c.id == comment_id)?;
        Some(self.comments.remove(index))
    }

    pub fn apply(&mut self, changes: &PostChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(content) = &changes.content {
            self.content = content.clone();
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        self.updated_at = changes.updated_at;
    }
}

impl Comment {
    pub fn new(post_id: Uuid, author: &str, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            author: author.to_string(),
            post_id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category.is_none()
    }

    /// Validate every present field, failing on the first invalid one.
    pub fn validate(self) -> Result<PostChanges, DomainError> {
        Ok(PostChanges {
            title: self.title.as_deref().map(validate_title).transpose()?,
            content: self.content.as_deref().map(validate_content).transpose()?,
            category: self.category,
            updated_at: Utc::now(),
        })
    }
}

pub fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    let len = title.chars().count();
    if len < TITLE_MIN_CHARS {
        return Err(DomainError::Validation(format!(
            "title: Title must be at least {TITLE_MIN_CHARS} characters"
        )));
    }
    if len > TITLE_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "title: Title cannot exceed {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

pub fn validate_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.chars().count() < CONTENT_MIN_CHARS {
        return Err(DomainError::Validation(format!(
            "content: Content must be at least {CONTENT_MIN_CHARS} characters"
        )));
    }
    Ok(content.to_string())
}

/// Comment text bounds; `min_chars` comes from the forum rules but is never below 1.
pub fn validate_comment_text(text: &str, min_chars: usize) -> Result<String, DomainError> {
    let text = text.trim();
    let len = text.chars().count();
    if len == 0 {
        return Err(DomainError::Validation(
            "text: Comment text is required".to_string(),
        ));
    }
    let min_chars = min_chars.max(COMMENT_MIN_CHARS);
    if len < min_chars {
        return Err(DomainError::Validation(format!(
            "text: Comment must be at least {min_chars} characters"
        )));
    }
    if len > COMMENT_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "text: Comment cannot exceed {COMMENT_MAX_CHARS} characters"
        )));
    }
    Ok(text.to_string())
}
