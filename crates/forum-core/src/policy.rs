//! Authorization policy - pure decisions over an actor email and a target.
//!
//! Reads need no identity at all, so only mutations are modelled here.

use crate::domain::{Comment, Post};
use crate::error::DomainError;

/// Mutations a caller can attempt on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Update,
    Delete,
    Like,
    Comment,
}

/// Mutations a caller can attempt on an embedded comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Update,
    Delete,
}

/// Only the author may update or delete a post; any authenticated actor,
/// the author included, may like or comment.
pub fn authorize_post(actor: &str, post: &Post, action: PostAction) -> Result<(), DomainError> {
    match action {
        PostAction::Like | PostAction::Comment => Ok(()),
        PostAction::Update | PostAction::Delete if actor == post.author => Ok(()),
        PostAction::Update => Err(DomainError::Forbidden(
            "Not authorized to update this post".to_string(),
        )),
        PostAction::Delete => Err(DomainError::Forbidden(
            "Not authorized to delete this post".to_string(),
        )),
    }
}

/// Only the comment's own author may change it. The post author gets no override.
pub fn authorize_comment(
    actor: &str,
    comment: &Comment,
    action: CommentAction,
) -> Result<(), DomainError> {
    if actor == comment.author {
        return Ok(());
    }
    let verb = match action {
        CommentAction::Update => "update",
        CommentAction::Delete => "delete",
    };
    Err(DomainError::Forbidden(format!(
        "Not authorized to {verb} this comment"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, NewPost};

    fn post_by(author: &str) -> Post {
        Post::new(
            NewPost {
                title: "Patch notes".to_string(),
                content: "Discuss the latest balance changes".to_string(),
                category: Category::GamingNews,
            },
            author,
        )
        .unwrap()
    }

    #[test]
    fn test_only_author_mutates_post() {
        let post = post_by("a@x.com");

        assert!(authorize_post("a@x.com", &post, PostAction::Update).is_ok());
        assert!(authorize_post("a@x.com", &post, PostAction::Delete).is_ok());
        assert!(matches!(
            authorize_post("b@x.com", &post, PostAction::Update),
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            authorize_post("b@x.com", &post, PostAction::Delete),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn test_email_match_is_case_sensitive() {
        let post = post_by("a@x.com");
        assert!(authorize_post("A@x.com", &post, PostAction::Update).is_err());
    }

    #[test]
    fn test_anyone_likes_and_comments() {
        let post = post_by("a@x.com");

        for actor in ["a@x.com", "b@x.com"] {
            assert!(authorize_post(actor, &post, PostAction::Like).is_ok());
            assert!(authorize_post(actor, &post, PostAction::Comment).is_ok());
        }
    }

    #[test]
    fn test_post_author_cannot_delete_others_comment() {
        let post = post_by("a@x.com");
        let comment = Comment::new(post.id, "c@x.com", "Nice list!".to_string());

        assert!(authorize_comment("c@x.com", &comment, CommentAction::Delete).is_ok());
        assert!(matches!(
            authorize_comment("a@x.com", &comment, CommentAction::Delete),
            Err(DomainError::Forbidden(_))
        ));
        assert!(authorize_comment("a@x.com", &comment, CommentAction::Update).is_err());
    }
}
