//! Domain entities - the core business objects.

mod category;
mod post;
mod user;

pub use category::{Category, UnknownCategory};
pub use post::{
    AuthorStats, COMMENT_MAX_CHARS, COMMENT_MIN_CHARS, CONTENT_MIN_CHARS, Comment, NewPost, Post,
    PostChanges, PostPatch, TITLE_MAX_CHARS, TITLE_MIN_CHARS, validate_comment_text,
    validate_content, validate_title,
};
pub use user::{NAME_MAX_CHARS, Registration, User, mask_email, normalize_name};
