//! Post entity for SeaORM.
//!
//! A post is stored as one document-shaped row: likers and comments live in
//! JSONB columns so that every post mutation is a single-row update.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use forum_core::domain::{Category, Comment, Post};
use forum_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// Category code, 1 through 6.
    pub category: i16,
    pub author: String,
    pub likes: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub liked_by: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn decode_err(id: Uuid, what: &str, e: impl std::fmt::Display) -> RepoError {
    RepoError::Decode(format!("post {id}: {what}: {e}"))
}

/// JSONB form of an embedded comment, same keys serde reads back.
pub(crate) fn comment_document(comment: &Comment) -> Json {
    let mut document = serde_json::json!({
        "id": comment.id,
        "text": comment.text,
        "author": comment.author,
        "postId": comment.post_id,
        "createdAt": comment.created_at,
    });
    if let Some(updated_at) = comment.updated_at {
        document["updatedAt"] = serde_json::json!(updated_at);
    }
    document
}

/// Conversion from SeaORM Model to Domain Post.
impl TryFrom<Model> for Post {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let category = Category::from_code(model.category.into())
            .ok_or_else(|| decode_err(id, "category", model.category))?;
        let liked_by: Vec<String> =
            serde_json::from_value(model.liked_by).map_err(|e| decode_err(id, "liked_by", e))?;
        let comments: Vec<Comment> =
            serde_json::from_value(model.comments).map_err(|e| decode_err(id, "comments", e))?;
        let likes = u32::try_from(model.likes).map_err(|e| decode_err(id, "likes", e))?;

        Ok(Self {
            id,
            title: model.title,
            content: model.content,
            category,
            author: model.author,
            likes,
            liked_by,
            comments,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            content: Set(post.content),
            category: Set(post.category.code()),
            author: Set(post.author),
            likes: Set(i32::try_from(post.likes).unwrap_or(i32::MAX)),
            liked_by: Set(Json::from(post.liked_by)),
            comments: Set(Json::Array(post.comments.iter().map(comment_document).collect())),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
