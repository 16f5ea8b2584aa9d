//! Post, like and comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use forum_core::domain::{Category, NewPost, PostPatch, validate_content, validate_title};
use forum_shared::MessageResponse;
use forum_shared::dto::{CommentRequest, CreatePostRequest, UpdatePostRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Body categories arrive as a slug or a numeric code.
fn parse_category(value: serde_json::Value) -> AppResult<Category> {
    if value.is_null() {
        return Err(AppError::BadRequest("category: is required".to_string()));
    }
    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("category: {}", e)))
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.forum.list_posts(None).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/category/{categoryId}
pub async fn list_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category: Category = path
        .parse()
        .map_err(|e: forum_core::domain::UnknownCategory| AppError::BadRequest(e.to_string()))?;

    let posts = state.forum.list_posts(Some(category)).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.forum.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let title = validate_title(&req.title)?;
    let content = validate_content(&req.content)?;
    let draft = NewPost {
        title,
        content,
        category: parse_category(req.category)?,
    };

    let post = state.forum.create_post(draft, &identity.email).await?;
    Ok(HttpResponse::Created().json(post))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = PostPatch {
        title: req.title,
        content: req.content,
        category: req.category.map(parse_category).transpose()?,
    };

    let post = state
        .forum
        .update_post(path.into_inner(), patch, &identity.email)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .forum
        .delete_post(path.into_inner(), &identity.email)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// POST /api/posts/{id}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .forum
        .toggle_like(path.into_inner(), &identity.email)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .forum
        .add_comment(path.into_inner(), &identity.email, &body.text)
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// PUT /api/posts/{postId}/comments/{commentId}
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post = state
        .forum
        .update_comment(post_id, comment_id, &body.text, &identity.email)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{postId}/comments/{commentId}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post = state
        .forum
        .delete_comment(post_id, comment_id, &identity.email)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}
