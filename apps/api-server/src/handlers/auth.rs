//! Authentication handlers.

use actix_web::{HttpResponse, web};

use forum_core::Session;
use forum_core::domain::Registration;
use forum_core::domain::User;
use forum_shared::dto::{
    AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UpdateProfileRequest,
    UserSummary,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(message: &str, session: Session) -> AuthResponse {
    AuthResponse {
        message: message.to_string(),
        token: session.token,
        user: UserSummary {
            email: session.user.email,
            name: session.user.name,
        },
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .accounts
        .register(Registration {
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            name: req.name,
        })
        .await?;

    Ok(HttpResponse::Created().json(auth_response("User registered successfully", session)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state.accounts.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(auth_response("Login successful", session)))
}

async fn profile_response(state: &AppState, user: User) -> AppResult<ProfileResponse> {
    let stats = state.forum.author_stats(&user.email).await?;
    Ok(ProfileResponse {
        email: user.email,
        name: user.name,
        created_at: user.created_at,
        posts_count: stats.posts,
        comments_count: stats.comments,
    })
}

/// GET /api/auth/profile - Protected route
pub async fn profile(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = state.accounts.profile(&identity.email).await?;

    Ok(HttpResponse::Ok().json(profile_response(&state, user).await?))
}

/// PUT /api/auth/profile - Protected route
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .accounts
        .update_name(&identity.email, body.into_inner().name)
        .await?;

    Ok(HttpResponse::Ok().json(profile_response(&state, user).await?))
}
