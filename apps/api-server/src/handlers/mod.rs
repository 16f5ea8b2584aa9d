//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::{json_config, path_config};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(path_config()).service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/profile", web::get().to(auth::profile))
                    .route("/profile", web::put().to(auth::update_profile)),
            )
            // Post routes; reads are public, mutations need a bearer token
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/category/{categoryId}", web::get().to(posts::list_by_category))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/like", web::post().to(posts::toggle_like))
                    .route("/{id}/comments", web::post().to(posts::add_comment))
                    .route(
                        "/{postId}/comments/{commentId}",
                        web::put().to(posts::update_comment),
                    )
                    .route(
                        "/{postId}/comments/{commentId}",
                        web::delete().to(posts::delete_comment),
                    ),
            ),
    );
}
