//! # Forum Infrastructure
//!
//! Concrete implementations of the ports defined in `forum-core`.
//! This crate contains the repositories and the credential/token adapters.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory repositories only
//! - `postgres` - PostgreSQL persistence via SeaORM

pub mod auth;
pub mod database;

// Re-exports - always available
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};
