//! # Forum Core
//!
//! The domain layer of the gaming forum.
//! This crate contains the post/comment aggregate, the authorization policy
//! and the account and forum services. It has zero infrastructure dependencies:
//! storage, hashing and token signing are reached through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::{AccountService, ForumRules, ForumService, Session};
