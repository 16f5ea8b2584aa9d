//! # Forum Shared
//!
//! Request/response bodies of the forum HTTP API.
//! Kept free of domain types so a client can depend on it alone.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse};
