//! Application services - orchestrate the domain over the ports.

mod account;
mod forum;

pub use account::{AccountService, Session};
pub use forum::{ForumRules, ForumService};
