#![allow(dead_code)]

use std::sync::Arc;

use forum_core::{AccountService, ForumRules, ForumService};
use forum_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

pub fn forum() -> ForumService {
    forum_with(ForumRules::default())
}

pub fn forum_with(rules: ForumRules) -> ForumService {
    ForumService::new(Arc::new(InMemoryPostRepository::new()), rules)
}

pub fn accounts() -> AccountService {
    let passwords = Argon2PasswordService::with_cost(1024, 1, 1).expect("valid argon2 cost");
    AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(passwords),
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "integration-secret".to_string(),
            ..JwtConfig::default()
        })),
    )
}
