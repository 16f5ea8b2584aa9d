//! Credential store and session issuer.

use std::sync::{Arc, OnceLock};

use crate::domain::{Registration, User, mask_email, normalize_name};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// A freshly issued token together with the user it is bound to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Registration, login and profile lookup.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    /// Hash verified against when the email is unknown, so both login
    /// failures cost one password verification.
    decoy_hash: OnceLock<Option<String>>,
}

const DECOY_PASSWORD: &str = "decoy-password-never-matches";

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Spend one verification on a hash made with the live parameters.
    fn verify_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.passwords.hash(DECOY_PASSWORD).ok());
        if let Some(hash) = decoy {
            let _ = self.passwords.verify(password, hash);
        }
    }

    /// Register a new user and issue their first token.
    pub async fn register(&self, form: Registration) -> Result<Session, DomainError> {
        if form.email.is_empty() || form.password.is_empty() || form.confirm_password.is_empty() {
            return Err(DomainError::Validation("All fields are required".to_string()));
        }
        if !form.email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }
        if form.password != form.confirm_password {
            return Err(DomainError::Validation("Passwords do not match".to_string()));
        }
        let name = normalize_name(form.name)?;

        if self.users.find_by_email(&form.email).await?.is_some() {
            return Err(DomainError::Conflict("User already exists".to_string()));
        }

        let password_hash = self.passwords.hash(&form.password)?;

        // A concurrent registration surfaces as a unique constraint -> Conflict.
        let user = self
            .users
            .insert(User::new(form.email, name, password_hash))
            .await?;
        let token = self.tokens.generate_token(&user.email)?;

        tracing::info!(user_email = %mask_email(&user.email), "User registered");
        Ok(Session { token, user })
    }

    /// Verify credentials and issue a fresh token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            self.verify_decoy(password);
            return Err(DomainError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_email = %mask_email(email), "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.tokens.generate_token(&user.email)?;
        Ok(Session { token, user })
    }

    pub async fn profile(&self, email: &str) -> Result<User, DomainError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User", mask_email(email)))
    }

    /// Change the caller's own display name. A blank name clears it.
    pub async fn update_name(
        &self,
        email: &str,
        name: Option<String>,
    ) -> Result<User, DomainError> {
        let name = normalize_name(name)?;

        let user = self
            .users
            .update_name(email, name, chrono::Utc::now())
            .await?
            .ok_or_else(|| DomainError::not_found("User", mask_email(email)))?;
        tracing::info!(user_email = %mask_email(email), "Profile updated");
        Ok(user)
    }

    /// Resolve a bearer token to the email it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<String, AuthError> {
        self.tokens.validate_token(token).map(|claims| claims.email)
    }

    pub fn token_lifetime_seconds(&self) -> i64 {
        self.tokens.expiration_seconds()
    }
}
