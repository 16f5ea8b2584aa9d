use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::DomainError;

pub const NAME_MAX_CHARS: usize = 50;

/// User entity - a registered forum member, identified by email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(email: String, name: Option<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Registration form as submitted by a client.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: Option<String>,
}

/// Trim a display name; blank clears it.
pub fn normalize_name(name: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(name) = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "name: Name cannot exceed {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(Some(name))
}

/// Mask an email for logging to avoid PII in logs.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}@{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::new("a@x.com".to_string(), None, "$argon2id$secret".to_string());
        let json = serde_json::to_string(&user).unwrap();

        assert!(!json.contains("argon2"));
        assert!(json.contains("\"email\":\"a@x.com\""));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(Some("  Ada  ".into())).unwrap().as_deref(), Some("Ada"));
        assert_eq!(normalize_name(Some("   ".into())).unwrap(), None);
        assert_eq!(normalize_name(None).unwrap(), None);
        assert!(matches!(
            normalize_name(Some("n".repeat(NAME_MAX_CHARS + 1))),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@x.com"), "a***@x.com");
        assert_eq!(mask_email("a@x.com"), "***@x.com");
        assert_eq!(mask_email("nobody"), "***");
    }
}
