//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to register a new user. Missing fields deserialize as empty
/// so the server can answer with its own validation message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public part of a user, embedded in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub email: String,
    pub name: Option<String>,
}

/// Response to a successful register or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

/// Response of `GET /api/auth/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub posts_count: u64,
    pub comments_count: u64,
}

/// Body of `PUT /api/auth/profile`. A missing, `null` or blank name clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /api/posts`. `category` is a slug (`"pc-games"`) or a code (`1`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub category: serde_json::Value,
}

/// Body of `PUT /api/posts/:id`. Absent or `null` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<serde_json::Value>,
}

/// Body of comment create/edit requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentRequest {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_tolerates_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();

        assert_eq!(req.email, "a@x.com");
        assert!(req.password.is_empty());
        assert!(req.confirm_password.is_empty());
    }

    #[test]
    fn test_register_request_reads_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@x.com","password":"pw123456","confirmPassword":"pw123456"}"#,
        )
        .unwrap();

        assert_eq!(req.confirm_password, "pw123456");
    }

    #[test]
    fn test_profile_response_counts_are_camel_case() {
        let body = serde_json::to_value(ProfileResponse {
            email: "a@x.com".to_string(),
            name: None,
            created_at: Utc::now(),
            posts_count: 2,
            comments_count: 5,
        })
        .unwrap();

        assert_eq!(body["postsCount"], 2);
        assert_eq!(body["commentsCount"], 5);
    }

    #[test]
    fn test_update_request_null_means_absent() {
        let req: UpdatePostRequest = serde_json::from_str(r#"{"title":null}"#).unwrap();

        assert!(req.title.is_none());
        assert!(req.category.is_none());
    }
}
