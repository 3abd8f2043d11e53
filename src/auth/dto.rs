use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{claims::Role, repo_types::User};

/// Email + password body shared by both login endpoints. Fields are optional
/// so a missing one becomes a 400 from the handler, not a JSON rejection.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both fields, when present and non-blank.
    pub fn required(self) -> Option<(String, String)> {
        let email = self.email.filter(|e| !e.trim().is_empty())?;
        let password = self.password.filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.name.clone(),
            role: u.role,
        }
    }
}

/// `POST /api/auth/login` success body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: PublicUser,
    pub token: String,
}

/// `POST /api/auth/credentials` success body.
#[derive(Debug, Serialize)]
pub struct CredentialsResponse {
    pub message: String,
    pub user: PublicUser,
    pub token: String,
}

/// Response returned after registration.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardResponse {
    pub authenticated: bool,
    pub redirect: &'static str,
    pub token_storage_key: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_requires_both_fields() {
        let full: LoginRequest =
            serde_json::from_str(r#"{"email":"a@b.co","password":"pw"}"#).unwrap();
        assert!(full.required().is_some());

        let missing: LoginRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert!(missing.required().is_none());

        let blank: LoginRequest =
            serde_json::from_str(r#"{"email":"   ","password":"pw"}"#).unwrap();
        assert!(blank.required().is_none());
    }

    #[test]
    fn public_user_never_carries_the_hash() {
        let response = PublicUser {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            name: "Test".to_string(),
            role: Role::User,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"role\":\"USER\""));
        assert!(!json.contains("password"));
    }
}
