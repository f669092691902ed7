//! Backend authentication client.
//!
//! Implements [`AuthGateway`] over the backend's REST auth endpoints,
//! normalizing every response shape at this boundary so nothing
//! loosely-typed travels further into the client.

use crate::wire::{error_message, is_retryable_status, parse_timestamp};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tailorcv_core::auth::AuthGateway;
use tailorcv_core::error::{Result, TailorCvError};
use tailorcv_core::session::Session;
use tailorcv_core::user::User;

/// HTTP implementation of the backend auth collaborator.
#[derive(Clone)]
pub struct AuthApiClient {
    client: Client,
    base_url: String,
}

impl AuthApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-2xx auth response into the matching error class.
    async fn auth_failure(response: Response) -> TailorCvError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        if is_retryable_status(status) {
            TailorCvError::transient(message)
        } else {
            // 401/403 and any other 4xx all mean "this credential or token
            // is no good" from the session's point of view
            TailorCvError::auth(message)
        }
    }
}

#[async_trait]
impl AuthGateway for AuthApiClient {
    async fn verify(&self, token: &str) -> Result<User> {
        let response = self
            .client
            .get(self.url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::auth_failure(response).await);
        }

        let parsed: MeResponse = response.json().await?;
        if !parsed.success {
            return Err(TailorCvError::auth(
                parsed.error.unwrap_or_else(|| "Not authenticated".to_string()),
            ));
        }
        parsed
            .user
            .ok_or_else(|| malformed("auth/me response carried no user"))?
            .into_user()
    }

    async fn exchange(&self, credential: &str) -> Result<Session> {
        let response = self
            .client
            .post(self.url("/api/auth/google"))
            .json(&GoogleAuthRequest { token: credential })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::auth_failure(response).await);
        }

        let parsed: LoginResponse = response.json().await?;
        if !parsed.success {
            return Err(TailorCvError::auth(
                parsed
                    .error
                    .unwrap_or_else(|| "Authentication failed".to_string()),
            ));
        }

        let token = parsed
            .session_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| malformed("login response carried no session token"))?;
        let user = parsed
            .user
            .ok_or_else(|| malformed("login response carried no user"))?
            .into_user()?;

        Ok(Session {
            token,
            user,
            expires_at: parse_timestamp(parsed.expires_at),
        })
    }

    async fn invalidate(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::auth_failure(response).await);
        }
        Ok(())
    }
}

fn malformed(detail: &str) -> TailorCvError {
    TailorCvError::Serialization {
        format: "JSON".to_string(),
        message: detail.to_string(),
    }
}

#[derive(Serialize)]
struct GoogleAuthRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct MeResponse {
    #[serde(default)]
    success: bool,
    user: Option<UserDto>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    session_token: Option<String>,
    user: Option<UserDto>,
    expires_at: Option<String>,
    error: Option<String>,
}

/// Wire shape of a user payload. All fields optional; normalization into
/// the domain record decides what is genuinely required.
#[derive(Deserialize)]
struct UserDto {
    id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    profile_picture: Option<String>,
    is_premium: Option<bool>,
    generation_count: Option<i64>,
    created_at: Option<String>,
    last_generated: Option<String>,
    upgraded_at: Option<String>,
}

impl UserDto {
    fn into_user(self) -> Result<User> {
        let id = self
            .id
            .filter(|v| !v.is_empty())
            .ok_or_else(|| malformed("user payload missing id"))?;
        let email = self
            .email
            .filter(|v| !v.is_empty())
            .ok_or_else(|| malformed("user payload missing email"))?;

        Ok(User {
            id,
            email,
            name: self.name.unwrap_or_default(),
            profile_picture_url: self.profile_picture.unwrap_or_default(),
            is_premium: self.is_premium.unwrap_or(false),
            generation_count: self.generation_count.unwrap_or(0).max(0) as u32,
            created_at: parse_timestamp(self.created_at),
            last_generated_at: parse_timestamp(self.last_generated),
            upgraded_at: parse_timestamp(self.upgraded_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_dto_normalization() {
        let dto: UserDto = serde_json::from_str(
            r#"{
                "id": "u1",
                "name": "Test User",
                "email": "test@example.com",
                "profile_picture": "https://example.com/p.png",
                "is_premium": false,
                "generation_count": 3,
                "last_generated": "2025-01-15T10:00:00Z"
            }"#,
        )
        .unwrap();

        let user = dto.into_user().unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.generation_count, 3);
        assert!(!user.is_premium);
        assert!(user.last_generated_at.is_some());
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_user_dto_clamps_negative_count() {
        let dto: UserDto = serde_json::from_str(
            r#"{"id": "u1", "email": "test@example.com", "generation_count": -2}"#,
        )
        .unwrap();
        assert_eq!(dto.into_user().unwrap().generation_count, 0);
    }

    #[test]
    fn test_user_dto_without_id_is_rejected() {
        let dto: UserDto =
            serde_json::from_str(r#"{"email": "test@example.com"}"#).unwrap();
        assert!(dto.into_user().is_err());
    }

    #[test]
    fn test_login_response_shape() {
        let parsed: LoginResponse = serde_json::from_str(
            r#"{
                "success": true,
                "session_token": "tok1",
                "expires_at": "2025-02-01T00:00:00Z",
                "user": {"id": "u1", "email": "test@example.com", "is_premium": false}
            }"#,
        )
        .unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.session_token.as_deref(), Some("tok1"));
        assert!(parse_timestamp(parsed.expires_at).is_some());
    }

    #[test]
    fn test_failure_response_shape() {
        let parsed: MeResponse =
            serde_json::from_str(r#"{"success": false, "error": "Not authenticated"}"#).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("Not authenticated"));
    }
}
