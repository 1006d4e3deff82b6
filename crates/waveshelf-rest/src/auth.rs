//! GoTrue auth endpoints.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use waveshelf_core::{AppError, AuthProvider, Session, User};

use crate::RestBackend;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: User,
}

/// Sign-up responses carry the user at the top level when auto-confirm is
/// on, or nested under `user` when email confirmation is pending.
fn parse_signup_user(body: serde_json::Value) -> Result<User, AppError> {
    let value = if body.get("id").is_some() {
        body
    } else if let Some(user) = body.get("user") {
        user.clone()
    } else {
        return Err(AppError::Auth("Sign-up response had no user".to_string()));
    };
    serde_json::from_value(value)
        .map_err(|e| AppError::Auth(format!("Malformed sign-up response: {}", e)))
}

#[async_trait]
impl AuthProvider for RestBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<User, AppError> {
        let url = self.build_url("/auth/v1/signup");
        let request = self
            .client
            .post(&url)
            .json(&json!({ "email": email, "password": password }));
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(Self::error_text(response).await));
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;
        parse_signup_user(body)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let url = self.build_url("/auth/v1/token?grant_type=password");
        let request = self
            .client
            .post(&url)
            .json(&json!({ "email": email, "password": password }));
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(Self::error_text(response).await));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Malformed token response: {}", e)))?;

        let session = Session {
            access_token: token.access_token,
            user: token.user,
            expires_at: token.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        };
        self.set_session(Some(session.clone())).await;
        Ok(session)
    }

    fn oauth_authorize_url(&self, provider: &str, redirect_to: &str) -> String {
        format!(
            "{}/auth/v1/authorize?provider={}&redirect_to={}",
            self.base_url,
            urlencoding::encode(provider),
            urlencoding::encode(redirect_to)
        )
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        if self.access_token().await.is_some() {
            let url = self.build_url("/auth/v1/logout");
            let request = self.client.post(&url);
            let response = self
                .apply_auth(request)
                .await
                .send()
                .await
                .map_err(|e| AppError::Auth(e.to_string()))?;
            // A rejected logout still invalidates the local session below.
            if !response.status().is_success() {
                tracing::debug!(status = %response.status(), "Sign-out rejected by backend");
            }
        }
        self.set_session(None).await;
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let url = self.build_url("/auth/v1/recover");
        let request = self.client.post(&url).json(&json!({ "email": email }));
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(Self::error_text(response).await));
        }
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<(), AppError> {
        if self.access_token().await.is_none() {
            return Err(AppError::Unauthorized(
                "Password update requires a signed-in session".to_string(),
            ));
        }
        let url = self.build_url("/auth/v1/user");
        let request = self.client.put(&url).json(&json!({ "password": new_password }));
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(Self::error_text(response).await));
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>, AppError> {
        if self.access_token().await.is_none() {
            return Ok(None);
        }
        let url = self.build_url("/auth/v1/user");
        let request = self.client.get(&url);
        let response = self
            .apply_auth(request)
            .await
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Token expired or revoked server-side: now anonymous.
            self.set_session(None).await;
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::Auth(Self::error_text(response).await));
        }
        let user: User = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Malformed user response: {}", e)))?;
        Ok(Some(user))
    }
}
