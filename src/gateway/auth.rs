//! Auth service calls
//!
//! Password sign-in/sign-up against `/auth/v1`. Tokens are handed back to
//! the caller; storing them is the session's job.

use serde::{Deserialize, Serialize};

use super::client::TableClient;
use super::error::GatewayResult;
use super::types::{AuthTokens, AuthUser};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Result of a sign-up: projects without email confirmation return a
/// session right away, others return only the pending user
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SignUpOutcome {
    SignedIn(AuthTokens),
    ConfirmationRequired(AuthUser),
}

pub struct AuthApi<'a> {
    client: &'a TableClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a TableClient) -> Self {
        Self { client }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> GatewayResult<AuthTokens> {
        tracing::info!(email = %email, "signing in");
        self.client
            .auth_post(
                "token",
                &[("grant_type", "password")],
                &Credentials { email, password },
            )
            .await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> GatewayResult<SignUpOutcome> {
        tracing::info!(email = %email, "signing up");
        self.client
            .auth_post("signup", &[], &Credentials { email, password })
            .await
    }

    /// Revoke the given access token
    pub async fn sign_out(&self, access_token: &str) -> GatewayResult<()> {
        self.client
            .with_access_token(Some(access_token.to_string()))
            .auth_post_empty("logout")
            .await
    }

    /// Resolve the user owning an access token
    pub async fn current_user(&self, access_token: &str) -> GatewayResult<AuthUser> {
        self.client
            .with_access_token(Some(access_token.to_string()))
            .auth_get("user")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::testing::MockBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_sign_in_password_grant() {
        let backend = MockBackend::start().await;
        backend.respond(
            "POST",
            "/auth/v1/token",
            200,
            json!({
                "access_token": "jwt-1",
                "refresh_token": "r-1",
                "expires_at": 1700000000,
                "user": { "id": "u1", "email": "a@example.com" }
            }),
        );

        let tokens = backend
            .gateway()
            .auth()
            .sign_in("a@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(tokens.access_token, "jwt-1");
        assert_eq!(tokens.user.id, "u1");

        let request = backend.last_request().unwrap();
        assert_eq!(request.param("grant_type"), Some("password"));
        assert_eq!(request.body.unwrap()["email"], "a@example.com");
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials() {
        let backend = MockBackend::start().await;
        backend.respond(
            "POST",
            "/auth/v1/token",
            400,
            json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }),
        );

        let result = backend.gateway().auth().sign_in("a@example.com", "nope").await;
        match result {
            Err(GatewayError::Api { status, message, .. }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sign_up_requires_confirmation() {
        let backend = MockBackend::start().await;
        backend.respond(
            "POST",
            "/auth/v1/signup",
            200,
            json!({ "id": "u2", "email": "b@example.com", "confirmation_sent_at": "2024-05-01T00:00:00Z" }),
        );

        let outcome = backend
            .gateway()
            .auth()
            .sign_up("b@example.com", "secret")
            .await
            .unwrap();
        assert!(matches!(outcome, SignUpOutcome::ConfirmationRequired(user) if user.id == "u2"));
    }

    #[tokio::test]
    async fn test_current_user_uses_user_token() {
        let backend = MockBackend::start().await;
        backend.respond(
            "GET",
            "/auth/v1/user",
            200,
            json!({ "id": "u1", "email": "a@example.com" }),
        );

        let user = backend.gateway().auth().current_user("jwt-1").await.unwrap();
        assert_eq!(user.email.as_deref(), Some("a@example.com"));

        let request = backend.last_request().unwrap();
        assert_eq!(request.header("authorization"), Some("Bearer jwt-1"));
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let backend = MockBackend::start().await;
        backend.respond("GET", "/auth/v1/user", 401, json!({ "msg": "JWT expired" }));

        let result = backend.gateway().auth().current_user("stale").await;
        assert!(matches!(result, Err(GatewayError::Unauthorized)));
    }
}
