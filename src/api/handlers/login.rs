//! The two login endpoints.
//!
//! `/login1` is the OTP-gated flow: valid credentials trigger a challenge
//! and the response is a bare boolean. `/login` is the direct path that
//! issues a bearer token. The two are intentionally independent.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::error;

use crate::api::state::GatewayState;
use crate::auth::AuthError;

use super::normalize_email;
use super::types::{CredentialsRequest, TokenResponse};

/// Validate credentials and, on success, issue an OTP challenge for
/// out-of-band delivery. `true` means "credentials valid, OTP sent".
#[utoipa::path(
    post,
    path = "/login1",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Whether credentials were valid and a challenge was issued", body = bool),
        (status = 400, description = "Missing payload", body = String)
    ),
    tag = "gateway"
)]
pub async fn login_challenge(
    state: Extension<Arc<GatewayState>>,
    payload: Option<Json<CredentialsRequest>>,
) -> impl IntoResponse {
    let request: CredentialsRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    match state
        .auth()
        .authenticate_and_challenge(&email, &request.password)
        .await
    {
        Ok(valid) => (StatusCode::OK, Json(valid)).into_response(),
        Err(err) => {
            error!("Login challenge failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Direct login: issue an opaque bearer token without OTP confirmation.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Session token issued", body = TokenResponse),
        (status = 400, description = "Missing payload", body = String),
        (status = 401, description = "Invalid credentials", body = String)
    ),
    tag = "gateway"
)]
pub async fn login(
    state: Extension<Arc<GatewayState>>,
    payload: Option<Json<CredentialsRequest>>,
) -> impl IntoResponse {
    let request: CredentialsRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    match state.auth().login(&email, &request.password).await {
        Ok(token) => (
            StatusCode::OK,
            Json(TokenResponse {
                access_token: token.access_token,
            }),
        )
            .into_response(),
        Err(AuthError::InvalidCredentials) => {
            // No detail: callers cannot distinguish unknown email from a
            // wrong password.
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()).into_response()
        }
        Err(AuthError::Internal(err)) => {
            error!("Login failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::register::register;
    use crate::api::handlers::types::RegisterRequest;
    use crate::api::state::GatewayConfig;
    use axum::body::to_bytes;

    fn state() -> Extension<Arc<GatewayState>> {
        Extension(Arc::new(GatewayState::in_memory(GatewayConfig::default())))
    }

    async fn register_alice(state: &Extension<Arc<GatewayState>>) {
        register(
            state.clone(),
            Some(Json(RegisterRequest {
                email: "a@x.com".to_string(),
                password: "pw1".to_string(),
                name: "Alice".to_string(),
                phone: String::new(),
                address: String::new(),
            })),
        )
        .await;
    }

    fn credentials(password: &str) -> Json<CredentialsRequest> {
        Json(CredentialsRequest {
            email: "a@x.com".to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn login_challenge_missing_payload() {
        let response = login_challenge(state(), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_challenge_reports_boolean_outcome() -> anyhow::Result<()> {
        let state = state();
        register_alice(&state).await;

        let response = login_challenge(state.clone(), Some(credentials("wrong")))
            .await
            .into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], b"false");

        let response = login_challenge(state, Some(credentials("pw1")))
            .await
            .into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], b"true");
        Ok(())
    }

    #[tokio::test]
    async fn direct_login_rejects_bad_password() {
        let state = state();
        register_alice(&state).await;
        let response = login(state, Some(credentials("wrong")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn direct_login_returns_access_token() -> anyhow::Result<()> {
        let state = state();
        register_alice(&state).await;
        let response = login(state.clone(), Some(credentials("pw1")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let token: TokenResponse = serde_json::from_slice(&body)?;
        let session = state
            .auth()
            .authenticate_token(&token.access_token)
            .await?
            .expect("session resolves");
        assert_eq!(session.email, "a@x.com");
        Ok(())
    }
}
