//! Registration and user listing endpoints.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::error;

use crate::api::state::GatewayState;
use crate::auth::Registration;

use super::types::{RegisterRequest, UserResponse};
use super::{normalize_email, valid_email};

/// Register a user; re-registering an email overwrites the prior record.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = String),
        (status = 400, description = "Missing or invalid payload", body = String)
    ),
    tag = "gateway"
)]
pub async fn register(
    state: Extension<Arc<GatewayState>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string());
    }
    if request.password.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing password".to_string());
    }

    let registration = Registration {
        email,
        password: request.password,
        name: request.name,
        phone: request.phone,
        address: request.address,
    };

    match state.auth().register(registration).await {
        Ok(()) => (StatusCode::OK, "User registered successfully".to_string()),
        Err(err) => {
            error!("Failed to register user: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
        }
    }
}

/// List all registered users (without credential material).
#[utoipa::path(
    get,
    path = "/getAll",
    responses(
        (status = 200, description = "All registered users", body = [UserResponse])
    ),
    tag = "gateway"
)]
pub async fn get_all(state: Extension<Arc<GatewayState>>) -> impl IntoResponse {
    match state.auth().list_users().await {
        Ok(users) => {
            let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            (StatusCode::OK, Json(users)).into_response()
        }
        Err(err) => {
            error!("Failed to list users: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::GatewayConfig;
    use axum::body::to_bytes;

    fn state() -> Extension<Arc<GatewayState>> {
        Extension(Arc::new(GatewayState::in_memory(GatewayConfig::default())))
    }

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "pw1".to_string(),
            name: "Alice".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    #[tokio::test]
    async fn register_missing_payload() {
        let response = register(state(), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let response = register(state(), Some(Json(request("not-an-email"))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_then_get_all_round_trips() -> anyhow::Result<()> {
        let state = state();
        let response = register(state.clone(), Some(Json(request("A@X.com"))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_all(state).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let users: Vec<UserResponse> = serde_json::from_slice(&body)?;
        assert_eq!(users.len(), 1);
        // Emails are normalized on the way in.
        assert_eq!(users[0].email, "a@x.com");
        assert_eq!(users[0].name, "Alice");
        Ok(())
    }

    #[tokio::test]
    async fn reregistration_overwrites_record() -> anyhow::Result<()> {
        let state = state();
        register(state.clone(), Some(Json(request("a@x.com")))).await;
        let mut updated = request("a@x.com");
        updated.name = "Alicia".to_string();
        register(state.clone(), Some(Json(updated))).await;

        let response = get_all(state).await.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let users: Vec<UserResponse> = serde_json::from_slice(&body)?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Alicia");
        Ok(())
    }
}
