//! OTP verification and password-reset endpoints.

use axum::{
    extract::rejection::QueryRejection,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::error;

use crate::api::state::GatewayState;

use super::normalize_email;
use super::types::{ForgotPasswordParams, VerifyOtpRequest};

/// Check a submitted code against the outstanding challenge. A matching
/// code is consumed and cannot be replayed.
#[utoipa::path(
    post,
    path = "/verifyOTP",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Whether the code matched", body = bool),
        (status = 400, description = "Missing payload", body = String)
    ),
    tag = "gateway"
)]
pub async fn verify_otp(
    state: Extension<Arc<GatewayState>>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> impl IntoResponse {
    let request: VerifyOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    match state.otp().validate(&email, request.otp.trim()).await {
        Ok(matched) => (StatusCode::OK, Json(matched)).into_response(),
        Err(err) => {
            error!("OTP validation failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Issue a password-reset challenge. The response is identical whether or
/// not the email belongs to an account, so it carries no enumeration
/// signal.
#[utoipa::path(
    post,
    path = "/forgotPassword",
    params(ForgotPasswordParams),
    responses(
        (status = 200, description = "Reset challenge issued"),
        (status = 400, description = "Missing email parameter", body = String)
    ),
    tag = "gateway"
)]
pub async fn forgot_password(
    state: Extension<Arc<GatewayState>>,
    query: Result<Query<ForgotPasswordParams>, QueryRejection>,
) -> impl IntoResponse {
    let Ok(Query(params)) = query else {
        return (StatusCode::BAD_REQUEST, "Missing email".to_string()).into_response();
    };

    let email = normalize_email(&params.email);
    if let Err(err) = state.auth().request_password_reset(&email).await {
        // Keep the response opaque even on infrastructure failure.
        error!("Failed to issue password reset challenge: {err}");
    }
    StatusCode::OK.into_response()
}
