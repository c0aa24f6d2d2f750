//! OpenAPI document for the gateway surface.

use utoipa::OpenApi;

use super::handlers::types::{
    CredentialsRequest, RegisterRequest, TokenResponse, UserResponse, VerifyOtpRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::health::health,
        super::handlers::register::register,
        super::handlers::register::get_all,
        super::handlers::login::login_challenge,
        super::handlers::login::login,
        super::handlers::otp::verify_otp,
        super::handlers::otp::forgot_password,
    ),
    components(schemas(
        RegisterRequest,
        CredentialsRequest,
        VerifyOtpRequest,
        TokenResponse,
        UserResponse
    )),
    tags(
        (name = "gateway", description = "Registration, login, OTP and password-reset API")
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
