// handlers/public/auth/login.rs - POST /v1/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::credentials::is_valid_email;
use crate::error::{ApiError, DomainError};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /v1/login - authenticate and receive a bearer token
///
/// An unknown email answers 409, a wrong password 401.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = payload?;

    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("email or password is missing"));
    }
    if !is_valid_email(request.email.trim()) {
        return Err(DomainError::BadParamInput("email".to_string()).into());
    }

    let token = state
        .users
        .login(&request.email, &request.password)
        .await?;

    Ok(ApiResponse::success(LoginResponse { token }))
}
