// handlers/public/auth/register.rs - POST /v1/register handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::app::AppState;
use crate::auth::credentials::is_valid_email;
use crate::database::models::User;
use crate::error::DomainError;
use crate::handlers::utils::validate_request;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::RegisterInput;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub name: String,
}

/// POST /v1/register - create a user and echo it back
///
/// The echoed `password` is the stored digest.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(request) = payload?;
    validate_request(&request)?;

    if !is_valid_email(request.email.trim()) {
        return Err(DomainError::BadParamInput("email".to_string()).into());
    }

    let user = state
        .users
        .register(RegisterInput {
            email: request.email,
            password: request.password,
            name: request.name,
        })
        .await?;

    Ok(ApiResponse::created(user))
}
