// handlers/protected/profile.rs - GET /v1/profile handler

use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /v1/profile - the user named by the token's subject id
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = state.users.fetch_by_id(auth_user.user_id).await?;
    Ok(ApiResponse::success(user))
}
