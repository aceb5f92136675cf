use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::Claims;
use crate::error::ApiError;

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.userid,
            email: claims.email,
        }
    }
}

/// Rejects the request with 401 unless it carries a valid bearer token
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|err| ApiError::unauthorized(err.to_string()))?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Token text following the `Bearer` marker, trimmed
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .ok_or("Unauthorized")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    if auth_str.trim().is_empty() {
        return Err("Unauthorized");
    }

    let (_, token) = auth_str
        .split_once("Bearer")
        .ok_or("Authorization header must use Bearer token format")?;

    let token = token.trim();
    if token.is_empty() {
        return Err("Empty JWT token");
    }
    Ok(token)
}
