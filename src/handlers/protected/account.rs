// handlers/protected/account.rs - /v1/account handlers

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::app::AppState;
use crate::database::models::{Account, AccountChanges, NewAccount};
use crate::handlers::utils::{parse_id, parse_list_query, validate_request};
use crate::middleware::{ApiResponse, ApiResult, ListResponse};

#[derive(Debug, Deserialize, Validate)]
pub struct AccountRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub name: String,
    #[serde(default, rename = "type")]
    #[validate(length(min = 1, message = "This field is required"))]
    pub kind: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub description: String,
}

/// Partial update body; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AccountPatchRequest {
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub kind: Option<String>,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub description: Option<String>,
}

/// GET /v1/account?limit=&offset=&keyword=&<column>=<value>
pub async fn account_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<ListResponse<Account>> {
    let query = parse_list_query(params)?;
    let page = state.accounts.fetch_all(&query).await?;
    Ok(ApiResponse::success(ListResponse::new(page)))
}

/// GET /v1/account/:id
pub async fn account_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Account> {
    let account = state.accounts.fetch_by_id(parse_id(&id)?).await?;
    Ok(ApiResponse::success(account))
}

/// POST /v1/account
pub async fn account_post(
    State(state): State<AppState>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> ApiResult<Account> {
    let Json(request) = payload?;
    validate_request(&request)?;

    let account = state
        .accounts
        .create(NewAccount {
            name: request.name,
            kind: request.kind,
            description: request.description,
        })
        .await?;
    Ok(ApiResponse::created(account))
}

/// PATCH /v1/account/:id
pub async fn account_patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AccountPatchRequest>, JsonRejection>,
) -> ApiResult<Account> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    validate_request(&request)?;

    let changes = AccountChanges {
        name: request.name,
        kind: request.kind,
        description: request.description,
    };
    let account = state.accounts.update(id, changes).await?;
    Ok(ApiResponse::success(account))
}

/// DELETE /v1/account/:id - soft delete
pub async fn account_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.accounts.delete(parse_id(&id)?).await?;
    Ok(ApiResponse::<()>::no_content())
}
