// handlers/protected/transaction.rs - /v1/transaction handlers

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::app::AppState;
use crate::database::models::{
    SummaryDaily, SummaryMonthly, Transaction, TransactionDraft, TransactionKind,
};
use crate::error::ApiError;
use crate::handlers::utils::{parse_id, parse_list_query, validate_request};
use crate::middleware::{ApiResponse, ApiResult, ListResponse};

/// Create and update body. `type` decides which amount slot `amount` fills.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub name: String,
    #[serde(default, rename = "type")]
    #[validate(length(min = 1, message = "This field is required"))]
    pub kind: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required"))]
    pub description: String,
    #[serde(default)]
    #[validate(required(message = "This field is required"))]
    pub amount: Option<Decimal>,
    #[serde(default)]
    #[validate(required(message = "This field is required"))]
    pub account_id: Option<i64>,
}

impl TransactionRequest {
    fn into_draft(self) -> Result<TransactionDraft, ApiError> {
        validate_request(&self)?;

        let kind = TransactionKind::parse(&self.kind)
            .ok_or_else(|| ApiError::bad_request("Type should be in or out"))?;

        let (amount, account_id) = match (self.amount, self.account_id) {
            (Some(amount), Some(account_id)) if !amount.is_zero() => (amount, account_id),
            _ => {
                let field_errors = HashMap::from([(
                    "amount".to_string(),
                    "This field is required".to_string(),
                )]);
                return Err(ApiError::validation_error(
                    "Missing required fields",
                    Some(field_errors),
                ));
            }
        };

        Ok(TransactionDraft::new(
            self.name,
            kind,
            self.description,
            amount,
            account_id,
        ))
    }
}

/// GET /v1/transaction?limit=&offset=&keyword=&accountId=&<column>=<value>
pub async fn transaction_list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<ListResponse<Transaction>> {
    let query = parse_list_query(params)?;
    let page = state.transactions.fetch_all(&query).await?;
    Ok(ApiResponse::success(ListResponse::new(page)))
}

/// GET /v1/transaction/:id
pub async fn transaction_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Transaction> {
    let trx = state.transactions.fetch_by_id(parse_id(&id)?).await?;
    Ok(ApiResponse::success(trx))
}

/// POST /v1/transaction
pub async fn transaction_post(
    State(state): State<AppState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> ApiResult<Transaction> {
    let Json(request) = payload?;
    let draft = request.into_draft()?;

    let trx = state.transactions.create(draft).await?;
    Ok(ApiResponse::created(trx))
}

/// PATCH /v1/transaction/:id - full replacement of the editable fields
pub async fn transaction_patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> ApiResult<Transaction> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let draft = request.into_draft()?;

    let trx = state.transactions.update(id, draft).await?;
    Ok(ApiResponse::success(trx))
}

/// DELETE /v1/transaction/:id - soft delete
pub async fn transaction_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.transactions.delete(parse_id(&id)?).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// GET /v1/transaction/daily
pub async fn transaction_daily(State(state): State<AppState>) -> ApiResult<Vec<SummaryDaily>> {
    let rows = state.transactions.daily_summary().await?;
    Ok(ApiResponse::success(rows))
}

/// GET /v1/transaction/monthly
pub async fn transaction_monthly(State(state): State<AppState>) -> ApiResult<Vec<SummaryMonthly>> {
    let rows = state.transactions.monthly_summary().await?;
    Ok(ApiResponse::success(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;

    fn request(kind: &str) -> TransactionRequest {
        TransactionRequest {
            name: "Lunch".into(),
            kind: kind.into(),
            description: "noodles".into(),
            amount: Some(dec!(12.5)),
            account_id: Some(1),
        }
    }

    #[test]
    fn type_selects_amount_slot() {
        let draft = request("out").into_draft().unwrap();
        assert_eq!(draft.amount_out, dec!(12.5));
        assert_eq!(draft.amount_in, Decimal::ZERO);
    }

    #[test]
    fn unknown_type_is_bad_request() {
        let err = request("transfer").into_draft().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Type should be in or out");
    }

    #[test]
    fn missing_fields_are_validation_errors() {
        let mut req = request("in");
        req.account_id = None;
        assert_eq!(req.into_draft().unwrap_err().error_code(), "VALIDATION_ERROR");

        let mut req = request("in");
        req.amount = Some(Decimal::ZERO);
        assert_eq!(req.into_draft().unwrap_err().error_code(), "VALIDATION_ERROR");
    }
}
