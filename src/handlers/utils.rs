// handlers/utils.rs - request parsing shared by the handler tiers

use std::collections::HashMap;

use validator::Validate;

use crate::error::{ApiError, DomainError};
use crate::filter::ListQuery;

/// Query parameters with structural meaning; everything else is a filter
const RESERVED_PARAMS: [&str; 3] = ["limit", "offset", "keyword"];

/// Split raw query parameters into a `ListQuery`.
///
/// `limit` and `offset` are required integers, no default is applied.
pub fn parse_list_query(params: HashMap<String, String>) -> Result<ListQuery, ApiError> {
    let limit = required_int(&params, "limit")?;
    let offset = required_int(&params, "offset")?;

    let mut query = ListQuery::new(limit, offset);
    for (key, value) in params {
        if key == "keyword" {
            query.keyword = Some(value);
        } else if !RESERVED_PARAMS.contains(&key.as_str()) {
            query.filters.insert(key, value);
        }
    }
    Ok(query)
}

fn required_int(params: &HashMap<String, String>, key: &str) -> Result<i64, ApiError> {
    params
        .get(key)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .ok_or_else(|| DomainError::BadParamInput(key.to_string()).into())
}

/// Path ids that are not integers cannot name an existing row
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::from(DomainError::NotFound))
}

pub fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request.validate().map_err(ApiError::from)
}
