use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Average non-zero amounts for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDaily {
    pub day: i32,
    pub month: i32,
    pub year: i32,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub average_in: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub average_out: Option<Decimal>,
}

/// Average non-zero amounts for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMonthly {
    pub month: i32,
    pub year: i32,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub average_in: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub average_out: Option<Decimal>,
}
