use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Status;

/// Direction of a transaction; decides which amount column is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    In,
    Out,
}

impl TransactionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in" => Some(TransactionKind::In),
            "out" => Some(TransactionKind::Out),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::In => "in",
            TransactionKind::Out => "out",
        }
    }

    /// `(amount_in, amount_out)` with the other slot zeroed
    pub fn split(self, amount: Decimal) -> (Decimal, Decimal) {
        match self {
            TransactionKind::In => (amount, Decimal::ZERO),
            TransactionKind::Out => (Decimal::ZERO, amount),
        }
    }
}

/// Denormalized account fields carried on a transaction read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAccount {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_in: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_out: Decimal,
    pub status: Status,
    pub account: TransactionAccount,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transaction joined with its account. The account columns are nullable
/// because of the LEFT JOIN.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub description: String,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub status: i16,
    pub account_id: i64,
    pub account_name: Option<String>,
    pub account_type: Option<String>,
    pub account_description: Option<String>,
    pub account_status: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            kind: row.kind,
            description: row.description,
            amount_in: row.amount_in,
            amount_out: row.amount_out,
            status: Status::from(row.status),
            account: TransactionAccount {
                id: row.account_id,
                name: row.account_name.unwrap_or_default(),
                kind: row.account_type.unwrap_or_default(),
                description: row.account_description.unwrap_or_default(),
                status: Status::from(row.account_status.unwrap_or(0)),
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Validated write payload for create and update
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub name: String,
    pub kind: TransactionKind,
    pub description: String,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub account_id: i64,
}

impl TransactionDraft {
    pub fn new(
        name: impl Into<String>,
        kind: TransactionKind,
        description: impl Into<String>,
        amount: Decimal,
        account_id: i64,
    ) -> Self {
        let (amount_in, amount_out) = kind.split(amount);
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            amount_in,
            amount_out,
            account_id,
        }
    }
}
