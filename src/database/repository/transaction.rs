use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::TransactionRepository;
use crate::database::models::{
    Status, SummaryDaily, SummaryMonthly, Transaction, TransactionDraft, TransactionRow,
};
use crate::database::query_builder::QueryBuilder;
use crate::error::DomainError;
use crate::filter::{ColumnOverride, Filter, ListQuery};

const SELECT_TRANSACTION: &str = "SELECT t.id, t.name, t.type, t.description, t.amount_in, t.amount_out, \
     t.status, t.account_id, a.name AS account_name, a.type AS account_type, \
     a.description AS account_description, a.status AS account_status, \
     t.created_at, t.updated_at \
     FROM transactions t LEFT JOIN accounts a ON t.account_id = a.id";

const COUNT_TRANSACTION: &str =
    "SELECT COUNT(t.id) FROM transactions t LEFT JOIN accounts a ON t.account_id = a.id";

const TRANSACTION_OVERRIDES: &[ColumnOverride] = &[
    ColumnOverride::integer("accountId", "account_id"),
    ColumnOverride::integer("account_id", "account_id"),
    ColumnOverride::decimal("amountIn", "amount_in"),
    ColumnOverride::decimal("amount_in", "amount_in"),
    ColumnOverride::decimal("amountOut", "amount_out"),
    ColumnOverride::decimal("amount_out", "amount_out"),
];

pub struct PgTransactionRepository {
    pool: PgPool,
}

impl PgTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn list_filter() -> Filter {
        Filter::new(SELECT_TRANSACTION, COUNT_TRANSACTION)
            .predicate("t.status = 1")
            .column_prefix("t")
            .overrides(TRANSACTION_OVERRIDES)
            .order_by("t.id ASC")
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Transaction>, i64), DomainError> {
        let (rows, total) = QueryBuilder::<TransactionRow>::new(Self::list_filter())
            .assign(query)?
            .select_page(&self.pool)
            .await?;
        Ok((rows.into_iter().map(Transaction::from).collect(), total))
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Transaction, DomainError> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "{} WHERE t.status = 1 AND t.id = $1",
            SELECT_TRANSACTION
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Transaction::from).ok_or(DomainError::NotFound)
    }

    async fn store(&self, draft: &TransactionDraft, now: DateTime<Utc>) -> Result<i64, DomainError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions \
             (name, account_id, type, description, amount_in, amount_out, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) RETURNING id",
        )
        .bind(&draft.name)
        .bind(draft.account_id)
        .bind(draft.kind.as_str())
        .bind(&draft.description)
        .bind(draft.amount_in)
        .bind(draft.amount_out)
        .bind(Status::Active.to_db())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: i64, draft: &TransactionDraft, now: DateTime<Utc>) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE transactions SET name = $1, account_id = $2, type = $3, description = $4, \
             amount_in = $5, amount_out = $6, updated_at = $7 WHERE status = 1 AND id = $8",
        )
        .bind(&draft.name)
        .bind(draft.account_id)
        .bind(draft.kind.as_str())
        .bind(&draft.description)
        .bind(draft.amount_in)
        .bind(draft.amount_out)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() != 1 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        sqlx::query("UPDATE transactions SET status = $1 WHERE id = $2")
            .bind(Status::Inactive.to_db())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn daily_summary(&self) -> Result<Vec<SummaryDaily>, DomainError> {
        let rows = sqlx::query_as::<_, SummaryDaily>(
            "SELECT EXTRACT(DAY FROM created_at)::INT AS day, \
             EXTRACT(MONTH FROM created_at)::INT AS month, \
             EXTRACT(YEAR FROM created_at)::INT AS year, \
             AVG(NULLIF(amount_in, 0)) AS average_in, \
             AVG(NULLIF(amount_out, 0)) AS average_out \
             FROM transactions GROUP BY 1, 2, 3 ORDER BY 3, 2, 1",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn monthly_summary(&self) -> Result<Vec<SummaryMonthly>, DomainError> {
        let rows = sqlx::query_as::<_, SummaryMonthly>(
            "SELECT EXTRACT(MONTH FROM created_at)::INT AS month, \
             EXTRACT(YEAR FROM created_at)::INT AS year, \
             AVG(NULLIF(amount_in, 0)) AS average_in, \
             AVG(NULLIF(amount_out, 0)) AS average_out \
             FROM transactions GROUP BY 1, 2 ORDER BY 2, 1",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
