use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::AccountRepository;
use crate::database::models::{Account, AccountRow, NewAccount, Status};
use crate::database::query_builder::QueryBuilder;
use crate::error::DomainError;
use crate::filter::{Filter, ListQuery};

const ACCOUNT_COLUMNS: &str = "id, name, type, description, status, created_at, updated_at";

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn list_filter() -> Filter {
        Filter::new(
            format!("SELECT {} FROM accounts", ACCOUNT_COLUMNS),
            "SELECT COUNT(id) FROM accounts",
        )
        .predicate("status = 1")
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn fetch_all(&self, query: &ListQuery) -> Result<(Vec<Account>, i64), DomainError> {
        let (rows, total) = QueryBuilder::<AccountRow>::new(Self::list_filter())
            .assign(query)?
            .select_page(&self.pool)
            .await?;
        Ok((rows.into_iter().map(Account::from).collect(), total))
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Account, DomainError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE status = 1 AND id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Account::from).ok_or(DomainError::NotFound)
    }

    async fn store(&self, account: NewAccount, now: DateTime<Utc>) -> Result<Account, DomainError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO accounts (name, type, description, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(&account.name)
        .bind(&account.kind)
        .bind(&account.description)
        .bind(Status::Active.to_db())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update(&self, account: &Account) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE accounts SET name = $1, type = $2, description = $3, updated_at = $4 \
             WHERE status = 1 AND id = $5",
        )
        .bind(&account.name)
        .bind(&account.kind)
        .bind(&account.description)
        .bind(account.updated_at)
        .bind(account.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() != 1 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        sqlx::query("UPDATE accounts SET status = $1 WHERE id = $2")
            .bind(Status::Inactive.to_db())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
