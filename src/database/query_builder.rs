use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::filter::types::SqlResult;
use crate::filter::{Filter, ListQuery};
use crate::error::DomainError;

/// Runs a `Filter` against the pool: count first, then the bounded page.
pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn assign(mut self, query: &ListQuery) -> Result<Self, DomainError> {
        self.filter.assign(query)?;
        Ok(self)
    }

    /// Rows for the requested page plus the total number of matching rows
    pub async fn select_page(self, pool: &PgPool) -> Result<(Vec<T>, i64), DomainError> {
        let count_sql = self.filter.to_count_sql()?;
        let data_sql = self.filter.to_sql()?;

        let total = count(pool, &count_sql).await?;
        let rows = select_all::<T>(pool, &data_sql).await?;
        Ok((rows, total))
    }
}

pub async fn select_all<T>(pool: &PgPool, sql_result: &SqlResult) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    let mut q = sqlx::query_as::<_, T>(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param_query_as(q, p);
    }
    Ok(q.fetch_all(pool).await?)
}

/// An empty count result set is a count of zero
pub async fn count(pool: &PgPool, sql_result: &SqlResult) -> Result<i64, DatabaseError> {
    let mut q = sqlx::query_scalar::<_, i64>(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param_query_scalar(q, p);
    }
    Ok(q.fetch_optional(pool).await?.unwrap_or(0))
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => q.bind(i),
            None => q.bind(n.to_string()),
        },
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.to_string()),
    }
}

fn bind_param_query_scalar<'q>(
    q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => q.bind(i),
            None => q.bind(n.to_string()),
        },
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.to_string()),
    }
}
