use rust_decimal::Decimal;
use serde_json::Value;

use super::error::FilterError;
use super::filter_where::{like_pattern, FilterWhere};
use super::types::{ColumnOverride, FilterOp, FilterWhereInfo, ListQuery, SqlResult};

/// Bounded SELECT plus parallel COUNT built from a fixed base query and a
/// caller supplied `ListQuery`.
///
/// The base SQL and predicates are trusted repository text. Everything taken
/// from the `ListQuery` is bound through placeholders.
#[derive(Debug, Clone)]
pub struct Filter {
    select_sql: String,
    count_sql: String,
    base_predicates: Vec<String>,
    column_prefix: Option<String>,
    overrides: &'static [ColumnOverride],
    keyword_column: &'static str,
    order_by: String,
    where_data: FilterWhere,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(select_sql: impl Into<String>, count_sql: impl Into<String>) -> Self {
        Self {
            select_sql: select_sql.into(),
            count_sql: count_sql.into(),
            base_predicates: vec![],
            column_prefix: None,
            overrides: &[],
            keyword_column: "name",
            order_by: "id ASC".to_string(),
            where_data: FilterWhere::new(),
            limit: None,
            offset: None,
        }
    }

    /// Predicate that always applies, e.g. the active-status check
    pub fn predicate(mut self, sql: impl Into<String>) -> Self {
        self.base_predicates.push(sql.into());
        self
    }

    /// Table alias used to qualify filter columns
    pub fn column_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.column_prefix = Some(prefix.into());
        self
    }

    pub fn overrides(mut self, overrides: &'static [ColumnOverride]) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    pub fn assign(&mut self, query: &ListQuery) -> Result<&mut Self, FilterError> {
        for (key, value) in &query.filters {
            self.where_clause(key, value)?;
        }
        if let Some(keyword) = query.effective_keyword() {
            self.where_data.push(FilterWhereInfo {
                column: self.keyword_column.to_string(),
                operator: FilterOp::Like,
                data: Value::String(like_pattern(keyword)),
            });
        }
        self.limit(query.limit, query.offset)?;
        Ok(self)
    }

    pub fn where_clause(&mut self, key: &str, value: &str) -> Result<&mut Self, FilterError> {
        let condition = match self.overrides.iter().find(|o| o.key == key) {
            Some(over) => FilterWhereInfo {
                column: over.column.to_string(),
                operator: over.operator,
                data: Self::typed_value(over, value)?,
            },
            None => FilterWhereInfo {
                column: key.to_string(),
                operator: FilterOp::Eq,
                data: Value::String(value.to_string()),
            },
        };
        self.where_data.push(condition);
        Ok(self)
    }

    pub fn limit(&mut self, limit: i64, offset: i64) -> Result<&mut Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
        }
        if offset < 0 {
            return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string()));
        }
        self.limit = Some(limit);
        self.offset = Some(offset);
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, mut params) = self.to_where()?;

        let mut query = format!(
            "{} WHERE {} ORDER BY {}",
            self.select_sql, where_clause, self.order_by
        );
        if let Some(limit) = self.limit {
            params.push(Value::from(limit));
            query.push_str(&format!(" LIMIT ${}", params.len()));
        }
        if let Some(offset) = self.offset {
            params.push(Value::from(offset));
            query.push_str(&format!(" OFFSET ${}", params.len()));
        }

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.to_where()?;
        Ok(SqlResult {
            query: format!("{} WHERE {}", self.count_sql, where_clause),
            params,
        })
    }

    fn to_where(&self) -> Result<(String, Vec<Value>), FilterError> {
        self.where_data
            .generate(&self.base_predicates, self.column_prefix.as_deref())
    }

    fn typed_value(over: &ColumnOverride, value: &str) -> Result<Value, FilterError> {
        match over.operator {
            FilterOp::EqInt => value
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| FilterError::InvalidValue {
                    column: over.key.to_string(),
                    value: value.to_string(),
                }),
            FilterOp::EqDecimal => value
                .trim()
                .parse::<Decimal>()
                .map(|d| Value::String(d.normalize().to_string()))
                .map_err(|_| FilterError::InvalidValue {
                    column: over.key.to_string(),
                    value: value.to_string(),
                }),
            _ => Ok(Value::String(value.to_string())),
        }
    }
}
