use serde_json::Value;

use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo};

/// AND-combined predicate list rendered with `$n` placeholders.
#[derive(Debug, Clone, Default)]
pub struct FilterWhere {
    conditions: Vec<FilterWhereInfo>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: FilterWhereInfo) {
        self.conditions.push(condition);
    }

    /// Render `fixed` predicates followed by the bound conditions.
    ///
    /// `fixed` is trusted SQL supplied by the repository, never by callers.
    /// Placeholders start at `$1`, in the order conditions were pushed.
    pub fn generate(&self, fixed: &[String], column_prefix: Option<&str>) -> Result<(String, Vec<Value>), FilterError> {
        let mut params = Vec::with_capacity(self.conditions.len());
        let mut sql_conditions: Vec<String> = fixed.to_vec();
        for condition in &self.conditions {
            sql_conditions.push(Self::build_sql_condition(condition, column_prefix, &mut params)?);
        }

        let where_clause = if sql_conditions.is_empty() {
            "1=1".to_string()
        } else {
            sql_conditions.join(" AND ")
        };
        Ok((where_clause, params))
    }

    fn build_sql_condition(
        condition: &FilterWhereInfo,
        column_prefix: Option<&str>,
        params: &mut Vec<Value>,
    ) -> Result<String, FilterError> {
        validate_identifier(&condition.column)?;
        let quoted_column = match column_prefix {
            Some(prefix) => format!("{}.\"{}\"", prefix, condition.column),
            None => format!("\"{}\"", condition.column),
        };

        params.push(condition.data.clone());
        let placeholder = format!("${}", params.len());
        Ok(match condition.operator {
            FilterOp::Eq => format!("{}::text = {}", quoted_column, placeholder),
            FilterOp::EqInt => format!("{} = {}", quoted_column, placeholder),
            FilterOp::EqDecimal => format!("{} = {}::numeric", quoted_column, placeholder),
            FilterOp::Like => format!("{} LIKE {} ESCAPE '\\'", quoted_column, placeholder),
        })
    }
}

/// Column names cannot be bound, so they must be plain identifiers
pub fn validate_identifier(column: &str) -> Result<(), FilterError> {
    let mut chars = column.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidColumn(column.to_string()));
    }
    Ok(())
}

/// Escape LIKE metacharacters so the keyword matches literally
pub fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
