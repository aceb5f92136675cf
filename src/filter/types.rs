use std::collections::BTreeMap;

/// Structural list parameters plus free-form equality filters.
///
/// Filters live in a `BTreeMap` so the generated SQL does not depend on the
/// order in which the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: BTreeMap<String, String>,
    pub keyword: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ListQuery {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit,
            offset,
            ..Default::default()
        }
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Keyword with surrounding whitespace removed, or None when blank
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Text equality, column cast to text
    Eq,
    /// Integer equality, value bound as i64
    EqInt,
    /// Numeric equality, value parsed as a decimal and cast with `::numeric`
    EqDecimal,
    /// Substring match with escaped pattern
    Like,
}

/// How a filter key maps onto a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOverride {
    pub key: &'static str,
    pub column: &'static str,
    pub operator: FilterOp,
}

impl ColumnOverride {
    pub const fn integer(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            operator: FilterOp::EqInt,
        }
    }

    pub const fn decimal(key: &'static str, column: &'static str) -> Self {
        Self {
            key,
            column,
            operator: FilterOp::EqDecimal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<serde_json::Value>,
}
