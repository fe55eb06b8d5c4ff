use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "$eq")] Eq,
    #[serde(rename = "$ne")] Ne,
    #[serde(rename = "$gt")] Gt,
    #[serde(rename = "$gte")] Gte,
    #[serde(rename = "$lt")] Lt,
    #[serde(rename = "$lte")] Lte,
}

impl FilterOp {
    pub fn sql_operator(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "<>",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    pub where_clause: Option<Value>,
}

impl FilterData {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_where(where_clause: Value) -> Self {
        Self { where_clause: Some(where_clause) }
    }
}

/// A comparison operand. Range operands that parse as RFC 3339 compare chronologically.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl FilterValue {
    /// Equality operands are never coerced, so `{notes: "2024-03-01T00:00:00Z"}` stays a text match.
    pub fn from_json(value: &Value, operator: FilterOp) -> Result<Self, FilterError> {
        match value {
            Value::Null => Ok(FilterValue::Null),
            Value::Bool(b) => Ok(FilterValue::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(FilterValue::Number)
                .ok_or_else(|| FilterError::InvalidOperatorData(format!("unsupported number {}", n))),
            Value::String(s) if operator.is_range() => Ok(match DateTime::parse_from_rfc3339(s) {
                Ok(dt) => FilterValue::Timestamp(dt.with_timezone(&Utc)),
                Err(_) => FilterValue::Text(s.clone()),
            }),
            Value::String(s) => Ok(FilterValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(FilterError::InvalidOperatorData(
                "comparison value must be a scalar".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: FilterValue,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FilterValue>,
}
