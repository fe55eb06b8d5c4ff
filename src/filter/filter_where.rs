use serde_json::{Map, Value};
use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::error::FilterError;
use super::types::{FilterOp, FilterValue, FilterWhereInfo};

/// Column holding the JSONB document body in every collection table
pub const DATA_COLUMN: &str = "data";

/// Stored strings must look like this before Postgres is asked to cast them
const RFC3339_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$";

pub struct FilterWhere {
    param_values: Vec<FilterValue>,
    param_index: usize,
    conditions: Vec<FilterWhereInfo>,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
            conditions: vec![],
        }
    }

    /// Parse a where document into its field conditions
    pub fn parse(where_data: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        let mut filter_where = Self::new(0);
        filter_where.parse_where_data(where_data)?;
        Ok(filter_where.conditions)
    }

    pub fn generate(where_data: &Value, starting_param_index: usize) -> Result<(String, Vec<FilterValue>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.parse_where_data(where_data)?;

        let conditions_snapshot = filter_where.conditions.clone();
        let mut sql_conditions = vec![];
        for condition in &conditions_snapshot {
            sql_conditions.push(filter_where.build_sql_condition(condition));
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    /// Evaluate parsed conditions against a document body. All conditions must hold.
    pub fn matches(conditions: &[FilterWhereInfo], document: &Map<String, Value>) -> bool {
        conditions.iter().all(|condition| Self::matches_condition(condition, document.get(&condition.column)))
    }

    fn parse_where_data(&mut self, where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null => Ok(()),
            Value::Object(obj) => {
                for (key, value) in obj {
                    if key.starts_with('$') {
                        return Err(FilterError::UnsupportedOperator(key.clone()));
                    }
                    self.parse_field_condition(key, value)?;
                }
                Ok(())
            }
            _ => Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        }
    }

    fn parse_field_condition(&mut self, field: &str, value: &Value) -> Result<(), FilterError> {
        Self::validate_column(field)?;
        if let Value::Object(obj) = value {
            for (op_key, op_val) in obj {
                let operator = Self::map_operator(op_key)?;
                let data = FilterValue::from_json(op_val, operator)?;
                if operator.is_range() && data == FilterValue::Null {
                    return Err(FilterError::InvalidOperatorData(format!("{} requires a non-null value", op_key)));
                }
                self.conditions.push(FilterWhereInfo { column: field.to_string(), operator, data });
            }
        } else {
            // Implicit equality: { field: value }
            let data = FilterValue::from_json(value, FilterOp::Eq)?;
            self.conditions.push(FilterWhereInfo { column: field.to_string(), operator: FilterOp::Eq, data });
        }
        Ok(())
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Ne,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn validate_column(name: &str) -> Result<(), FilterError> {
        let valid = !name.is_empty()
            && name.len() <= 63
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !name.starts_with(|c: char| c.is_ascii_digit());
        if valid { Ok(()) } else { Err(FilterError::InvalidColumn(name.to_string())) }
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> String {
        // Column names are validated identifiers, safe to inline as a JSON key literal
        let field = format!("{}->>'{}'", DATA_COLUMN, condition.column);
        let json_field = format!("{}->'{}'", DATA_COLUMN, condition.column);
        let op = condition.operator.sql_operator();

        // Casts sit inside CASE: values of another JSON type compare as NULL
        let operand = match &condition.data {
            FilterValue::Null => {
                return match condition.operator {
                    FilterOp::Ne => format!("COALESCE(jsonb_typeof({}), 'null') <> 'null'", json_field),
                    _ => format!("COALESCE(jsonb_typeof({}), 'null') = 'null'", json_field),
                };
            }
            FilterValue::Timestamp(_) => format!(
                "CASE WHEN jsonb_typeof({}) = 'string' AND {} ~ '{}' THEN ({})::timestamptz END",
                json_field, field, RFC3339_PATTERN, field
            ),
            FilterValue::Number(_) => {
                format!("CASE WHEN jsonb_typeof({}) = 'number' THEN ({})::float8 END", json_field, field)
            }
            FilterValue::Bool(_) => {
                format!("CASE WHEN jsonb_typeof({}) = 'boolean' THEN ({})::boolean END", json_field, field)
            }
            FilterValue::Text(_) => {
                format!("CASE WHEN jsonb_typeof({}) = 'string' THEN {} END", json_field, field)
            }
        };

        let param = self.param(condition.data.clone());
        format!("{} {} {}", operand, op, param)
    }

    fn param(&mut self, value: FilterValue) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    fn matches_condition(condition: &FilterWhereInfo, actual: Option<&Value>) -> bool {
        let actual = actual.filter(|v| !v.is_null());

        let ordering = match (&condition.data, actual) {
            (FilterValue::Null, None) => return condition.operator == FilterOp::Eq,
            (FilterValue::Null, Some(_)) => return condition.operator == FilterOp::Ne,
            (_, None) => return false,
            (FilterValue::Timestamp(expected), Some(Value::String(s))) => {
                match DateTime::parse_from_rfc3339(s) {
                    Ok(dt) => dt.with_timezone(&Utc).cmp(expected),
                    Err(_) => return false,
                }
            }
            (FilterValue::Number(expected), Some(Value::Number(n))) => {
                match n.as_f64().and_then(|v| v.partial_cmp(expected)) {
                    Some(ord) => ord,
                    None => return false,
                }
            }
            (FilterValue::Bool(expected), Some(Value::Bool(b))) => b.cmp(expected),
            (FilterValue::Text(expected), Some(Value::String(s))) => s.as_str().cmp(expected.as_str()),
            _ => return false,
        };

        match condition.operator {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Ne => ordering != Ordering::Equal,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
        }
    }
}
