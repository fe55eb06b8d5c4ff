use serde_json::Value;

use super::error::FilterError;
use super::filter_where::{FilterWhere, DATA_COLUMN};
use super::types::{FilterData, FilterWhereInfo, SqlResult};

/// A where document bound to one collection table
pub struct Filter {
    table_name: String,
    where_data: Option<Value>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            where_data: None,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    /// Documents in insertion order
    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = match self.where_data {
            Some(ref where_data) => FilterWhere::generate(where_data, 0)?,
            None => ("1=1".to_string(), vec![]),
        };

        let query = format!(
            "SELECT id, {} FROM \"{}\" WHERE {} ORDER BY seq",
            DATA_COLUMN, self.table_name, where_clause
        );

        Ok(SqlResult { query, params })
    }

    pub fn conditions(&self) -> Result<Vec<FilterWhereInfo>, FilterError> {
        match self.where_data {
            Some(ref where_data) => FilterWhere::parse(where_data),
            None => Ok(vec![]),
        }
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if name.is_empty() { return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())); }
        if !name.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
            return Err(FilterError::InvalidTableName(name.to_string()));
        }
        Ok(())
    }
}
