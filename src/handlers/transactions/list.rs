// handlers/transactions/list.rs - GET /api/transactions handler

use axum::extract::{rejection::QueryRejection, Query, State};
use serde::Deserialize;
use serde_json::Value;

use crate::database::{models::MonthRange, Collection};
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    /// Start of the month range, e.g. `2024-03-01`
    pub month: Option<String>,
}

/// GET /api/transactions[?month=YYYY-MM-DD] - Transactions, optionally limited
/// to `[month, month + 1 calendar month)`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<TransactionQuery>, QueryRejection>,
) -> ApiResult<Vec<Value>> {
    let Query(query) = query?;
    let filter = match query.month.as_deref().filter(|m| !m.is_empty()) {
        Some(month) => MonthRange::parse(month)?.to_filter(),
        None => FilterData::all(),
    };

    let transactions = state
        .store
        .find(Collection::Transactions, filter)
        .await?
        .into_iter()
        .map(|doc| doc.into_value())
        .collect();

    Ok(ApiResponse::success(transactions))
}
