// handlers/classes/delete.rs - DELETE /api/classes/:id handler

use axum::extract::{rejection::PathRejection, Path, State};
use serde::Serialize;

use crate::database::{record::parse_record_id, Collection};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedClass {
    pub deleted_count: u64,
}

/// DELETE /api/classes/:id
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<DeletedClass> {
    let Path(id) = path?;
    let id = parse_record_id(&id)?;

    let deleted_count = state.store.delete_one(Collection::Classes, id).await?;
    if deleted_count == 0 {
        return Err(ApiError::not_found("class not found for delete"));
    }

    tracing::info!("Deleted class {}", id);
    Ok(ApiResponse::success(DeletedClass { deleted_count }))
}
