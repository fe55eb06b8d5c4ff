// handlers/classes/update.rs - PUT /api/classes/:id handler

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::database::{models::ClassInput, record::parse_record_id, Collection};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedClass {
    pub modified_count: u64,
}

/// PUT /api/classes/:id - Merge the supplied fields into a class.
/// Fields left out of the body keep their stored values.
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ClassInput>, JsonRejection>,
) -> ApiResult<UpdatedClass> {
    let Path(id) = path?;
    let id = parse_record_id(&id)?;
    let Json(input) = payload?;

    let result = state
        .store
        .update_one(Collection::Classes, id, input.into_patch(Utc::now()))
        .await?;

    if result.matched_count == 0 {
        return Err(ApiError::not_found("class not found"));
    }

    tracing::info!("Updated class {} (modified: {})", id, result.modified_count);
    Ok(ApiResponse::success(UpdatedClass { modified_count: result.modified_count }))
}
