// handlers/classes/create.rs - POST /api/classes handler

use axum::{extract::{rejection::JsonRejection, State}, Json};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::database::{models::ClassInput, Collection};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedClass {
    pub inserted_id: Uuid,
}

/**
 * POST /api/classes - Create a class
 *
 * Expected Input:
 * ```json
 * {
 *   "subject": "string",     // Required
 *   "instructor": "string",  // Required
 *   "dayOfWeek": "string",   // Required
 *   "startTime": "string",   // Required
 *   "endTime": "string",     // Required
 *   "color": "string",       // Optional, defaults to #0046FF
 *   "notes": "string"        // Optional, defaults to ""
 * }
 * ```
 *
 * @returns 201 with `{ insertedId }`
 */
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ClassInput>, JsonRejection>,
) -> ApiResult<CreatedClass> {
    let Json(input) = payload?;
    let class = input.into_new_class(Utc::now())?;

    let inserted_id = state.store.insert_one(Collection::Classes, class.into_fields()).await?;
    tracing::info!("Created class {}", inserted_id);

    Ok(ApiResponse::created(CreatedClass { inserted_id }))
}
