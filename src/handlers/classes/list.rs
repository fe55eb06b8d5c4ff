// handlers/classes/list.rs - GET /api/classes handler

use axum::extract::State;

use crate::database::{models::ClassSession, Collection};
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/classes - All classes, unfiltered, in storage order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ClassSession>> {
    let classes = state
        .store
        .find(Collection::Classes, FilterData::all())
        .await?
        .into_iter()
        .map(|doc| doc.decode::<ClassSession>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ApiResponse::success(classes))
}
