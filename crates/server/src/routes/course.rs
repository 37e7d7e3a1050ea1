use crate::{
    dtos::prereq::{PrereqGroupResponse, PrereqTreeResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::{StoreError, services::prereq::PrereqService};
use log::error;
use models::expand;

/// Get the term-resolved prerequisites of a course
#[utoipa::path(
    get,
    path = "/courses/{course_id}/prereqs",
    params(
        ("course_id" = String, Path, description = "Course ID, e.g. CSE100")
    ),
    responses(
        (status = 200, description = "Prerequisite groups, empty if none are recorded", body = Vec<PrereqGroupResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Prerequisites"
)]
pub async fn get_prereqs(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<PrereqGroupResponse>>, StatusCode> {
    let course_id = course_id.to_uppercase();

    let groups = PrereqService::resolve_prereqs(&state.db, &course_id)
        .await
        .map_err(|e| store_error(&course_id, e))?;

    Ok(Json(groups.into_iter().map(Into::into).collect()))
}

/// Get the full transitive prerequisite tree of a course
#[utoipa::path(
    get,
    path = "/courses/{course_id}/tree",
    params(
        ("course_id" = String, Path, description = "Course ID, e.g. CSE100")
    ),
    responses(
        (status = 200, description = "Expanded tree; repeated ancestors are marked as cycles", body = PrereqTreeResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Prerequisites"
)]
pub async fn get_tree(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<PrereqTreeResponse>, StatusCode> {
    let course_id = course_id.to_uppercase();

    let table = PrereqService::reachable_table(&state.db, &course_id)
        .await
        .map_err(|e| store_error(&course_id, e))?;

    Ok(Json(expand(&course_id, &table).into()))
}

/// Maps store failures to a status code, logging the cause
fn store_error(course_id: &str, e: StoreError) -> StatusCode {
    error!("Failed to read prerequisites for {course_id}: {e}");
    match e {
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
