use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use service::child_service::{self, ChildDetails, CreateChild, UpdateChild};
use service::pagination::Page;

use crate::errors::ApiError;
use crate::extract::{ids, ApiJson, ApiPath, ApiQuery, IdRef, PageQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
        .route("/:id/activities", post(add_activities).delete(remove_activities))
        .route("/:id/activities/clear", delete(clear_activities))
}

#[utoipa::path(post, path = "/api/v1/child", tag = "child",
    request_body = crate::openapi::ChildDoc,
    responses(
        (status = 201, description = "Child created"),
        (status = 404, description = "Group, parent or kindergarten missing"),
        (status = 409, description = "Same name, surname and parent already registered")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateChild>,
) -> Result<(StatusCode, Json<ChildDetails>), ApiError> {
    let created = child_service::create_child(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> Result<Json<Page<ChildDetails>>, ApiError> {
    Ok(Json(child_service::list_children(&state.db, q.into_request()?).await?))
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<ChildDetails>, ApiError> {
    Ok(Json(child_service::get_child(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/v1/child/{id}", tag = "child",
    params(("id" = i32, Path,)), request_body = crate::openapi::ChildDoc,
    responses((status = 200, description = "Merged child"), (status = 409, description = "Merged triple collides")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateChild>,
) -> Result<Json<ChildDetails>, ApiError> {
    Ok(Json(child_service::update_child(&state.db, id, input).await?))
}

pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, ApiError> {
    child_service::delete_child(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/v1/child/{id}/activities", tag = "child",
    params(("id" = i32, Path,)), request_body = Vec<crate::openapi::IdRefDoc>,
    responses((status = 200, description = "Child with its activities"), (status = 404, description = "Unknown child or activity")))]
pub async fn add_activities(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(refs): ApiJson<Vec<IdRef>>,
) -> Result<Json<ChildDetails>, ApiError> {
    Ok(Json(child_service::add_activities(&state.db, id, &ids(&refs)).await?))
}

pub async fn remove_activities(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(refs): ApiJson<Vec<IdRef>>,
) -> Result<Json<ChildDetails>, ApiError> {
    Ok(Json(child_service::remove_activities(&state.db, id, &ids(&refs)).await?))
}

pub async fn clear_activities(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<ChildDetails>, ApiError> {
    Ok(Json(child_service::clear_activities(&state.db, id).await?))
}
