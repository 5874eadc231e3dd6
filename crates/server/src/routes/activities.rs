use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use models::activity;
use service::activity_service::{self, CreateActivity, UpdateActivity};
use service::pagination::Page;

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, PageQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
        .route("/name/:name", get(get_by_name))
}

#[utoipa::path(post, path = "/api/v1/activities", tag = "activities",
    request_body = crate::openapi::ActivityDoc,
    responses((status = 201, description = "Activity created"), (status = 409, description = "Name taken")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateActivity>,
) -> Result<(StatusCode, Json<activity::Model>), ApiError> {
    let created = activity_service::create_activity(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/v1/activities", tag = "activities",
    params(("page" = Option<i64>, Query,), ("size" = Option<i64>, Query,)),
    responses((status = 200, description = "One page of activities")))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Page<activity::Model>>, ApiError> {
    Ok(Json(activity_service::list_activities(&state.db, q.into_request()?).await?))
}

#[utoipa::path(get, path = "/api/v1/activities/{id}", tag = "activities",
    params(("id" = i32, Path,)),
    responses((status = 200, description = "Activity"), (status = 404, description = "Unknown id")))]
pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<activity::Model>, ApiError> {
    Ok(Json(activity_service::get_activity(&state.db, id).await?))
}

pub async fn get_by_name(State(state): State<AppState>, ApiPath(name): ApiPath<String>) -> Result<Json<activity::Model>, ApiError> {
    Ok(Json(activity_service::get_activity_by_name(&state.db, &name).await?))
}

#[utoipa::path(put, path = "/api/v1/activities/{id}", tag = "activities",
    params(("id" = i32, Path,)), request_body = crate::openapi::ActivityDoc,
    responses((status = 200, description = "Merged activity")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateActivity>,
) -> Result<Json<activity::Model>, ApiError> {
    Ok(Json(activity_service::update_activity(&state.db, id, input).await?))
}

#[utoipa::path(delete, path = "/api/v1/activities/{id}", tag = "activities",
    params(("id" = i32, Path,)),
    responses((status = 204, description = "Deleted"), (status = 409, description = "Still referenced")))]
pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, ApiError> {
    activity_service::delete_activity(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
