use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use models::group;
use service::group_service::{self, CreateGroup, UpdateGroup};
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

#[utoipa::path(post, path = "/api/v1/groups", tag = "groups",
    request_body = crate::openapi::GroupDoc,
    responses((status = 201, description = "Group created"), (status = 409, description = "Name taken")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateGroup>,
) -> Result<(StatusCode, Json<group::Model>), ApiError> {
    let created = group_service::create_group(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/v1/groups", tag = "groups",
    params(("page" = Option<i64>, Query,), ("size" = Option<i64>, Query,)),
    responses((status = 200, description = "One page of groups")))]
pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> Result<Json<Page<group::Model>>, ApiError> {
    Ok(Json(group_service::list_groups(&state.db, q.into_request()?).await?))
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<group::Model>, ApiError> {
    Ok(Json(group_service::get_group(&state.db, id).await?))
}

pub async fn get_by_name(State(state): State<AppState>, ApiPath(name): ApiPath<String>) -> Result<Json<group::Model>, ApiError> {
    Ok(Json(group_service::get_group_by_name(&state.db, &name).await?))
}

#[utoipa::path(put, path = "/api/v1/groups/{id}", tag = "groups",
    params(("id" = i32, Path,)), request_body = crate::openapi::GroupDoc,
    responses((status = 200, description = "Merged group")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateGroup>,
) -> Result<Json<group::Model>, ApiError> {
    Ok(Json(group_service::update_group(&state.db, id, input).await?))
}

pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, ApiError> {
    group_service::delete_group(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
