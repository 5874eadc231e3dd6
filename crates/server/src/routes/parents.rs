use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use models::parent;
use service::pagination::Page;
use service::parent_service::{self, CreateParent, UpdateParent};

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, PageQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
        .route("/email/:email", get(get_by_email))
}

#[utoipa::path(post, path = "/api/v1/parent", tag = "parent",
    request_body = crate::openapi::ParentDoc,
    responses((status = 201, description = "Parent created"), (status = 400, description = "Invalid field"), (status = 409, description = "Email taken")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateParent>,
) -> Result<(StatusCode, Json<parent::Model>), ApiError> {
    let created = parent_service::create_parent(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> Result<Json<Page<parent::Model>>, ApiError> {
    Ok(Json(parent_service::list_parents(&state.db, q.into_request()?).await?))
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<parent::Model>, ApiError> {
    Ok(Json(parent_service::get_parent(&state.db, id).await?))
}

pub async fn get_by_email(State(state): State<AppState>, ApiPath(email): ApiPath<String>) -> Result<Json<parent::Model>, ApiError> {
    Ok(Json(parent_service::get_parent_by_email(&state.db, &email).await?))
}

#[utoipa::path(put, path = "/api/v1/parent/{id}", tag = "parent",
    params(("id" = i32, Path,)), request_body = crate::openapi::ParentDoc,
    responses((status = 200, description = "Merged parent"), (status = 400, description = "Invalid email format")))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateParent>,
) -> Result<Json<parent::Model>, ApiError> {
    Ok(Json(parent_service::update_parent(&state.db, id, input).await?))
}

pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, ApiError> {
    parent_service::delete_parent(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
