use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use service::kindergarten_service::{self, CreateKindergarten, KindergartenDetails, UpdateKindergarten};
use service::pagination::Page;

use crate::errors::ApiError;
use crate::extract::{ids, ApiJson, ApiPath, ApiQuery, IdRef, PageQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
        .route("/name/:name", get(get_by_name))
        .route("/email/:email", get(get_by_email))
        .route("/:id/groups", post(add_groups).delete(remove_groups))
        .route("/:id/groups/clear", delete(clear_groups))
        .route("/:id/activities", post(add_activities).delete(remove_activities))
        .route("/:id/activities/clear", delete(clear_activities))
}

#[utoipa::path(post, path = "/api/v1/kindergarten", tag = "kindergarten",
    request_body = crate::openapi::KindergartenDoc,
    responses(
        (status = 201, description = "Kindergarten created"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Name, email or account already in use")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateKindergarten>,
) -> Result<(StatusCode, Json<KindergartenDetails>), ApiError> {
    let created = kindergarten_service::create_kindergarten(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/v1/kindergarten", tag = "kindergarten",
    params(("page" = Option<i64>, Query,), ("size" = Option<i64>, Query,)),
    responses((status = 200, description = "One page of kindergartens with groups and activities")))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Page<KindergartenDetails>>, ApiError> {
    Ok(Json(kindergarten_service::list_kindergartens(&state.db, q.into_request()?).await?))
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::get_kindergarten(&state.db, id).await?))
}

pub async fn get_by_name(State(state): State<AppState>, ApiPath(name): ApiPath<String>) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::get_kindergarten_by_name(&state.db, &name).await?))
}

pub async fn get_by_email(State(state): State<AppState>, ApiPath(email): ApiPath<String>) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::get_kindergarten_by_email(&state.db, &email).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateKindergarten>,
) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::update_kindergarten(&state.db, id, input).await?))
}

pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, ApiError> {
    kindergarten_service::delete_kindergarten(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/v1/kindergarten/{id}/groups", tag = "kindergarten",
    params(("id" = i32, Path,)), request_body = Vec<crate::openapi::IdRefDoc>,
    responses((status = 200, description = "Kindergarten with its groups"), (status = 404, description = "Unknown kindergarten or group")))]
pub async fn add_groups(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(refs): ApiJson<Vec<IdRef>>,
) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::add_groups(&state.db, id, &ids(&refs)).await?))
}

pub async fn remove_groups(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(refs): ApiJson<Vec<IdRef>>,
) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::remove_groups(&state.db, id, &ids(&refs)).await?))
}

pub async fn clear_groups(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::clear_groups(&state.db, id).await?))
}

#[utoipa::path(post, path = "/api/v1/kindergarten/{id}/activities", tag = "kindergarten",
    params(("id" = i32, Path,)), request_body = Vec<crate::openapi::IdRefDoc>,
    responses((status = 200, description = "Kindergarten with its activities"), (status = 404, description = "Unknown kindergarten or activity")))]
pub async fn add_activities(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(refs): ApiJson<Vec<IdRef>>,
) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::add_activities(&state.db, id, &ids(&refs)).await?))
}

pub async fn remove_activities(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(refs): ApiJson<Vec<IdRef>>,
) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::remove_activities(&state.db, id, &ids(&refs)).await?))
}

pub async fn clear_activities(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<KindergartenDetails>, ApiError> {
    Ok(Json(kindergarten_service::clear_activities(&state.db, id).await?))
}
