use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use models::user;
use service::pagination::Page;
use service::user_service::{self, CreateUser, UpdateUser};

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, PageQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
        .route("/username/:username", get(get_by_username))
        .route("/email/:email", get(get_by_email))
}

/// The stored password hash never leaves the server.
#[utoipa::path(post, path = "/api/v1/users", tag = "users",
    request_body = crate::openapi::UserDoc,
    responses((status = 201, description = "User created"), (status = 409, description = "Username or email taken")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateUser>,
) -> Result<(StatusCode, Json<user::Model>), ApiError> {
    let created = user_service::create_user(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> Result<Json<Page<user::Model>>, ApiError> {
    Ok(Json(user_service::list_users(&state.db, q.into_request()?).await?))
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(user_service::get_user(&state.db, id).await?))
}

pub async fn get_by_username(State(state): State<AppState>, ApiPath(username): ApiPath<String>) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(user_service::get_user_by_username(&state.db, &username).await?))
}

pub async fn get_by_email(State(state): State<AppState>, ApiPath(email): ApiPath<String>) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(user_service::get_user_by_email(&state.db, &email).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateUser>,
) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(user_service::update_user(&state.db, id, input).await?))
}

pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, ApiError> {
    user_service::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
