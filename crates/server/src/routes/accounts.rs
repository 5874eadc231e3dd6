use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use service::account_service::{self, AccountView, CreateAccount, UpdateAccount};
use service::pagination::Page;

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, PageQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
        .route("/account/:account_number", get(get_by_number))
        .route("/identification/:identification_number", get(get_by_identification))
}

#[utoipa::path(post, path = "/api/v1/kindergarten-account", tag = "kindergarten-account",
    request_body = crate::openapi::AccountDoc,
    responses((status = 201, description = "Account created"), (status = 400, description = "PIB must have exactly 9 digits")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateAccount>,
) -> Result<(StatusCode, Json<AccountView>), ApiError> {
    let created = account_service::create_account(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> Result<Json<Page<AccountView>>, ApiError> {
    Ok(Json(account_service::list_accounts(&state.db, q.into_request()?).await?))
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<AccountView>, ApiError> {
    Ok(Json(account_service::get_account(&state.db, id).await?))
}

pub async fn get_by_number(State(state): State<AppState>, ApiPath(number): ApiPath<String>) -> Result<Json<AccountView>, ApiError> {
    Ok(Json(account_service::get_account_by_number(&state.db, &number).await?))
}

pub async fn get_by_identification(State(state): State<AppState>, ApiPath(ident): ApiPath<String>) -> Result<Json<AccountView>, ApiError> {
    Ok(Json(account_service::get_account_by_identification(&state.db, &ident).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateAccount>,
) -> Result<Json<AccountView>, ApiError> {
    Ok(Json(account_service::update_account(&state.db, id, input).await?))
}

pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, ApiError> {
    account_service::delete_account(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
