use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use models::bill;
use service::bill_service::{self, CreateBill, UpdateBill};
use service::pagination::Page;

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, PageQuery};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
}

#[utoipa::path(post, path = "/api/v1/bill", tag = "bill",
    request_body = crate::openapi::BillDoc,
    responses((status = 201, description = "Bill created"), (status = 404, description = "Child or kindergarten missing")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateBill>,
) -> Result<(StatusCode, Json<bill::Model>), ApiError> {
    let created = bill_service::create_bill(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(State(state): State<AppState>, ApiQuery(q): ApiQuery<PageQuery>) -> Result<Json<Page<bill::Model>>, ApiError> {
    Ok(Json(bill_service::list_bills(&state.db, q.into_request()?).await?))
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<bill::Model>, ApiError> {
    Ok(Json(bill_service::get_bill(&state.db, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<UpdateBill>,
) -> Result<Json<bill::Model>, ApiError> {
    Ok(Json(bill_service::update_bill(&state.db, id, input).await?))
}

pub async fn remove(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<StatusCode, ApiError> {
    bill_service::delete_bill(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
