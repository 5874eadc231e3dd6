use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use models::mail_history;
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use service::mail::{Delivery, OutgoingMail};
use service::mail_history_service::{self, CreateMailHistory};
use service::pagination::Page;
use tracing::info;

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, PageQuery};
use crate::state::AppState;

pub fn history_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id))
        .route("/addresses", get(by_addresses))
        .route("/message", get(by_message))
}

pub fn mail_router() -> Router<AppState> {
    Router::new().route("/payment-slip", post(send_payment_slip))
}

#[derive(Debug, Deserialize)]
pub struct AddressesQuery {
    pub addresses: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub message: String,
}

/// Body of a 202 answer: the mail was accepted but no transport delivered it.
#[derive(Debug, Serialize)]
pub struct NotDelivered {
    pub to: String,
    pub delivered: bool,
    pub message: &'static str,
}

/// Deliver one mail, then record it. Only delivered mail gets a history row.
#[utoipa::path(post, path = "/api/v1/mail/payment-slip", tag = "mail",
    request_body = crate::openapi::OutgoingMailDoc,
    responses(
        (status = 201, description = "Sent and recorded"),
        (status = 202, description = "Accepted, not delivered: SMTP is not configured"),
        (status = 500, description = "Delivery failed")))]
pub async fn send_payment_slip(
    State(state): State<AppState>,
    ApiJson(mail): ApiJson<OutgoingMail>,
) -> Result<Response, ApiError> {
    match state.mailer.send(&mail).await.map_err(ServiceError::from)? {
        Delivery::Sent => {
            let record = mail_history_service::create_mail_history(
                &state.db,
                CreateMailHistory { addresses: mail.to, message: Some(mail.subject) },
            )
            .await?;
            info!(event = "payment_slip_sent", history_id = record.id);
            Ok((StatusCode::CREATED, Json(record)).into_response())
        }
        Delivery::Skipped => {
            let body = NotDelivered { to: mail.to, delivered: false, message: "SMTP is not configured; mail was not sent" };
            Ok((StatusCode::ACCEPTED, Json(body)).into_response())
        }
    }
}

#[utoipa::path(post, path = "/api/v1/mail-history", tag = "mail",
    request_body = crate::openapi::MailHistoryDoc,
    responses((status = 201, description = "Recorded")))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateMailHistory>,
) -> Result<(StatusCode, Json<mail_history::Model>), ApiError> {
    let created = mail_history_service::create_mail_history(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<Page<mail_history::Model>>, ApiError> {
    Ok(Json(mail_history_service::list_mail_history(&state.db, q.into_request()?).await?))
}

pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<mail_history::Model>, ApiError> {
    Ok(Json(mail_history_service::get_mail_history(&state.db, id).await?))
}

pub async fn by_addresses(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<AddressesQuery>,
) -> Result<Json<Vec<mail_history::Model>>, ApiError> {
    Ok(Json(mail_history_service::find_by_addresses(&state.db, &q.addresses).await?))
}

pub async fn by_message(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<MessageQuery>,
) -> Result<Json<Vec<mail_history::Model>>, ApiError> {
    Ok(Json(mail_history_service::find_by_message(&state.db, &q.message).await?))
}
