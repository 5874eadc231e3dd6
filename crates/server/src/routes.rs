pub mod accounts;
pub mod activities;
pub mod bills;
pub mod children;
pub mod groups;
pub mod kindergartens;
pub mod mail;
pub mod parents;
pub mod users;

use axum::{middleware, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::attach_path;
use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: every resource under `/api/v1`, plus
/// health and the OpenAPI document.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .nest("/activities", activities::router())
        .nest("/groups", groups::router())
        .nest("/parent", parents::router())
        .nest("/users", users::router())
        .nest("/kindergarten", kindergartens::router())
        .nest("/kindergarten-account", accounts::router())
        .nest("/child", children::router())
        .nest("/bill", bills::router())
        .nest("/mail-history", mail::history_router())
        .nest("/mail", mail::mail_router());

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(middleware::from_fn(attach_path))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and transport failures
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
