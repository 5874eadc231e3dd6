use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use serde_json::{Map, Value};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// HTTP error: a status plus one `key: detail` pair, where the key is the
/// offending field name or `"message"`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub key: String,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, key: "message".into(), detail: detail.into() }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    fn field(field: &str, detail: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, key: field.to_string(), detail: detail.into() }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::bad_request(msg),
            ServiceError::Model(ModelError::Field { field, message }) => ApiError::field(field, message),
            ServiceError::Model(ModelError::Validation(msg)) => ApiError::bad_request(msg),
            ServiceError::NotFound(msg) => ApiError::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, msg),
            ServiceError::Db(msg) => {
                error!(error = %msg, "store failure");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
            ServiceError::Mail(e) => {
                error!(error = %e, "mail delivery failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Mail error: {}", e))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        ApiError::bad_request(r.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        ApiError::bad_request(format!("Invalid parameter type: {}", r.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        ApiError::bad_request(format!("Invalid parameter type: {}", r.body_text()))
    }
}

/// Error body carried in response extensions until [`attach_path`] adds the
/// request path and renders it.
#[derive(Clone, Debug)]
pub struct ErrorBody(pub Map<String, Value>);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert(self.key, Value::String(self.detail));
        let mut res = (self.status, Json(Value::Object(body.clone()))).into_response();
        res.extensions_mut().insert(ErrorBody(body));
        res
    }
}

/// Middleware: every error produced by a handler or extractor gets the
/// request path in its body.
pub async fn attach_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let res = next.run(req).await;
    match res.extensions().get::<ErrorBody>().cloned() {
        Some(ErrorBody(mut body)) => {
            body.insert("path".into(), Value::String(path));
            (res.status(), Json(Value::Object(body))).into_response()
        }
        None => res,
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("mail setup failed: {0}")]
    Mail(#[from] service::mail::MailError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_keep_their_key() {
        let e: ApiError = ServiceError::Model(ModelError::field("name", "Name can not be empty or null")).into();
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.key, "name");
    }

    #[test]
    fn status_per_kind() {
        let cases = [
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Db("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[tokio::test]
    async fn middleware_adds_request_path() -> anyhow::Result<()> {
        use axum::{body::Body, middleware, routing::get, Router};
        use tower::ServiceExt;

        async fn missing() -> Result<(), ApiError> {
            Err(ServiceError::not_found("Activity", 7).into())
        }
        let app = Router::new().route("/api/v1/activities/7", get(missing)).layer(middleware::from_fn(attach_path));
        let res = app.oneshot(axum::http::Request::get("/api/v1/activities/7").body(Body::empty())?).await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["message"], "Activity with id 7 not found");
        assert_eq!(body["path"], "/api/v1/activities/7");
        Ok(())
    }
}
