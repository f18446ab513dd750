use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use service::errors::ServiceError;
use tracing::error;

/// JSON error body: `{timestamp, status, error, message, path}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
    pub path: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message, path: None }
    }

    /// Attach the request path the error answers.
    pub fn at(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Resource not found", Some(e.to_string())),
            ServiceError::Database(_) => Self::new(StatusCode::BAD_REQUEST, "Database exception", Some(e.to_string())),
            ServiceError::BadRequest(_) => Self::new(StatusCode::BAD_REQUEST, "Bad request", Some(e.to_string())),
            ServiceError::Validation(_) | ServiceError::Model(_) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation exception", Some(e.to_string()))
            }
            ServiceError::Db(_) => {
                error!(err = %e, "catalog backend failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", Some(e.to_string()))
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "status": self.status.as_u16(),
            "error": self.error,
            "message": self.message,
            "path": self.path,
        });
        (self.status, Json(body)).into_response()
    }
}
