use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use critica_core::{
    CatalogError,
    api_types::ErrorEnvelope,
    messages::{ErrorCode, FieldViolation},
};
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

/// Error returned by handlers and extractors.
///
/// The rendered body is completed with the request path and method by
/// [`crate::infra::middleware::error_envelope`], which finds the error in the
/// response extensions.
#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Vec<FieldViolation>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, message)
    }

    /// 400 carrying every violated field constraint.
    pub fn validation(errors: Vec<FieldViolation>) -> Self {
        let details = errors
            .iter()
            .map(|violation| violation.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let message = if details.is_empty() {
            ErrorCode::ValidationFailed.render(&[])
        } else {
            format!("{}: {details}", ErrorCode::ValidationFailed.render(&[]))
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
            errors,
        }
    }

    pub fn malformed_body(detail: impl fmt::Display) -> Self {
        Self::bad_request(ErrorCode::MalformedBody.render(&[("detail", &detail)]))
    }

    /// Generic 500; the cause is logged by the caller, never sent.
    pub fn unexpected() -> Self {
        Self::internal(ErrorCode::Unexpected.render(&[]))
    }

    pub fn envelope(&self, method: &str, path: &str) -> ErrorEnvelope {
        ErrorEnvelope {
            message: self.message.clone(),
            path: path.to_string(),
            status: self.status.as_u16(),
            method: method.to_string(),
            timestamp: Utc::now(),
            errors: self.errors.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(self.envelope("", ""));
        let mut response = (self.status, body).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => Self::not_found(err.to_string()),
            CatalogError::AlreadyExists { .. }
            | CatalogError::AlreadyLiked { .. }
            | CatalogError::AlreadyReviewed { .. } => Self::bad_request(err.to_string()),
            CatalogError::Invalid(violations) => Self::validation(violations),
            CatalogError::Storage(detail) => {
                tracing::error!(error = %detail, "storage operation failed");
                Self::unexpected()
            }
        }
    }
}

impl From<Vec<FieldViolation>> for AppError {
    fn from(errors: Vec<FieldViolation>) -> Self {
        Self::validation(errors)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = ?err, "request failed");
        Self::unexpected()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = ?err, "database operation failed");
        Self::unexpected()
    }
}
