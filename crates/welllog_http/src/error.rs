//! HTTP error payloads and mapping from core errors.
//!
//! Keep the core free of transport concerns by translating [`RepoError`] and
//! [`DbError`] into Actix responses here.

use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use welllog_core::db::DbError;
use welllog_core::{RepoError, ValidationError};

/// Field key used for failures that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Stable machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    NotFound,
    InternalError,
}

/// Standard error envelope returned by HTTP handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Internal failure; the detail is logged and redacted from the response.
    pub fn internal(detail: impl Display) -> Self {
        error!("event=request_failed module=http status=error error={detail}");
        Self::new(ErrorCode::InternalError, "Internal server error")
    }

    /// Attaches a field-level message.
    pub fn with_field_error(mut self, field: &str, message: impl Into<String>) -> Self {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        let message = value.to_string();
        ApiError::invalid_request(message.clone())
            .with_field_error(value.field().unwrap_or(NON_FIELD_ERRORS), message)
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => err.into(),
            RepoError::WellNotFound(_) | RepoError::LayerNotFound(_) => {
                ApiError::not_found(value.to_string())
            }
            other => ApiError::internal(other),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        ApiError::internal(value)
    }
}

impl From<BlockingError> for ApiError {
    fn from(value: BlockingError) -> Self {
        ApiError::internal(value)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::{ApiError, ErrorCode, NON_FIELD_ERRORS};
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use uuid::Uuid;
    use welllog_core::{Depth, RepoError, ValidationError};

    #[test]
    fn validation_errors_carry_field_messages() {
        let err = ApiError::from(RepoError::Validation(ValidationError::EndNotAfterStart {
            start_depth: Depth::from_whole_meters(2),
            end_depth: Depth::from_whole_meters(1),
        }));

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.fields()["end_depth"],
            vec!["end depth must exceed start depth".to_string()]
        );
    }

    #[test]
    fn overlap_is_reported_as_non_field_error() {
        let err = ApiError::from(ValidationError::Overlap {
            conflicting_layer: Uuid::nil(),
        });
        assert_eq!(
            err.fields()[NON_FIELD_ERRORS],
            vec!["layers must not overlap".to_string()]
        );
    }

    #[test]
    fn not_found_and_internal_errors_map_to_status_codes() {
        let missing = ApiError::from(RepoError::LayerNotFound(Uuid::nil()));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let internal = ApiError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message(), "Internal server error");
        assert!(internal.fields().is_empty());
    }
}
