use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::db::models::DecodeError;
use crate::db::repository::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Record store did not answer within {0:?}")]
    StoreTimeout(Duration),

    #[error("Record store query failed: {0}")]
    Store(String),

    #[error("Malformed product record: {0}")]
    Decoding(#[from] DecodeError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(e) => AppError::StoreUnavailable(e.to_string()),
            StoreError::Query(e) => AppError::Store(e.to_string()),
        }
    }
}

impl AppError {
    fn detail(&self) -> String {
        match self {
            AppError::InvalidArgument(m) | AppError::NotFound(m) => m.clone(),
            AppError::StoreUnavailable(_) => "Record store unavailable".to_string(),
            AppError::StoreTimeout(_) => "Record store timed out".to_string(),
            AppError::Store(_) => "Record store query failed".to_string(),
            AppError::Decoding(_) => "Stored product data is malformed".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::StoreTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Store(_) | AppError::Decoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(application_error = %self, "Responding with error");
        } else {
            tracing::warn!(application_error = %self, "Rejecting request");
        }
        HttpResponse::build(status).json(json!({ "detail": self.detail() }))
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_per_kind() {
        assert_eq!(
            AppError::InvalidArgument("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound("none".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::StoreUnavailable("pool".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::StoreTimeout(Duration::from_secs(1)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::Decoding(DecodeError::MissingField("label")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_internals() {
        let err = AppError::Store("relation \"product_records\" does not exist".into());
        assert_eq!(err.detail(), "Record store query failed");
    }
}
