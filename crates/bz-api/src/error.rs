//! Structured error responses: `{"error": {"kind": ..., "message": ...}}`.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use bz_core::error::AppError;
use serde::Serialize;

/// HTTP face of `AppError`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    kind: &'a str,
    message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::ValidationError(_) | AppError::EmptyContent => StatusCode::BAD_REQUEST,
            AppError::NotFound(..) | AppError::RecipientNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Concurrency(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match &self.0 {
            // Infrastructure details stay in the log.
            AppError::Configuration(_) | AppError::Internal(_) => {
                log::error!("request failed: {}", self.0);
                "internal service error".to_string()
            }
            AppError::Concurrency(_) => "the server is busy, please retry".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: ErrorDetail {
                kind: self.0.kind(),
                message,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn internal_details_are_hidden() {
        let response = ApiError(AppError::Internal("disk /dev/sda1 on fire".into())).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["kind"], "internal");
        assert!(!json["error"]["message"].as_str().unwrap().contains("sda1"));
    }

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError(AppError::EmptyContent).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError(AppError::RecipientNotFound(uuid::Uuid::nil())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(AppError::Concurrency("busy".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
