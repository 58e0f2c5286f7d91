use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use gradebook_core::LoginError;
use serde::Serialize;

use crate::store::StoreError;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const TOO_MANY_ATTEMPTS: &str = "Too many login attempts. Please try again later.";

#[derive(Debug)]
pub enum AppError {
    /// Bad or missing input.
    Validation(String),
    Auth(String),
    RateLimited { retry_after: Duration },
    NotFound(String),
    /// The database refused a command; its message is shown to the caller.
    Rejected(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::RateLimited { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, TOO_MANY_ATTEMPTS.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Rejected(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                // Log the real error server-side, return generic message to client
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            message,
        };

        let mut response = (status, axum::Json(body)).into_response();
        if let AppError::RateLimited { retry_after } = self {
            // Round up, and never advertise an immediate retry alongside a 429.
            let secs = (retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0)).max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::RateLimited { retry_after } => AppError::RateLimited { retry_after },
            LoginError::InvalidUserType(_) => AppError::Validation("Invalid user type".to_string()),
            LoginError::InvalidCredentials => AppError::Auth(INVALID_CREDENTIALS.to_string()),
            LoginError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Rejected(msg) => AppError::Rejected(msg),
            StoreError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
