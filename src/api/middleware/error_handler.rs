//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` implements `IntoResponse` so handlers can return it directly.
//! `global_error_handler` then normalizes every error response, including
//! ones axum produces itself (unknown route, wrong method), into the
//! `ErrorResponse` shape and stamps the request ID onto it.

use axum::{
    Json,
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::api::dto::ErrorResponse;
use crate::api::middleware::RequestId;
use crate::error::{AppError, ConstraintKind};

/// Error bodies larger than this are passed through untouched.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// Status code mapping:
    /// - NotFound → 404
    /// - ValidationErrors, Validation, BadRequest → 400
    /// - ConstraintViolation → 409 for unique, 400 for not-null
    /// - Database, Configuration, Internal → 500
    /// - ConnectionPool → 503
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        (status, Json(error_to_body(&self))).into_response()
    }
}

fn error_to_body(error: &AppError) -> ErrorResponse {
    match error {
        AppError::NotFound {
            entity,
            field,
            value,
        } => ErrorResponse::not_found_error(entity, field, value),
        AppError::ValidationErrors { errors } => ErrorResponse::validation_errors(errors),
        AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
        AppError::ConstraintViolation {
            kind,
            entity,
            field,
            value,
        } => ErrorResponse::constraint_violation(*kind, entity, field, value.as_deref()),
        AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
        AppError::Database { operation, .. } => ErrorResponse::new(
            "DATABASE_ERROR",
            &format!("Database operation failed: {}", operation),
        ),
        AppError::Configuration { key, .. } => {
            ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key))
        }
        AppError::ConnectionPool { .. } => {
            ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
        }
        AppError::Internal { .. } => {
            ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
        }
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::ConstraintViolation {
            kind: ConstraintKind::Unique,
            ..
        } => StatusCode::CONFLICT,
        AppError::ConstraintViolation {
            kind: ConstraintKind::NotNull,
            ..
        } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::ValidationErrors { .. } | AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn default_code_and_message(status: StatusCode) -> (&'static str, &'static str) {
    match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => (
            "METHOD_NOT_ALLOWED",
            "HTTP method not allowed for this endpoint",
        ),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::SERVICE_UNAVAILABLE => {
            ("SERVICE_UNAVAILABLE", "Service temporarily unavailable")
        }
        s if s.is_server_error() => ("INTERNAL_SERVER_ERROR", "An internal server error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    }
}

/// Global error handling middleware.
///
/// Rewrites non-JSON error responses into `ErrorResponse`, keeping a
/// plain-text client error message when one was given, and adds
/// `request_id` to every JSON error body that lacks it.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    let (parts, body) = response.into_parts();
    let Ok(bytes) = to_bytes(body, MAX_ERROR_BODY_BYTES).await else {
        let (code, message) = default_code_and_message(status);
        let error_response = ErrorResponse::new(code, message).with_request_id(request_id);
        return (status, Json(error_response)).into_response();
    };

    if is_json {
        let Some(request_id) = request_id else {
            return Response::from_parts(parts, Body::from(bytes));
        };
        return match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(mut object)) => {
                object
                    .entry("request_id")
                    .or_insert_with(|| Value::String(request_id));
                (status, Json(Value::Object(object))).into_response()
            }
            _ => Response::from_parts(parts, Body::from(bytes)),
        };
    }

    let (code, default_message) = default_code_and_message(status);
    let original = String::from_utf8_lossy(&bytes).trim().to_string();
    // Server error text can leak internals
    let message = if original.is_empty() || status.is_server_error() {
        default_message.to_string()
    } else {
        original
    };

    let error_response = ErrorResponse::new(code, &message).with_request_id(request_id);
    (status, Json(error_response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http, middleware, routing::get};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            error_to_status_code(&AppError::duplicate("user", "cedula", 1)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_to_status_code(&AppError::ConstraintViolation {
                kind: ConstraintKind::NotNull,
                entity: "user".to_string(),
                field: "cedula".to_string(),
                value: None,
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_to_status_code(&AppError::invalid_field("nationalId", "must not be empty")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_to_status_code(&AppError::ConnectionPool {
                source: anyhow::anyhow!("timed out"),
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            error_to_code(&AppError::duplicate("user", "cedula", 1)),
            "CONSTRAINT_VIOLATION"
        );
        assert_eq!(
            error_to_code(&AppError::invalid_field("nationalId", "must not be empty")),
            "VALIDATION_ERROR"
        );
    }

    #[tokio::test]
    async fn test_internal_error_is_sanitized() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("password=hunter2"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let response = AppError::invalid_field("nationalId", "must not be empty").into_response();
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["message"], "must not be empty");
    }

    fn router() -> Router {
        Router::new()
            .route(
                "/plain",
                get(|| async { (StatusCode::BAD_REQUEST, "missing thing") }),
            )
            .route(
                "/app",
                get(|| async { AppError::invalid_field("x", "bad") }),
            )
            .layer(middleware::from_fn(global_error_handler))
    }

    #[tokio::test]
    async fn test_plain_text_error_is_wrapped() {
        let response = router()
            .oneshot(http::Request::get("/plain").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "missing thing");
    }

    #[tokio::test]
    async fn test_unknown_route_is_wrapped() {
        let response = router()
            .oneshot(http::Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_request_id_is_added_to_json_errors() {
        let mut request = http::Request::get("/app").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(RequestId("req-42".to_string()));

        let response = router().oneshot(request).await.unwrap();

        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["request_id"], "req-42");
    }

    #[tokio::test]
    async fn test_wrapped_plain_text_error_carries_request_id() {
        let mut request = http::Request::get("/plain").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(RequestId("req-7".to_string()));

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "missing thing");
        assert_eq!(body["request_id"], "req-7");
    }
}
