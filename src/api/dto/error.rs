//! Error response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{ConstraintKind, ValidationFieldError};

/// Standard error response format.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "code": "VALIDATION_ERROR",
    "message": "Validation failed",
    "details": [{"field": "nationalId", "message": "must not be empty"}],
    "request_id": "7f1c3a52-9d7e-4f0b-8a43-2b6e1c9d0f11"
}))]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with code and message.
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    pub fn not_found_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new("NOT_FOUND", &format!("{} not found", entity)).with_details(serde_json::json!({
            "entity": entity,
            "field": field,
            "value": value,
        }))
    }

    /// One entry per rejected field.
    pub fn validation_errors(errors: &[ValidationFieldError]) -> Self {
        Self::new("VALIDATION_ERROR", "Validation failed")
            .with_details(serde_json::to_value(errors).unwrap_or(Value::Null))
    }

    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::validation_errors(&[ValidationFieldError::new(field, reason)])
    }

    pub fn constraint_violation(
        kind: ConstraintKind,
        entity: &str,
        field: &str,
        value: Option<&str>,
    ) -> Self {
        let message = match kind {
            ConstraintKind::Unique => format!("{} with this {} already exists", entity, field),
            ConstraintKind::NotNull => format!("{}.{} must not be empty", entity, field),
        };
        Self::new("CONSTRAINT_VIOLATION", &message).with_details(serde_json::json!({
            "constraint": kind.to_string(),
            "entity": entity,
            "field": field,
            "value": value,
        }))
    }

    /// Adds details to the error response.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Sets the request ID for correlation; `None` leaves it out of the body.
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(ErrorResponse::new("BAD_REQUEST", "nope")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": "BAD_REQUEST", "message": "nope"})
        );
    }

    #[test]
    fn test_validation_errors_details_list_fields() {
        let response = ErrorResponse::validation_error("nationalId", "must not be empty")
            .with_request_id(Some("req-1".to_string()));

        assert_eq!(response.code, "VALIDATION_ERROR");
        assert_eq!(response.request_id.as_deref(), Some("req-1"));
        assert_eq!(
            response.details,
            Some(serde_json::json!([{"field": "nationalId", "message": "must not be empty"}]))
        );
    }

    #[test]
    fn test_unique_violation_message() {
        let response =
            ErrorResponse::constraint_violation(ConstraintKind::Unique, "user", "cedula", Some("42"));
        assert_eq!(response.code, "CONSTRAINT_VIOLATION");
        assert_eq!(response.message, "user with this cedula already exists");
        assert_eq!(response.details.unwrap()["constraint"], "unique");
    }
}
