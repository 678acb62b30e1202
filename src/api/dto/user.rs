//! User-related DTOs for API requests and responses.

use bigdecimal::BigDecimal;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, User};

// ============================================================================
// Request DTOs
// ============================================================================

/// User identifier data received at the API boundary.
///
/// `id` only refers to an existing record; registration ignores it because
/// storage assigns ids. `nationalId` is required and also accepted as
/// `cedula`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct UserInput {
    /// Integer of any size
    #[serde(default, with = "crate::utils::numeric_id::option")]
    #[schema(value_type = Option<i128>, example = 1)]
    pub id: Option<BigDecimal>,

    #[serde(rename = "nationalId", alias = "cedula")]
    #[validate(required(message = "must not be empty"))]
    #[schema(required = true, example = 123456789)]
    pub national_id: Option<i64>,
}

impl UserInput {
    pub fn new(national_id: i64) -> Self {
        Self {
            id: None,
            national_id: Some(national_id),
        }
    }

    /// Validates the input and maps it to a record ready for insertion.
    pub fn into_new_user(self, created_at: Date) -> AppResult<NewUser> {
        self.validate().map_err(AppError::json_validation)?;

        let national_id = self
            .national_id
            .ok_or_else(|| AppError::invalid_field("nationalId", "must not be empty"))?;

        Ok(NewUser {
            national_id,
            created_at,
        })
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for a stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(with = "crate::utils::numeric_id")]
    #[schema(value_type = i128, example = 1)]
    pub id: BigDecimal,
    #[schema(example = 123456789)]
    pub national_id: i64,
    /// Creation day, `yyyy-MM-dd`
    #[serde(with = "crate::utils::date_format")]
    #[schema(value_type = String, format = Date, example = "2024-03-07")]
    pub created_at: Date,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            national_id: user.national_id,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use proptest::prelude::*;

    #[test]
    fn test_deserialize_camel_case_and_alias() {
        let input: UserInput = serde_json::from_str(r#"{"nationalId":123456789}"#).unwrap();
        assert_eq!(input, UserInput::new(123456789));

        let input: UserInput = serde_json::from_str(r#"{"id":4,"cedula":55}"#).unwrap();
        assert_eq!(input.id, Some(BigDecimal::from(4)));
        assert_eq!(input.national_id, Some(55));
    }

    #[test]
    fn test_missing_national_id_fails_validation() {
        for body in ["{}", r#"{"id": 3}"#, r#"{"nationalId": null}"#] {
            let input: UserInput = serde_json::from_str(body).unwrap();
            match input.into_new_user(date(2024, 3, 7)).unwrap_err() {
                AppError::ValidationErrors { errors } => {
                    assert_eq!(errors.len(), 1);
                    assert_eq!(errors[0].field, "nationalId");
                    assert_eq!(errors[0].message, "must not be empty");
                }
                other => panic!("Expected ValidationErrors for {body}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_into_new_user_ignores_inbound_id() {
        let input = UserInput {
            id: Some(BigDecimal::from(999)),
            national_id: Some(1),
        };
        let new_user = input.into_new_user(date(2024, 3, 7)).unwrap();
        assert_eq!(
            new_user,
            NewUser {
                national_id: 1,
                created_at: date(2024, 3, 7),
            }
        );
    }

    #[test]
    fn test_response_serializes_created_at_as_day() {
        let response = UserResponse::from(User {
            id: BigDecimal::from(1),
            national_id: 123456789,
            created_at: date(2024, 3, 7),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "nationalId": 123456789,
                "createdAt": "2024-03-07"
            })
        );
    }

    #[test]
    fn test_large_id_with_national_id_validates() {
        let input: UserInput =
            serde_json::from_str(r#"{"id": 99999999999999999999, "nationalId": 123456789}"#)
                .unwrap();
        assert_eq!(
            input.id.as_ref().map(crate::utils::numeric_id::format_id).as_deref(),
            Some("99999999999999999999")
        );
        assert!(input.validate().is_ok());

        let new_user = input.into_new_user(date(2024, 3, 7)).unwrap();
        assert_eq!(new_user.national_id, 123456789);
    }

    #[test]
    fn test_response_keeps_large_id_digits() {
        let response = UserResponse::from(User {
            id: crate::utils::numeric_id::parse_id("123456789012345678901234567890").unwrap(),
            national_id: 1,
            created_at: date(2024, 3, 7),
        });

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.starts_with(r#"{"id":123456789012345678901234567890,"#));
        assert_eq!(serde_json::from_str::<UserResponse>(&json).unwrap(), response);
    }

    proptest! {
        #[test]
        fn prop_any_present_national_id_validates(national_id in any::<i64>()) {
            prop_assert!(UserInput::new(national_id).validate().is_ok());
        }
    }
}
