//! User service for business logic operations.
//!
//! Provides a higher-level API for user operations, encapsulating
//! business rules and coordinating with the repository layer.

use std::fmt::Display;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use jiff::Zoned;
use jiff::civil::Date;
use tracing::{info, warn};

use crate::api::dto::UserInput;
use crate::error::{AppError, AppResult};
use crate::models::{User, columns};
use crate::repositories::UserStore;
use crate::utils::numeric_id::format_id;

/// User service for handling user-related business logic.
///
/// Wraps whichever `UserStore` was selected at startup.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    /// Creates a new UserService with the given store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Registers a user created today (local time zone).
    ///
    /// # Errors
    /// `ValidationErrors` when `nationalId` is missing, `ConstraintViolation`
    /// when it is already registered.
    pub async fn register(&self, input: UserInput) -> AppResult<User> {
        self.register_on(input, Zoned::now().date()).await
    }

    /// Registers a user with an explicit creation date.
    pub async fn register_on(&self, input: UserInput, created_at: Date) -> AppResult<User> {
        let new_user = input.into_new_user(created_at)?;
        let national_id = new_user.national_id;

        match self.store.create(new_user).await {
            Ok(user) => {
                info!(user_id = %format_id(&user.id), national_id, "User registered");
                Ok(user)
            }
            Err(err @ AppError::ConstraintViolation { .. }) => {
                warn!(national_id, error = %err, "User registration rejected");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Gets a user by their ID.
    ///
    /// # Returns
    /// The user if found, or `NotFound` error
    pub async fn get_user(&self, id: &BigDecimal) -> AppResult<User> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(columns::ID, format_id(id)))
    }

    /// Gets a user by national id, or `NotFound`.
    pub async fn get_by_national_id(&self, national_id: i64) -> AppResult<User> {
        self.store
            .find_by_national_id(national_id)
            .await?
            .ok_or_else(|| not_found(columns::NATIONAL_ID, national_id))
    }

    /// Lists users with pagination.
    ///
    /// # Arguments
    /// * `offset` - Number of records to skip
    /// * `limit` - Maximum number of records to return
    ///
    /// # Returns
    /// A tuple of (users, total_count)
    pub async fn list_users_paginated(
        &self,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        self.store.list_paginated(offset, limit).await
    }
}

fn not_found(field: &str, value: impl Display) -> AppError {
    AppError::NotFound {
        entity: columns::TABLE.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstraintKind;
    use crate::repositories::MemoryUserRepository;
    use jiff::civil::date;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryUserRepository::new()))
    }

    #[tokio::test]
    async fn test_register_from_json_payload() {
        let service = service();
        let input: UserInput = serde_json::from_str(r#"{"nationalId":123456789}"#).unwrap();

        let user = service.register_on(input, date(2024, 3, 7)).await.unwrap();

        assert_eq!(user.national_id, 123456789);
        assert!(user.id > BigDecimal::from(0));
        assert_eq!(user.created_at, date(2024, 3, 7));
        assert_eq!(service.get_user(&user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_register_stamps_today() {
        let before = Zoned::now().date();
        let user = service().register(UserInput::new(5)).await.unwrap();
        let after = Zoned::now().date();

        // A registration that straddles midnight may carry either day.
        assert!(before <= user.created_at && user.created_at <= after);
    }

    #[tokio::test]
    async fn test_register_without_national_id_never_reaches_store() {
        let service = service();

        let err = service.register(UserInput::default()).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationErrors { .. }));

        let (_, total) = service.list_users_paginated(0, 10).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_national_id() {
        let service = service();
        service.register(UserInput::new(77)).await.unwrap();

        match service.register(UserInput::new(77)).await.unwrap_err() {
            AppError::ConstraintViolation { kind, field, .. } => {
                assert_eq!(kind, ConstraintKind::Unique);
                assert_eq!(field, "cedula");
            }
            other => panic!("Expected ConstraintViolation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lookups_report_not_found() {
        let service = service();

        match service.get_user(&BigDecimal::from(12)).await.unwrap_err() {
            AppError::NotFound { entity, field, value } => {
                assert_eq!(entity, "user");
                assert_eq!(field, "id");
                assert_eq!(value, "12");
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        assert!(matches!(
            service.get_by_national_id(3).await.unwrap_err(),
            AppError::NotFound { field, .. } if field == "cedula"
        ));
    }

    #[tokio::test]
    async fn test_get_by_national_id() {
        let service = service();
        let created = service.register(UserInput::new(31)).await.unwrap();
        assert_eq!(service.get_by_national_id(31).await.unwrap(), created);
    }
}
