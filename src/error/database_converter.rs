use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintKind, ConstraintParser};

/// Utility for converting database errors to structured AppError variants.
///
/// Uniqueness and not-null violations become `AppError::ConstraintViolation`
/// with entity and field recovered from the PostgreSQL message.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let details = info.details();
        let constraint_name = info.constraint_name();

        let parsed = match kind {
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_unique_violation(message, details, constraint_name).map(
                    |(entity, field, value)| AppError::ConstraintViolation {
                        kind: ConstraintKind::Unique,
                        entity: entity_or_table(entity, info.table_name()),
                        field,
                        value: Some(value),
                    },
                )
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(message, constraint_name).map(
                    |(entity, field)| AppError::ConstraintViolation {
                        kind: ConstraintKind::NotNull,
                        entity: entity_or_table(entity, info.table_name()),
                        field,
                        value: None,
                    },
                )
            }
            _ => None,
        };

        parsed.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("Database error: {}", message)),
        })
    }
}

/// The parser's generic "resource" entity gives way to the table name
/// PostgreSQL reports alongside the error.
fn entity_or_table(entity: String, table_name: Option<&str>) -> String {
    match table_name {
        Some(table) if entity == "resource" => table.to_string(),
        _ => entity,
    }
}
