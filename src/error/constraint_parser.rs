use std::sync::OnceLock;

use regex::Regex;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Patterns are compiled once and cached.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    relation_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // "Key (field)=(value)" in the DETAIL line
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key/value pattern"),
            column_name: Regex::new(r#"column "([^"]+)""#).expect("valid column pattern"),
            // "relation" for not-null messages, "table" for foreign keys
            relation_name: Regex::new(r#"(?:relation|table) "([^"]+)""#)
                .expect("valid relation pattern"),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique constraint violation into `(entity, field, value)`.
    ///
    /// PostgreSQL puts `Key (field)=(value)` in the DETAIL field of the
    /// error, not in the primary message, so `details` is searched first.
    /// The constraint name (e.g. `user_cedula_key`) names the entity and field.
    ///
    /// # Examples
    /// ```
    /// use biblioteca::error::ConstraintParser;
    ///
    /// let message = "duplicate key value violates unique constraint \"user_cedula_key\"";
    /// let details = Some("Key (cedula)=(123456789) already exists.");
    /// let result = ConstraintParser::parse_unique_violation(message, details, Some("user_cedula_key"));
    /// assert_eq!(result, Some(("user".to_string(), "cedula".to_string(), "123456789".to_string())));
    /// ```
    pub fn parse_unique_violation(
        message: &str,
        details: Option<&str>,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = details
            .and_then(Self::extract_key_value_from_message)
            .or_else(|| Self::extract_key_value_from_message(message));

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity = Self::extract_relation_from_message(message)
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a not-null constraint violation into `(entity, field)`.
    ///
    /// # Examples
    /// ```
    /// use biblioteca::error::ConstraintParser;
    ///
    /// let message = "null value in column \"cedula\" of relation \"user\" violates not-null constraint";
    /// let result = ConstraintParser::parse_not_null_violation(message, None);
    /// assert_eq!(result, Some(("user".to_string(), "cedula".to_string())));
    /// ```
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity = Self::extract_relation_from_message(message)
            .or_else(|| {
                constraint_name.and_then(|c| Self::parse_constraint_name(c).map(|(e, _)| e))
            })
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits a constraint name following PostgreSQL's default naming
    /// (`{table}_{column}_{suffix}`) into `(table, column)`.
    ///
    /// Multi-word columns keep their underscores: `user_national_id_key`
    /// yields `("user", "national_id")`.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let (rest, _suffix) = constraint_name.rsplit_once('_')?;
        let (entity, field) = rest.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_relation_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .relation_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts `(field, value)` from a `Key (field)=(value)` detail.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns().key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }
}
