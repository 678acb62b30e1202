//! Integer ids of any size.
//!
//! Ids are `BigDecimal` values with no fractional part, so they are not
//! bounded by a machine integer. On the JSON wire they are plain numbers,
//! kept digit for digit.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

/// Parses an integer id such as `"42"` or `"99999999999999999999"`.
///
/// Notations that denote an integer (`"1e3"`, `"7.0"`) are accepted; the
/// result always has scale 0.
pub fn parse_id(text: &str) -> Result<BigDecimal, String> {
    let value = BigDecimal::from_str(text).map_err(|_| format!("'{}' is not a number", text))?;
    let integral = value.with_scale(0);
    if integral != value {
        return Err(format!("'{}' is not an integer", text));
    }
    Ok(integral)
}

/// Renders an id as plain decimal digits, without exponent or fraction.
pub fn format_id(id: &BigDecimal) -> String {
    let (digits, _) = id.with_scale(0).into_bigint_and_exponent();
    digits.to_string()
}

pub fn serialize<S>(id: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Number::from_str(&format_id(id))
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    parse_id(&number.to_string()).map_err(D::Error::custom)
}

/// Same as the parent module for optional ids; pair with `#[serde(default)]`.
pub mod option {
    use bigdecimal::BigDecimal;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Number;

    use super::parse_id;

    pub fn serialize<S>(id: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => super::serialize(id, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Number>::deserialize(deserializer)?
            .map(|number| parse_id(&number.to_string()))
            .transpose()
            .map_err(D::Error::custom)
    }
}
