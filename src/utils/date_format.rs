//! Day-precision date formatting used on the wire.
//!
//! Dates are rendered as `yyyy-MM-dd`. The module doubles as a serde
//! `with` adapter:
//!
//! ```
//! use jiff::civil::Date;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Row {
//!     #[serde(with = "biblioteca::utils::date_format")]
//!     day: Date,
//! }
//!
//! let row = Row { day: jiff::civil::date(2024, 3, 7) };
//! assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"day":"2024-03-07"}"#);
//! ```

use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: Date) -> String {
    date.strftime(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str) -> Result<Date, jiff::Error> {
    Date::strptime(DATE_FORMAT, value)
}

pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_date(*date))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_date(&value).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use proptest::prelude::*;
    use serde::Serialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        day: Date,
    }

    #[test]
    fn test_format_pads_month_and_day() {
        assert_eq!(format_date(date(2024, 3, 7)), "2024-03-07");
        assert_eq!(format_date(date(1999, 12, 31)), "1999-12-31");
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        assert!(parse_date("2024-03-07").is_ok());
        assert!(parse_date("07/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_serde_adapter() {
        let json = serde_json::to_string(&Wrapper {
            day: date(2024, 3, 7),
        })
        .unwrap();
        assert_eq!(json, r#"{"day":"2024-03-07"}"#);

        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.day, date(2024, 3, 7));

        assert!(serde_json::from_str::<Wrapper>(r#"{"day":"not a date"}"#).is_err());
    }

    proptest! {
        #[test]
        fn prop_formatted_dates_are_ten_chars_and_parse_back(
            year in 1000i16..=9999,
            month in 1i8..=12,
            day in 1i8..=28,
        ) {
            let d = date(year, month, day);
            let text = format_date(d);
            prop_assert_eq!(text.len(), 10);
            prop_assert_eq!(parse_date(&text).unwrap(), d);
        }
    }
}
