//! Calendar date codec.
//!
//! Dates cross every boundary of the system (storage, HTTP, CLI) in the
//! compact `YYYYMMDD` form. Search input additionally accepts `DD.MM.YYYY`.

use chrono::NaiveDate;

use crate::error::CoreError;

pub const DATE_FORMAT: &str = "%Y%m%d";
const SEARCH_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parses a `YYYYMMDD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, CoreError> {
    // chrono accepts shorter numeric fields, the wire format does not.
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| CoreError::InvalidDate(text.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Recognises the `DD.MM.YYYY` form used when searching tasks by date.
pub fn parse_search_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, SEARCH_DATE_FORMAT).ok()
}

/// `#[serde(with = "crate::dates::serde_compact")]` for `NaiveDate` fields.
pub mod serde_compact {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_date(&text).map_err(serde::de::Error::custom)
    }
}
