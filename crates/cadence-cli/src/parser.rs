use anyhow::{anyhow, Result};
use cadence_core::dates;
use chrono::{Local, NaiveDate};
use chrono_english::{parse_date_string, Dialect};

/// Parses a date given on the command line.
///
/// Accepts the storage format `YYYYMMDD` as well as natural language such as
/// `tomorrow` or `next friday`, resolved against the local clock.
pub fn parse_due_date(date_str: &str) -> Result<NaiveDate> {
    let trimmed = date_str.trim();
    if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(dates::parse_date(trimmed)?);
    }

    parse_date_string(trimmed, Local::now(), Dialect::Uk)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))
}

/// Resolves an optional CLI date into the `YYYYMMDD` text the core expects.
pub fn due_date_text(date_str: Option<&str>) -> Result<Option<String>> {
    date_str
        .map(|d| parse_due_date(d).map(dates::format_date))
        .transpose()
}
