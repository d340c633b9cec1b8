//! Recurrence rule grammar.
//!
//! A rule is stored and exchanged as a compact string:
//!
//! | text          | meaning                                             |
//! |---------------|-----------------------------------------------------|
//! | `""`          | no recurrence, the task is one-shot                 |
//! | `d 7`         | every 7 days (1..=400)                              |
//! | `y`           | every year                                          |
//! | `w 1,3,5`     | on Monday, Wednesday and Friday (1 = Monday)        |
//! | `m -1`        | on the last day of every month (-2 = second-to-last)|
//! | `m 10 1,12`   | on the 10th of January and December                 |
//!
//! Parsing is pure syntax and range validation; it never looks at dates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

pub const MAX_DAILY_INTERVAL: u32 = 400;

/// A parsed recurrence rule.
///
/// Sets are ordered so two rules compare equal when they describe the same
/// schedule, and so `Display` always renders the same canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecurrenceRule {
    #[default]
    None,
    Daily {
        interval: u32,
    },
    Yearly,
    Weekly {
        /// 1 = Monday .. 7 = Sunday, never empty
        weekdays: BTreeSet<u8>,
    },
    Monthly {
        /// 1..=31, or -1 / -2 for the last / second-to-last day, never empty
        days: BTreeSet<i8>,
        /// 1..=12; empty means every month
        months: BTreeSet<u8>,
    },
}

fn is_valid_weekday(day: u8) -> bool {
    (1..=7).contains(&day)
}

fn is_valid_month_day(day: i8) -> bool {
    day == -1 || day == -2 || (1..=31).contains(&day)
}

fn is_valid_month(month: u8) -> bool {
    (1..=12).contains(&month)
}

impl RecurrenceRule {
    pub fn daily(interval: u32) -> Result<Self, ParseError> {
        if interval > MAX_DAILY_INTERVAL {
            return Err(ParseError::IntervalTooLarge(i64::from(interval)));
        }
        if interval == 0 {
            return Err(ParseError::InvalidArgument(interval.to_string()));
        }
        Ok(RecurrenceRule::Daily { interval })
    }

    pub fn weekly(weekdays: impl IntoIterator<Item = u8>) -> Result<Self, ParseError> {
        let weekdays: BTreeSet<u8> = weekdays.into_iter().collect();
        if weekdays.is_empty() {
            return Err(ParseError::InvalidWeekday(String::new()));
        }
        if let Some(bad) = weekdays.iter().find(|d| !is_valid_weekday(**d)) {
            return Err(ParseError::InvalidWeekday(bad.to_string()));
        }
        Ok(RecurrenceRule::Weekly { weekdays })
    }

    pub fn monthly(
        days: impl IntoIterator<Item = i8>,
        months: impl IntoIterator<Item = u8>,
    ) -> Result<Self, ParseError> {
        let days: BTreeSet<i8> = days.into_iter().collect();
        let months: BTreeSet<u8> = months.into_iter().collect();
        if days.is_empty() {
            return Err(ParseError::InvalidMonthDay(String::new()));
        }
        if let Some(bad) = days.iter().find(|d| !is_valid_month_day(**d)) {
            return Err(ParseError::InvalidMonthDay(bad.to_string()));
        }
        if let Some(bad) = months.iter().find(|m| !is_valid_month(**m)) {
            return Err(ParseError::InvalidMonth(bad.to_string()));
        }
        Ok(RecurrenceRule::Monthly { days, months })
    }

    /// Parses the compact rule text. The empty string is `RecurrenceRule::None`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        if text.is_empty() {
            return Ok(RecurrenceRule::None);
        }

        let trimmed = text.trim();
        if !trimmed.chars().any(|c| c.is_ascii_alphanumeric() || c == ' ') {
            return Err(ParseError::MalformedRule(text.to_string()));
        }

        let mut tokens = trimmed.split(' ');
        let kind = tokens.next().unwrap_or_default();
        let primary = tokens.next().filter(|t| !t.is_empty());
        let optional = tokens.next().filter(|t| !t.is_empty());

        match kind {
            "d" => parse_interval(primary.unwrap_or_default()),
            "y" => Ok(RecurrenceRule::Yearly),
            "w" => {
                let weekdays = parse_list(
                    primary.unwrap_or_default(),
                    is_valid_weekday,
                    ParseError::InvalidWeekday,
                )?;
                Ok(RecurrenceRule::Weekly { weekdays })
            }
            "m" => {
                let days = parse_list(
                    primary.unwrap_or_default(),
                    is_valid_month_day,
                    ParseError::InvalidMonthDay,
                )?;
                let months = match optional {
                    Some(arg) => parse_list(arg, is_valid_month, ParseError::InvalidMonth)?,
                    None => BTreeSet::new(),
                };
                Ok(RecurrenceRule::Monthly { days, months })
            }
            other => Err(ParseError::UnknownRuleKind(other.to_string())),
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, RecurrenceRule::None)
    }
}

fn parse_interval(arg: &str) -> Result<RecurrenceRule, ParseError> {
    let interval: i64 = match arg.parse() {
        Ok(interval) => interval,
        // Too many digits for i64 is still just a number that is too large.
        Err(_) if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) => {
            return Err(ParseError::IntervalTooLarge(i64::MAX));
        }
        Err(_) => return Err(ParseError::InvalidArgument(arg.to_string())),
    };
    if interval > i64::from(MAX_DAILY_INTERVAL) {
        return Err(ParseError::IntervalTooLarge(interval));
    }
    if interval < 1 {
        return Err(ParseError::InvalidArgument(arg.to_string()));
    }
    // bounded by the checks above
    Ok(RecurrenceRule::Daily {
        interval: interval as u32,
    })
}

/// Parses a comma-separated list, reporting the first offending item.
/// An empty argument yields a single empty item and is therefore rejected.
fn parse_list<T>(
    arg: &str,
    valid: impl Fn(T) -> bool,
    error: fn(String) -> ParseError,
) -> Result<BTreeSet<T>, ParseError>
where
    T: FromStr + Ord + Copy,
{
    arg.split(',')
        .map(|item| {
            item.parse::<T>()
                .ok()
                .filter(|value| valid(*value))
                .ok_or_else(|| error(item.to_string()))
        })
        .collect()
}

fn join<T: fmt::Display>(values: &BTreeSet<T>) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::None => Ok(()),
            RecurrenceRule::Daily { interval } => write!(f, "d {}", interval),
            RecurrenceRule::Yearly => write!(f, "y"),
            RecurrenceRule::Weekly { weekdays } => write!(f, "w {}", join(weekdays)),
            RecurrenceRule::Monthly { days, months } => {
                write!(f, "m {}", join(days))?;
                if !months.is_empty() {
                    write!(f, " {}", join(months))?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecurrenceRule::parse(s)
    }
}

impl TryFrom<String> for RecurrenceRule {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RecurrenceRule::parse(&value)
    }
}

impl From<RecurrenceRule> for String {
    fn from(rule: RecurrenceRule) -> Self {
        rule.to_string()
    }
}
