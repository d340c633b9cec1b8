use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeSet;

use crate::dates;
use crate::error::{EvalError, NextDateError};
use crate::rule::RecurrenceRule;

/// How far ahead, in months, a monthly rule is searched before giving up.
pub const MONTHLY_SEARCH_HORIZON_MONTHS: u32 = 24;

/// Computes the next occurrence of `rule` for a task anchored at `anchor`,
/// measured against the reference date `now`.
///
/// # Behavior
/// - `d 1`: an overdue anchor catches up to `now`; otherwise the day after the anchor.
/// - `d N`: a future anchor moves one step; otherwise the first `anchor + k*N` after `now`.
/// - `y`: a future anchor moves one year; otherwise whole years until after `now`.
///   Feb 29 rolls over to Mar 1 in common years.
/// - `w ...`: the first listed weekday strictly after the later of `anchor` and `now`.
/// - `m ...`: the earliest listed day strictly after the later of `anchor` and `now`,
///   searched for at most [`MONTHLY_SEARCH_HORIZON_MONTHS`] months.
///
/// Pure: the same arguments always produce the same result.
pub fn next_occurrence(
    anchor: NaiveDate,
    now: NaiveDate,
    rule: &RecurrenceRule,
) -> Result<NaiveDate, EvalError> {
    match rule {
        RecurrenceRule::None => Err(EvalError::NotRecurring),
        RecurrenceRule::Daily { interval } => next_daily(anchor, now, *interval),
        RecurrenceRule::Yearly => next_yearly(anchor, now),
        RecurrenceRule::Weekly { weekdays } => next_weekly(anchor, now, weekdays),
        RecurrenceRule::Monthly { days, months } => next_monthly(anchor, now, days, months),
    }
}

/// Textual entry point used by the "compute next date" query.
///
/// The rule is validated first, then the anchor (`YYYYMMDD`). An empty rule
/// has no next date and is reported as [`EvalError::NotRecurring`].
pub fn next_date(now: NaiveDate, anchor: &str, rule: &str) -> Result<NaiveDate, NextDateError> {
    let rule = RecurrenceRule::parse(rule)?;
    if !rule.is_recurring() {
        return Err(EvalError::NotRecurring.into());
    }
    let anchor = dates::parse_date(anchor)
        .map_err(|_| EvalError::InvalidAnchorDate(anchor.to_string()))?;
    Ok(next_occurrence(anchor, now, &rule)?)
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, EvalError> {
    date.checked_add_days(Days::new(days))
        .ok_or(EvalError::DateOutOfRange)
}

fn add_year(date: NaiveDate) -> Result<NaiveDate, EvalError> {
    let year = date.year().checked_add(1).ok_or(EvalError::DateOutOfRange)?;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .ok_or(EvalError::DateOutOfRange)
}

fn next_daily(anchor: NaiveDate, now: NaiveDate, interval: u32) -> Result<NaiveDate, EvalError> {
    if interval == 0 {
        return Err(EvalError::InvalidRule("d 0".to_string()));
    }
    if interval == 1 {
        return if anchor < now { Ok(now) } else { add_days(anchor, 1) };
    }
    let interval = u64::from(interval);
    if anchor > now {
        return add_days(anchor, interval);
    }
    // Smallest k >= 1 with anchor + k * interval > now.
    let gap = (now - anchor).num_days().unsigned_abs();
    let steps = gap / interval + 1;
    add_days(anchor, steps * interval)
}

fn next_yearly(anchor: NaiveDate, now: NaiveDate) -> Result<NaiveDate, EvalError> {
    if anchor > now {
        return add_year(anchor);
    }
    // Each step strictly increases the date, so this stops once it passes `now`.
    let mut next = add_year(anchor)?;
    while next <= now {
        next = add_year(next)?;
    }
    Ok(next)
}

fn next_weekly(
    anchor: NaiveDate,
    now: NaiveDate,
    weekdays: &BTreeSet<u8>,
) -> Result<NaiveDate, EvalError> {
    let base = anchor.max(now);
    let start = base.weekday().number_from_monday();
    for offset in 1..=7u32 {
        let weekday = (start + offset - 1) % 7 + 1;
        if weekdays.contains(&(weekday as u8)) {
            return add_days(base, u64::from(offset));
        }
    }
    Err(EvalError::InvalidRule(
        RecurrenceRule::Weekly {
            weekdays: weekdays.clone(),
        }
        .to_string(),
    ))
}

fn next_monthly(
    anchor: NaiveDate,
    now: NaiveDate,
    days: &BTreeSet<i8>,
    months: &BTreeSet<u8>,
) -> Result<NaiveDate, EvalError> {
    let base = anchor.max(now);
    let (mut year, mut month) = (base.year(), base.month());

    for _ in 0..MONTHLY_SEARCH_HORIZON_MONTHS {
        if months.is_empty() || months.contains(&(month as u8)) {
            // Months are visited in order, so the first hit is the overall minimum.
            let earliest = days
                .iter()
                .filter_map(|code| resolve_day(year, month, *code))
                .filter(|date| *date > base)
                .min();
            if let Some(date) = earliest {
                return Ok(date);
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    Err(EvalError::NoCandidateFound(MONTHLY_SEARCH_HORIZON_MONTHS))
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|date| date.day())
}

/// Concrete date for a day code in the given month; `None` when the month is too short.
fn resolve_day(year: i32, month: u32, code: i8) -> Option<NaiveDate> {
    let last = i64::from(last_day_of_month(year, month)?);
    let target = match code {
        c if c > 0 => i64::from(c),
        c => last + 1 + i64::from(c),
    };
    if !(1..=last).contains(&target) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, target as u32)
}
