//! Calendar helpers for lifecycle dates

use std::sync::LazyLock;

use chrono::{Datelike, Local, Months, NaiveDate};
use regex::Regex;

/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`
static PARTIAL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{2}))?$").expect("partial date pattern is valid")
});

/// Today's local calendar day
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_full_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse a lifecycle date, trying `YYYY-MM-DD`, then `YYYY-MM`, then `YYYY`.
///
/// Partial dates resolve to the first day of the month or year.
pub fn parse_lifecycle_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Some(date) = parse_full_date(value) {
        return Some(date);
    }

    let captures = PARTIAL_DATE.captures(value)?;
    let year = captures[1].parse().ok()?;
    let month = match captures.get(2) {
        Some(month) => month.as_str().parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Shift a date by whole years, clamping Feb 29 to Feb 28
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    let months = Months::new(years.unsigned_abs() * 12);
    let shifted = if years >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

/// Elapsed calendar time between two days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSpan {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl CalendarSpan {
    /// Years, months and days between two days, regardless of their order
    pub fn between(a: NaiveDate, b: NaiveDate) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };

        let mut years = end.year() - start.year();
        let mut months = end.month() as i32 - start.month() as i32;
        let mut days = end.day() as i32 - start.day() as i32;

        if months < 0 {
            years -= 1;
            months += 12;
        }

        if days < 0 {
            months -= 1;
            days += days_in_previous_month(end);
        }

        if months < 0 {
            years -= 1;
            months += 12;
        }

        Self {
            years,
            months,
            days,
        }
    }
}

fn days_in_previous_month(date: NaiveDate) -> i32 {
    // The first of this month minus one day is the last day of the previous month
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day() as i32)
        .unwrap_or(30)
}
