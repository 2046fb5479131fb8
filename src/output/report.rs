//! Human-readable answer to a version support check

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::config::CACHE_DAY_FORMAT;
use crate::lifecycle::dates::CalendarSpan;
use crate::lifecycle::query::SupportReport;
use crate::lifecycle::resolver::SupportStatus;

/// Describe `report` for `version` of `technology` as of `today`.
///
/// The first line states the verdict and the latest release. When the
/// matched cycle publishes a concrete end date, a second line gives the time
/// left until it, or the time elapsed since it once that day has come.
pub fn describe_support(
    technology: &str,
    version: &str,
    report: &SupportReport,
    today: NaiveDate,
) -> String {
    let latest = format!(
        "The latest version of {} on {} was {}.",
        technology,
        today.format(CACHE_DAY_FORMAT),
        report.latest_version
    );

    let mut out = match &report.status {
        SupportStatus::Supported(_) => {
            format!("{} {} is Supported. {}\n", technology, version, latest)
        }
        SupportStatus::EndOfLife(_) | SupportStatus::PredatesOldestCycle(_) => {
            format!("{} {} is no longer Supported. {}\n", technology, version, latest)
        }
        SupportStatus::NotFound => format!(
            "{} {} does not match any known release cycle. {}\n",
            technology, version, latest
        ),
    };

    let Some(end) = report.status.record().and_then(|p| p.effective_end_date()) else {
        return out;
    };
    let span = CalendarSpan::between(today, end);
    let end_text = end.format(CACHE_DAY_FORMAT);

    let _ = if end > today {
        writeln!(
            out,
            "Support ends in {} years, {} months, and {} days ({})",
            span.years, span.months, span.days, end_text
        )
    } else {
        writeln!(
            out,
            "Support ended {} years, {} months, and {} days ago ({})",
            span.years, span.months, span.days, end_text
        )
    };
    out
}
