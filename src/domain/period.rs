//! Summary periods and the date windows they select.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Time-window selector for summaries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Total,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Daily, Period::Weekly, Period::Monthly, Period::Total];
    pub const NAMES: [&'static str; 4] = ["daily", "weekly", "monthly", "total"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Total => "total",
        }
    }

    /// Whether the period is anchored to a reference date.
    pub fn uses_reference(&self) -> bool {
        !matches!(self, Period::Total)
    }

    /// Inclusive window selected by this period around `target`, if the period is bounded.
    pub fn window(&self, target: NaiveDate) -> Option<DateWindow> {
        match self {
            Period::Daily => Some(DateWindow {
                start: target,
                end: target,
            }),
            Period::Weekly => Some(DateWindow::week_of(target)),
            Period::Monthly => Some(DateWindow::month_of(target)),
            Period::Total => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown period `{0}` (use daily, weekly, monthly, or total)")]
pub struct ParsePeriodError(pub String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Period::ALL
            .into_iter()
            .find(|period| period.as_str() == needle)
            .ok_or_else(|| ParsePeriodError(s.to_string()))
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Sunday through Saturday of the week containing `target`.
    pub fn week_of(target: NaiveDate) -> Self {
        let offset = i64::from(target.weekday().num_days_from_sunday());
        let start = target - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// First through last day of the calendar month containing `target`.
    pub fn month_of(target: NaiveDate) -> Self {
        let start = target.with_day(1).unwrap_or(target);
        let next_month = if target.month() == 12 {
            NaiveDate::from_ymd_opt(target.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(target.year(), target.month() + 1, 1)
        };
        let end = next_month
            .and_then(|first| first.pred_opt())
            .unwrap_or(target);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} .. {}", self.start, self.end)
        }
    }
}
