//! Date-range presets resolved against "today".

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};

/// Preset date range offered by the session browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    Any,
    Past7,
    Past30,
    ThisMonth,
    ThisYear,
    LastYear,
    Year(i32),
}

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// A window no date falls into.
    const fn empty() -> Self {
        Self {
            start: NaiveDate::MAX,
            end: NaiveDate::MIN,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl DateRange {
    /// Resolve the preset to a concrete window. `Any` has no window.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use surflog::domain::filter::DateRange;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 7, 14).expect("date");
    /// let window = DateRange::Past7.window(today).expect("window");
    /// assert_eq!(window.start, NaiveDate::from_ymd_opt(2025, 7, 7).expect("date"));
    /// assert_eq!(window.end, today);
    /// ```
    pub fn window(self, today: NaiveDate) -> Option<DateWindow> {
        let window = match self {
            Self::Any => return None,
            Self::Past7 => trailing(today, 7),
            Self::Past30 => trailing(today, 30),
            Self::ThisMonth => month_bounds(today),
            Self::ThisYear => year_bounds(today.year()),
            Self::LastYear => year_bounds(today.year() - 1),
            Self::Year(year) => year_bounds(year),
        };
        Some(window.unwrap_or_else(DateWindow::empty))
    }
}

fn trailing(today: NaiveDate, days: u64) -> Option<DateWindow> {
    today.checked_sub_days(Days::new(days)).map(|start| DateWindow { start, end: today })
}

fn month_bounds(today: NaiveDate) -> Option<DateWindow> {
    let start = today.with_day(1)?;
    let end = start
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))?;
    Some(DateWindow { start, end })
}

fn year_bounds(year: i32) -> Option<DateWindow> {
    Some(DateWindow {
        start: NaiveDate::from_ymd_opt(year, 1, 1)?,
        end: NaiveDate::from_ymd_opt(year, 12, 31)?,
    })
}

/// Error returned for unknown date-range labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown date range: {0}")]
pub struct ParseDateRangeError(pub String);

impl FromStr for DateRange {
    type Err = ParseDateRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "any" | "all" => Ok(Self::Any),
            "past7" => Ok(Self::Past7),
            "past30" => Ok(Self::Past30),
            "thismonth" => Ok(Self::ThisMonth),
            "thisyear" => Ok(Self::ThisYear),
            "lastyear" => Ok(Self::LastYear),
            year if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) => year
                .parse()
                .map(Self::Year)
                .map_err(|_| ParseDateRangeError(trimmed.to_owned())),
            _ => Err(ParseDateRangeError(trimmed.to_owned())),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Past7 => f.write_str("past7"),
            Self::Past30 => f.write_str("past30"),
            Self::ThisMonth => f.write_str("thisMonth"),
            Self::ThisYear => f.write_str("thisYear"),
            Self::LastYear => f.write_str("lastYear"),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}
