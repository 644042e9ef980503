//! Sort state and field comparators for session lists.
//!
//! Missing values sort as zero: numbers as `0`, text as the empty string,
//! dates as the Unix epoch and times as midnight. Sorting is stable and
//! descending order reverses the comparator, so equal keys keep their
//! filtered order in both directions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::format::parse_time_of_day;
use crate::domain::sessions::{SurfSession, SwellComponent, SwellSlot};

/// Column a session list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Date,
    StartTime,
    EndTime,
    Location,
    SessionName,
    FunRating,
    DisplayName,
    SwellHeight(SwellSlot),
    SwellPeriod(SwellSlot),
    SwellDirection(SwellSlot),
    WindSpeed,
    WindDirection,
    TideWaterLevel,
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active sort column and direction. Defaults to newest sessions first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Column-header click: flip on the same field, start ascending on a new one.
    ///
    /// ```
    /// use surflog::domain::filter::{SortDirection, SortField, SortState};
    ///
    /// let state = SortState::default().toggle(SortField::FunRating);
    /// assert_eq!(state.direction, SortDirection::Asc);
    /// assert_eq!(state.toggle(SortField::FunRating).direction, SortDirection::Desc);
    /// ```
    #[must_use]
    pub fn toggle(self, field: SortField) -> Self {
        if field == self.field {
            Self {
                field,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Asc,
            }
        }
    }

    /// Stable in-place sort of borrowed sessions.
    pub fn apply(&self, sessions: &mut [&SurfSession]) {
        sessions.sort_by(|a, b| {
            let ordering = compare(a, b, self.field);
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

fn compare(a: &SurfSession, b: &SurfSession, field: SortField) -> Ordering {
    match field {
        SortField::Date => date_key(a).cmp(&date_key(b)),
        SortField::StartTime => time_key(a.time.as_deref()).cmp(&time_key(b.time.as_deref())),
        SortField::EndTime => {
            time_key(a.end_time.as_deref()).cmp(&time_key(b.end_time.as_deref()))
        }
        SortField::Location => text_cmp(&a.location, &b.location),
        SortField::SessionName => text_cmp(&a.session_name, &b.session_name),
        SortField::DisplayName => {
            text_cmp(a.surfer_name().unwrap_or(""), b.surfer_name().unwrap_or(""))
        }
        SortField::FunRating => number_cmp(a.fun_rating, b.fun_rating),
        SortField::SwellHeight(slot) => swell_cmp(a, b, slot, |c| c.height),
        SortField::SwellPeriod(slot) => swell_cmp(a, b, slot, |c| c.period),
        SortField::SwellDirection(slot) => swell_cmp(a, b, slot, |c| c.direction),
        SortField::WindSpeed => number_cmp(
            a.primary_met().and_then(|m| m.wind_speed),
            b.primary_met().and_then(|m| m.wind_speed),
        ),
        SortField::WindDirection => number_cmp(
            a.primary_met().and_then(|m| m.wind_direction),
            b.primary_met().and_then(|m| m.wind_direction),
        ),
        SortField::TideWaterLevel => number_cmp(
            a.raw_tide.as_ref().and_then(|t| t.water_level),
            b.raw_tide.as_ref().and_then(|t| t.water_level),
        ),
    }
}

fn date_key(session: &SurfSession) -> NaiveDate {
    session
        .date
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH.date_naive())
}

fn time_key(raw: Option<&str>) -> NaiveTime {
    raw.and_then(parse_time_of_day).unwrap_or(NaiveTime::MIN)
}

fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn number_cmp(a: Option<f64>, b: Option<f64>) -> Ordering {
    a.unwrap_or(0.0).total_cmp(&b.unwrap_or(0.0))
}

fn swell_cmp(
    a: &SurfSession,
    b: &SurfSession,
    slot: SwellSlot,
    value: fn(&SwellComponent) -> Option<f64>,
) -> Ordering {
    number_cmp(a.swell(slot).and_then(value), b.swell(slot).and_then(value))
}

/// Error returned for unknown sort keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort field: {0}")]
pub struct ParseSortFieldError(pub String);

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    /// Accepts snake_case and camelCase keys, e.g. `swell2_period` or `funRating`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        let field = match key.as_str() {
            "date" => Self::Date,
            "time" | "starttime" => Self::StartTime,
            "endtime" => Self::EndTime,
            "location" => Self::Location,
            "sessionname" | "name" => Self::SessionName,
            "funrating" | "rating" => Self::FunRating,
            "displayname" | "surfer" => Self::DisplayName,
            "windspeed" => Self::WindSpeed,
            "winddirection" => Self::WindDirection,
            "tidewaterlevel" | "tide" => Self::TideWaterLevel,
            other => swell_field(other).ok_or_else(|| ParseSortFieldError(s.to_owned()))?,
        };
        Ok(field)
    }
}

fn swell_field(key: &str) -> Option<SortField> {
    let rest = key.strip_prefix("swell")?;
    let (digit, metric) = rest.split_at_checked(1)?;
    let slot: SwellSlot = format!("swell{digit}").parse().ok()?;
    match metric {
        "height" => Some(SortField::SwellHeight(slot)),
        "period" => Some(SortField::SwellPeriod(slot)),
        "direction" => Some(SortField::SwellDirection(slot)),
        _ => None,
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => f.write_str("date"),
            Self::StartTime => f.write_str("start_time"),
            Self::EndTime => f.write_str("end_time"),
            Self::Location => f.write_str("location"),
            Self::SessionName => f.write_str("session_name"),
            Self::FunRating => f.write_str("fun_rating"),
            Self::DisplayName => f.write_str("display_name"),
            Self::SwellHeight(slot) => write!(f, "swell{}_height", slot.number()),
            Self::SwellPeriod(slot) => write!(f, "swell{}_period", slot.number()),
            Self::SwellDirection(slot) => write!(f, "swell{}_direction", slot.number()),
            Self::WindSpeed => f.write_str("wind_speed"),
            Self::WindDirection => f.write_str("wind_direction"),
            Self::TideWaterLevel => f.write_str("tide_water_level"),
        }
    }
}

/// Error returned for unknown sort directions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort direction: {0}")]
pub struct ParseSortDirectionError(pub String);

impl FromStr for SortDirection {
    type Err = ParseSortDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(ParseSortDirectionError(s.to_owned())),
        }
    }
}
