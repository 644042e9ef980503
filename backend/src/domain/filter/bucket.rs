//! Swell height/period buckets and direction filters.

use std::fmt;
use std::str::FromStr;

use crate::domain::compass::{Sectors, cardinal};

/// Half-open numeric bucket `[min, max)`, or `[min, ∞)` when open-ended.
///
/// Parsed from labels such as `1-2`, `5+`, `0-2 ft` or `12+ s`; a trailing
/// unit word is ignored.
///
/// # Examples
/// ```
/// use surflog::domain::filter::RangeBucket;
///
/// let bucket: RangeBucket = "2-3 ft".parse().expect("bucket");
/// assert!(bucket.contains(2.0));
/// assert!(!bucket.contains(3.0));
/// let open: RangeBucket = "12+".parse().expect("bucket");
/// assert!(open.contains(18.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBucket {
    min: f64,
    max: Option<f64>,
}

impl RangeBucket {
    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.is_none_or(|max| value < max)
    }
}

/// Error returned for malformed bucket labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid range bucket: {0}")]
pub struct ParseBucketError(pub String);

impl FromStr for RangeBucket {
    type Err = ParseBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseBucketError(s.trim().to_owned());
        let range = s.split_whitespace().next().ok_or_else(invalid)?;
        let parse = |raw: &str| raw.parse::<f64>().ok().filter(|n| n.is_finite());

        if let Some(min) = range.strip_suffix('+') {
            let min = parse(min).ok_or_else(invalid)?;
            return Ok(Self { min, max: None });
        }

        let (min, max) = range.split_once('-').ok_or_else(invalid)?;
        let (min, max) = (parse(min).ok_or_else(invalid)?, parse(max).ok_or_else(invalid)?);
        if min >= max {
            return Err(invalid());
        }
        Ok(Self {
            min,
            max: Some(max),
        })
    }
}

impl fmt::Display for RangeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

/// Matches bearings that bucket to one compass label.
///
/// The rose granularity comes from the label: `N/E/S/W` use four sectors,
/// `NE/SE/SW/NW` eight, and three-letter points sixteen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionFilter {
    label: String,
    sectors: Sectors,
}

impl DirectionFilter {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sectors(&self) -> Sectors {
        self.sectors
    }

    pub fn matches(&self, degrees: f64) -> bool {
        cardinal(degrees, self.sectors) == Some(self.label.as_str())
    }
}

/// Error returned for unknown compass labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown compass direction: {0}")]
pub struct ParseDirectionError(pub String);

impl FromStr for DirectionFilter {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_uppercase();
        let sectors = Sectors::for_label(&label).ok_or_else(|| ParseDirectionError(s.to_owned()))?;
        Ok(Self { label, sectors })
    }
}
