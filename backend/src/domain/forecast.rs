//! Hourly surf forecasts for a spot.
//!
//! The forecast feed mixes observed ("actual") hours with predicted ones. The
//! day navigator walks the distinct calendar days in the feed.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::compass::{Sectors, cardinal};
use super::sessions::optional_number;

fn zero_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.unwrap_or(0.0))
}

fn null_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Whether an hour was observed or predicted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastKind {
    Actual,
    #[default]
    #[serde(other)]
    Forecast,
}

/// Breaking wave height band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakingWaveHeight {
    #[serde(default, deserialize_with = "zero_default")]
    pub min: f64,
    #[serde(default, deserialize_with = "zero_default")]
    pub max: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_text: Option<String>,
}

/// One swell train in a forecast hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSwell {
    #[serde(default, deserialize_with = "zero_default")]
    pub height: f64,
    #[serde(default, deserialize_with = "zero_default")]
    pub period: f64,
    /// Bearing in degrees.
    #[serde(default, deserialize_with = "optional_number")]
    pub direction_degrees: Option<f64>,
    /// Label supplied by the feed, when any.
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub unit: String,
}

impl ForecastSwell {
    /// Sixteen-point label for the swell bearing.
    ///
    /// Falls back to the feed's own label when no bearing is present.
    pub fn compass_label(&self) -> Option<&str> {
        self.direction_degrees
            .and_then(|degrees| cardinal(degrees, Sectors::Sixteen))
            .or(self.direction.as_deref())
    }
}

/// Tide height for the hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastTide {
    #[serde(default, deserialize_with = "zero_default")]
    pub height: f64,
    #[serde(default)]
    pub unit: String,
}

/// Wind for the hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastWind {
    #[serde(default, deserialize_with = "zero_default")]
    pub speed: f64,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub direction_degrees: Option<f64>,
    #[serde(default)]
    pub unit: String,
}

/// A single forecast hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: String,
    #[serde(default)]
    pub breaking_wave_height: BreakingWaveHeight,
    #[serde(default, deserialize_with = "null_vec")]
    pub swell_components: Vec<ForecastSwell>,
    #[serde(default)]
    pub wind: ForecastWind,
    #[serde(default)]
    pub tide: ForecastTide,
    #[serde(default, rename = "type")]
    pub kind: ForecastKind,
}

impl ForecastEntry {
    /// Local calendar day of the hour as written in the timestamp.
    ///
    /// Offsets are ignored so the day matches the spot's own clock.
    pub fn day(&self) -> Option<NaiveDate> {
        let raw = self.timestamp.trim();
        DateTime::<FixedOffset>::parse_from_rfc3339(raw)
            .map(|stamp| stamp.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .map(|stamp| stamp.date())
            .ok()
    }
}

/// The `data` object of the forecast endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    #[serde(default, deserialize_with = "null_vec")]
    pub forecast_data: Vec<ForecastEntry>,
    #[serde(default)]
    pub forecast_generated_at: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl ForecastData {
    /// Partition hours into `(actual, forecast)`, keeping feed order.
    pub fn split(&self) -> (Vec<&ForecastEntry>, Vec<&ForecastEntry>) {
        self.forecast_data
            .iter()
            .partition(|entry| entry.kind == ForecastKind::Actual)
    }

    /// Distinct calendar days in feed order. Unparseable timestamps are
    /// skipped.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use surflog::domain::forecast::ForecastData;
    ///
    /// let data: ForecastData = serde_json::from_value(json!({
    ///     "forecast_data": [
    ///         {"timestamp": "2025-07-14T06:00:00"},
    ///         {"timestamp": "2025-07-14T07:00:00"},
    ///         {"timestamp": "2025-07-15T06:00:00"}
    ///     ]
    /// }))
    /// .expect("forecast decodes");
    /// assert_eq!(data.days().len(), 2);
    /// ```
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = Vec::new();
        for day in self.forecast_data.iter().filter_map(ForecastEntry::day) {
            if !days.contains(&day) {
                days.push(day);
            }
        }
        days
    }

    /// Hours that fall on `day`.
    pub fn entries_for_day(&self, day: NaiveDate) -> Vec<&ForecastEntry> {
        self.forecast_data
            .iter()
            .filter(|entry| entry.day() == Some(day))
            .collect()
    }
}
