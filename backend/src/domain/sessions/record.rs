//! The surf session read model and its environmental snapshots.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{
    null_as_empty, one_or_many, optional_date, optional_number, optional_object, optional_string,
};

/// A logged surf session as returned by the external API.
///
/// Only `id` is mandatory. Every other field tolerates absence, and the
/// environmental snapshots accept either a single object or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfSession {
    pub id: i64,
    #[serde(default)]
    pub session_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, with = "optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub fun_rating: Option<f64>,
    #[serde(default)]
    pub session_notes: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub participants: Vec<Participant>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub raw_swell: Vec<SwellSnapshot>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub raw_met: Vec<MetReading>,
    #[serde(default, deserialize_with = "optional_object")]
    pub raw_tide: Option<TideReading>,
}

impl SurfSession {
    /// `swell_1` of the first recorded swell snapshot.
    pub fn primary_swell(&self) -> Option<&SwellComponent> {
        self.swell(SwellSlot::One)
    }

    /// The requested component of the first recorded swell snapshot.
    pub fn swell(&self, slot: SwellSlot) -> Option<&SwellComponent> {
        self.raw_swell
            .first()
            .and_then(|snapshot| snapshot.swell_components.get(slot))
    }

    /// First meteorological reading, if any.
    pub fn primary_met(&self) -> Option<&MetReading> {
        self.raw_met.first()
    }

    /// Name shown for the authoring surfer, falling back to their email.
    pub fn surfer_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(self.user_email.as_deref())
    }
}

/// A co-surfer tagged on a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default, deserialize_with = "participant_id")]
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
}

fn participant_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(optional_string(deserializer)?.unwrap_or_default())
}

/// One buoy swell snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwellSnapshot {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub swell_components: SwellComponents,
}

/// Up to four swell trains keyed `swell_1`..`swell_4`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwellComponents {
    #[serde(default, deserialize_with = "optional_object")]
    pub swell_1: Option<SwellComponent>,
    #[serde(default, deserialize_with = "optional_object")]
    pub swell_2: Option<SwellComponent>,
    #[serde(default, deserialize_with = "optional_object")]
    pub swell_3: Option<SwellComponent>,
    #[serde(default, deserialize_with = "optional_object")]
    pub swell_4: Option<SwellComponent>,
}

impl SwellComponents {
    /// Component stored under the given key.
    pub fn get(&self, slot: SwellSlot) -> Option<&SwellComponent> {
        match slot {
            SwellSlot::One => self.swell_1.as_ref(),
            SwellSlot::Two => self.swell_2.as_ref(),
            SwellSlot::Three => self.swell_3.as_ref(),
            SwellSlot::Four => self.swell_4.as_ref(),
        }
    }
}

/// Height (ft), period (s) and direction (degrees) of one swell train.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SwellComponent {
    #[serde(default, deserialize_with = "optional_number")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub period: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub direction: Option<f64>,
}

/// Key of a swell component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwellSlot {
    One,
    Two,
    Three,
    Four,
}

impl SwellSlot {
    /// All slots in key order.
    pub const ALL: [Self; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// One-based slot number.
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.number() == number)
    }
}

impl fmt::Display for SwellSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swell_{}", self.number())
    }
}

/// Error returned when a swell slot key is not `swell1`..`swell4`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown swell slot: {0}")]
pub struct ParseSwellSlotError(pub String);

impl FromStr for SwellSlot {
    type Err = ParseSwellSlotError;

    /// Accepts `swell1` and `swell_1` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("swell")
            .map(|rest| rest.trim_start_matches('_'))
            .and_then(|digits| digits.parse::<u8>().ok())
            .and_then(Self::from_number)
            .ok_or_else(|| ParseSwellSlotError(s.to_owned()))
    }
}

/// Meteorological reading. Unknown keys are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetReading {
    #[serde(default, deserialize_with = "optional_number")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub wind_direction: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub wind_gust: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub air_temperature: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub water_temperature: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tide gauge reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TideReading {
    #[serde(default, deserialize_with = "optional_number")]
    pub water_level: Option<f64>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub station_id: Option<String>,
}
