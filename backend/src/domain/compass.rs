//! Compass-degree to cardinal-direction bucketing.
//!
//! Sector 0 is centred on North. A bearing falls in sector
//! `round(degrees / width) mod count`, so 0°, 360° and anything within half a
//! sector of North all map to `N`.

use std::fmt;

const FOUR: [&str; 4] = ["N", "E", "S", "W"];
const EIGHT: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const SIXTEEN: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Granularity of a compass rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sectors {
    Four,
    Eight,
    Sixteen,
}

impl Sectors {
    fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Four => &FOUR,
            Self::Eight => &EIGHT,
            Self::Sixteen => &SIXTEEN,
        }
    }

    /// Number of sectors.
    pub fn count(self) -> usize {
        self.labels().len()
    }

    /// Angular width of one sector in degrees.
    pub fn width(self) -> f64 {
        360.0 / self.count() as f64
    }

    /// Coarsest rose that contains `label`, compared case-insensitively.
    ///
    /// ```
    /// use surflog::domain::compass::Sectors;
    ///
    /// assert_eq!(Sectors::for_label("w"), Some(Sectors::Four));
    /// assert_eq!(Sectors::for_label("SW"), Some(Sectors::Eight));
    /// assert_eq!(Sectors::for_label("WSW"), Some(Sectors::Sixteen));
    /// assert_eq!(Sectors::for_label("X"), None);
    /// ```
    pub fn for_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_ascii_uppercase();
        [Self::Four, Self::Eight, Self::Sixteen]
            .into_iter()
            .find(|sectors| sectors.labels().contains(&wanted.as_str()))
    }
}

impl fmt::Display for Sectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-sector", self.count())
    }
}

/// Bucket a bearing into a cardinal label. Non-finite input yields `None`.
///
/// # Examples
/// ```
/// use surflog::domain::compass::{Sectors, cardinal};
///
/// assert_eq!(cardinal(350.0, Sectors::Four), Some("N"));
/// assert_eq!(cardinal(200.0, Sectors::Sixteen), Some("SSW"));
/// ```
pub fn cardinal(degrees: f64, sectors: Sectors) -> Option<&'static str> {
    if !degrees.is_finite() {
        return None;
    }
    let labels = sectors.labels();
    let normalised = degrees.rem_euclid(360.0);
    let index = (normalised / sectors.width()).round() as usize % labels.len();
    labels.get(index).copied()
}
