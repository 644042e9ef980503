//! Display helpers shared by the session, dashboard and forecast views.

use chrono::{NaiveTime, Timelike};

use super::sessions::Participant;

const NO_DATA: &str = "No data";

/// How a missing minutes value is rendered.
///
/// Some views read a missing aggregate as "nothing logged yet" and others as
/// "unknown". Zero is always a real value and renders as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMinutes {
    /// Render the "No data" placeholder.
    NoData,
    /// Render as zero hours.
    Zero,
}

/// Convert minutes to hours with one decimal place.
///
/// # Examples
/// ```
/// use surflog::domain::format::{MissingMinutes, format_hours};
///
/// assert_eq!(format_hours(Some(90.0), MissingMinutes::NoData), "1.5");
/// assert_eq!(format_hours(Some(0.0), MissingMinutes::NoData), "0.0");
/// assert_eq!(format_hours(None, MissingMinutes::NoData), "No data");
/// assert_eq!(format_hours(None, MissingMinutes::Zero), "0.0");
/// ```
pub fn format_hours(minutes: Option<f64>, missing: MissingMinutes) -> String {
    match (minutes.filter(|m| m.is_finite()), missing) {
        (Some(minutes), _) => format!("{:.1}", minutes / 60.0),
        (None, MissingMinutes::NoData) => NO_DATA.to_owned(),
        (None, MissingMinutes::Zero) => "0.0".to_owned(),
    }
}

/// Like [`format_hours`] with an ` hours` suffix on numeric output.
pub fn format_hours_label(minutes: Option<f64>, missing: MissingMinutes) -> String {
    let value = format_hours(minutes, missing);
    if value == NO_DATA {
        value
    } else {
        format!("{value} hours")
    }
}

/// Capitalise each space-separated word and lowercase the rest.
///
/// ```
/// use surflog::domain::format::capitalize_location;
///
/// assert_eq!(capitalize_location("LONG beach"), "Long Beach");
/// ```
pub fn capitalize_location(location: &str) -> String {
    location
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summarise tagged co-surfers.
///
/// ```
/// use surflog::domain::format::format_participants;
///
/// assert_eq!(format_participants(&[]), "Solo session");
/// ```
pub fn format_participants(participants: &[Participant]) -> String {
    match participants {
        [] => "Solo session".to_owned(),
        [first, second, rest @ ..] if !rest.is_empty() => {
            let remaining = rest.len();
            let plural = if remaining > 1 { "s" } else { "" };
            format!(
                "{}, {} + {remaining} other{plural}",
                first.display_name, second.display_name
            )
        }
        few => few
            .iter()
            .map(|p| p.display_name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

/// Normalise a time of day to `HH:MM:SS`.
///
/// ```
/// use surflog::domain::format::normalize_time;
///
/// assert_eq!(normalize_time("10:00").as_deref(), Some("10:00:00"));
/// ```
pub fn normalize_time(raw: &str) -> Option<String> {
    parse_time_of_day(raw).map(|time| time.format("%H:%M:%S").to_string())
}

/// Render a 24-hour time as a 12-hour clock reading such as `2:30 PM`.
///
/// Blank input renders as an empty string; unparseable input is returned
/// unchanged.
pub fn format_time_of_day(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match parse_time_of_day(raw) {
        Some(time) => {
            let (is_pm, hour) = time.hour12();
            let suffix = if is_pm { "PM" } else { "AM" };
            format!("{hour}:{:02} {suffix}", time.minute())
        }
        None => raw.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for display helpers.
    use super::*;
    use rstest::rstest;

    fn people(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| Participant {
                user_id: format!("user-{index}"),
                display_name: (*name).to_owned(),
            })
            .collect()
    }

    #[rstest]
    #[case(&[], "Solo session")]
    #[case(&["Kai"], "Kai")]
    #[case(&["Kai", "Lei"], "Kai, Lei")]
    #[case(&["Kai", "Lei", "Moana"], "Kai, Lei + 1 other")]
    #[case(&["Kai", "Lei", "Moana", "Nalu"], "Kai, Lei + 2 others")]
    fn participants(#[case] names: &[&str], #[case] expected: &str) {
        assert_eq!(format_participants(&people(names)), expected);
    }

    #[rstest]
    #[case(Some(0.0), MissingMinutes::NoData, "0.0")]
    #[case(None, MissingMinutes::NoData, "No data")]
    #[case(None, MissingMinutes::Zero, "0.0")]
    #[case(Some(f64::NAN), MissingMinutes::NoData, "No data")]
    #[case(Some(150.0), MissingMinutes::Zero, "2.5")]
    fn hours(#[case] minutes: Option<f64>, #[case] missing: MissingMinutes, #[case] expected: &str) {
        assert_eq!(format_hours(minutes, missing), expected);
    }

    #[rstest]
    #[case(Some(0.0), "0.0 hours")]
    #[case(Some(60.0), "1.0 hours")]
    #[case(None, "No data")]
    fn hour_labels(#[case] minutes: Option<f64>, #[case] expected: &str) {
        assert_eq!(format_hours_label(minutes, MissingMinutes::NoData), expected);
    }

    #[rstest]
    #[case("lido beach", "Lido Beach")]
    #[case("MONTAUK", "Montauk")]
    #[case("rockaway  92nd", "Rockaway  92nd")]
    #[case("", "")]
    fn capitalises_locations(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(capitalize_location(raw), expected);
    }

    #[rstest]
    #[case("14:30:00", "2:30 PM")]
    #[case("00:05", "12:05 AM")]
    #[case("12:00:00", "12:00 PM")]
    #[case("", "")]
    #[case("dusk", "dusk")]
    fn twelve_hour_times(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(format_time_of_day(raw), expected);
    }
}
