//! Dashboard aggregates served by the external API and the views built on
//! them.
//!
//! The API computes every aggregate. This module only decodes the payload,
//! picks a year and ranks users for the leaderboards. Numeric aggregates
//! arrive as strings or numbers, so they are decoded leniently and default
//! to zero.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::auth::UserRecord;
use super::format::{MissingMinutes, capitalize_location, format_hours, format_hours_label};
use super::sessions::optional_number;

/// Identifier given to the signed-in user's leaderboard row.
pub const CURRENT_USER_ID: &str = "current";
/// Display name given to the signed-in user's leaderboard row.
pub const CURRENT_USER_LABEL: &str = "You";

fn zero_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.unwrap_or(0.0))
}

fn count_default<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = optional_number(deserializer)?.unwrap_or(0.0);
    Ok(if value > 0.0 { value.round() as u64 } else { 0 })
}

fn null_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<BTreeMap<String, T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A location and how many sessions were logged there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopLocation {
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "count_default")]
    pub session_count: u64,
}

/// One user's aggregates for a single calendar year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyStats {
    #[serde(default, deserialize_with = "zero_default")]
    pub avg_fun_rating: f64,
    #[serde(default, deserialize_with = "zero_default")]
    pub avg_session_duration_minutes: f64,
    #[serde(default, deserialize_with = "zero_default")]
    pub sessions_per_week: f64,
    #[serde(default, deserialize_with = "count_default")]
    pub total_sessions: u64,
    #[serde(default, deserialize_with = "zero_default")]
    pub total_surf_time_minutes: f64,
    #[serde(default, deserialize_with = "null_vec")]
    pub top_locations: Vec<TopLocation>,
}

/// Aggregates for the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUserStats {
    #[serde(default, deserialize_with = "null_vec")]
    pub top_locations: Vec<TopLocation>,
    #[serde(default, deserialize_with = "count_default")]
    pub total_sessions_all_time: u64,
    #[serde(default, deserialize_with = "null_map")]
    pub yearly_stats: BTreeMap<String, YearlyStats>,
}

/// Aggregates for another surfer, used by the leaderboards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherUserStats {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "count_default")]
    pub total_sessions_all_time: u64,
    #[serde(default, deserialize_with = "null_map")]
    pub yearly_stats: BTreeMap<String, YearlyStats>,
}

/// Community-wide totals. Minute totals stay optional so the view can tell
/// "no data" apart from zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityStats {
    #[serde(default, deserialize_with = "optional_number")]
    pub avg_session_duration_minutes: Option<f64>,
    #[serde(default)]
    pub top_location: Option<TopLocation>,
    #[serde(default, deserialize_with = "count_default")]
    pub total_sessions: u64,
    #[serde(default, deserialize_with = "zero_default")]
    pub total_stoke: f64,
    #[serde(default, deserialize_with = "optional_number")]
    pub total_surf_time_minutes: Option<f64>,
}

/// The `data` object of the dashboard endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub community: CommunityStats,
    #[serde(default)]
    pub current_user: CurrentUserStats,
    #[serde(default, deserialize_with = "null_vec")]
    pub other_users: Vec<OtherUserStats>,
}

/// Quantity a leaderboard ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    Sessions,
    SurfTime,
    FunRating,
}

impl LeaderboardMetric {
    pub const ALL: [Self; 3] = [Self::Sessions, Self::SurfTime, Self::FunRating];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::SurfTime => "surf_time",
            Self::FunRating => "fun_rating",
        }
    }

    fn value(self, stats: &YearlyStats) -> f64 {
        match self {
            Self::Sessions => stats.total_sessions as f64,
            Self::SurfTime => stats.total_surf_time_minutes,
            Self::FunRating => stats.avg_fun_rating,
        }
    }
}

impl fmt::Display for LeaderboardMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown leaderboard metric: {0}")]
pub struct ParseLeaderboardMetricError(pub String);

impl FromStr for LeaderboardMetric {
    type Err = ParseLeaderboardMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLeaderboardMetricError(s.to_owned()))
    }
}

/// A ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub display_name: String,
    pub is_current_user: bool,
    pub stats: YearlyStats,
}

impl DashboardStats {
    /// Every year with stats for any user, most recent first.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use surflog::domain::dashboard::DashboardStats;
    ///
    /// let stats: DashboardStats = serde_json::from_value(json!({
    ///     "current_user": {"yearly_stats": {"2024": {}, "2025": {}}},
    ///     "other_users": [{"user_id": "u2", "yearly_stats": {"2023": {}}}]
    /// }))
    /// .expect("stats decode");
    /// assert_eq!(stats.available_years(), vec![2025, 2024, 2023]);
    /// ```
    pub fn available_years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .current_user
            .yearly_stats
            .keys()
            .chain(self.other_users.iter().flat_map(|user| user.yearly_stats.keys()))
            .filter_map(|key| key.trim().parse().ok())
            .collect();
        years.into_iter().rev().collect()
    }

    /// The current year when it has data, otherwise the most recent year.
    pub fn default_year(&self, current_year: i32) -> Option<i32> {
        let years = self.available_years();
        if years.contains(&current_year) {
            Some(current_year)
        } else {
            years.first().copied()
        }
    }

    /// The signed-in user's stats for `year`, zeroed when absent.
    pub fn current_user_year(&self, year: i32) -> YearlyStats {
        year_stats(&self.current_user.yearly_stats, year)
    }

    /// Rank the signed-in user and every other surfer for `year`.
    ///
    /// The signed-in user appears as "You". Users without stats for the
    /// year rank with zeros. Ties keep the signed-in user first, then the
    /// API's order.
    pub fn leaderboard(
        &self,
        year: i32,
        metric: LeaderboardMetric,
        current_user: Option<&UserRecord>,
    ) -> Vec<LeaderboardEntry> {
        let current_id = current_user.map_or(CURRENT_USER_ID, |user| user.id.as_str());
        let mut rows: Vec<(String, String, bool, YearlyStats)> =
            Vec::with_capacity(self.other_users.len() + 1);
        rows.push((
            current_id.to_owned(),
            CURRENT_USER_LABEL.to_owned(),
            true,
            self.current_user_year(year),
        ));
        rows.extend(
            self.other_users
                .iter()
                .filter(|user| current_user.is_none_or(|me| me.id != user.user_id))
                .map(|user| {
                    (
                        user.user_id.clone(),
                        user.display_name.clone(),
                        false,
                        year_stats(&user.yearly_stats, year),
                    )
                }),
        );
        rows.sort_by(|a, b| {
            metric
                .value(&b.3)
                .partial_cmp(&metric.value(&a.3))
                .unwrap_or(Ordering::Equal)
        });
        rows.into_iter()
            .enumerate()
            .map(|(index, (user_id, display_name, is_current_user, stats))| {
                LeaderboardEntry {
                    rank: index + 1,
                    user_id,
                    display_name,
                    is_current_user,
                    stats,
                }
            })
            .collect()
    }
}

fn year_stats(stats: &BTreeMap<String, YearlyStats>, year: i32) -> YearlyStats {
    stats.get(&year.to_string()).cloned().unwrap_or_default()
}

/// Formatted figures for the signed-in user's stat cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalSummary {
    pub total_sessions: u64,
    pub total_sessions_all_time: u64,
    pub surf_hours: String,
    pub avg_session_hours: String,
    pub avg_fun_rating: String,
    pub sessions_per_week: String,
    pub top_locations: Vec<TopLocation>,
}

/// Formatted community cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunitySummary {
    pub total_sessions: u64,
    pub surf_hours: String,
    pub avg_session_hours: String,
    pub total_stoke: String,
    pub top_location: Option<TopLocation>,
}

/// One leaderboard per metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboards {
    pub sessions: Vec<LeaderboardEntry>,
    pub surf_time: Vec<LeaderboardEntry>,
    pub fun_rating: Vec<LeaderboardEntry>,
}

/// Everything the dashboard renders for one selected year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub year: Option<i32>,
    pub available_years: Vec<i32>,
    pub you: PersonalSummary,
    pub community: CommunitySummary,
    pub leaderboards: Leaderboards,
}

fn capitalized(location: &TopLocation) -> TopLocation {
    TopLocation {
        location: capitalize_location(&location.location),
        session_count: location.session_count,
    }
}

impl DashboardView {
    /// Build the view for `requested_year`, or the default year when absent.
    pub fn build(
        stats: &DashboardStats,
        requested_year: Option<i32>,
        current_year: i32,
        current_user: Option<&UserRecord>,
    ) -> Self {
        let year = requested_year.or_else(|| stats.default_year(current_year));
        let selected = year.unwrap_or(current_year);
        let mine = stats.current_user_year(selected);
        let top_locations = if mine.top_locations.is_empty() {
            &stats.current_user.top_locations
        } else {
            &mine.top_locations
        };
        let you = PersonalSummary {
            total_sessions: mine.total_sessions,
            total_sessions_all_time: stats.current_user.total_sessions_all_time,
            surf_hours: format_hours(Some(mine.total_surf_time_minutes), MissingMinutes::Zero),
            avg_session_hours: format_hours(
                Some(mine.avg_session_duration_minutes),
                MissingMinutes::Zero,
            ),
            avg_fun_rating: format!("{:.1}", mine.avg_fun_rating),
            sessions_per_week: format!("{:.2}", mine.sessions_per_week),
            top_locations: top_locations.iter().map(capitalized).collect(),
        };
        let community = &stats.community;
        let community = CommunitySummary {
            total_sessions: community.total_sessions,
            surf_hours: format_hours_label(
                community.total_surf_time_minutes,
                MissingMinutes::NoData,
            ),
            avg_session_hours: format_hours_label(
                community.avg_session_duration_minutes,
                MissingMinutes::NoData,
            ),
            total_stoke: format!("{:.0}", community.total_stoke),
            top_location: community
                .top_location
                .as_ref()
                .filter(|top| !top.location.trim().is_empty())
                .map(capitalized),
        };
        let board = |metric| stats.leaderboard(selected, metric, current_user);
        Self {
            year,
            available_years: stats.available_years(),
            you,
            community,
            leaderboards: Leaderboards {
                sessions: board(LeaderboardMetric::Sessions),
                surf_time: board(LeaderboardMetric::SurfTime),
                fun_rating: board(LeaderboardMetric::FunRating),
            },
        }
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
