//! Session list filter/sort pipeline.
//!
//! [`browse`] is a pure function of the source list, the filter state and the
//! sort state. Each active filter is an independent predicate (logical AND);
//! a filter left at its default is a no-op. Filters fail closed: a session
//! missing the field an active filter reads is excluded. The sort, by
//! contrast, treats missing values as zero so it always yields a total order.

mod bucket;
mod date_range;
mod derive;
mod sort;

use chrono::NaiveDate;

use super::sessions::{SurfSession, SwellComponent};

pub use bucket::{DirectionFilter, ParseBucketError, ParseDirectionError, RangeBucket};
pub use date_range::{DateRange, DateWindow, ParseDateRangeError};
pub use derive::{LocationCount, surfer_names, top_locations};
pub use sort::{
    ParseSortDirectionError, ParseSortFieldError, SortDirection, SortField, SortState,
};

/// Filter state. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFilter {
    /// Case-insensitive location substring.
    pub location: Option<String>,
    pub date_range: DateRange,
    /// Inclusive minimum fun rating.
    pub min_fun_rating: Option<u8>,
    /// Bucket for the primary swell height.
    pub swell_height: Option<RangeBucket>,
    /// Bucket for the primary swell period.
    pub swell_period: Option<RangeBucket>,
    /// Compass label for the primary swell direction.
    pub swell_direction: Option<DirectionFilter>,
    /// Surfer display name, matched case-insensitively.
    pub surfer: Option<String>,
    /// Case-insensitive substring of the session notes.
    pub keywords: Option<String>,
    /// Only the current user's sessions.
    pub mine_only: bool,
}

/// Evaluation-time inputs the filter state refers to.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub today: NaiveDate,
    pub current_user_id: Option<&'a str>,
}

impl SessionFilter {
    /// Sessions passing every active filter, in source order.
    pub fn apply<'a>(
        &self,
        sessions: &'a [SurfSession],
        ctx: &FilterContext<'_>,
    ) -> Vec<&'a SurfSession> {
        let window = self.date_range.window(ctx.today);
        sessions
            .iter()
            .filter(|session| self.matches(session, ctx, window.as_ref()))
            .collect()
    }

    fn matches(
        &self,
        session: &SurfSession,
        ctx: &FilterContext<'_>,
        window: Option<&DateWindow>,
    ) -> bool {
        self.matches_owner(session, ctx)
            && active(self.location.as_deref())
                .is_none_or(|needle| contains_ci(&session.location, needle))
            && window.is_none_or(|w| session.date.is_some_and(|date| w.contains(date)))
            && self
                .min_fun_rating
                .is_none_or(|min| session.fun_rating.is_some_and(|r| r >= f64::from(min)))
            && self.swell_height.is_none_or(|bucket| {
                primary(session, |c| c.height).is_some_and(|h| bucket.contains(h))
            })
            && self.swell_period.is_none_or(|bucket| {
                primary(session, |c| c.period).is_some_and(|p| bucket.contains(p))
            })
            && self.swell_direction.as_ref().is_none_or(|direction| {
                primary(session, |c| c.direction).is_some_and(|d| direction.matches(d))
            })
            && active(self.surfer.as_deref()).is_none_or(|surfer| {
                session
                    .surfer_name()
                    .is_some_and(|name| name.trim().eq_ignore_ascii_case(surfer))
            })
            && active(self.keywords.as_deref()).is_none_or(|keywords| {
                session
                    .session_notes
                    .as_deref()
                    .is_some_and(|notes| contains_ci(notes, keywords))
            })
    }

    fn matches_owner(&self, session: &SurfSession, ctx: &FilterContext<'_>) -> bool {
        if !self.mine_only {
            return true;
        }
        match (ctx.current_user_id, session.user_id.as_deref()) {
            (Some(current), Some(owner)) => current == owner,
            _ => false,
        }
    }
}

fn active(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn primary(
    session: &SurfSession,
    value: fn(&SwellComponent) -> Option<f64>,
) -> Option<f64> {
    session.primary_swell().and_then(value)
}

/// Filter and sort state for one browse request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionQuery {
    pub filter: SessionFilter,
    pub sort: SortState,
}

/// Result of browsing a session list.
///
/// An empty source and an over-restrictive filter are kept apart so the user
/// can tell "nothing logged yet" from "nothing matches".
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseOutcome<'a> {
    NoSessions,
    NoMatches,
    Sessions(Vec<&'a SurfSession>),
}

impl<'a> BrowseOutcome<'a> {
    /// User-facing message for the empty states.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::NoSessions => Some("No sessions logged yet"),
            Self::NoMatches => Some("No sessions match the current filters"),
            Self::Sessions(_) => None,
        }
    }

    pub fn sessions(&self) -> &[&'a SurfSession] {
        match self {
            Self::Sessions(sessions) => sessions,
            Self::NoSessions | Self::NoMatches => &[],
        }
    }
}

/// Filter, then sort. The source list is never mutated.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use serde_json::json;
/// use surflog::domain::filter::{FilterContext, SessionQuery, browse};
/// use surflog::domain::sessions::SurfSession;
///
/// let sessions: Vec<SurfSession> =
///     serde_json::from_value(json!([{"id": 1, "fun_rating": 6}, {"id": 2, "fun_rating": 9}]))
///         .expect("sessions");
/// let mut query = SessionQuery::default();
/// query.filter.min_fun_rating = Some(7);
/// let ctx = FilterContext {
///     today: NaiveDate::from_ymd_opt(2025, 7, 14).expect("date"),
///     current_user_id: None,
/// };
/// let outcome = browse(&sessions, &query, &ctx);
/// assert_eq!(outcome.sessions().len(), 1);
/// ```
pub fn browse<'a>(
    sessions: &'a [SurfSession],
    query: &SessionQuery,
    ctx: &FilterContext<'_>,
) -> BrowseOutcome<'a> {
    if sessions.is_empty() {
        return BrowseOutcome::NoSessions;
    }
    let mut matched = query.filter.apply(sessions, ctx);
    if matched.is_empty() {
        return BrowseOutcome::NoMatches;
    }
    query.sort.apply(&mut matched);
    BrowseOutcome::Sessions(matched)
}
