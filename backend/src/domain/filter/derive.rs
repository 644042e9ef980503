//! Display fields derived from a session list.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::sessions::SurfSession;

/// Number of sessions logged at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCount {
    pub location: String,
    pub sessions: usize,
}

/// Locations ranked by session count, most popular first.
///
/// Locations are grouped ignoring case and labelled with their first-seen
/// spelling. Ties keep first-seen order. Blank locations are ignored.
pub fn top_locations<'a>(
    sessions: impl IntoIterator<Item = &'a SurfSession>,
    limit: usize,
) -> Vec<LocationCount> {
    let mut counts: Vec<LocationCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for session in sessions {
        let location = session.location.trim();
        if location.is_empty() {
            continue;
        }
        let key = location.to_lowercase();
        match index.get(&key) {
            Some(&slot) => {
                if let Some(entry) = counts.get_mut(slot) {
                    entry.sessions += 1;
                }
            }
            None => {
                index.insert(key, counts.len());
                counts.push(LocationCount {
                    location: location.to_owned(),
                    sessions: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.sessions.cmp(&a.sessions));
    counts.truncate(limit);
    counts
}

/// Distinct surfer names in first-seen order, for the surfer filter.
pub fn surfer_names<'a>(sessions: impl IntoIterator<Item = &'a SurfSession>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in sessions.into_iter().filter_map(SurfSession::surfer_name) {
        let name = name.trim();
        if !name.is_empty() && !names.iter().any(|seen| seen == name) {
            names.push(name.to_owned());
        }
    }
    names
}
