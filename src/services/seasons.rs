use crate::core::model::Episode;
use crate::services::filter::Filters;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Bucket for episodes whose code carries no `S<n>E` marker.
pub const UNKNOWN_SEASON: u32 = 0;

static SEASON_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"S(\d+)E").expect("valid regex"));

/// Season number from the first `S<digits>E` in an episode code.
pub fn season_number(code: &str) -> u32 {
    SEASON_RE
        .captures(code)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(UNKNOWN_SEASON)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonGroup {
    pub season: u32,
    pub episodes: Vec<Episode>,
}

impl SeasonGroup {
    pub fn label(&self) -> String {
        if self.season == UNKNOWN_SEASON {
            "Unknown season".to_string()
        } else {
            format!("Season {}", self.season)
        }
    }

    pub fn selected_count(&self, filters: &Filters) -> usize {
        self.episodes
            .iter()
            .filter(|e| filters.episodes.contains(&e.id))
            .count()
    }
}

/// Groups episodes by season, ascending. Within a season the input order is kept.
pub fn group_by_season(episodes: &[Episode]) -> Vec<SeasonGroup> {
    let mut seasons: BTreeMap<u32, Vec<Episode>> = BTreeMap::new();
    for episode in episodes {
        seasons
            .entry(episode.season())
            .or_default()
            .push(episode.clone());
    }

    seasons
        .into_iter()
        .map(|(season, episodes)| SeasonGroup { season, episodes })
        .collect()
}
