use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Alive,
    Dead,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Alive => "Alive",
            Status::Dead => "Dead",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Alive" => Ok(Status::Alive),
            "Dead" => Ok(Status::Dead),
            "unknown" => Ok(Status::Unknown),
            other => Err(anyhow::anyhow!("Unknown character status: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct LocationRef {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: Status,
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: String,
    pub origin: LocationRef,
    pub location: LocationRef,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "episode", default)]
    pub episodes: Vec<String>,
    #[serde(default)]
    pub url: String,
    pub created: DateTime<Utc>,
}

impl Character {
    /// Numeric ids of the episodes this character appears in, in API order.
    pub fn episode_ids(&self) -> Vec<u32> {
        self.episodes
            .iter()
            .filter_map(|u| resource_id(u))
            .collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub air_date: String,
    /// Season code such as `S01E01`.
    #[serde(rename = "episode")]
    pub code: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub url: String,
}

impl Episode {
    pub fn season(&self) -> u32 {
        crate::services::seasons::season_number(&self.code)
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct PageInfo {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Listing envelope shared by every paginated endpoint.
#[derive(Deserialize, Clone, Debug)]
pub struct Page<T> {
    #[serde(default)]
    pub info: PageInfo,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub error: String,
}

/// A character placed on the timeline, with its episode ids resolved once.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineCharacter {
    pub character: Character,
    pub episode_ids: Vec<u32>,
}

impl From<Character> for TimelineCharacter {
    fn from(character: Character) -> Self {
        let episode_ids = character.episode_ids();
        Self {
            character,
            episode_ids,
        }
    }
}

impl TimelineCharacter {
    /// Builds the timeline ordered by creation time. Ties keep API order.
    pub fn chronological(characters: Vec<Character>) -> Vec<TimelineCharacter> {
        let mut timeline: Vec<TimelineCharacter> =
            characters.into_iter().map(TimelineCharacter::from).collect();
        timeline.sort_by_key(|c| c.character.created);
        timeline
    }

    pub fn appears_in(&self, episode_id: u32) -> bool {
        self.episode_ids.contains(&episode_id)
    }
}

/// Extracts the trailing numeric id from a resource URL such as
/// `https://rickandmortyapi.com/api/episode/28`.
pub fn resource_id(resource_url: &str) -> Option<u32> {
    let parsed = Url::parse(resource_url).ok()?;
    let last = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()?;
    last.parse().ok()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn character(id: u32, name: &str, status: Status, episodes: &[u32]) -> Character {
        Character {
            id,
            name: name.to_string(),
            status,
            species: "Human".to_string(),
            kind: String::new(),
            gender: "Male".to_string(),
            origin: LocationRef {
                name: "Earth (C-137)".to_string(),
                url: "https://rickandmortyapi.com/api/location/1".to_string(),
            },
            location: LocationRef {
                name: "Citadel of Ricks".to_string(),
                url: "https://rickandmortyapi.com/api/location/3".to_string(),
            },
            image: format!("https://rickandmortyapi.com/api/character/avatar/{}.jpeg", id),
            episodes: episodes
                .iter()
                .map(|e| format!("https://rickandmortyapi.com/api/episode/{}", e))
                .collect(),
            url: format!("https://rickandmortyapi.com/api/character/{}", id),
            created: DateTime::parse_from_rfc3339("2017-11-04T18:48:46.250Z")
                .map(|d| d.with_timezone(&Utc))
                .unwrap(),
        }
    }

    pub fn episode(id: u32, code: &str) -> Episode {
        Episode {
            id,
            name: format!("Episode {}", id),
            air_date: "December 2, 2013".to_string(),
            code: code.to_string(),
            characters: vec![],
            url: format!("https://rickandmortyapi.com/api/episode/{}", id),
        }
    }
}
