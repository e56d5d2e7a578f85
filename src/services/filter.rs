use crate::core::model::{Status, TimelineCharacter};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Gender,
    Species,
    Origin,
    Status,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Gender,
        FilterField::Species,
        FilterField::Status,
        FilterField::Origin,
    ];

    /// Label of the "match everything" choice.
    pub fn any_label(&self) -> &'static str {
        match self {
            FilterField::Gender => "All Genders",
            FilterField::Species => "All Species",
            FilterField::Origin => "All Origins",
            FilterField::Status => "All Statuses",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterField::Gender => "Gender",
            FilterField::Species => "Species",
            FilterField::Origin => "Origin",
            FilterField::Status => "Status",
        };
        f.write_str(name)
    }
}

/// Equality constraints plus a set of episodes a character must all appear in.
/// `None` matches every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub gender: Option<String>,
    pub species: Option<String>,
    pub origin: Option<String>,
    pub status: Option<Status>,
    pub episodes: BTreeSet<u32>,
}

impl Filters {
    pub fn get(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Gender => self.gender.as_deref(),
            FilterField::Species => self.species.as_deref(),
            FilterField::Origin => self.origin.as_deref(),
            FilterField::Status => self.status.as_ref().map(Status::as_str),
        }
    }

    /// An empty value clears the field.
    pub fn set(&mut self, field: FilterField, value: &str) {
        let value = (!value.is_empty()).then(|| value.to_string());
        match field {
            FilterField::Gender => self.gender = value,
            FilterField::Species => self.species = value,
            FilterField::Origin => self.origin = value,
            FilterField::Status => {
                self.status = value.and_then(|v| match v.parse() {
                    Ok(status) => Some(status),
                    Err(e) => {
                        log::warn!("Ignoring status filter: {}", e);
                        None
                    }
                })
            }
        }
    }

    /// Selects `value`, or clears the field when it is already selected.
    pub fn toggle(&mut self, field: FilterField, value: &str) {
        if self.get(field) == Some(value) {
            self.set(field, "");
        } else {
            self.set(field, value);
        }
    }

    pub fn toggle_episode(&mut self, episode_id: u32) {
        if !self.episodes.remove(&episode_id) {
            self.episodes.insert(episode_id);
        }
    }

    pub fn clear_episodes(&mut self) {
        self.episodes.clear();
    }

    pub fn is_active(&self) -> bool {
        self.gender.is_some()
            || self.species.is_some()
            || self.origin.is_some()
            || self.status.is_some()
            || !self.episodes.is_empty()
    }

    pub fn matches(&self, c: &TimelineCharacter) -> bool {
        let ch = &c.character;
        self.gender.as_ref().map_or(true, |g| &ch.gender == g)
            && self.species.as_ref().map_or(true, |s| &ch.species == s)
            && self.origin.as_ref().map_or(true, |o| &ch.origin.name == o)
            && self.status.map_or(true, |s| ch.status == s)
            && self.episodes.iter().all(|id| c.appears_in(*id))
    }
}

/// Keeps every character that satisfies all active constraints, in input order.
pub fn apply(characters: &[TimelineCharacter], filters: &Filters) -> Vec<TimelineCharacter> {
    characters
        .iter()
        .filter(|c| filters.matches(c))
        .cloned()
        .collect()
}

/// Distinct values offered by the filter selects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub genders: BTreeSet<String>,
    pub species: BTreeSet<String>,
    pub origins: BTreeSet<String>,
    pub statuses: BTreeSet<Status>,
}

impl FilterOptions {
    pub fn from_characters(characters: &[TimelineCharacter]) -> Self {
        let mut options = Self::default();
        for c in characters {
            let ch = &c.character;
            options.genders.insert(ch.gender.clone());
            options.species.insert(ch.species.clone());
            options.origins.insert(ch.origin.name.clone());
            options.statuses.insert(ch.status);
        }
        options
    }

    pub fn values(&self, field: FilterField) -> Vec<String> {
        match field {
            FilterField::Gender => self.genders.iter().cloned().collect(),
            FilterField::Species => self.species.iter().cloned().collect(),
            FilterField::Origin => self.origins.iter().cloned().collect(),
            FilterField::Status => self.statuses.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::fixtures::character;

    fn roster() -> Vec<TimelineCharacter> {
        let rick = character(1, "Rick Sanchez", Status::Alive, &[1, 2, 3]);

        let mut morty = character(2, "Morty Smith", Status::Alive, &[1, 2]);
        morty.origin.name = "unknown".to_string();

        let mut summer = character(3, "Summer Smith", Status::Alive, &[2, 3]);
        summer.gender = "Female".to_string();

        let mut bird = character(4, "Birdperson", Status::Dead, &[1, 3]);
        bird.species = "Bird-Person".to_string();

        let mut jessica = character(5, "Jessica", Status::Unknown, &[]);
        jessica.gender = "Female".to_string();

        vec![rick, morty, summer, bird, jessica]
            .into_iter()
            .map(TimelineCharacter::from)
            .collect()
    }

    fn ids(characters: &[TimelineCharacter]) -> Vec<u32> {
        characters.iter().map(|c| c.character.id).collect()
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        let all = roster();
        let filters = Filters::default();

        assert!(!filters.is_active());
        assert_eq!(apply(&all, &filters), all);
    }

    #[test]
    fn test_each_dimension_alone() {
        let all = roster();

        let mut filters = Filters::default();
        filters.set(FilterField::Gender, "Female");
        assert_eq!(ids(&apply(&all, &filters)), vec![3, 5]);

        let mut filters = Filters::default();
        filters.set(FilterField::Species, "Bird-Person");
        assert_eq!(ids(&apply(&all, &filters)), vec![4]);

        let mut filters = Filters::default();
        filters.set(FilterField::Origin, "unknown");
        assert_eq!(ids(&apply(&all, &filters)), vec![2]);

        let mut filters = Filters::default();
        filters.set(FilterField::Status, "Dead");
        assert_eq!(ids(&apply(&all, &filters)), vec![4]);

        let mut filters = Filters::default();
        filters.toggle_episode(3);
        assert_eq!(ids(&apply(&all, &filters)), vec![1, 3, 4]);
    }

    #[test]
    fn test_episode_constraint_requires_every_episode() {
        let all = roster();
        let mut filters = Filters::default();
        filters.toggle_episode(1);
        filters.toggle_episode(2);

        assert_eq!(ids(&apply(&all, &filters)), vec![1, 2]);

        filters.toggle_episode(2);
        assert_eq!(filters.episodes.len(), 1);
        filters.clear_episodes();
        assert!(!filters.is_active());
    }

    #[test]
    fn test_combined_constraints() {
        let all = roster();
        let mut filters = Filters::default();
        filters.set(FilterField::Gender, "Male");
        filters.set(FilterField::Status, "Alive");
        filters.toggle_episode(3);

        let result = apply(&all, &filters);
        assert_eq!(ids(&result), vec![1]);
        assert!(result.iter().all(|c| all.contains(c)));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let all = roster();
        let mut filters = Filters::default();
        filters.set(FilterField::Species, "Human");
        filters.toggle_episode(2);

        let once = apply(&all, &filters);
        let twice = apply(&once, &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_toggle_and_clear_field() {
        let mut filters = Filters::default();
        filters.toggle(FilterField::Species, "Human");
        assert_eq!(filters.get(FilterField::Species), Some("Human"));

        filters.toggle(FilterField::Species, "Human");
        assert_eq!(filters.get(FilterField::Species), None);

        filters.set(FilterField::Status, "Alive");
        filters.set(FilterField::Status, "");
        assert_eq!(filters.status, None);

        filters.set(FilterField::Status, "Zombie");
        assert_eq!(filters.status, None);
    }

    #[test]
    fn test_options_are_distinct_and_sorted() {
        let options = FilterOptions::from_characters(&roster());

        assert_eq!(options.values(FilterField::Gender), vec!["Female", "Male"]);
        assert_eq!(options.values(FilterField::Species), vec!["Bird-Person", "Human"]);
        assert_eq!(options.values(FilterField::Origin), vec!["Earth (C-137)", "unknown"]);
        assert_eq!(options.values(FilterField::Status), vec!["Alive", "Dead", "unknown"]);
    }
}
