use crate::core::config::Config;
use crate::core::model::{Character, Episode, TimelineCharacter};
use crate::services::api::{ApiClient, Resource};
use crate::services::filter::{apply, FilterField, FilterOptions, Filters};
use crate::services::search::SuggestionSearch;
use crate::services::seasons::group_by_season;
use crate::services::timeline::episodes_of;
use anyhow::Result;
use futures_util::future::try_join;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use inquire::{MultiSelect, Select, Text};

const MENU_TIMELINE: &str = "Character timeline";
const MENU_SEARCH: &str = "Character search";
const MENU_QUIT: &str = "Quit";

pub async fn run(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.api)?;

    loop {
        let choice = Select::new(
            "What would you like to explore?",
            vec![MENU_TIMELINE, MENU_SEARCH, MENU_QUIT],
        )
        .prompt()?;

        match choice {
            MENU_TIMELINE => run_timeline(&client).await?,
            MENU_SEARCH => run_search(&client, config).await?,
            _ => break,
        }
    }
    Ok(())
}

fn page_bar(multi: &MultiProgress, label: &'static str) -> Result<ProgressBar> {
    let pb = multi.add(ProgressBar::new(1));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:<10} [{bar:30.cyan/blue}] page {pos}/{len}")?
            .progress_chars("#>-"),
    );
    pb.set_message(label);
    Ok(pb)
}

/// Loads the full character and episode rosters side by side.
async fn load_rosters(client: &ApiClient) -> Result<(Vec<Character>, Vec<Episode>)> {
    let multi = MultiProgress::new();
    let character_bar = page_bar(&multi, "characters")?;
    let episode_bar = page_bar(&multi, "episodes")?;

    let track = |pb: ProgressBar| {
        move |page: u32, total: u32| {
            pb.set_length(total.max(1) as u64);
            pb.set_position(page as u64);
        }
    };

    let result = try_join(
        client.fetch_all_pages(Resource::Character, track(character_bar.clone())),
        client.fetch_all_pages(Resource::Episode, track(episode_bar.clone())),
    )
    .await;

    character_bar.finish_and_clear();
    episode_bar.finish_and_clear();
    result
}

async fn run_timeline(client: &ApiClient) -> Result<()> {
    println!("Loading character timeline...");
    let (characters, episodes) = match load_rosters(client).await {
        Ok(rosters) => rosters,
        Err(e) => {
            eprintln!("{:#}", e);
            return Ok(());
        }
    };

    let timeline = TimelineCharacter::chronological(characters);
    let options = FilterOptions::from_characters(&timeline);
    let mut filters = Filters::default();

    loop {
        let shown = apply(&timeline, &filters);
        println!(
            "\nShowing {} of {} characters{}",
            shown.len(),
            timeline.len(),
            describe_filters(&filters)
        );

        let mut actions = vec!["List characters".to_string(), "Character details".to_string()];
        actions.extend(FilterField::ALL.iter().map(|f| format!("Filter by {}", f.to_string().to_lowercase())));
        actions.push("Filter by episodes".to_string());
        actions.push("Clear filters".to_string());
        actions.push("Back".to_string());

        let action = Select::new("Timeline:", actions).prompt()?;
        match action.as_str() {
            "List characters" => print_timeline(&shown),
            "Character details" => {
                if shown.is_empty() {
                    println!("No characters match the current filters.");
                    continue;
                }
                let labels: Vec<String> = shown.iter().map(timeline_label).collect();
                let picked = Select::new("Character:", labels).raw_prompt()?;
                print_character(&shown[picked.index].character, &episodes);
            }
            "Filter by episodes" => choose_episodes(&mut filters, &episodes)?,
            "Clear filters" => filters = Filters::default(),
            "Back" => return Ok(()),
            other => {
                if let Some(field) = FilterField::ALL
                    .into_iter()
                    .find(|f| other == format!("Filter by {}", f.to_string().to_lowercase()))
                {
                    choose_value(&mut filters, &options, field)?;
                }
            }
        }
    }
}

fn choose_value(filters: &mut Filters, options: &FilterOptions, field: FilterField) -> Result<()> {
    let mut choices = vec![field.any_label().to_string()];
    choices.extend(options.values(field));

    let start = filters
        .get(field)
        .and_then(|current| choices.iter().position(|c| c == current))
        .unwrap_or(0);

    let picked = Select::new(&format!("{}:", field), choices)
        .with_starting_cursor(start)
        .raw_prompt()?;

    let value = if picked.index == 0 { "" } else { picked.value.as_str() };
    filters.set(field, value);
    Ok(())
}

fn choose_episodes(filters: &mut Filters, episodes: &[Episode]) -> Result<()> {
    let mut ids = Vec::new();
    let mut labels = Vec::new();
    for group in group_by_season(episodes) {
        let label = group.label();
        for episode in &group.episodes {
            ids.push(episode.id);
            labels.push(format!("[{}] {} - {}", label, episode.code, episode.name));
        }
    }

    let defaults: Vec<usize> = ids
        .iter()
        .enumerate()
        .filter(|(_, id)| filters.episodes.contains(*id))
        .map(|(i, _)| i)
        .collect();

    let picked = MultiSelect::new("Characters must appear in every selected episode:", labels)
        .with_default(&defaults)
        .raw_prompt()?;

    filters.clear_episodes();
    for option in picked {
        filters.toggle_episode(ids[option.index]);
    }
    Ok(())
}

fn describe_filters(filters: &Filters) -> String {
    if !filters.is_active() {
        return String::new();
    }
    let mut parts: Vec<String> = FilterField::ALL
        .iter()
        .filter_map(|f| filters.get(*f).map(|v| format!("{}={}", f, v)))
        .collect();
    if !filters.episodes.is_empty() {
        parts.push(format!("{} episode(s)", filters.episodes.len()));
    }
    format!(" ({})", parts.join(", "))
}

fn timeline_label(c: &TimelineCharacter) -> String {
    format!(
        "{} {} ({})",
        c.character.created.format("%Y-%m-%d"),
        c.character.name,
        c.character.status
    )
}

fn print_timeline(characters: &[TimelineCharacter]) {
    for c in characters {
        let ch = &c.character;
        println!(
            "{}  {:<32} {:<8} {:<12} {:<8} from {} ({} episodes)",
            ch.created.format("%Y-%m-%d"),
            ch.name,
            ch.status,
            ch.species,
            ch.gender,
            ch.origin.name,
            c.episode_ids.len()
        );
    }
}

fn print_character(character: &Character, episodes: &[Episode]) {
    let kind = if character.kind.is_empty() { "N/A" } else { character.kind.as_str() };
    println!("\n{}", character.name);
    println!("  Status    {}", character.status);
    println!("  Species   {}", character.species);
    println!("  Gender    {}", character.gender);
    println!("  Origin    {}", character.origin.name);
    println!("  Location  {}", character.location.name);
    println!("  Type      {}", kind);
    println!("  Created   {}", character.created.format("%Y-%m-%d"));
    println!("  Episodes  {}", character.episodes.len());

    let timeline_entry = TimelineCharacter::from(character.clone());
    for episode in episodes_of(&timeline_entry, episodes) {
        println!("    {} - {} (aired {})", episode.code, episode.name, episode.air_date);
    }
}

async fn run_search(client: &ApiClient, config: &Config) -> Result<()> {
    let search = SuggestionSearch::new(client.clone(), &config.search);
    let mut episodes: Option<Vec<Episode>> = None;

    loop {
        let query = Text::new("Character name (empty to go back):").prompt()?;
        if query.trim().is_empty() {
            return Ok(());
        }

        let suggestions = search.suggest(&query).await.unwrap_or_default();
        if suggestions.is_empty() {
            println!("No characters found for {:?}.", query);
            continue;
        }

        let labels: Vec<String> = suggestions
            .iter()
            .map(|c| format!("{} - {} - {}", c.name, c.species, c.status))
            .collect();
        let picked = Select::new("Select a character:", labels).raw_prompt()?;

        if episodes.is_none() {
            match client.fetch_all_episodes().await {
                Ok(list) => episodes = Some(list),
                Err(e) => eprintln!("{:#}", e),
            }
        }
        print_character(
            &suggestions[picked.index],
            episodes.as_deref().unwrap_or_default(),
        );
    }
}
