use super::AppContext;
use crate::core::model::{Character, Episode};
use crate::services::search::SuggestionSearch;
use crate::utils::lifetime::ViewLifetime;
use leptos::*;

#[component]
pub fn Search(ctx: AppContext) -> impl IntoView {
    let lifetime = ViewLifetime::new();
    let search = SuggestionSearch::new(ctx.client.clone(), &ctx.config.search);

    let (query, set_query) = create_signal(String::new());
    let (suggestions, set_suggestions) = create_signal(Vec::<Character>::new());
    let (character, set_character) = create_signal(None::<Character>);
    let (episodes, set_episodes) = create_signal(Vec::<Episode>::new());
    let (error, set_error) = create_signal(None::<String>);
    let (show_episodes, set_show_episodes) = create_signal(false);

    {
        let lifetime = lifetime.clone();
        let client = ctx.client.clone();
        spawn_local(async move {
            let result = client.fetch_all_episodes().await;
            match lifetime.deliver(result) {
                Some(Ok(list)) => set_episodes.set(list),
                Some(Err(e)) => set_error.set(Some(e.to_string())),
                None => {}
            }
        });
    }

    on_cleanup({
        let lifetime = lifetime.clone();
        let search = search.clone();
        move || {
            lifetime.end();
            search.cancel();
        }
    });

    let on_input = {
        let search = search.clone();
        let lifetime = lifetime.clone();
        move |ev: ev::Event| {
            let value = event_target_value(&ev);
            set_query.set(value.clone());

            let search = search.clone();
            let lifetime = lifetime.clone();
            spawn_local(async move {
                if let Some(found) = search.suggest(&value).await.and_then(|s| lifetime.deliver(s)) {
                    set_suggestions.set(found);
                }
            });
        }
    };

    let select = move |chosen: Character| {
        search.cancel();
        set_query.set(chosen.name.clone());
        set_suggestions.set(Vec::new());
        set_show_episodes.set(false);
        set_character.set(Some(chosen));
    };

    view! {
        <main class="search-page">
            <h1>"Character Search"</h1>

            <div class="search-box">
                <input
                    type="text"
                    placeholder="Enter character name..."
                    prop:value=query
                    on:input=on_input
                />
                <Show when=move || suggestions.with(|s| !s.is_empty())>
                    <div class="suggestions">
                        <For
                            each=move || suggestions.get()
                            key=|c| c.id
                            children={
                                let select = select.clone();
                                move |suggestion: Character| {
                                    let select = select.clone();
                                    let chosen = suggestion.clone();
                                    view! {
                                        <div class="suggestion" on:click=move |_| select(chosen.clone())>
                                            <img class="avatar" src=suggestion.image.clone() alt=suggestion.name.clone()/>
                                            <div>
                                                <div class="suggestion-name">{suggestion.name.clone()}</div>
                                                <div class="suggestion-meta">
                                                    {format!("{} - {}", suggestion.species, suggestion.status)}
                                                </div>
                                            </div>
                                        </div>
                                    }
                                }
                            }
                        />
                    </div>
                </Show>
            </div>

            {move || error.get().map(|message| view! { <div class="error-banner">{message}</div> })}

            {move || {
                character
                    .get()
                    .map(|c| {
                        view! {
                            <CharacterDetail
                                character=c
                                episodes=episodes
                                show_episodes=show_episodes
                                set_show_episodes=set_show_episodes
                            />
                        }
                    })
            }}
        </main>
    }
}

#[component]
fn CharacterDetail(
    character: Character,
    episodes: ReadSignal<Vec<Episode>>,
    show_episodes: ReadSignal<bool>,
    set_show_episodes: WriteSignal<bool>,
) -> impl IntoView {
    let kind = if character.kind.is_empty() {
        "N/A".to_string()
    } else {
        character.kind.clone()
    };
    let rows = [
        ("Status", character.status.to_string()),
        ("Species", character.species.clone()),
        ("Gender", character.gender.clone()),
        ("Origin", character.origin.name.clone()),
        ("Location", character.location.name.clone()),
        ("Type", kind),
    ];
    let episode_urls = character.episodes.clone();
    let appearances = move || {
        episodes.with(|all| {
            all.iter()
                .filter(|e| episode_urls.contains(&e.url))
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="card detail">
            <div class="detail-portrait">
                <img src=character.image.clone() alt=character.name.clone()/>
                <h2>{character.name.clone()}</h2>
            </div>
            <table class="detail-table">
                <tbody>
                    {rows
                        .into_iter()
                        .map(|(label, value)| view! { <tr><td class="detail-label">{label}</td><td>{value}</td></tr> })
                        .collect_view()}
                    <tr>
                        <td class="detail-label">"Episodes"</td>
                        <td>
                            {character.episodes.len()}
                            <button class="primary" on:click=move |_| set_show_episodes.set(true)>
                                "View Episodes"
                            </button>
                        </td>
                    </tr>
                </tbody>
            </table>
        </div>

        <aside class="episode-panel" class:open=move || show_episodes.get()>
            <div class="episode-panel-header">
                <h2>{format!("{}'s Episodes ({})", character.name, character.episodes.len())}</h2>
                <button class="icon-button" on:click=move |_| set_show_episodes.set(false)>"✕"</button>
            </div>
            <div class="episode-panel-body">
                {move || {
                    appearances()
                        .into_iter()
                        .map(|episode| {
                            view! {
                                <div class="episode-card">
                                    <h3>{episode.name}</h3>
                                    <p>{episode.code}</p>
                                    <p>{format!("Air date: {}", episode.air_date)}</p>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </aside>
    }
}
