use super::AppContext;
use crate::core::model::{Episode, Status, TimelineCharacter};
use crate::services::filter::{apply, FilterField, FilterOptions, Filters};
use crate::services::seasons::{group_by_season, SeasonGroup};
use crate::services::timeline::{episodes_of, TimelineScroller, TimelineSelection};
use crate::utils::lifetime::ViewLifetime;
use crate::utils::time::now_ms;
use leptos::html::Div;
use leptos::*;

type CoastHandle = StoredValue<Option<AnimationFrameRequestHandle>>;

#[component]
pub fn Timeline(ctx: AppContext) -> impl IntoView {
    let lifetime = ViewLifetime::new();

    let (characters, set_characters) = create_signal(Vec::<TimelineCharacter>::new());
    let (episodes, set_episodes) = create_signal(Vec::<Episode>::new());
    let (loading, set_loading) = create_signal(true);
    let (error, set_error) = create_signal(None::<String>);
    let (sidebar_open, set_sidebar_open) = create_signal(false);
    let (grabbing, set_grabbing) = create_signal(false);
    let filters = create_rw_signal(Filters::default());
    let selection = create_rw_signal(TimelineSelection::default());

    let options = create_memo(move |_| characters.with(|all| FilterOptions::from_characters(all)));
    let filtered = create_memo(move |_| filters.with(|f| characters.with(|all| apply(all, f))));
    let seasons = create_memo(move |_| episodes.with(|all| group_by_season(all)));

    let scroller = store_value(TimelineScroller::new(ctx.config.timeline.clone()));
    let coast: CoastHandle = store_value(None);
    let surface = create_node_ref::<Div>();

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
    {
        let lifetime = lifetime.clone();
        let client = ctx.client.clone();
        spawn_local(async move {
            let result = client.fetch_all_characters().await;
            let Some(result) = lifetime.deliver(result) else {
                return;
            };
            match result {
                Ok(list) => set_characters.set(TimelineCharacter::chronological(list)),
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    }

    on_cleanup({
        let lifetime = lifetime.clone();
        move || {
            stop_coast(coast);
            scroller.try_update_value(|s| s.cancel());
            lifetime.end();
        }
    });

    let on_mouse_down = move |ev: ev::MouseEvent| {
        let Some(el) = surface.get_untracked() else {
            return;
        };
        stop_coast(coast);
        let started = scroller
            .try_update_value(|s| {
                s.press(ev.button(), ev.client_x() as f64, el.scroll_left() as f64, now_ms())
            })
            .unwrap_or(false);
        set_grabbing.set(started);
    };

    let on_mouse_move = move |ev: ev::MouseEvent| {
        if !scroller.with_value(|s| s.is_dragging()) {
            return;
        }
        ev.prevent_default();
        let Some(el) = surface.get_untracked() else {
            return;
        };
        let offset = scroller
            .try_update_value(|s| s.pointer_move(ev.client_x() as f64, now_ms()))
            .flatten();
        if let Some(offset) = offset {
            el.set_scroll_left(offset.round() as i32);
        }
    };

    let on_mouse_up = move |_: ev::MouseEvent| {
        let coasting = scroller
            .try_update_value(|s| s.release(now_ms()))
            .unwrap_or(false);
        set_grabbing.set(false);
        if coasting {
            schedule_coast(scroller, coast, surface);
        }
    };

    let on_mouse_leave = move |_: ev::MouseEvent| {
        scroller.update_value(|s| s.leave());
        set_grabbing.set(false);
    };

    let on_wheel = move |ev: ev::WheelEvent| {
        ev.prevent_default();
        let Some(el) = surface.get_untracked() else {
            return;
        };
        let offset = scroller.with_value(|s| s.wheel_offset(ev.delta_y()));
        el.set_scroll_left(el.scroll_left() + offset.round() as i32);
    };

    let on_select = Callback::new(move |(id, client_x): (u32, f64)| {
        let Some(current) = scroller.try_get_value() else {
            return;
        };
        selection.update(|s| {
            s.click(&current, id, client_x);
        });
    });

    move || {
        if loading.get() {
            return view! { <div class="page-status">"Loading character timeline..."</div> }.into_view();
        }
        if let Some(message) = error.get() {
            return view! { <div class="page-status error">{message}</div> }.into_view();
        }

        view! {
            <div class="timeline-page">
                <div class="timeline-bar">
                    <button class="icon-button" aria-label="Open filters" on:click=move |_| set_sidebar_open.set(true)>
                        "☰"
                    </button>
                    <span class="timeline-count">
                        {move || {
                            format!(
                                "Showing {} of {} characters",
                                filtered.with(Vec::len),
                                characters.with(Vec::len),
                            )
                        }}
                    </span>
                </div>

                <FilterSidebar
                    open=sidebar_open
                    on_close=Callback::new(move |_| set_sidebar_open.set(false))
                    options=options
                    filters=filters
                    seasons=seasons
                />

                <div
                    class="timeline-scroll"
                    class:grabbing=move || grabbing.get()
                    node_ref=surface
                    on:mousedown=on_mouse_down
                    on:mousemove=on_mouse_move
                    on:mouseup=on_mouse_up
                    on:mouseleave=on_mouse_leave
                    on:wheel=on_wheel
                >
                    <div class="timeline-content">
                        <div class="timeline-axis"></div>
                        <div class="timeline-track">
                            <For
                                each=move || filtered.get().into_iter().enumerate()
                                key=|(index, c)| (c.character.id, *index)
                                children=move |(index, entry)| {
                                    view! {
                                        <CharacterItem
                                            entry=entry
                                            index=index
                                            selection=selection
                                            filters=filters
                                            episodes=episodes
                                            on_select=on_select
                                        />
                                    }
                                }
                            />
                        </div>
                    </div>
                </div>
            </div>
        }
        .into_view()
    }
}

fn stop_coast(coast: CoastHandle) {
    if let Some(Some(handle)) = coast.try_get_value() {
        handle.cancel();
    }
    coast.try_set_value(None);
}

/// Requests the next momentum frame and keeps the handle so the coast can be
/// cancelled by a new press or by unmounting.
fn schedule_coast(scroller: StoredValue<TimelineScroller>, coast: CoastHandle, surface: NodeRef<Div>) {
    let next = request_animation_frame_with_handle(move || {
        let Some(el) = surface.get_untracked() else {
            coast.try_set_value(None);
            return;
        };
        match scroller.try_update_value(|s| s.frame(now_ms())).flatten() {
            Some(offset) => {
                el.set_scroll_left(el.scroll_left() + offset.round() as i32);
                schedule_coast(scroller, coast, surface);
            }
            None => {
                coast.try_set_value(None);
            }
        }
    });

    match next {
        Ok(handle) => {
            coast.try_set_value(Some(handle));
        }
        Err(e) => log::warn!("Could not schedule momentum frame: {:?}", e),
    }
}

#[component]
fn FilterSidebar(
    open: ReadSignal<bool>,
    on_close: Callback<()>,
    options: Memo<FilterOptions>,
    filters: RwSignal<Filters>,
    seasons: Memo<Vec<SeasonGroup>>,
) -> impl IntoView {
    let select_for = move |field: FilterField| {
        view! {
            <div class="filter-field">
                <label>{field.to_string()}</label>
                <select
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        filters.update(|f| f.set(field, &value));
                    }
                    prop:value=move || filters.with(|f| f.get(field).unwrap_or_default().to_string())
                >
                    <option value="">{field.any_label()}</option>
                    {move || {
                        options
                            .with(|o| o.values(field))
                            .into_iter()
                            .map(|v| view! { <option value=v.clone()>{v}</option> })
                            .collect_view()
                    }}
                </select>
            </div>
        }
    };

    view! {
        <aside class="filter-sidebar" class:open=move || open.get()>
            <div class="filter-header">
                <h2>"Filters"</h2>
                <button class="icon-button" on:click=move |_| on_close.call(())>"✕"</button>
            </div>
            <div class="filter-body">
                {FilterField::ALL.into_iter().map(select_for).collect_view()}

                <div class="episodes-header">
                    <label>"Episodes"</label>
                    <Show when=move || filters.with(|f| !f.episodes.is_empty())>
                        <button class="link" on:click=move |_| filters.update(|f| f.clear_episodes())>
                            "Clear all"
                        </button>
                    </Show>
                </div>
                <div class="season-list">
                    <For
                        each=move || seasons.get()
                        key=|group| group.season
                        children=move |group| view! { <SeasonAccordion group=group filters=filters/> }
                    />
                </div>
            </div>
        </aside>
    }
}

#[component]
fn SeasonAccordion(group: SeasonGroup, filters: RwSignal<Filters>) -> impl IntoView {
    let (open, set_open) = create_signal(false);
    let label = group.label();
    let counted = group.clone();
    let selected = create_memo(move |_| filters.with(|f| counted.selected_count(f)));

    view! {
        <div class="season">
            <button class="season-header" on:click=move |_| set_open.update(|o| *o = !*o)>
                <span>{label}</span>
                <Show when=move || { selected.get() > 0 }>
                    <span class="badge">{move || format!("{} selected", selected.get())}</span>
                </Show>
            </button>
            <div class="season-episodes" class:open=move || open.get()>
                {group
                    .episodes
                    .into_iter()
                    .map(|episode| {
                        let id = episode.id;
                        view! {
                            <div class="episode-row" on:click=move |_| filters.update(|f| f.toggle_episode(id))>
                                <input type="checkbox" prop:checked=move || filters.with(|f| f.episodes.contains(&id))/>
                                <label>{format!("{} - {}", episode.code, episode.name)}</label>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
fn CharacterItem(
    entry: TimelineCharacter,
    index: usize,
    selection: RwSignal<TimelineSelection>,
    filters: RwSignal<Filters>,
    episodes: ReadSignal<Vec<Episode>>,
    on_select: Callback<(u32, f64)>,
) -> impl IntoView {
    let ch = entry.character.clone();
    let id = ch.id;
    let above = index % 2 == 0;
    let is_selected = move || selection.with(|s| s.is_selected(id));
    let shows_episodes = move || selection.with(|s| s.shows_episodes(id));
    let status_class = match ch.status {
        Status::Alive => "thumb alive",
        Status::Dead => "thumb dead",
        Status::Unknown => "thumb unknown",
    };
    let episode_count = entry.episode_ids.len();
    let appearances = move || {
        episodes.with(|all| {
            episodes_of(&entry, all)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let attribute = move |label: &'static str, value: String, field: FilterField| {
        view! { <FilterableValue label=label value=value field=field filters=filters/> }
    };

    view! {
        <div class="timeline-item" class:above=above class:below=!above>
            <div
                class="character-card"
                class:selected=is_selected
                on:click=move |ev: ev::MouseEvent| on_select.call((id, ev.client_x() as f64))
            >
                <div class="info-box">
                    <div class="info-name">{ch.name.clone()}</div>
                    <div class="info-details">
                        <img class="portrait" src=ch.image.clone() alt=ch.name.clone()/>
                        <div class="info-values">
                            <p>{format!("Created: {}", ch.created.format("%Y-%m-%d"))}</p>
                            {attribute("Status", ch.status.to_string(), FilterField::Status)}
                            {attribute("Species", ch.species.clone(), FilterField::Species)}
                            {attribute("Gender", ch.gender.clone(), FilterField::Gender)}
                            {attribute("Origin", ch.origin.name.clone(), FilterField::Origin)}
                            <p>{format!("Location: {}", ch.location.name)}</p>
                            <div class="info-episodes">
                                <p>{format!("Episodes: {}", episode_count)}</p>
                                <button
                                    class="primary"
                                    on:click=move |ev: ev::MouseEvent| {
                                        ev.stop_propagation();
                                        selection.update(|s| s.toggle_episodes(id));
                                    }
                                >
                                    {move || if shows_episodes() { "Hide Episodes" } else { "View Episodes" }}
                                </button>
                            </div>
                        </div>
                    </div>
                </div>

                <div class="episodes-box" class:open=shows_episodes>
                    {move || {
                        let list = appearances();
                        view! {
                            <h3>{format!("Episodes ({})", list.len())}</h3>
                            {list
                                .into_iter()
                                .map(|episode| {
                                    view! {
                                        <div class="episode-card">
                                            <h4>{episode.name}</h4>
                                            <p>{episode.code}</p>
                                            <p>{format!("Air date: {}", episode.air_date)}</p>
                                        </div>
                                    }
                                })
                                .collect_view()}
                        }
                    }}
                </div>

                <div class=status_class>
                    <img src=ch.image.clone() alt=ch.name.clone()/>
                </div>
            </div>
        </div>
    }
}

#[component]
fn FilterableValue(
    label: &'static str,
    value: String,
    field: FilterField,
    filters: RwSignal<Filters>,
) -> impl IntoView {
    let current = value.clone();
    let is_active = move || filters.with(|f| f.get(field) == Some(current.as_str()));
    let toggled = value.clone();

    view! {
        <div class="filterable">
            <span class="filterable-label">{label} ":"</span>
            <button
                class:active=is_active
                on:click=move |ev: ev::MouseEvent| {
                    ev.stop_propagation();
                    filters.update(|f| f.toggle(field, &toggled));
                }
            >
                {value}
            </button>
        </div>
    }
}
