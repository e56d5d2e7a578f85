use crate::core::config::Config;
use crate::services::api::ApiClient;
use chrono::Datelike;
use leptos::*;

mod home;
mod search;
mod timeline;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Timeline,
    Search,
}

/// Shared by every page: configuration and the API client.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub client: ApiClient,
}

#[component]
pub fn App() -> impl IntoView {
    let config = Config::default();
    let client = match ApiClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => {
            return view! { <p class="page-status error">"Failed to start: " {format!("{:#}", e)}</p> }
                .into_view()
        }
    };
    let ctx = AppContext { config, client };
    let route = create_rw_signal(Route::Home);

    view! {
        <Navigation route=route/>
        {move || {
            let ctx = ctx.clone();
            match route.get() {
                Route::Home => view! { <home::Home route=route/> }.into_view(),
                Route::Timeline => view! { <timeline::Timeline ctx=ctx/> }.into_view(),
                Route::Search => view! { <search::Search ctx=ctx/> }.into_view(),
            }
        }}
        <Footer/>
    }
    .into_view()
}

#[component]
fn Navigation(route: RwSignal<Route>) -> impl IntoView {
    let link = move |target: Route, label: &'static str| {
        view! {
            <button
                class="nav-link"
                class:active=move || route.get() == target
                on:click=move |_| route.set(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <nav class="nav">
            <div class="nav-inner">
                <button class="nav-brand" on:click=move |_| route.set(Route::Home)>
                    "Rick and Morty Explorer"
                </button>
                <div class="nav-links">
                    {link(Route::Home, "Home")}
                    {link(Route::Timeline, "Timeline")}
                    {link(Route::Search, "Search")}
                </div>
            </div>
        </nav>
    }
}

#[component]
fn Footer() -> impl IntoView {
    let year = chrono::Utc::now().year();
    view! {
        <footer class="footer">
            <span>"Built on the public Rick and Morty API"</span>
            <span class="footer-year">{format!("© {} All rights reserved.", year)}</span>
        </footer>
    }
}
