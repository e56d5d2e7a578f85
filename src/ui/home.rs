use super::Route;
use leptos::*;

const AVATAR_BASE: &str = "https://rickandmortyapi.com/api/character/avatar";

#[component]
pub fn Home(route: RwSignal<Route>) -> impl IntoView {
    let avatars = [(1, "Rick Sanchez"), (2, "Morty Smith"), (3, "Summer Smith")];

    view! {
        <main class="home">
            <section class="card intro">
                <h1>"Rick and Morty Explorer"</h1>
                <p>
                    "Browse every character of the show in the order they were added to the API, "
                    "narrow them down by gender, species, origin, status and episodes, "
                    "or look a character up by name."
                </p>
            </section>

            <div class="home-cards">
                <button class="card nav-card" on:click=move |_| route.set(Route::Timeline)>
                    <h2>"Character Timeline"</h2>
                    <p>"Explore characters in chronological order with an interactive timeline view"</p>
                    <div class="avatar-strip">
                        {avatars
                            .into_iter()
                            .map(|(id, name)| {
                                view! {
                                    <img class="avatar" src=format!("{}/{}.jpeg", AVATAR_BASE, id) alt=name/>
                                }
                            })
                            .collect_view()}
                    </div>
                </button>
                <button class="card nav-card" on:click=move |_| route.set(Route::Search)>
                    <h2>"Character Search"</h2>
                    <p>"Search characters by name and see their details and episodes"</p>
                </button>
            </div>
        </main>
    }
}
