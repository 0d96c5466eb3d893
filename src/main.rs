use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

mod album_art;
mod api;
mod components;
mod config;
mod playback;
mod status_sync;
#[cfg(test)]
mod testing;

use components::Route;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

#[cfg(debug_assertions)]
const LOG_LEVEL: Level = Level::DEBUG;
#[cfg(not(debug_assertions))]
const LOG_LEVEL: Level = Level::INFO;

fn main() {
    if let Err(err) = dioxus::logger::init(LOG_LEVEL) {
        eprintln!("failed to initialize logging: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }
        document::Meta { name: "theme-color", content: "#1db954" }
        document::Stylesheet { href: APP_CSS }

        Router::<Route> {}
    }
}
