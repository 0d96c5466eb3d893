use crate::api::SpopClient;
use crate::components::Route;
use crate::config::load_config;
use crate::playback::PlaybackModel;
use crate::status_sync::{DioxusSpawner, StatusClient};
use dioxus::logger::tracing::info;
use dioxus::prelude::*;

/// The status client as wired for the running app.
pub type SpopSession = StatusClient<SpopClient, Signal<PlaybackModel>, DioxusSpawner>;

/// Owns the playback model and the status client for the page's lifetime.
/// Both are created once, on first render, and reach the views via context.
#[component]
pub fn AppShell() -> Element {
    let model = use_signal(PlaybackModel::default);

    let session = use_hook(|| {
        let config = load_config();
        let session = SpopSession::new(
            SpopClient::from_config(&config),
            model,
            DioxusSpawner,
            &config,
        );
        info!(api = %session.api().base_url, "connecting to spop");
        session.start_polling();
        session
    });

    use_context_provider(|| session.clone());
    use_context_provider(|| *session.model());

    {
        let poll = session.poll_handle();
        use_drop(move || poll.cancel());
    }

    rsx! {
        main { class: "app-shell", Outlet::<Route> {} }
    }
}
