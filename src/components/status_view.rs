//! Now-playing page: album art, track info, transport controls.
//!
//! Everything displayed comes from the last status the player confirmed.
//! Buttons only send commands; the page changes once the next status arrives.

use crate::components::{Icon, IconKind, SpopSession};
use crate::playback::{ModelHandle, PlaybackModel};
use dioxus::prelude::*;

const CONTROL_CLASS: &str = "control";
const CONTROL_ACTIVE_CLASS: &str = "control active";
const PROGRESS_TICK_MS: u64 = 1000;

#[cfg(not(target_arch = "wasm32"))]
async fn progress_tick_delay_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[cfg(target_arch = "wasm32")]
async fn progress_tick_delay_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms.min(u32::MAX as u64) as u32).await;
}

#[component]
pub fn StatusPage() -> Element {
    let model = use_context::<Signal<PlaybackModel>>();
    let state = model.read();

    let page_title = state.page_title();
    let img_src = state.img_src();
    let player = &state.player;
    let title = player.title.clone().unwrap_or_default();
    let artist = player.artist.clone().unwrap_or_default();
    let album = player.album.clone().unwrap_or_default();
    let track_position = state.track_position();
    let stopped = state.stopped();

    rsx! {
        document::Title { "{page_title}" }
        section { id: "status", class: if stopped { "status stopped" } else { "status" },
            div { class: "cover",
                {
                    match img_src {
                        Some(src) => rsx! {
                            img { src: "{src}", alt: "{album}" }
                        },
                        None => rsx! {
                            div { class: "cover-placeholder",
                                Icon { kind: IconKind::Music, class: "icon-large".to_string() }
                            }
                        },
                    }
                }
            }
            div { class: "track",
                if stopped {
                    p { class: "track-title muted", "Not playing" }
                } else {
                    p { class: "track-title", "{title}" }
                    p { class: "track-artist", "{artist}" }
                    p { class: "track-album", "{album}" }
                }
                if let Some(position) = track_position {
                    p { class: "track-number", "Track {position}" }
                }
            }
            div { class: "controls",
                ShuffleButton {}
                PrevButton {}
                PlayPauseButton {}
                StopButton {}
                NextButton {}
                RepeatButton {}
            }
            ProgressBar {}
        }
    }
}

/// Play/pause - `play` starts a stopped player, `toggle` pauses or resumes.
#[component]
fn PlayPauseButton() -> Element {
    let session = use_context::<SpopSession>();
    let model = use_context::<Signal<PlaybackModel>>();
    let playing = model.read().playing();
    let stopped = model.read().stopped();

    rsx! {
        button {
            id: "play-pause-btn",
            r#type: "button",
            class: "control primary",
            title: if playing { "Pause" } else { "Play" },
            onclick: move |_| {
                if stopped {
                    session.play();
                } else {
                    session.toggle();
                }
            },
            if playing {
                Icon { kind: IconKind::Pause, class: "icon".to_string() }
            } else {
                Icon { kind: IconKind::Play, class: "icon".to_string() }
            }
        }
    }
}

#[component]
fn StopButton() -> Element {
    let session = use_context::<SpopSession>();
    let stopped = use_context::<Signal<PlaybackModel>>().read().stopped();

    rsx! {
        button {
            id: "stop-btn",
            r#type: "button",
            class: CONTROL_CLASS,
            title: "Stop",
            disabled: stopped,
            onclick: move |_| session.stop(),
            Icon { kind: IconKind::Stop, class: "icon".to_string() }
        }
    }
}

#[component]
fn PrevButton() -> Element {
    let session = use_context::<SpopSession>();

    rsx! {
        button {
            id: "prev-btn",
            r#type: "button",
            class: CONTROL_CLASS,
            title: "Previous",
            onclick: move |_| session.prev(),
            Icon { kind: IconKind::Prev, class: "icon".to_string() }
        }
    }
}

#[component]
fn NextButton() -> Element {
    let session = use_context::<SpopSession>();

    rsx! {
        button {
            id: "next-btn",
            r#type: "button",
            class: CONTROL_CLASS,
            title: "Next",
            onclick: move |_| session.next(),
            Icon { kind: IconKind::Next, class: "icon".to_string() }
        }
    }
}

/// Shows the player's shuffle flag; clicking asks the player to flip it.
#[component]
fn ShuffleButton() -> Element {
    let session = use_context::<SpopSession>();
    let enabled = use_context::<Signal<PlaybackModel>>().read().player.shuffle;

    rsx! {
        button {
            id: "shuffle-btn",
            r#type: "button",
            class: if enabled { CONTROL_ACTIVE_CLASS } else { CONTROL_CLASS },
            title: "Shuffle",
            aria_pressed: enabled,
            onclick: move |_| session.toggle_shuffle(),
            Icon { kind: IconKind::Shuffle, class: "icon".to_string() }
        }
    }
}

/// Same contract as the shuffle button.
#[component]
fn RepeatButton() -> Element {
    let session = use_context::<SpopSession>();
    let enabled = use_context::<Signal<PlaybackModel>>().read().player.repeat;

    rsx! {
        button {
            id: "repeat-btn",
            r#type: "button",
            class: if enabled { CONTROL_ACTIVE_CLASS } else { CONTROL_CLASS },
            title: "Repeat",
            aria_pressed: enabled,
            onclick: move |_| session.toggle_repeat(),
            Icon { kind: IconKind::Repeat, class: "icon".to_string() }
        }
    }
}

#[component]
fn ProgressBar() -> Element {
    let session = use_context::<SpopSession>();
    let model = use_context::<Signal<PlaybackModel>>();

    // The player only reports a new position on state changes, so the bar
    // counts the seconds in between itself.
    use_future(move || async move {
        loop {
            progress_tick_delay_ms(PROGRESS_TICK_MS).await;
            if model.peek_model(PlaybackModel::advancing) {
                model.update_model(|state| state.advance((PROGRESS_TICK_MS / 1000) as u32));
            }
        }
    });

    let state = model.read();

    let Some(progress_text) = state.progress_text() else {
        return rsx! {};
    };
    let percent = state.progress_percent().round() as u32;
    let duration_secs = state.player.duration.unwrap_or(0) / 1000;

    let on_seek = move |e: Event<FormData>| {
        let Ok(percent) = e.value().parse::<f64>() else {
            return;
        };
        let seconds = (percent.clamp(0.0, 100.0) / 100.0 * duration_secs as f64).floor() as u32;
        // The player rejects positions at or past the end of the track.
        session.seek(seconds.min(duration_secs.saturating_sub(1)));
    };

    rsx! {
        div { class: "progress",
            input {
                r#type: "range",
                min: "0",
                max: "100",
                value: "{percent}",
                disabled: duration_secs == 0,
                onchange: on_seek,
            }
            span { class: "progress-text", "{progress_text}" }
        }
    }
}
