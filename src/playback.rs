//! Client-side view of the player: the last status the server confirmed plus
//! the album art that goes with it.

use crate::api::models::format_duration;
use crate::api::{AlbumArt, ArtLoadStatus, PlaybackState, PlayerStatus};
use base64::{engine::general_purpose, Engine as _};
use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";
pub const PAGE_TITLE_SUFFIX: &str = "Spop";
const PLAYING_MARKER: &str = "▶ ";

/// What the caller has to do about album art after a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtChange {
    Unchanged,
    /// The track changed: fetch art for this generation.
    Fetch(u64),
    /// Nothing is loaded anymore; the art was dropped.
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackModel {
    pub player: PlayerStatus,
    /// Base64 JPEG payload currently on display.
    pub img: Option<String>,
    /// Last art document received for the current generation.
    pub art: Option<AlbumArt>,
    /// Bumped on every `uri` change. Art responses for older generations are
    /// dropped.
    pub art_generation: u64,
    /// Number of status documents applied so far.
    pub revision: u64,
    /// Seconds played since the last status document, counted locally.
    pub elapsed: u32,
}

impl PlaybackModel {
    pub fn apply_status(&mut self, next: PlayerStatus) -> ArtChange {
        let uri_changed = self.player.uri != next.uri;
        let has_track = next.uri.is_some();
        self.player = next;
        self.revision = self.revision.saturating_add(1);
        self.elapsed = 0;

        if !uri_changed {
            return ArtChange::Unchanged;
        }

        self.art_generation = self.art_generation.saturating_add(1);
        self.art = None;
        if has_track {
            ArtChange::Fetch(self.art_generation)
        } else {
            self.img = None;
            ArtChange::Cleared
        }
    }

    /// Stores an art response. Returns `false` when `generation` has been
    /// superseded, in which case nothing changes.
    pub fn apply_art(&mut self, generation: u64, art: AlbumArt) -> bool {
        if generation != self.art_generation {
            return false;
        }

        let data = art
            .data
            .as_deref()
            .filter(|data| is_valid_payload(generation, data));
        match art.status {
            // A loaded answer is final for this track, with or without art.
            ArtLoadStatus::Loaded => self.img = data.map(str::to_string),
            ArtLoadStatus::NotLoaded => {
                if let Some(data) = data {
                    if self.img.as_deref() != Some(data) {
                        self.img = Some(data.to_string());
                    }
                }
            }
        }
        self.art = Some(art);
        true
    }

    pub fn is_current_generation(&self, generation: u64) -> bool {
        self.art_generation == generation
    }

    pub fn img_src(&self) -> Option<String> {
        self.img
            .as_ref()
            .map(|img| format!("{IMAGE_DATA_URI_PREFIX}{img}"))
    }

    pub fn playing(&self) -> bool {
        self.player.status == PlaybackState::Playing
    }

    pub fn stopped(&self) -> bool {
        self.player.status == PlaybackState::Stopped
    }

    pub fn page_title(&self) -> String {
        let mut page_title = String::new();
        if self.playing() {
            page_title.push_str(PLAYING_MARKER);
        }
        if let (Some(title), Some(artist)) = (
            non_empty(self.player.title.as_deref()),
            non_empty(self.player.artist.as_deref()),
        ) {
            page_title.push_str(&format!("{title} ({artist}) - "));
        }
        page_title.push_str(PAGE_TITLE_SUFFIX);
        page_title
    }

    /// `"3/12"` while a track is loaded.
    pub fn track_position(&self) -> Option<String> {
        let current = self.player.current_track?;
        Some(format!("{}/{}", current, self.player.total_tracks))
    }

    /// Play position in seconds: the last reported position plus the time
    /// counted locally since, capped at the track length.
    pub fn position_secs(&self) -> Option<u32> {
        let duration_secs = self.player.duration? / 1000;
        Some(
            self.player
                .position
                .unwrap_or(0)
                .saturating_add(self.elapsed)
                .min(duration_secs),
        )
    }

    /// Whether the displayed position should still move on its own.
    pub fn advancing(&self) -> bool {
        let Some(duration_secs) = self.player.duration.map(|d| d / 1000) else {
            return false;
        };
        self.playing() && self.position_secs().unwrap_or(0) < duration_secs
    }

    /// Counts `secs` of playback since the last status. Returns whether the
    /// position moved.
    pub fn advance(&mut self, secs: u32) -> bool {
        if !self.advancing() {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(secs);
        true
    }

    /// `"0:17 / 7:09"` while a track is loaded.
    pub fn progress_text(&self) -> Option<String> {
        let duration_secs = self.player.duration? / 1000;
        let position = self.position_secs()?;
        Some(format!(
            "{} / {}",
            format_duration(position),
            format_duration(duration_secs)
        ))
    }

    pub fn progress_percent(&self) -> f64 {
        let Some(duration_ms) = self.player.duration.filter(|d| *d > 0) else {
            return 0.0;
        };
        let position_ms = self.position_secs().unwrap_or(0) as f64 * 1000.0;
        (position_ms / duration_ms as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// Shared access to the model from async tasks.
pub trait ModelHandle: Clone + 'static {
    fn peek_model<R>(&self, f: impl FnOnce(&PlaybackModel) -> R) -> R;
    fn update_model<R>(&self, f: impl FnOnce(&mut PlaybackModel) -> R) -> R;
}

impl ModelHandle for Signal<PlaybackModel> {
    // Background tasks must not subscribe to the signal.
    fn peek_model<R>(&self, f: impl FnOnce(&PlaybackModel) -> R) -> R {
        self.with_peek(f)
    }

    fn update_model<R>(&self, f: impl FnOnce(&mut PlaybackModel) -> R) -> R {
        let mut signal = *self;
        signal.with_mut(f)
    }
}

fn is_valid_payload(generation: u64, data: &str) -> bool {
    let valid = general_purpose::STANDARD.decode(data).is_ok();
    if !valid {
        warn!(generation, "album art payload is not valid base64");
    }
    valid
}

// Empty strings count as missing.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
