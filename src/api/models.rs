use serde::{Deserialize, Serialize};

/// Transport state reported by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
    #[default]
    Stopped,
    #[serde(other)]
    Unknown,
}

/// Document returned by `/api/status` and `/api/idle`.
///
/// The player omits every track field while stopped, so all of them are
/// optional and default to `None` when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlayerStatus {
    #[serde(default)]
    pub status: PlaybackState,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub current_track: Option<u32>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Track length in milliseconds.
    #[serde(default)]
    pub duration: Option<u32>,
    /// Play position in seconds.
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ArtLoadStatus {
    Loaded,
    #[default]
    NotLoaded,
}

/// Document returned by `/api/image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AlbumArt {
    #[serde(default)]
    pub status: ArtLoadStatus,
    /// Base64 encoded JPEG.
    #[serde(default)]
    pub data: Option<String>,
}

impl AlbumArt {
    pub fn is_loaded(&self) -> bool {
        self.status == ArtLoadStatus::Loaded
    }
}

/// Fire-and-forget commands understood by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Toggle,
    Stop,
    Prev,
    Next,
    Shuffle,
    Repeat,
    Seek(u32),
}

impl Command {
    /// Path below the API root, without the leading `/api/`.
    pub fn path(&self) -> String {
        match self {
            Self::Play => "play".to_string(),
            Self::Toggle => "toggle".to_string(),
            Self::Stop => "stop".to_string(),
            Self::Prev => "prev".to_string(),
            Self::Next => "next".to_string(),
            Self::Shuffle => "shuffle".to_string(),
            Self::Repeat => "repeat".to_string(),
            Self::Seek(seconds) => format!("seek/{seconds}"),
        }
    }
}

pub fn format_duration(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}
