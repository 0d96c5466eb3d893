pub mod models;
pub mod spop;

pub use models::*;
pub use spop::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered with HTTP {0}")]
    Status(u16),
}

/// The player control surface the UI talks to.
///
/// `SpopClient` is the HTTP implementation; tests drive the sync loop with
/// scripted implementations instead.
#[allow(async_fn_in_trait)]
pub trait PlayerApi {
    async fn status(&self) -> Result<PlayerStatus, ApiError>;

    /// Long-poll: resolves once the player state changes.
    async fn idle(&self) -> Result<PlayerStatus, ApiError>;

    async fn image(&self) -> Result<AlbumArt, ApiError>;

    async fn command(&self, command: Command) -> Result<(), ApiError>;
}
