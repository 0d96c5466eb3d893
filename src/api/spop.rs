use crate::api::{AlbumArt, ApiError, Command, PlayerApi, PlayerStatus};
use crate::config::AppConfig;
use dioxus::logger::tracing::debug;
use once_cell::sync::Lazy;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Upper bound for the short requests. `/api/idle` is exempt since the player
/// holds it open until something changes.
#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the spop `web` plugin API.
#[derive(Debug, Clone, PartialEq)]
pub struct SpopClient {
    pub base_url: String,
    pub log_requests: bool,
}

impl SpopClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            log_requests: false,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            log_requests: config.log_requests,
            ..Self::new(config.api_base.as_str())
        }
    }

    pub fn build_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn get(&self, endpoint: &str, long_poll: bool) -> Result<reqwest::Response, ApiError> {
        let url = self.build_url(endpoint);
        let request = HTTP_CLIENT.get(&url);
        #[cfg(not(target_arch = "wasm32"))]
        let request = if long_poll {
            request
        } else {
            request.timeout(REQUEST_TIMEOUT)
        };
        #[cfg(target_arch = "wasm32")]
        let _ = long_poll;

        let response = request.send().await?;
        let status = response.status();
        if self.log_requests {
            debug!(url = %url, status = status.as_u16(), "spop api");
        }
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

impl PlayerApi for SpopClient {
    async fn status(&self) -> Result<PlayerStatus, ApiError> {
        let response = self.get("status", false).await?;
        Ok(response.json().await?)
    }

    async fn idle(&self) -> Result<PlayerStatus, ApiError> {
        let response = self.get("idle", true).await?;
        Ok(response.json().await?)
    }

    async fn image(&self) -> Result<AlbumArt, ApiError> {
        let response = self.get("image", false).await?;
        Ok(response.json().await?)
    }

    async fn command(&self, command: Command) -> Result<(), ApiError> {
        self.get(&command.path(), false).await?;
        Ok(())
    }
}
