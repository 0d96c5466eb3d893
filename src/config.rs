//! Runtime configuration.
//!
//! The web build talks to the daemon that served the page. The desktop build
//! reads `$SPOP_WEB_API`, then `<config dir>/spop-web/config.json`, then falls
//! back to the web plugin's default listen address.

use dioxus::logger::tracing::warn;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
const API_ENV_VAR: &str = "SPOP_WEB_API";
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_FILE: &str = "config.json";
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_SUBDIR: &str = "spop-web";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Delay before asking again for album art the player has not loaded yet.
    #[serde(default = "default_art_retry_delay_ms")]
    pub art_retry_delay_ms: u64,
    /// Log every API request at debug level. On by default in debug builds.
    #[serde(default = "default_log_requests")]
    pub log_requests: bool,
}

fn default_api_base() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_art_retry_delay_ms() -> u64 {
    50
}

fn default_log_requests() -> bool {
    cfg!(debug_assertions)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            art_retry_delay_ms: default_art_retry_delay_ms(),
            log_requests: default_log_requests(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_config() -> AppConfig {
    let mut config = dirs::config_dir()
        .map(|dir| dir.join(CONFIG_SUBDIR).join(CONFIG_FILE))
        .filter(|path| path.exists())
        .and_then(|path| match std::fs::read_to_string(&path) {
            Ok(raw) => match AppConfig::from_json(&raw) {
                Ok(config) => Some(config),
                Err(err) => {
                    warn!(path = %path.display(), "ignoring malformed config: {err}");
                    None
                }
            },
            Err(err) => {
                warn!(path = %path.display(), "could not read config: {err}");
                None
            }
        })
        .unwrap_or_default();

    if let Ok(api_base) = std::env::var(API_ENV_VAR) {
        if !api_base.trim().is_empty() {
            config.api_base = api_base.trim().to_string();
        }
    }

    config
}

#[cfg(target_arch = "wasm32")]
pub fn load_config() -> AppConfig {
    let origin = web_sys::window().and_then(|w| w.location().origin().ok());
    match origin {
        Some(origin) => AppConfig {
            api_base: origin,
            ..AppConfig::default()
        },
        None => {
            warn!("no window location; using the default API address");
            AppConfig::default()
        }
    }
}
