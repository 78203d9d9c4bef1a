//! Configuration management for the dashboard login companion.
//!
//! Values come from environment variables and an optional `.env` file in the
//! local data directory. Variables already present in the environment win over
//! the file, and most settings fall back to a default when unset.

use std::{env, path::PathBuf, time::Duration};

use crate::utils;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_GRACE_MS: u64 = 500;
pub const DEFAULT_REDIRECT_MS: u64 = 1500;
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 120;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `spotdash` data directory when it doesn't exist yet. A missing
/// `.env` file is not an error, the process environment alone is enough.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotdash/.env`
/// - macOS: `~/Library/Application Support/spotdash/.env`
/// - Windows: `%LOCALAPPDATA%/spotdash/.env`
///
/// # Errors
///
/// Returns an error string when the directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Platform data directory holding `.env` and the cookie jar.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotdash");
    path
}

/// Address the local server binds to, `SERVER_ADDRESS` or `127.0.0.1:3000`.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Origin under which the local server is reachable from the browser.
pub fn origin() -> String {
    utils::origin_from_addr(&server_addr())
}

/// Dashboard backend base URL, normalized against the local origin.
pub fn api_base_url() -> String {
    let raw = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    utils::normalize_base_url(&raw, &origin())
}

/// OAuth client identifier, `None` when `SPOTIFY_CLIENT_ID` is unset or blank.
pub fn spotify_client_id() -> Option<String> {
    env::var("SPOTIFY_CLIENT_ID")
        .ok()
        .filter(|id| !id.trim().is_empty())
}

/// Redirect URI registered with Spotify.
///
/// `SPOTIFY_REDIRECT_URI` overrides the default `{origin}/callback`.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_REDIRECT_URI")
        .ok()
        .filter(|uri| !uri.trim().is_empty())
        .unwrap_or_else(|| format!("{}/callback", origin()))
}

pub fn callback_grace() -> Duration {
    Duration::from_millis(env_u64("CALLBACK_GRACE_MS", DEFAULT_GRACE_MS))
}

pub fn callback_redirect_delay() -> Duration {
    Duration::from_millis(env_u64("CALLBACK_REDIRECT_MS", DEFAULT_REDIRECT_MS))
}

pub fn login_timeout() -> Duration {
    Duration::from_secs(env_u64("LOGIN_TIMEOUT_SECS", DEFAULT_LOGIN_TIMEOUT_SECS))
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Everything a callback page needs, resolved once so pages never read the
/// environment themselves.
#[derive(Debug, Clone)]
pub struct CallbackSettings {
    pub api_base_url: String,
    pub redirect_uri: String,
    pub secure: bool,
    pub grace: Duration,
    pub redirect_delay: Duration,
}

impl CallbackSettings {
    pub fn from_env() -> Self {
        Self {
            api_base_url: api_base_url(),
            redirect_uri: spotify_redirect_uri(),
            secure: utils::is_secure_origin(&origin()),
            grace: callback_grace(),
            redirect_delay: callback_redirect_delay(),
        }
    }
}
