//! Configuration management for TuneInsight.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. All values are resolved once into a [`Config`] that
//! is handed to the components that need it, so nothing downstream reads the
//! environment directly.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (everything except the client credentials)

use std::{env, path::PathBuf, time::Duration};

use crate::error::TuneError;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const OUTPUT_DIR_NAME: &str = "Spreadsheets";

/// Scopes requested during authorization: following, library, top items and
/// playlist read access (private and collaborative).
pub const DEFAULT_SCOPES: [&str; 6] = [
    "user-follow-read",
    "user-follow-modify",
    "user-library-read",
    "user-top-read",
    "playlist-read-private",
    "playlist-read-collaborative",
];

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist and loads variables from
/// `tuneinsight/.env` below the platform-specific local data directory:
/// - Linux: `~/.local/share/tuneinsight/.env`
/// - macOS: `~/Library/Application Support/tuneinsight/.env`
/// - Windows: `%LOCALAPPDATA%/tuneinsight/.env`
///
/// A missing `.env` file is not an error; the variables may come from the
/// process environment instead.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or if the
/// `.env` file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())
}

pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tuneinsight/.env");
    path
}

/// Everything the session, the API client and the exporter need to know.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Address the redirect listener binds to. Must match `redirect_uri`.
    pub server_address: String,
    pub output_dir: PathBuf,
    /// `None` waits for the browser redirect forever.
    pub callback_timeout: Option<Duration>,
}

impl Config {
    /// Builds a configuration with defaults for everything but the credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            output_dir: default_output_dir(),
            callback_timeout: None,
        }
    }

    /// Resolves the configuration from the process environment.
    ///
    /// # Environment
    ///
    /// - `SPOTIFY_API_AUTH_CLIENT_ID` (required)
    /// - `SPOTIFY_API_AUTH_CLIENT_SECRET` (required)
    /// - `SPOTIFY_API_REDIRECT_URI`
    /// - `SPOTIFY_API_AUTH_SCOPE` (space separated)
    /// - `SPOTIFY_API_AUTH_URL`
    /// - `SPOTIFY_API_TOKEN_URL`
    /// - `SPOTIFY_API_URL`
    /// - `SERVER_ADDRESS`
    /// - `TUNEINSIGHT_OUTPUT_DIR`
    /// - `CALLBACK_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns [`TuneError::Config`] when a credential is missing or the timeout
    /// is not a number.
    pub fn from_env() -> Result<Self, TuneError> {
        let mut config = Self::new(
            required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
        );

        if let Some(uri) = optional("SPOTIFY_API_REDIRECT_URI") {
            config.redirect_uri = uri;
        }
        if let Some(scope) = optional("SPOTIFY_API_AUTH_SCOPE") {
            config.scopes = scope.split_whitespace().map(str::to_string).collect();
        }
        if let Some(url) = optional("SPOTIFY_API_AUTH_URL") {
            config.auth_url = url;
        }
        if let Some(url) = optional("SPOTIFY_API_TOKEN_URL") {
            config.token_url = url;
        }
        if let Some(url) = optional("SPOTIFY_API_URL") {
            config.api_url = url;
        }
        if let Some(addr) = optional("SERVER_ADDRESS") {
            config.server_address = addr;
        }
        if let Some(dir) = optional("TUNEINSIGHT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(secs) = optional("CALLBACK_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|e| {
                TuneError::Config(format!(
                    "CALLBACK_TIMEOUT_SECS must be a number of seconds: {}",
                    e
                ))
            })?;
            config.callback_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}

/// `Spreadsheets` next to the current working directory, i.e. below its parent.
pub fn default_output_dir() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let base = cwd.parent().map(PathBuf::from).unwrap_or(cwd);
    base.join(OUTPUT_DIR_NAME)
}

fn required(key: &str) -> Result<String, TuneError> {
    optional(key).ok_or_else(|| TuneError::Config(format!("{} must be set", key)))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
