//! Configuration management for portal.
//!
//! Loads configuration from ${PORTAL_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Env var overriding `google.client_id`.
pub const CLIENT_ID_ENV: &str = "PORTAL_GOOGLE_CLIENT_ID";
/// Env var overriding `google.client_secret`.
pub const CLIENT_SECRET_ENV: &str = "PORTAL_GOOGLE_CLIENT_SECRET";

/// Google OAuth and profile endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// OAuth client id (desktop application type). Sign-in is disabled without it.
    pub client_id: Option<String>,
    /// OAuth client secret. Google issues one for desktop clients; it is not confidential.
    pub client_secret: Option<String>,
    /// Authorization endpoint.
    pub auth_url: String,
    /// Token endpoint.
    pub token_url: String,
    /// Profile endpoint queried with the access token.
    pub userinfo_url: String,
    /// Loopback port for the OAuth redirect (0 picks a random high port).
    pub callback_port: u16,
    /// How long to wait for the browser redirect before giving up.
    pub callback_timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            auth_url: GoogleConfig::DEFAULT_AUTH_URL.to_string(),
            token_url: GoogleConfig::DEFAULT_TOKEN_URL.to_string(),
            userinfo_url: GoogleConfig::DEFAULT_USERINFO_URL.to_string(),
            callback_port: 0,
            callback_timeout_secs: GoogleConfig::DEFAULT_CALLBACK_TIMEOUT_SECS,
        }
    }
}

impl GoogleConfig {
    pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
    pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
    pub const DEFAULT_USERINFO_URL: &str = "https://www.googleapis.com/userinfo/v2/me";
    const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 120;

    /// Returns the effective client id (env var wins over the file).
    pub fn effective_client_id(&self) -> Option<String> {
        non_empty_env(CLIENT_ID_ENV).or_else(|| {
            self.client_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ToString::to_string)
        })
    }

    /// Returns the effective client secret (env var wins over the file).
    pub fn effective_client_secret(&self) -> Option<String> {
        non_empty_env(CLIENT_SECRET_ENV).or_else(|| {
            self.client_secret
                .as_deref()
                .map(str::trim)
                .filter(|secret| !secret.is_empty())
                .map(ToString::to_string)
        })
    }

    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs.max(1))
    }
}

/// Guest session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestConfig {
    /// Placeholder image shown for guest profiles.
    pub avatar_url: String,
}

impl Default for GuestConfig {
    fn default() -> Self {
        Self {
            avatar_url: GuestConfig::DEFAULT_AVATAR_URL.to_string(),
        }
    }
}

impl GuestConfig {
    pub const DEFAULT_AVATAR_URL: &str =
        "https://s3.amazonaws.com/images.seroundtable.com/google-links-1510059186.jpg";
}

/// Log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `PORTAL_LOG` is unset (e.g. "info", "portal_core=debug").
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub google: GoogleConfig,
    pub guest: GuestConfig,
    pub log: LogConfig,
}

pub mod paths {
    //! Path resolution for portal configuration and data directories.
    //!
    //! PORTAL_HOME resolution order:
    //! 1. PORTAL_HOME environment variable (if set)
    //! 2. ~/.config/portal (default)
    //! 3. ./.portal when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the portal home directory.
    pub fn portal_home() -> PathBuf {
        if let Ok(home) = std::env::var("PORTAL_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".portal"),
            |h| h.join(".config").join("portal"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        portal_home().join("config.toml")
    }

    /// Returns the path to the key-value storage file.
    pub fn storage_path() -> PathBuf {
        portal_home().join("storage.json")
    }

    /// Returns the log directory.
    pub fn logs_dir() -> PathBuf {
        portal_home().join("logs")
    }
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
