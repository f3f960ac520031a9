//! Configuration management for the Mindscape client.
//!
//! Settings merge in priority order: built-in defaults, then an optional
//! `mindscape.toml` config file, then `MINDSCAPE_*` environment variables,
//! then explicit CLI flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Production service endpoint the original client shipped with.
pub const DEFAULT_BASE_URL: &str =
    "https://memory-palace-leaning-model-ssbb3bwuaq-ew.a.run.app";

/// Default request/response timeout in seconds. Content processing runs
/// server-side and is slow; minutes, not seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Additional attempts after the initial one when the server is busy.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the content-processing service.
    pub base_url: String,
    /// Request/response timeout in seconds.
    pub request_timeout: u64,
    /// Retry ceiling for 503/504 responses.
    pub max_retries: u32,
    /// Base backoff delay in seconds; doubles per retry.
    pub backoff_base_secs: u64,
    /// User agent for HTTP requests.
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_secs: 1,
            user_agent: concat!("Mindscape/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the content-processing service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Retry ceiling for busy-server responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Config {
    /// Load configuration from a specific TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Discover a config file in standard locations.
    ///
    /// Checks `./mindscape.toml`, then `~/.config/mindscape/mindscape.toml`.
    pub fn discover() -> Option<PathBuf> {
        let cwd_config = PathBuf::from("mindscape.toml");
        if cwd_config.is_file() {
            return Some(cwd_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("mindscape").join("mindscape.toml"))
            .filter(|path| path.is_file())
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref base_url) = self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(retries) = self.max_retries {
            settings.max_retries = retries;
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
    }
}

/// Read an environment override, ignoring unset or unparseable values.
fn env_override<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|s| s.parse().ok())
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Base URL override (--base-url flag).
    pub base_url: Option<String>,
}

/// Load settings with explicit options.
pub fn load_settings_with_options(options: LoadOptions) -> Result<Settings, String> {
    let mut settings = Settings::default();

    let config = match &options.config_path {
        Some(path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            Some(Config::load_from_path(Path::new(&expanded))?)
        }
        None => Config::discover()
            .map(|path| Config::load_from_path(&path))
            .transpose()?,
    };

    if let Some(config) = config {
        config.apply_to_settings(&mut settings);
    }

    if let Some(base_url) = env_override::<String>("MINDSCAPE_BASE_URL") {
        settings.base_url = base_url;
    }
    if let Some(timeout) = env_override::<u64>("MINDSCAPE_TIMEOUT_SECS") {
        settings.request_timeout = timeout;
    }

    // --base-url flag takes precedence
    if let Some(base_url) = options.base_url {
        settings.base_url = base_url;
    }

    Ok(settings)
}
