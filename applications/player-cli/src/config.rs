/// Player configuration
use crate::error::{CliError, Result};
use minarets_client::ClientConfig;
use minarets_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "minarets.toml";

/// Prefix of environment overrides (`MINARETS_API__URL=...`)
pub const ENV_PREFIX: &str = "MINARETS";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default)]
    pub token: Option<String>,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `minarets.toml` is read when
    /// present in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Nested keys use a double underscore: MINARETS_PLAYBACK__VOLUME=40
        settings = settings.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        tracing::debug!(api = %config.api.url, "Configuration loaded");
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.client_config()
            .normalized()
            .map_err(|e| CliError::Config(format!("api.url: {e}")))?;

        if self.playback.volume > 100 {
            return Err(CliError::Config(format!(
                "playback.volume must be between 0 and 100, got {}",
                self.playback.volume
            )));
        }

        Ok(())
    }

    /// Connection settings for the catalog client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.api.url.clone(),
            api_token: self.api.token.clone(),
        }
    }
}

fn default_api() -> ApiSettings {
    ApiSettings {
        url: default_api_url(),
        token: None,
    }
}

fn default_api_url() -> String {
    "https://api.minarets.io".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            playback: PlaybackConfig::default(),
        }
    }
}
