use std::path::{Path, PathBuf};

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use keytrace::Configuration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SETTINGS_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "KEYTRACE_";

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Engine configuration used for every replay without its own `[session]` table
    pub session: Configuration,
    /// Print reports as JSON by default
    pub json: bool,
}

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),
}

impl Settings {
    /// Load the settings
    ///
    /// Defaults are overridden by `settings.toml` in the config directory (the platform's
    /// config dir unless `override_path` is given), which is in turn overridden by
    /// `KEYTRACE_` environment variables. Nested keys use `__`, e.g.
    /// `KEYTRACE_SESSION__TIME_LIMIT_SECONDS=30`.
    pub fn get(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_dir = override_path
            .or_else(|| {
                ProjectDirs::from("com", "keytrace", "keytrace")
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
            .ok_or(ConfigError::NoDirectory)?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir)?;
        }

        let settings = Self::figment(&config_dir).extract().map_err(Box::new)?;
        tracing::debug!(dir = %config_dir.display(), ?settings, "Loaded settings");

        Ok(settings)
    }

    fn figment(config_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let settings_toml = config_dir.join(SETTINGS_FILE);
        if settings_toml.exists() {
            figment = figment.merge(Toml::file(settings_toml));
        }

        // Keys are kebab-case, so `SESSION__WORD_BUFFERED_INPUT` maps to
        // `session.word-buffered-input`
        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .map(|key| key.as_str().replace("__", ".").replace('_', "-").into()),
        )
    }
}
