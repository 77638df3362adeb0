use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::{
    parse_base_url,
    table::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS},
    FetchError,
};

pub const CONFIG_FILE: &str = "holonet.toml";
pub const DEFAULT_API_URL: &str = "https://swapi.dev/api/";
pub const DEFAULT_THEME_AUDIO_URL: &str =
    "https://s.cdpn.io/1202/Star_Wars_original_opening_crawl_1977.mp3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid api url '{url}': {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("unsupported page size {0}, expected one of {options:?}", options = PAGE_SIZE_OPTIONS)]
    UnsupportedPageSize(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    /// `None` disables the theme audio download.
    pub theme_audio_url: Option<String>,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            theme_audio_url: Some(DEFAULT_THEME_AUDIO_URL.into()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_base_url(&self.api_url).map_err(|source| ConfigError::InvalidApiUrl {
            url: self.api_url.clone(),
            source,
        })?;
        if !PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            return Err(ConfigError::UnsupportedPageSize(self.page_size));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    theme_audio_url: Option<String>,
    page_size: Option<usize>,
}

/// Defaults, then `holonet.toml` in the working directory, then the
/// environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_url {
                    settings.api_url = v;
                }
                if let Some(v) = file_cfg.theme_audio_url {
                    settings.theme_audio_url = non_empty(v);
                }
                if let Some(v) = file_cfg.page_size {
                    settings.page_size = v;
                }
            }
            Err(err) => warn!(path = %path.display(), "ignoring unreadable config file: {err}"),
        }
    }

    if let Some(v) = env("API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("THEME_AUDIO_URL") {
        settings.theme_audio_url = non_empty(v);
    }
    if let Some(v) = env("APP__THEME_AUDIO_URL") {
        settings.theme_audio_url = non_empty(v);
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.page_size = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__PAGE_SIZE"),
        }
    }

    settings
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
