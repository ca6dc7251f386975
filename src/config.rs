use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FeedError, Result};

pub const DEFAULT_API_URL: &str = "https://tech-test.raintor.com";
pub const DEFAULT_VIEWPORT_ROWS: u16 = 5;
pub const API_URL_ENV: &str = "USERFEED_API_URL";

#[derive(Deserialize, Serialize, Default, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    pub viewport_rows: Option<u16>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| FeedError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| FeedError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "userfeed")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(FeedError::NoConfigDir)
    }

    /// Get the API base URL with the env var taking precedence over the config file
    pub fn api_url(&self) -> Result<Url> {
        let raw = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        parse_api_url(&raw)
    }

    /// Get the viewport height in rows, preferring an explicit argument
    pub fn resolve_rows(&self, explicit: Option<u16>) -> u16 {
        explicit
            .or(self.viewport_rows)
            .unwrap_or(DEFAULT_VIEWPORT_ROWS)
            .max(1)
    }
}

/// Validate a base URL and normalize it to end with a slash so relative
/// joins keep any path prefix.
pub fn parse_api_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|_| FeedError::InvalidUrl(trimmed.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FeedError::InvalidUrl(trimmed.to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
