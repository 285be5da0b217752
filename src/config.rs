//! Configuration loading.
//!
//! Settings come from a single YAML file (`config.yaml` by default). Every key
//! except `oauth` has a stock default, so the smallest useful file is:
//!
//! ```yaml
//! oauth: ghp_yourtoken
//! ```
//!
//! ## Configuration Options
//!
//! ```yaml
//! oauth: ""                       # GitHub token (required)
//! org: shopware                   # Repository owner
//! repo: platform                  # Repository name
//! excluded: []                    # Logins left off the page
//! avatarSize: 100                 # Square avatar edge in pixels
//! apiUrl: https://api.github.com  # REST API root
//! template: contributors.html.tera  # Optional external page template
//! ```
//!
//! Unknown keys are rejected to catch typos early. The loaded [`AppConfig`] is
//! never mutated afterwards; it is passed by reference to every stage.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Config validation error: oauth token is missing")]
    MissingToken,
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Printed before any config error so first-time users know where to start.
pub const TOKEN_HELP: &str = "
Could not read your GitHub oauth token.
Did you set it in config.yaml?

If you need to generate a token follow these instructions:
https://docs.github.com/en/authentication/keeping-your-account-and-data-secure/creating-a-personal-access-token

After that, copy config.yaml.dist to config.yaml and set the token in the file,
or run `contrib-wall gen-config > config.yaml`.

";

/// Largest edge the JPEG encoder accepts.
pub const MAX_AVATAR_SIZE: u32 = u16::MAX as u32;

/// Application configuration loaded from `config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AppConfig {
    /// GitHub token sent as a bearer token to the contributors API.
    pub oauth: String,
    pub org: String,
    pub repo: String,
    /// Logins omitted from the page. Matched exactly, case-sensitive.
    pub excluded: Vec<String>,
    /// Edge length of the square avatar images, in pixels.
    pub avatar_size: u32,
    /// REST API root, without a trailing slash.
    pub api_url: String,
    /// External Tera template replacing the built-in page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            oauth: String::new(),
            org: "shopware".to_string(),
            repo: "platform".to_string(),
            excluded: Vec::new(),
            avatar_size: 100,
            api_url: "https://api.github.com".to_string(),
            template: None,
        }
    }
}

impl AppConfig {
    /// Validate that required values are present and in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oauth.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.org.trim().is_empty() {
            return Err(ConfigError::Validation("org must not be empty".into()));
        }
        if self.repo.trim().is_empty() {
            return Err(ConfigError::Validation("repo must not be empty".into()));
        }
        if self.avatar_size == 0 {
            return Err(ConfigError::Validation(
                "avatarSize must be a positive number of pixels".into(),
            ));
        }
        if self.avatar_size > MAX_AVATAR_SIZE {
            return Err(ConfigError::Validation(format!(
                "avatarSize must be at most {MAX_AVATAR_SIZE} pixels, got {}",
                self.avatar_size
            )));
        }
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "apiUrl must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        Ok(())
    }

    /// The exclusion list as a set, for membership tests while filtering.
    pub fn excluded_set(&self) -> HashSet<String> {
        self.excluded.iter().cloned().collect()
    }
}

/// Parse a YAML document on top of the stock defaults and validate it.
///
/// An empty document yields the defaults, which then fail validation for
/// lack of a token.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config = if content.trim().is_empty() {
        AppConfig::default()
    } else {
        serde_yaml::from_str(content)?
    };
    config.validate()?;
    Ok(config)
}

/// Load and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Returns a fully-commented stock `config.yaml` with every key explained.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_yaml() -> &'static str {
    include_str!("../config.yaml.dist")
}
