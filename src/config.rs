use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  /// How long a fetched project list is served from cache, in milliseconds
  #[serde(default = "default_cache_ttl_ms")]
  pub cache_ttl_ms: u64,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
  #[serde(default)]
  pub filters: FilterOptionsConfig,
  /// Default log level when RUST_LOG is not set
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the catalog API, e.g. https://api.example.org/v1/
  pub url: String,
  /// Per-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

/// Static option lists offered in the filter picker.
/// Ecosystems are not listed here; they come from the API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FilterOptionsConfig {
  #[serde(default = "default_languages")]
  pub languages: Vec<String>,
  #[serde(default = "default_categories")]
  pub categories: Vec<String>,
  #[serde(default = "default_tags")]
  pub tags: Vec<String>,
}

impl Default for FilterOptionsConfig {
  fn default() -> Self {
    Self {
      languages: default_languages(),
      categories: default_categories(),
      tags: default_tags(),
    }
  }
}

fn default_cache_ttl_ms() -> u64 {
  30_000
}

fn default_timeout_secs() -> u64 {
  15
}

fn default_log_level() -> String {
  "info".to_string()
}

fn strings(values: &[&str]) -> Vec<String> {
  values.iter().map(|s| s.to_string()).collect()
}

fn default_languages() -> Vec<String> {
  strings(&["TypeScript", "JavaScript", "Python", "Go", "Rust", "Java"])
}

fn default_categories() -> Vec<String> {
  strings(&["Frontend", "Backend", "Full Stack", "DevOps", "Mobile"])
}

fn default_tags() -> Vec<String> {
  strings(&[
    "Good first issues",
    "Open issues",
    "Help wanted",
    "Bug",
    "Feature",
    "Documentation",
  ])
}

impl Config {
  /// Configuration with every optional field at its default
  pub fn with_api(api: ApiConfig) -> Self {
    Self {
      api,
      cache_ttl_ms: default_cache_ttl_ms(),
      title: None,
      filters: FilterOptionsConfig::default(),
      log_level: default_log_level(),
    }
  }

  pub fn cache_ttl(&self) -> Duration {
    Duration::from_millis(self.cache_ttl_ms)
  }

  /// Load configuration, letting `api_url` override the file's API URL.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./pcat.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/pcat/config.yaml
  ///
  /// Without any file, `api_url` alone is enough to run with defaults.
  pub fn load(explicit_path: Option<&Path>, api_url: Option<String>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match (path, api_url.clone()) {
      (Some(p), _) => Self::load_from_path(&p)?,
      (None, Some(url)) => Self::with_api(ApiConfig {
        url,
        timeout_secs: default_timeout_secs(),
      }),
      (None, None) => {
        return Err(eyre!(
          "No configuration file found. Create one at ~/.config/pcat/config.yaml\n\
                 or pass --api-url."
        ))
      }
    };

    if let Some(url) = api_url {
      config.api.url = url;
    }
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("pcat.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("pcat").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }
}
