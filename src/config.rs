use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::view::ViewMode;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// User configuration, read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the task backend, without the `/api` suffix.
    pub api_url: String,
    /// View the TUI opens with.
    pub default_view: ViewMode,
    /// Where the TUI writes its log. Defaults to the data directory.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            default_view: ViewMode::List,
            log_file: None,
        }
    }
}

/// Returns the path to `config.toml`.
///
/// 1. `TASKBOARD_CONFIG` environment variable.
/// 2. `~/.config/taskboard/config.toml` (on Linux).
/// 3. `./config.toml` (fallback).
pub fn config_path() -> PathBuf {
    std::env::var("TASKBOARD_CONFIG").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("taskboard");
        p.push("config.toml");
        p
    })
}

/// Directory for the TUI log file.
pub fn data_dir() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("taskboard");
    p
}

/// Reads a config file. A missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

/// Applies overrides on top of the file config: CLI flag > `TASKBOARD_API` > file.
pub fn resolve(mut config: Config, env_api: Option<String>, flag_api: Option<String>) -> Config {
    if let Some(url) = flag_api.or(env_api).filter(|u| !u.trim().is_empty()) {
        config.api_url = url;
    }
    config
}

/// Loads the effective configuration for this run.
pub fn load(flag_api: Option<String>) -> Result<Config> {
    let file = load_from(&config_path())?;
    Ok(resolve(file, std::env::var("TASKBOARD_API").ok(), flag_api))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_toml() {
        let config: Config = toml::from_str(r#"default_view = "calendar""#).unwrap();
        assert_eq!(config.default_view, ViewMode::Calendar);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_is_read_and_bad_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "api_url = \"http://tasks.local:9000\"").unwrap();
        assert_eq!(load_from(&path).unwrap().api_url, "http://tasks.local:9000");

        fs::write(&path, "default_view = 3").unwrap();
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = Config { api_url: "http://file".into(), ..Default::default() };
        let r = resolve(file.clone(), Some("http://env".into()), Some("http://flag".into()));
        assert_eq!(r.api_url, "http://flag");
        let r = resolve(file.clone(), Some("http://env".into()), None);
        assert_eq!(r.api_url, "http://env");
        let r = resolve(file, None, None);
        assert_eq!(r.api_url, "http://file");
    }
}
