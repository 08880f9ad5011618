//! Configuration loading and parsing.
//!
//! `vimdrill.toml` is discovered in the working directory first, then the
//! platform config directory. Unknown fields are ignored and a file that
//! fails to parse falls back to defaults, so a stale config never blocks
//! startup. Data paths default under the platform config dir.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

const CONFIG_FILE: &str = "vimdrill.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address a transport wrapper should bind when one is attached.
    pub server_addr: String,
    /// Delay before auto-advancing to the next task after a match.
    pub auto_advance_delay_ms: u32,
    pub show_hints: bool,
    pub enable_sounds: bool,
    pub animation_speed: f64,
    /// "dark", "light" or "high-contrast".
    pub theme: String,
    pub data_dir: PathBuf,
    pub stats_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vimdrill");
        Self {
            server_addr: "localhost:8080".to_string(),
            auto_advance_delay_ms: 500,
            show_hints: true,
            enable_sounds: false,
            animation_speed: 1.0,
            theme: "dark".to_string(),
            stats_file: data_dir.join("stats.json"),
            data_dir,
        }
    }
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vimdrill").join(CONFIG_FILE);
    }
    local
}

/// Load configuration from `path`, or from the discovered location when
/// `None`. Missing or unparseable files yield defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(config) => {
                info!(target: "config", path = %path.display(), "config_loaded");
                Ok(config)
            }
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
                Ok(Config::default())
            }
        },
        Err(_) => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let config = load_from(Some(PathBuf::from("__no_such_config__.toml"))).unwrap();
        assert_eq!(config.server_addr, "localhost:8080");
        assert_eq!(config.theme, "dark");
        assert!(config.show_hints);
        assert!(config.stats_file.ends_with("stats.json"));
    }

    #[test]
    fn parses_overrides() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "server_addr = \"0.0.0.0:9999\"\ntheme = \"light\"\nauto_advance_delay_ms = 250\n",
        )
        .unwrap();
        let config = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:9999");
        assert_eq!(config.theme, "light");
        assert_eq!(config.auto_advance_delay_ms, 250);
        // Untouched fields keep their defaults.
        assert_eq!(config.animation_speed, 1.0);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "theme = \"light\"\nfuture_knob = 3\n").unwrap();
        let config = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(config.theme, "light");
    }

    #[test]
    fn parse_failure_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "theme = [broken").unwrap();
        let config = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(config.theme, "dark");
    }
}
