use std::path::{Path, PathBuf};

use compact_str::CompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::{
    client::config::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT},
    result::{ActivityError, Result},
};

/// Settings stored in `gh-activity.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    pub base_url: CompactString,
    pub user_agent: CompactString,
    /// Per-request deadline; requests are only bounded by cancellation when unset
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<CompactString>,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            request_timeout_secs: None,
            log_level: None,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("gh-activity.toml")
    } else {
        PathBuf::from("gh-activity.toml")
    }
}

/// Load the configuration, writing defaults if the file does not exist yet
pub fn load_config(config_file: &Path) -> Result<ActivityConfig> {
    confy::load_path(config_file)
        .map_err(|e| ActivityError::config_load_error(config_file.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gh-activity-{}-{name}.toml", std::process::id()))
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let path = scratch_path("partial");
        std::fs::write(&path, "base_url = \"http://127.0.0.1:8080\"\n").unwrap();

        let config = load_config(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        let path = scratch_path("malformed");
        std::fs::write(&path, "request_timeout_secs = \"soon\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);

        assert!(matches!(err, ActivityError::ConfigLoadError { .. }));
    }

    #[test]
    fn default_path_names_the_config_file() {
        assert!(default_config_path().ends_with("gh-activity.toml"));
    }
}
