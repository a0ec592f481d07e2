use crate::error::BeaconError;
use beacon_events::RateLimitPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct BeaconConfig {
    #[serde(default)]
    pub rate_limit: RateLimitSection,
}

/// The demo-tuned 100ms/10 defaults, exposed as policy parameters rather
/// than baked-in constants.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateLimitSection {
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    #[serde(default = "default_max_per_window")]
    pub max_per_window: usize,
}

fn default_window_ms() -> u64 {
    100
}

fn default_max_per_window() -> usize {
    10
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_per_window: default_max_per_window(),
        }
    }
}

impl BeaconConfig {
    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            window: Duration::from_millis(self.rate_limit.window_ms),
            max_per_window: self.rate_limit.max_per_window,
        }
    }
}

/// Reads config from `path`. A missing file yields defaults; anything else
/// that goes wrong is a config error.
pub fn load_config(path: &Path) -> Result<BeaconConfig, BeaconError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(BeaconConfig::default())
        }
        Err(err) => {
            return Err(BeaconError::Config {
                message: err.to_string(),
            })
        }
    };
    toml::from_str(&content).map_err(|err| BeaconError::Config {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_tuning() {
        let config = BeaconConfig::default();
        let policy = config.rate_limit_policy();
        assert_eq!(policy.window, Duration::from_millis(100));
        assert_eq!(policy.max_per_window, 10);
    }

    #[test]
    fn test_parse_full_section() {
        let config: BeaconConfig = toml::from_str(
            "[rate_limit]\nwindow_ms = 250\nmax_per_window = 3\n",
        )
        .unwrap();
        assert_eq!(config.rate_limit.window_ms, 250);
        assert_eq!(config.rate_limit.max_per_window, 3);
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: BeaconConfig = toml::from_str("[rate_limit]\nwindow_ms = 50\n").unwrap();
        assert_eq!(config.rate_limit.window_ms, 50);
        assert_eq!(config.rate_limit.max_per_window, 10);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: BeaconConfig = toml::from_str("").unwrap();
        assert_eq!(config, BeaconConfig::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/beacon.toml")).unwrap();
        assert_eq!(config, BeaconConfig::default());
    }

    #[test]
    fn test_unreadable_path_is_config_error() {
        // Reading a directory fails with something other than NotFound.
        let err = load_config(Path::new("/")).unwrap_err();
        assert!(matches!(err, BeaconError::Config { .. }));
    }
}
