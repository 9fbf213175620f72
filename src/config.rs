use serde::{Deserialize, Serialize};
use std::fs;
use std::env;
use anyhow::{Result, Context};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default = "default_zip")]
    pub default_zip: String,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_true")]
    pub enable_autotrader: bool,
    #[serde(default = "default_true")]
    pub enable_cars_com: bool,
}

fn default_user_agent() -> String {
    "carspotter/1.0".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_requests() -> usize {
    10
}

fn default_zip() -> String {
    "10001".to_string()
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
            default_zip: default_zip(),
            tracing_level: default_tracing_level(),
            enable_autotrader: true,
            enable_cars_com: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "data/config.yaml";

        let mut config: Config = if let Ok(config_str) = fs::read_to_string(config_path) {
            serde_yaml::from_str(&config_str)?
        } else {
            Config::default()
        };

        // Override with environment variables if present
        if let Ok(user_agent) = env::var("USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(timeout) = env::var("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = timeout.parse()
                .context("Failed to parse REQUEST_TIMEOUT_SECS environment variable")?;
        }

        if let Ok(max_concurrent) = env::var("MAX_CONCURRENT_REQUESTS") {
            config.max_concurrent_requests = max_concurrent.parse()
                .context("Failed to parse MAX_CONCURRENT_REQUESTS environment variable")?;
        }

        if let Ok(zip) = env::var("DEFAULT_ZIP") {
            config.default_zip = zip;
        }

        if let Ok(tracing_level) = env::var("TRACING_LEVEL") {
            config.tracing_level = tracing_level;
        }

        if let Ok(enabled) = env::var("ENABLE_AUTOTRADER") {
            config.enable_autotrader = enabled.parse()
                .context("Failed to parse ENABLE_AUTOTRADER environment variable")?;
        }

        if let Ok(enabled) = env::var("ENABLE_CARS_COM") {
            config.enable_cars_com = enabled.parse()
                .context("Failed to parse ENABLE_CARS_COM environment variable")?;
        }

        Ok(config)
    }

    pub fn create_default() -> Result<()> {
        std::fs::create_dir_all("data")?;

        let config_str = serde_yaml::to_string(&Config::default())?;
        fs::write("data/config.yaml", config_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.user_agent, "carspotter/1.0");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_concurrent_requests, 10);
        assert_eq!(config.default_zip, "10001");
        assert!(config.enable_autotrader);
        assert!(config.enable_cars_com);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config: Config = serde_yaml::from_str("user_agent: test/2.0\nenable_cars_com: false\n")
            .expect("partial config should deserialize");
        assert_eq!(config.user_agent, "test/2.0");
        assert!(!config.enable_cars_com);
        assert!(config.enable_autotrader);
        assert_eq!(config.request_timeout_secs, 30);
    }
}
