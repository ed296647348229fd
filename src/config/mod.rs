use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the user directory API, without the `/v1` suffix
    pub base_url: String,

    /// Users shown per page
    pub page_size: usize,

    /// Users requested per network call
    pub fetch_batch_size: usize,

    /// Users kept buffered beyond the current page
    pub buffer_ahead: usize,

    /// Numbered page buttons in the paging bar
    pub window_size: usize,

    /// Timeout for a single API request
    pub request_timeout_secs: u64,

    /// Directory for log files
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            page_size: 10,
            fetch_batch_size: 50,
            buffer_ahead: 200,
            window_size: 5,
            request_timeout_secs: 5,
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("userdeck"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Candidate configuration files, highest priority first
fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("./.userdeck.json"),
        PathBuf::from("./userdeck.json"),
    ];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("userdeck").join("userdeck.json"));
    }

    paths
}

impl Config {
    /// Initialize configuration from defaults, the first config file found,
    /// and the environment, in that order
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();

        for path in config_paths() {
            if path.exists() {
                config = Self::load_from_file(&path).await?;
                break;
            }
        }

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a JSON file; missing keys keep their defaults
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration in {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("USERDECK_BASE_URL") {
            self.base_url = base_url;
        }

        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<usize>().ok());

        if let Some(page_size) = parse("USERDECK_PAGE_SIZE") {
            self.page_size = page_size;
        }

        if let Some(batch) = parse("USERDECK_FETCH_BATCH_SIZE") {
            self.fetch_batch_size = batch;
        }

        if let Some(ahead) = parse("USERDECK_BUFFER_AHEAD") {
            self.buffer_ahead = ahead;
        }

        if let Some(window) = parse("USERDECK_WINDOW_SIZE") {
            self.window_size = window;
        }

        if let Some(timeout) = parse("USERDECK_REQUEST_TIMEOUT") {
            self.request_timeout_secs = timeout as u64;
        }

        if let Some(data_dir) = lookup("USERDECK_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("base_url is required"));
        }

        if self.page_size == 0 {
            return Err(anyhow::anyhow!("page_size must be greater than 0"));
        }

        if self.fetch_batch_size < self.page_size {
            return Err(anyhow::anyhow!(
                "fetch_batch_size ({}) must be at least page_size ({})",
                self.fetch_batch_size,
                self.page_size
            ));
        }

        if self.window_size == 0 {
            return Err(anyhow::anyhow!("window_size must be greater than 0"));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("request_timeout_secs must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.fetch_batch_size, 50);
        assert_eq!(config.buffer_ahead, 200);
        assert_eq!(config.window_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("USERDECK_BASE_URL", "https://users.example.com/api"),
            ("USERDECK_PAGE_SIZE", "25"),
            ("USERDECK_FETCH_BATCH_SIZE", "100"),
            ("USERDECK_BUFFER_AHEAD", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://users.example.com/api");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.fetch_batch_size, 100);
        assert_eq!(config.buffer_ahead, 200);
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let mut config = Config::default();
        config.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.fetch_batch_size = 5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.window_size = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userdeck.json");
        std::fs::write(&path, r#"{ "page_size": 20, "fetch_batch_size": 80 }"#).unwrap();

        let config = Config::load_from_file(&path).await.unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.fetch_batch_size, 80);
        assert_eq!(config.buffer_ahead, 200);
        assert_eq!(config.base_url, "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn test_load_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userdeck.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("userdeck.json"));
    }
}
