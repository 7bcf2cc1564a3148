//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::recommend::{RecommendationConfig, DEFAULT_ENDPOINT};
use crate::storage::{SnapshotConfig, DEFAULT_STORAGE_KEY};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub recommendations: RecommendationsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("firewatch").to_string_lossy().to_string())
        .unwrap_or_else(|| "./firewatch_data".to_string())
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// Snapshot slot described by this section
    ///
    /// A leading `~` in `data_dir` is expanded to the home directory.
    pub fn snapshot_config(&self) -> SnapshotConfig {
        SnapshotConfig::new(expand_home(&self.data_dir)).key(self.storage_key.clone())
    }
}

fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Recommendation service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_recommendations_enabled")]
    pub enabled: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_recommendations_enabled() -> bool {
    true
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
            enabled: default_recommendations_enabled(),
        }
    }
}

impl RecommendationsConfig {
    /// Client settings described by this section
    pub fn client_config(&self) -> RecommendationConfig {
        RecommendationConfig {
            endpoint: self.endpoint.clone(),
            request_timeout_ms: self.request_timeout_secs.saturating_mul(1000),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether logs should be emitted as JSON lines
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> ResolvedConfig {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("firewatch").join("config.toml")),
            Some(PathBuf::from("/etc/firewatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first readable file among `paths`, falling back to defaults
    ///
    /// Existing files that fail to load are skipped and reported in the result.
    pub fn load_first(paths: &[PathBuf]) -> ResolvedConfig {
        let mut skipped = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return ResolvedConfig {
                        config,
                        source: Some(path.clone()),
                        skipped,
                    }
                }
                Err(e) => skipped.push(e),
            }
        }

        ResolvedConfig {
            config: Self::from_env(),
            source: None,
            skipped,
        }
    }

    /// Load from an explicit path if given, otherwise from default locations
    pub fn resolve(path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
        match path {
            Some(path) => Ok(ResolvedConfig {
                config: Self::load_with_env(path)?,
                source: Some(path.to_path_buf()),
                skipped: Vec::new(),
            }),
            None => Ok(Self::load_default()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Storage overrides
        if let Ok(data_dir) = std::env::var("FIREWATCH_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Ok(key) = std::env::var("FIREWATCH_STORAGE_KEY") {
            self.storage.storage_key = key;
        }

        // API overrides
        if let Ok(host) = std::env::var("FIREWATCH_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("FIREWATCH_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Recommendation service overrides
        if let Ok(url) = std::env::var("FIREWATCH_RECOMMENDATIONS_URL") {
            self.recommendations.endpoint = url;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("FIREWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FIREWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// A loaded configuration and where it came from
///
/// Configuration is resolved before tracing is installed, so the outcome is
/// kept here and reported by [`ResolvedConfig::log_outcome`] afterwards.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub config: Config,
    /// File the configuration was read from, `None` for defaults
    pub source: Option<PathBuf>,
    /// Config files that exist but could not be loaded
    pub skipped: Vec<ConfigError>,
}

impl ResolvedConfig {
    /// Log the skipped files and the chosen source
    pub fn log_outcome(&self) {
        for error in &self.skipped {
            tracing::warn!("Skipping config file: {}", error);
        }

        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# Firewatch Configuration
#
# Environment variables override these settings:
# - FIREWATCH_DATA_DIR
# - FIREWATCH_STORAGE_KEY
# - FIREWATCH_API_HOST
# - FIREWATCH_API_PORT
# - FIREWATCH_RECOMMENDATIONS_URL
# - FIREWATCH_LOG_LEVEL
# - FIREWATCH_LOG_FORMAT

[storage]
# Directory holding the observation snapshot (a leading ~ is the home directory)
data_dir = "{data_dir}"

# Snapshot slot name (file is <data_dir>/<storage_key>.json)
storage_key = "{key}"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8086

[recommendations]
# Recommendation service endpoint
endpoint = "{endpoint}"

# Request timeout in seconds
request_timeout_secs = 30

# Fetch recommendations in the background
enabled = true

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        data_dir = default_data_dir().replace('\\', "/"),
        key = DEFAULT_STORAGE_KEY,
        endpoint = DEFAULT_ENDPOINT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.storage_key, "mapState");
        assert_eq!(config.api.port, 8086);
        assert_eq!(config.recommendations.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.recommendations.request_timeout_secs, 30);
        assert!(config.recommendations.enabled);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.storage.data_dir, default_data_dir().replace('\\', "/"));
        assert!(!config.storage.data_dir.starts_with('~'));
        assert_eq!(config.storage.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.api.addr(), "0.0.0.0:8086");
        assert_eq!(config.recommendations.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [recommendations]
            endpoint = "http://localhost:9000/recommend"
            request_timeout_secs = 5

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.recommendations.endpoint, "http://localhost:9000/recommend");
        assert_eq!(config.recommendations.client_config().request_timeout_ms, 5_000);
        assert!(config.logging.is_json());
        assert_eq!(config.api.port, 8086);
    }

    #[test]
    fn test_snapshot_config_path() {
        let config = Config::parse(
            r#"
            [storage]
            data_dir = "/tmp/fw"
            storage_key = "dashboard"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.storage.snapshot_config().path(),
            PathBuf::from("/tmp/fw/dashboard.json")
        );
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api\nport = ").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_home_dir_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };

        let config = Config::parse(
            r#"
            [storage]
            data_dir = "~/fw"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.storage.snapshot_config().path(),
            home.join("fw").join("mapState.json")
        );

        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("/srv/~fw"), PathBuf::from("/srv/~fw"));
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let config = Config::parse(
            r#"
            [recommendations]
            request_timeout_secs = 9223372036854775807
            "#,
        )
        .unwrap();

        assert_eq!(config.recommendations.client_config().request_timeout_ms, u64::MAX);
    }

    #[test]
    fn test_load_first_reports_skipped_files() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&bad, "[api\nport = ").unwrap();
        std::fs::write(&good, "[api]\nport = 9100\n").unwrap();

        let resolved = Config::load_first(&[dir.path().join("missing.toml"), bad.clone(), good.clone()]);
        assert_eq!(resolved.source, Some(good));
        assert_eq!(resolved.skipped.len(), 1);
        assert!(matches!(&resolved.skipped[0], ConfigError::Parse { path, .. } if *path == bad));

        let resolved = Config::load_first(&[bad]);
        assert_eq!(resolved.source, None);
        assert_eq!(resolved.skipped.len(), 1);
        assert_eq!(resolved.config.api.port, default_port());
    }
}
