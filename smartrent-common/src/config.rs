//! Configuration loading
//!
//! Every setting is resolved in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: the compiled defaults are used and
//! the returned [`ConfigSource`] records it, so the caller can log the
//! outcome once its subscriber is installed. A TOML file that exists but
//! does not parse is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_EXTERNAL_API_URL: &str = "http://127.0.0.1:8000/predict";
pub const DEFAULT_EXTERNAL_API_TIMEOUT_MS: u64 = 5000;

/// Environment variable naming the config file
pub const ENV_CONFIG_PATH: &str = "SMARTRENT_CONFIG";
pub const ENV_PORT: &str = "SMARTRENT_PE_PORT";
pub const ENV_BIND_ADDRESS: &str = "SMARTRENT_BIND_ADDRESS";
pub const ENV_LOG_LEVEL: &str = "SMARTRENT_LOG_LEVEL";
pub const ENV_EXTERNAL_API_URL: &str = "SMARTRENT_EXTERNAL_API_URL";
/// Older deployments set the scoring service address under this name
pub const ENV_EXTERNAL_API_URL_LEGACY: &str = "EXTERNAL_API_URL";
pub const ENV_EXTERNAL_API_TIMEOUT_MS: &str = "SMARTRENT_EXTERNAL_API_TIMEOUT_MS";

/// Price estimator configuration as read from TOML
///
/// ```toml
/// port = 5780
/// bind_address = "127.0.0.1"
///
/// [logging]
/// level = "info"
///
/// [external_api]
/// url = "http://127.0.0.1:8000/predict"
/// timeout_ms = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// HTTP server port
    pub port: u16,
    /// Address the HTTP server binds to
    pub bind_address: String,
    pub logging: LoggingConfig,
    pub external_api: ExternalApiConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            logging: LoggingConfig::default(),
            external_api: ExternalApiConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub fn filter_directive(&self) -> String {
        let level = &self.level;
        format!("smartrent_pe={level},smartrent_common={level},tower_http={level}")
    }
}

/// Remote scoring service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalApiConfig {
    /// Endpoint receiving the POSTed property payload
    pub url: String,
    /// Upper bound for the whole call, connect through body
    pub timeout_ms: u64,
}

impl Default for ExternalApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_EXTERNAL_API_URL.to_string(),
            timeout_ms: DEFAULT_EXTERNAL_API_TIMEOUT_MS,
        }
    }
}

impl ExternalApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::Config("external_api.url cannot be empty".to_string()));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "external_api.url must be an http(s) URL: {}",
                self.url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(Error::Config(
                "external_api.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the configuration file came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No file at this path; compiled defaults used
    Missing(PathBuf),
    /// No config location could be determined; compiled defaults used
    Unavailable,
}

impl ConfigSource {
    /// Report the outcome of the file lookup
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file not found at {} - using defaults",
                path.display()
            ),
            ConfigSource::Unavailable => {
                warn!("No config file location available - using defaults")
            }
        }
    }
}

/// Fully resolved configuration plus the file lookup outcome
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Values supplied on the command line
///
/// `None` leaves the environment/TOML/default value in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub external_api_url: Option<String>,
    pub external_api_timeout_ms: Option<u64>,
}

impl TomlConfig {
    /// Parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Parse a TOML file, falling back to defaults when it does not exist
    pub fn load_or_default(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        match path {
            Some(path) if path.exists() => {
                Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())))
            }
            Some(path) => Ok((Self::default(), ConfigSource::Missing(path.to_path_buf()))),
            None => Ok((Self::default(), ConfigSource::Unavailable)),
        }
    }

    /// Overwrite settings from `SMARTRENT_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(port) = env_value(ENV_PORT) {
            self.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{} is not a valid port: {}", ENV_PORT, port)))?;
        }
        if let Some(addr) = env_value(ENV_BIND_ADDRESS) {
            self.bind_address = addr;
        }
        if let Some(level) = env_value(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(url) =
            env_value(ENV_EXTERNAL_API_URL).or_else(|| env_value(ENV_EXTERNAL_API_URL_LEGACY))
        {
            self.external_api.url = url;
        }
        if let Some(ms) = env_value(ENV_EXTERNAL_API_TIMEOUT_MS) {
            self.external_api.timeout_ms = ms.parse().map_err(|_| {
                Error::Config(format!(
                    "{} is not a number of milliseconds: {}",
                    ENV_EXTERNAL_API_TIMEOUT_MS, ms
                ))
            })?;
        }
        Ok(())
    }

    /// Overwrite settings given on the command line
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(addr) = &overrides.bind_address {
            self.bind_address = addr.clone();
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if let Some(url) = &overrides.external_api_url {
            self.external_api.url = url.clone();
        }
        if let Some(ms) = overrides.external_api_timeout_ms {
            self.external_api.timeout_ms = ms;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_address.trim().is_empty() {
            return Err(Error::Config("bind_address cannot be empty".to_string()));
        }
        self.external_api.validate()
    }

    /// `bind_address:port`
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Full resolution: file, then environment, then command line, then validation
pub fn resolve_config(
    cli_config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ResolvedConfig> {
    let path = resolve_config_path(cli_config_path);
    let (mut config, source) = TomlConfig::load_or_default(path.as_deref())?;
    config.apply_env_overrides()?;
    config.apply_overrides(overrides);
    config.validate()?;
    Ok(ResolvedConfig { config, source })
}

/// Config file location: CLI argument, then `SMARTRENT_CONFIG`, then the
/// platform config directory
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env_value(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }

    default_config_path()
}

/// `~/.config/smartrent/smartrent-pe.toml` on Linux, the platform
/// equivalent elsewhere
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("smartrent").join("smartrent-pe.toml"))
}

/// Non-blank environment variable value
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.port, 5780);
        assert_eq!(config.listen_address(), "127.0.0.1:5780");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.external_api.url, "http://127.0.0.1:8000/predict");
        assert_eq!(config.external_api.timeout(), Duration::from_millis(5000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [external_api]
            url = "http://scoring.internal/predict"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.external_api.url, "http://scoring.internal/predict");
        assert_eq!(config.external_api.timeout_ms, DEFAULT_EXTERNAL_API_TIMEOUT_MS);
    }

    #[test]
    fn test_filter_directive_covers_common_crate() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
        };
        let directive = logging.filter_directive();

        assert!(directive.contains("smartrent_pe=debug"));
        assert!(directive.contains("smartrent_common=debug"));
        assert!(directive.contains("tower_http=debug"));
    }

    #[test]
    fn test_missing_file_reported_as_missing() {
        let path = Path::new("/nonexistent/smartrent/smartrent-pe.toml");
        let (config, source) = TomlConfig::load_or_default(Some(path)).unwrap();

        assert_eq!(config, TomlConfig::default());
        assert_eq!(source, ConfigSource::Missing(path.to_path_buf()));
    }

    #[test]
    fn test_no_location_reported_as_unavailable() {
        let (config, source) = TomlConfig::load_or_default(None).unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(source, ConfigSource::Unavailable);
    }

    #[test]
    fn test_unreadable_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = TomlConfig::load(dir.path()).unwrap_err();

        assert!(matches!(&err, Error::ConfigRead { path, .. } if path == dir.path()));
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let api = ExternalApiConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(api.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let api = ExternalApiConfig {
            url: "127.0.0.1:8000/predict".to_string(),
            ..Default::default()
        };
        assert!(matches!(api.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = TomlConfig::default();
        config.apply_overrides(&ConfigOverrides {
            port: Some(9000),
            external_api_timeout_ms: Some(250),
            ..Default::default()
        });

        assert_eq!(config.port, 9000);
        assert_eq!(config.external_api.timeout_ms, 250);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    }
}
