// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service configuration.
//!
//! Loaded from YAML, TOML, or JSON (chosen by file extension), then
//! overridden by `MECHANIKA_*` environment variables. `validate` rejects
//! configurations the service cannot run with; `warnings` flags legal but
//! suspicious values for the `validate` CLI command.

use std::env;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use mechanika_core::snapshot::{AUTH_COOKIE_MAX_AGE_SECS, AUTH_COOKIE_NAME};

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Environment variable prefix for overrides.
const ENV_PREFIX: &str = "MECHANIKA";

// =============================================================================
// ConfigError
// =============================================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// I/O failure reading the file.
    #[error("Failed to read {path}: {message}")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// Content failed to parse in the detected format.
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// The path being parsed.
        path: PathBuf,
        /// Parser error message.
        message: String,
    },

    /// File extension does not map to a supported format.
    #[error("Unsupported configuration format: {extension}")]
    UnsupportedFormat {
        /// The offending extension.
        extension: String,
    },

    /// An override variable held an unusable value.
    #[error("Invalid environment variable {name}: {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {message}")]
    Validation {
        /// What is wrong.
        message: String,
    },
}

impl ConfigError {
    /// Creates a file-not-found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported-format error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Creates an invalid-env-var error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }
}

// =============================================================================
// ServiceConfig
// =============================================================================

/// Top-level configuration for the MyMechanika service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Auth cookie settings.
    pub cookie: CookieConfig,
    /// Authentication backend settings.
    pub auth: AuthBackendConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cookie: CookieConfig::default(),
            auth: AuthBackendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, applying environment overrides.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        let format = ConfigFormat::from_path(path)?;
        let mut config = Self::parse_str(&content, format)
            .map_err(|e| ConfigError::parse(path, e.to_string()))?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses configuration from a string in the given format.
    ///
    /// No environment overrides or validation; callers compose those.
    pub fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<Self> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::validation(e.to_string())),
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::validation(e.to_string()))
            }
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::validation(e.to_string())),
        }
    }

    /// Applies `MECHANIKA_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        if let Ok(value) = env::var(format!("{}_HOST", ENV_PREFIX)) {
            self.server.host = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(
                    format!("{}_HOST", ENV_PREFIX),
                    format!("not an IP address: {}", value),
                )
            })?;
        }
        if let Ok(value) = env::var(format!("{}_PORT", ENV_PREFIX)) {
            self.server.port = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(
                    format!("{}_PORT", ENV_PREFIX),
                    format!("not a port number: {}", value),
                )
            })?;
        }
        if let Ok(value) = env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            self.logging.level = value;
        }
        if let Ok(value) = env::var(format!("{}_LOG_FORMAT", ENV_PREFIX)) {
            self.logging.format = value;
        }
        if let Ok(value) = env::var(format!("{}_STATE_FILE", ENV_PREFIX)) {
            self.auth.state_file = Some(PathBuf::from(value));
        }
        Ok(())
    }

    /// Rejects configurations the service cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.cookie.name.is_empty() {
            return Err(ConfigError::validation("cookie.name must not be empty"));
        }
        if self
            .cookie
            .name
            .chars()
            .any(|c| c == ';' || c == '=' || c == ',' || c.is_whitespace())
        {
            return Err(ConfigError::validation(
                "cookie.name must not contain ';', '=', ',' or whitespace",
            ));
        }
        if self.cookie.max_age_secs == 0 {
            return Err(ConfigError::validation(
                "cookie.max_age_secs must be positive",
            ));
        }
        if self.server.request_timeout.is_zero() {
            return Err(ConfigError::validation(
                "server.request_timeout must be positive",
            ));
        }
        if !matches!(
            self.logging.level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ConfigError::validation(format!(
                "logging.level must be one of trace/debug/info/warn/error, got {}",
                self.logging.level
            )));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json" | "compact") {
            return Err(ConfigError::validation(format!(
                "logging.format must be one of text/json/compact, got {}",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Flags legal but suspicious values.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.auth.state_file.is_none() {
            warnings.push(
                "auth.state_file is not set; sessions will not survive a restart".to_string(),
            );
        }
        if self.auth.simulated_latency_ms == 0 {
            warnings
                .push("auth.simulated_latency_ms is 0; fixture logins resolve instantly".to_string());
        }
        if self.cookie.max_age_secs < 3600 {
            warnings.push(format!(
                "cookie.max_age_secs is {} (< 1 hour); sessions will drop frequently",
                self.cookie.max_age_secs
            ));
        }
        if self.server.request_timeout > Duration::from_secs(300) {
            warnings.push(format!(
                "server.request_timeout is {}s (> 5 minutes)",
                self.server.request_timeout.as_secs()
            ));
        }

        warnings
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Sets the state file.
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth.state_file = Some(path.into());
        self
    }

    /// Configuration preset for tests: ephemeral port, zero login latency.
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.server.port = 0;
        config.auth.simulated_latency_ms = 0;
        config
    }
}

// =============================================================================
// ServerConfig
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Bind port.
    pub port: u16,
    /// Per-request timeout.
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Graceful shutdown deadline.
    #[serde(with = "duration_secs")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

// =============================================================================
// CookieConfig
// =============================================================================

/// Auth cookie settings.
///
/// Defaults are the wire contract shared with the dashboard client; override
/// only for staging environments that must not collide on cookie names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Cookie name.
    pub name: String,
    /// Cookie lifetime in seconds.
    pub max_age_secs: u64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: AUTH_COOKIE_NAME.to_string(),
            max_age_secs: AUTH_COOKIE_MAX_AGE_SECS,
        }
    }
}

// =============================================================================
// AuthBackendConfig
// =============================================================================

/// Authentication backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthBackendConfig {
    /// Artificial latency applied to fixture credential checks, in
    /// milliseconds. Matches the feel of a real credential service.
    pub simulated_latency_ms: u64,
    /// Session persistence file. `None` keeps sessions in memory only.
    pub state_file: Option<PathBuf>,
}

impl Default for AuthBackendConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 1000,
            state_file: None,
        }
    }
}

// =============================================================================
// LoggingConfig
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn, error.
    pub level: String,
    /// Output format: text, json, compact.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

// =============================================================================
// duration_secs serde module
// =============================================================================

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// =============================================================================
// Tests
// =============================================================================
