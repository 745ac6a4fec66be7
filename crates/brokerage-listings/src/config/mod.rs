use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::listings::locale::Language;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub sources: SourceConfig,
    pub sync: SyncConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let sources = SourceConfig {
            provider_url: optional_var("LISTINGS_PROVIDER_URL"),
            provider_api_key: optional_var("LISTINGS_PROVIDER_API_KEY"),
            cms_url: optional_var("LISTINGS_CMS_URL"),
        };

        let stale_after = seconds_var("LISTINGS_STALE_AFTER_SECS", 600)?;
        let refresh_interval = seconds_var("LISTINGS_REFRESH_INTERVAL_SECS", 600)?;
        let locale = env::var("LISTINGS_DEFAULT_LOCALE").unwrap_or_else(|_| "fi".to_string());
        let default_language =
            Language::from_tag(&locale).ok_or(ConfigError::InvalidLocale { value: locale })?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            sources,
            sync: SyncConfig {
                stale_after,
                refresh_interval: (!refresh_interval.is_zero()).then_some(refresh_interval),
                default_language,
            },
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn seconds_var(key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match optional_var(key) {
        None => Ok(Duration::from_secs(default)),
        Some(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidDuration { key }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Upstream listing endpoints.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    pub provider_url: Option<String>,
    pub provider_api_key: Option<String>,
    /// Content-management fallback; disabled when unset.
    pub cms_url: Option<String>,
}

impl SourceConfig {
    pub fn require_provider_url(&self) -> Result<&str, ConfigError> {
        self.provider_url
            .as_deref()
            .ok_or(ConfigError::MissingProviderUrl)
    }
}

/// Cache refresh policy.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub stale_after: Duration,
    /// `None` disables the refresh timer.
    pub refresh_interval: Option<Duration>,
    pub default_language: Language,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDuration { key: &'static str },
    InvalidLocale { value: String },
    MissingProviderUrl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDuration { key } => {
                write!(f, "{key} must be a whole number of seconds")
            }
            ConfigError::InvalidLocale { value } => {
                write!(f, "LISTINGS_DEFAULT_LOCALE '{value}' is not one of fi, sv, en")
            }
            ConfigError::MissingProviderUrl => write!(f, "LISTINGS_PROVIDER_URL is not set"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDuration { .. }
            | ConfigError::InvalidLocale { .. }
            | ConfigError::MissingProviderUrl => None,
        }
    }
}
