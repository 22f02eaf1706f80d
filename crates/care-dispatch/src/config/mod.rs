use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::dispatch::settings::{DispatchSettings, PriorityWeighting, SettingsError};
use crate::requests::domain::UnknownLabel;

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
    pub records: RecordConfig,
    pub dispatch: DispatchSettings,
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

        let requests_csv = env::var("APP_REQUESTS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            records: RecordConfig { requests_csv },
            dispatch: load_dispatch_settings()?,
        })
    }
}

fn load_dispatch_settings() -> Result<DispatchSettings, ConfigError> {
    let defaults = DispatchSettings::default();

    let auto_matching_enabled = match env::var("DISPATCH_AUTO_MATCHING") {
        Ok(value) => parse_flag("DISPATCH_AUTO_MATCHING", &value)?,
        Err(_) => defaults.auto_matching_enabled,
    };
    let max_response_hours = match env::var("DISPATCH_MAX_RESPONSE_HOURS") {
        Ok(value) => parse_number("DISPATCH_MAX_RESPONSE_HOURS", &value)?,
        Err(_) => defaults.max_response_hours,
    };
    let max_distance_miles = match env::var("DISPATCH_MAX_DISTANCE_MILES") {
        Ok(value) => parse_number("DISPATCH_MAX_DISTANCE_MILES", &value)?,
        Err(_) => defaults.max_distance_miles,
    };
    let priority_weighting = match env::var("DISPATCH_PRIORITY_WEIGHTING") {
        Ok(value) => value
            .parse::<PriorityWeighting>()
            .map_err(|source| ConfigError::InvalidWeighting { source })?,
        Err(_) => defaults.priority_weighting,
    };

    let settings = DispatchSettings {
        auto_matching_enabled,
        max_response_hours,
        max_distance_miles,
        priority_weighting,
    };
    settings.validate().map_err(ConfigError::InvalidDispatch)?;
    Ok(settings)
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
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

/// Where request records are loaded from. `None` falls back to the built-in
/// sample set.
#[derive(Debug, Clone, Default)]
pub struct RecordConfig {
    pub requests_csv: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { name: &'static str, value: String },
    InvalidNumber { name: &'static str, value: String },
    InvalidWeighting { source: UnknownLabel },
    InvalidDispatch(SettingsError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative integer, got '{value}'")
            }
            ConfigError::InvalidWeighting { source } => {
                write!(f, "DISPATCH_PRIORITY_WEIGHTING is invalid: {source}")
            }
            ConfigError::InvalidDispatch(err) => write!(f, "dispatch settings rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidWeighting { source } => Some(source),
            ConfigError::InvalidDispatch(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_REQUESTS_CSV",
            "DISPATCH_AUTO_MATCHING",
            "DISPATCH_MAX_RESPONSE_HOURS",
            "DISPATCH_MAX_DISTANCE_MILES",
            "DISPATCH_PRIORITY_WEIGHTING",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.records.requests_csv.is_none());
        assert_eq!(config.dispatch, DispatchSettings::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn dispatch_settings_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DISPATCH_AUTO_MATCHING", "off");
        env::set_var("DISPATCH_MAX_RESPONSE_HOURS", "6");
        env::set_var("DISPATCH_MAX_DISTANCE_MILES", "40");
        env::set_var("DISPATCH_PRIORITY_WEIGHTING", "emergency-first");
        env::set_var("APP_REQUESTS_CSV", "/tmp/requests.csv");

        let config = AppConfig::load().expect("config loads");
        assert!(!config.dispatch.auto_matching_enabled);
        assert_eq!(config.dispatch.max_response_hours, 6);
        assert_eq!(config.dispatch.max_distance_miles, 40);
        assert_eq!(
            config.dispatch.priority_weighting,
            PriorityWeighting::EmergencyFirst
        );
        assert_eq!(
            config.records.requests_csv,
            Some(PathBuf::from("/tmp/requests.csv"))
        );
        reset_env();
    }

    #[test]
    fn rejects_malformed_dispatch_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();

        env::set_var("DISPATCH_AUTO_MATCHING", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag { name: "DISPATCH_AUTO_MATCHING", .. })
        ));
        reset_env();

        env::set_var("DISPATCH_MAX_DISTANCE_MILES", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidDispatch(SettingsError::ZeroDistance))
        ));
        reset_env();

        env::set_var("DISPATCH_PRIORITY_WEIGHTING", "fastest");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidWeighting { .. })
        ));
        reset_env();
    }
}
