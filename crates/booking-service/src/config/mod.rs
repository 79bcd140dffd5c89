use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::bookings::{BookingConfig, OverlapPolicy};

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
///
/// Environment parsing happens here, at the binary boundary; the booking
/// core only ever sees plain values.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub booking: BookingSettings,
    pub events: EventNotifierConfig,
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

        let scope_timeout_ms = env::var("APP_BOOKING_SCOPE_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidScopeTimeout)?;

        let block_pending = match env::var("APP_BOOKING_BLOCK_PENDING") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidBlockPendingFlag)?,
            Err(_) => true,
        };

        let topic = env::var("APP_EVENT_TOPIC").unwrap_or_else(|_| "booking-events".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            booking: BookingSettings {
                scope_timeout_ms,
                block_pending,
            },
            events: EventNotifierConfig { topic },
        })
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

/// Dials for the booking core, sourced from the environment here and handed
/// over as plain values.
#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub scope_timeout_ms: u64,
    /// When false, pending bookings no longer hold their range and overlap
    /// races are resolved at confirm time instead of creation time.
    pub block_pending: bool,
}

impl BookingSettings {
    pub fn booking_config(&self) -> BookingConfig {
        BookingConfig {
            scope_timeout: Duration::from_millis(self.scope_timeout_ms),
            overlap_policy: if self.block_pending {
                OverlapPolicy::BlockActive
            } else {
                OverlapPolicy::BlockAcceptedOnly
            },
        }
    }
}

/// Destination label for the outbound event notifier.
#[derive(Debug, Clone)]
pub struct EventNotifierConfig {
    pub topic: String,
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScopeTimeout,
    InvalidBlockPendingFlag,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScopeTimeout => {
                write!(f, "APP_BOOKING_SCOPE_TIMEOUT_MS must be a valid u64")
            }
            ConfigError::InvalidBlockPendingFlag => {
                write!(f, "APP_BOOKING_BLOCK_PENDING must be a boolean flag")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
