use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::board::{BoardError, BoardStore, DEFAULT_DUE_IN_DAYS};

/// Upper bound accepted for `BOARD_DUE_IN_DAYS`.
pub const MAX_DUE_IN_DAYS: i64 = 3650;

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
    pub board: BoardConfig,
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

        let seed = BoardSeed::parse(
            &env::var("BOARD_SEED").unwrap_or_else(|_| "sample".to_string()),
        )?;
        let due_in_days = match env::var("BOARD_DUE_IN_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| (0..=MAX_DUE_IN_DAYS).contains(days))
                .ok_or(ConfigError::InvalidDueInDays(raw))?,
            Err(_) => DEFAULT_DUE_IN_DAYS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            board: BoardConfig { seed, due_in_days },
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Initial contents of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSeed {
    Sample,
    Empty,
}

impl BoardSeed {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sample" | "demo" => Ok(Self::Sample),
            "empty" | "none" => Ok(Self::Empty),
            _ => Err(ConfigError::InvalidSeed(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub seed: BoardSeed,
    pub due_in_days: i64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            seed: BoardSeed::Sample,
            due_in_days: DEFAULT_DUE_IN_DAYS,
        }
    }
}

impl BoardConfig {
    pub fn build_store(&self) -> Result<BoardStore, BoardError> {
        let store = match self.seed {
            BoardSeed::Sample => BoardStore::sample()?,
            BoardSeed::Empty => BoardStore::new(),
        };
        Ok(store.with_due_in_days(self.due_in_days))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSeed(String),
    InvalidDueInDays(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSeed(value) => {
                write!(f, "BOARD_SEED must be 'sample' or 'empty', got '{value}'")
            }
            ConfigError::InvalidDueInDays(value) => {
                write!(
                    f,
                    "BOARD_DUE_IN_DAYS must be an integer between 0 and {MAX_DUE_IN_DAYS}, got '{value}'"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSeed(_)
            | ConfigError::InvalidDueInDays(_) => None,
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
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("BOARD_SEED");
        env::remove_var("BOARD_DUE_IN_DAYS");
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
        assert_eq!(config.board.seed, BoardSeed::Sample);
        assert_eq!(config.board.due_in_days, 7);
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
    fn rejects_unknown_seed_and_negative_due_offset() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BOARD_SEED", "archive");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidSeed(value)) if value == "archive"
        ));

        reset_env();
        env::set_var("BOARD_DUE_IN_DAYS", "-3");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidDueInDays(_))
        ));
        reset_env();
    }

    #[test]
    fn due_offset_is_bounded_to_ten_years() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BOARD_DUE_IN_DAYS", "100000000");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidDueInDays(value)) if value == "100000000"
        ));

        env::set_var("BOARD_DUE_IN_DAYS", "3650");
        let config = AppConfig::load().expect("upper bound is accepted");
        assert_eq!(config.board.due_in_days, MAX_DUE_IN_DAYS);
        reset_env();
    }

    #[test]
    fn empty_seed_builds_an_empty_board() {
        let config = BoardConfig {
            seed: BoardSeed::Empty,
            due_in_days: 3,
        };
        let store = config.build_store().expect("empty board builds");
        assert_eq!(store.application_count(), 0);
    }
}
